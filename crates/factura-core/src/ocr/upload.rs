//! Uploaded invoice image, normalized for the OCR service.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::error::{InputError, Result};

/// An invoice image decoded and re-encoded as PNG, ready to upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    name: String,
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageUpload {
    /// File extensions accepted as invoice images.
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] =
        &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

    /// Whether the path has a supported image extension.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| Self::SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Read and normalize an image file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !Self::is_supported(path) {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            return Err(InputError::UnsupportedFormat(extension).into());
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(path.display().to_string(), &data)
    }

    /// Decode arbitrary image bytes and re-encode them as PNG.
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(InputError::Empty.into());
        }

        let image =
            image::load_from_memory(data).map_err(|e| InputError::Decode(e.to_string()))?;

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| InputError::Encode(e.to_string()))?;

        let name = name.into();
        debug!(
            "Prepared {} ({}x{}, {} bytes as PNG)",
            name,
            image.width(),
            image.height(),
            png.get_ref().len()
        );

        Ok(Self {
            name,
            png: png.into_inner(),
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// PNG bytes to send.
    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
