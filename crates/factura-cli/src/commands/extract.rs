//! Extract command - OCR an invoice image and extract its fields.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::{debug, info, warn};

use factura_core::invoice::{InvoiceExtractor, RuleBasedExtractor};
use factura_core::ocr::{AzureReadClient, ImageUpload};

use super::{load_config, spinner, ServiceArgs};
use crate::output::{emit, OutputArgs};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input image (jpg, png, bmp, tiff, webp)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    service: ServiceArgs,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.service.apply(&mut config.ocr);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let client = AzureReadClient::new(config.ocr.clone())?;

    info!("Processing file: {}", args.input.display());
    let pb = spinner()?;

    pb.set_message("Preparing image...");
    let upload = ImageUpload::from_path(&args.input)?;

    pb.set_message("Running OCR...");
    let text = match client.recognize(&upload).await {
        Ok(text) => text,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    if text.is_empty() {
        warn!("No text detected in {}", args.input.display());
    }

    pb.set_message("Extracting invoice data...");
    let extractor = RuleBasedExtractor::new().with_validation(args.output.validate);
    let result = extractor.extract(&text);
    pb.finish_and_clear();

    emit(&result, &args.output, &config.output)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
