//! OCR collaborator: recognized text model and the cloud Read API client.

mod response;
mod upload;

#[cfg(feature = "azure")]
mod client;
#[cfg(feature = "azure")]
mod poll;

pub use response::{AnalyzeResult, OperationStatus, ReadLine, ReadOperation, ReadPage, ServiceErrorBody};
pub use upload::ImageUpload;

#[cfg(feature = "azure")]
pub use client::AzureReadClient;
#[cfg(feature = "azure")]
pub use poll::{poll_operation, OperationSource, PollSchedule};

use serde::{Deserialize, Serialize};

/// Recognized text of one document, in reading order.
///
/// Holds both the individual lines and their `\n`-joined concatenation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedText {
    lines: Vec<String>,
    full_text: String,
}

impl RecognizedText {
    /// Build from lines in top-to-bottom order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let full_text = lines.join("\n");
        Self { lines, full_text }
    }

    /// Build from plain text, one recognized line per text line.
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Flatten all pages of a finished analysis, page order then line order.
    pub fn from_analyze_result(result: &AnalyzeResult) -> Self {
        Self::from_lines(
            result
                .read_results
                .iter()
                .flat_map(|page| page.lines.iter())
                .map(|line| line.text.as_str()),
        )
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
