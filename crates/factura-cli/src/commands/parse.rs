//! Parse command - extract fields from already recognized text.
//!
//! Accepts either a plain text file (one OCR line per line) or a saved
//! Read API response in JSON, so extraction can be rerun without calling
//! the OCR service again.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{debug, info};

use factura_core::invoice::{InvoiceExtractor, RuleBasedExtractor};
use factura_core::ocr::{AnalyzeResult, OperationStatus, ReadOperation, RecognizedText};

use super::load_config;
use crate::output::{emit, OutputArgs};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Recognized text (.txt) or saved OCR response (.json)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing {}", args.input.display());
    let text = load_recognized(&args.input)?;
    debug!("Loaded {} lines", text.line_count());

    let extractor = RuleBasedExtractor::new().with_validation(args.output.validate);
    let result = extractor.extract(&text);

    emit(&result, &args.output, &config.output)
}

/// Whether a file holds recognized text this command can read.
pub fn is_recognized_text(path: &Path) -> bool {
    matches!(extension(path).as_str(), "txt" | "json")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load recognized text from a .txt file or a saved OCR JSON response.
pub fn load_recognized(path: &Path) -> anyhow::Result<RecognizedText> {
    let content = fs::read_to_string(path)?;

    if extension(path) != "json" {
        return Ok(RecognizedText::from_plain_text(&content));
    }

    let value: serde_json::Value = serde_json::from_str(&content)?;

    // Either the full status document or just its analyzeResult
    let result: AnalyzeResult = if value.get("status").is_some() {
        let operation: ReadOperation = serde_json::from_value(value)?;
        match operation.status {
            OperationStatus::Succeeded => operation
                .analyze_result
                .ok_or_else(|| anyhow::anyhow!("OCR response has no analyzeResult"))?,
            OperationStatus::Failed => {
                anyhow::bail!("OCR response reports a failed analysis: {}", operation.failure_message())
            }
            other => anyhow::bail!("OCR response is not finished (status: {:?})", other),
        }
    } else {
        serde_json::from_value(value)?
    };

    Ok(RecognizedText::from_analyze_result(&result))
}
