//! Batch processing command for multiple invoice files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use factura_core::invoice::{ExtractionResult, InvoiceExtractor, RuleBasedExtractor};
use factura_core::models::config::FacturaConfig;
use factura_core::ocr::{AzureReadClient, ImageUpload};

use super::parse::{is_recognized_text, load_recognized};
use super::{load_config, ServiceArgs};
use crate::output::{render, OutputFormat, RenderOptions};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (images, .txt or saved OCR .json)
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Check extracted values for consistency
    #[arg(long)]
    validate: bool,

    /// Use the legacy Spanish JSON keys
    #[arg(long)]
    legacy_keys: bool,

    #[command(flatten)]
    service: ServiceArgs,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// Lazily built OCR client, so text-only batches need no credentials.
struct Processor<'a> {
    config: &'a FacturaConfig,
    extractor: RuleBasedExtractor,
    client: Option<AzureReadClient>,
}

impl Processor<'_> {
    fn client(&mut self) -> anyhow::Result<&AzureReadClient> {
        if self.client.is_none() {
            self.client = Some(AzureReadClient::new(self.config.ocr.clone())?);
        }
        self.client
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("OCR client unavailable"))
    }

    async fn process(&mut self, path: &Path) -> anyhow::Result<ExtractionResult> {
        let text = if is_recognized_text(path) {
            load_recognized(path)?
        } else if ImageUpload::is_supported(path) {
            let upload = ImageUpload::from_path(path)?;
            self.client()?.recognize(&upload).await?
        } else {
            anyhow::bail!("Unsupported file format: {}", path.display());
        };

        if text.is_empty() {
            warn!("No text detected in {}", path.display());
        }

        Ok(self.extractor.extract(&text))
    }
}

fn is_batch_input(path: &Path) -> bool {
    is_recognized_text(path) || ImageUpload::is_supported(path)
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.service.apply(&mut config.ocr);

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_batch_input(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut processor = Processor {
        config: &config,
        extractor: RuleBasedExtractor::new().with_validation(args.validate),
        client: None,
    };

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = processor.process(&path).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => results.push(ProcessResult {
                path,
                result: Some(result),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        let options = RenderOptions {
            format: args.format,
            legacy_keys: args.legacy_keys || config.output.legacy_keys,
            pretty: config.output.pretty,
            provenance: false,
            display_items: config.output.display_items,
            currency: config.output.currency.clone(),
        };

        let mut names = OutputNames::new(output_dir, results.iter().map(|r| r.path.as_path()))?;

        for entry in &successful {
            if let Some(result) = &entry.result {
                let output_path = names.claim(&entry.path, args.format.extension());
                fs::write(&output_path, render(result, &options)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for entry in &failed {
            println!(
                "  - {}: {}",
                entry.path.display(),
                entry.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Per-file output names that never overwrite an input or each other.
///
/// `scan.jpg` becomes `scan.json`; if that name is an input file or was
/// already written, the source extension is kept (`scan.jpg.json`) and a
/// counter is added when even that is taken.
struct OutputNames {
    dir: PathBuf,
    taken: HashSet<PathBuf>,
}

impl OutputNames {
    fn new<'a>(output_dir: &Path, inputs: impl IntoIterator<Item = &'a Path>) -> anyhow::Result<Self> {
        let dir = fs::canonicalize(output_dir)?;
        let taken = inputs
            .into_iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();
        Ok(Self { dir, taken })
    }

    fn claim(&mut self, input: &Path, extension: &str) -> PathBuf {
        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("invoice");
        let source = input.extension().and_then(|e| e.to_str()).unwrap_or("in");

        let dir = &self.dir;
        let taken = &mut self.taken;
        std::iter::once(format!("{stem}.{extension}"))
            .chain(std::iter::once(format!("{stem}.{source}.{extension}")))
            .chain((2u32..).map(|n| format!("{stem}.{source}.{n}.{extension}")))
            .map(|name| dir.join(name))
            .find(|path| taken.insert(path.clone()))
            .unwrap_or_else(|| dir.join(format!("{stem}.{extension}")))
    }
}

const SUMMARY_HEADER: [&str; 12] = [
    "filename",
    "status",
    "invoice_number",
    "date",
    "company",
    "tax_id",
    "total",
    "subtotal",
    "tax",
    "items",
    "processing_time_ms",
    "error",
];

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(SUMMARY_HEADER)?;

    for entry in results {
        let filename = entry.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let elapsed = entry.processing_time_ms.to_string();

        if let Some(result) = &entry.result {
            let record = &result.record;
            wtr.write_record([
                filename,
                "success",
                &record.invoice_number,
                &record.date,
                &record.company,
                &record.tax_id,
                &record.total,
                &record.subtotal,
                &record.tax,
                &record.items.len().to_string(),
                &elapsed,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &elapsed,
                entry.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
