//! Rendering and writing of extraction results.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use factura_core::invoice::ExtractionResult;
use factura_core::models::config::OutputConfig;
use factura_core::models::invoice::{Field, InvoiceRecord};

/// Output options shared by the extracting commands.
#[derive(Args, Clone, Debug)]
pub struct OutputArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Check extracted values for consistency
    #[arg(long)]
    pub validate: bool,

    /// Print the full recognized text
    #[arg(long)]
    pub show_text: bool,

    /// Include which rule produced each field (JSON only)
    #[arg(long)]
    pub provenance: bool,

    /// Use the legacy Spanish JSON keys (numero_factura, ruc_nit, ...)
    #[arg(long)]
    pub legacy_keys: bool,

    /// Number of items shown in the text summary (0 = all)
    #[arg(long)]
    pub items: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV field/value table
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Effective rendering settings: config file values overridden by flags.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub legacy_keys: bool,
    pub pretty: bool,
    pub provenance: bool,
    pub display_items: usize,
    pub currency: String,
}

impl RenderOptions {
    pub fn resolve(args: &OutputArgs, config: &OutputConfig) -> Self {
        Self {
            format: args.format,
            legacy_keys: args.legacy_keys || config.legacy_keys,
            pretty: config.pretty,
            provenance: args.provenance,
            display_items: args.items.unwrap_or(config.display_items),
            currency: config.currency.clone(),
        }
    }
}

/// Write the rendered result to the output file or stdout, and report
/// warnings and the recognized text on stderr.
pub fn emit(result: &ExtractionResult, args: &OutputArgs, config: &OutputConfig) -> anyhow::Result<()> {
    let options = RenderOptions::resolve(args, config);
    let rendered = render(result, &options)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    if !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    if args.show_text {
        eprintln!();
        eprintln!("{}", style("Recognized text:").blue());
        eprintln!("{}", result.raw_text);
    }

    Ok(())
}

/// Render a result in the requested format.
pub fn render(result: &ExtractionResult, options: &RenderOptions) -> anyhow::Result<String> {
    match options.format {
        OutputFormat::Json => format_json(result, options),
        OutputFormat::Csv => format_csv(&result.record),
        OutputFormat::Text => Ok(format_text(&result.record, options)),
    }
}

#[derive(Serialize)]
struct WithProvenance<'a, R: Serialize> {
    record: R,
    provenance: &'a [factura_core::invoice::FieldProvenance],
    warnings: &'a [String],
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn format_json(result: &ExtractionResult, options: &RenderOptions) -> anyhow::Result<String> {
    let record = &result.record;
    let json = match (options.legacy_keys, options.provenance) {
        (false, false) => to_json(record, options.pretty)?,
        (true, false) => to_json(&record.legacy(), options.pretty)?,
        (false, true) => to_json(
            &WithProvenance {
                record,
                provenance: &result.provenance,
                warnings: &result.warnings,
            },
            options.pretty,
        )?,
        (true, true) => to_json(
            &WithProvenance {
                record: record.legacy(),
                provenance: &result.provenance,
                warnings: &result.warnings,
            },
            options.pretty,
        )?,
    };
    Ok(json)
}

/// Field/value table of the populated scalar fields.
pub fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value"])?;
    for (field, value) in record.populated() {
        wtr.write_record([field.key(), value])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn is_amount(field: Field) -> bool {
    matches!(field, Field::Total | Field::Subtotal | Field::Tax)
}

/// Human-readable summary. Only the first `display_items` items are listed.
pub fn format_text(record: &InvoiceRecord, options: &RenderOptions) -> String {
    let mut output = String::new();

    if record.populated().next().is_none() {
        output.push_str("No invoice fields found\n");
    }

    for (field, value) in record.populated() {
        if is_amount(field) && !options.currency.is_empty() {
            output.push_str(&format!("{}: {} {}\n", field.label(), options.currency, value));
        } else {
            output.push_str(&format!("{}: {}\n", field.label(), value));
        }
    }

    if !record.items.is_empty() {
        let shown = match options.display_items {
            0 => record.items.len(),
            n => n.min(record.items.len()),
        };
        output.push('\n');
        output.push_str(&format!("Items ({} of {}):\n", shown, record.items.len()));
        for (i, item) in record.items.iter().take(shown).enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, item));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use factura_core::invoice::{InvoiceExtractor, RuleBasedExtractor};

    fn options(format: OutputFormat) -> RenderOptions {
        RenderOptions {
            format,
            legacy_keys: false,
            pretty: false,
            provenance: false,
            display_items: 5,
            currency: "S/".to_string(),
        }
    }

    fn result() -> ExtractionResult {
        RuleBasedExtractor::new().extract_from_text(
            "Panadería Señor\nFactura: A-00123\nPan francés 10 0.50 5.00\nTotal: S/ 5.00",
        )
    }

    #[test]
    fn test_json_is_utf8_verbatim() {
        let json = render(&result(), &options(OutputFormat::Json)).unwrap();
        assert!(json.contains("\"company\":\"Panadería Señor\""));
        assert!(json.contains("\"items\":[\"Pan francés 10 0.50 5.00\",\"Total: S/ 5.00\"]"));
    }

    #[test]
    fn test_legacy_json() {
        let mut opts = options(OutputFormat::Json);
        opts.legacy_keys = true;
        let json = render(&result(), &opts).unwrap();
        assert!(json.contains("\"numero_factura\":\"A-00123\""));
        assert!(json.contains("\"empresa\":\"Panadería Señor\""));
    }

    #[test]
    fn test_json_with_provenance() {
        let mut opts = options(OutputFormat::Json);
        opts.provenance = true;
        let value: serde_json::Value =
            serde_json::from_str(&render(&result(), &opts).unwrap()).unwrap();
        assert_eq!(value["record"]["invoice_number"], "A-00123");
        assert_eq!(value["provenance"][0]["field"], "invoice_number");
        assert_eq!(value["provenance"][0]["matched"]["rule"], "labeled");
    }

    #[test]
    fn test_csv_lists_populated_fields() {
        let csv = render(&result(), &options(OutputFormat::Csv)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert!(lines.contains(&"invoice_number,A-00123"));
        assert!(lines.contains(&"total,5.00"));
        assert!(!csv.contains("customer"));
    }

    #[test]
    fn test_text_truncates_items_for_display_only() {
        let mut record = InvoiceRecord::new();
        record.items = (1..=7).map(|i| format!("Item {i} 1 {i}.00")).collect();
        let text = format_text(&record, &options(OutputFormat::Text));
        assert!(text.contains("Items (5 of 7)"));
        assert!(text.contains("5. Item 5 1 5.00"));
        assert!(!text.contains("Item 6"));
        assert_eq!(record.items.len(), 7);
    }

    #[test]
    fn test_text_amounts_have_currency() {
        let text = format_text(&result().record, &options(OutputFormat::Text));
        assert!(text.contains("Total: S/ 5.00"));
        assert!(text.contains("Invoice number: A-00123"));
    }

    #[test]
    fn test_text_empty_record() {
        let text = format_text(&InvoiceRecord::new(), &options(OutputFormat::Text));
        assert_eq!(text, "No invoice fields found\n");
    }
}
