use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE_TEXT: &str = "Panadería Señor\nFactura: A-00123\nPan francés 10 0.50 5.00\nTotal: S/ 5.00\n";

/// A temp dir holding an empty config file, so runs never see the user's config.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    (dir, config)
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn factura(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("factura").unwrap();
    cmd.env_remove("FACTURA_OCR_ENDPOINT")
        .env_remove("FACTURA_OCR_KEY")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_parse_text_to_json() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "scan.txt", INVOICE_TEXT);

    let output = factura(&config).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["invoice_number"], "A-00123");
    assert_eq!(value["company"], "Panadería Señor");
    assert_eq!(value["total"], "5.00");
    assert_eq!(value["customer"], "");
    assert_eq!(value["items"][0], "Pan francés 10 0.50 5.00");
}

#[test]
fn test_parse_saved_ocr_response() {
    let (dir, config) = workspace();
    let input = write(
        dir.path(),
        "scan.json",
        r#"{"status":"succeeded","analyzeResult":{"readResults":[{"page":1,"lines":[{"text":"ACME CORP"},{"text":"RUC: 12345678901"}]}]}}"#,
    );

    let output = factura(&config).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["company"], "ACME CORP");
    assert_eq!(value["tax_id"], "12345678901");
}

#[test]
fn test_parse_legacy_keys_with_provenance() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "scan.txt", INVOICE_TEXT);

    let output = factura(&config)
        .args(["parse", "--legacy-keys", "--provenance"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["record"]["numero_factura"], "A-00123");
    assert_eq!(value["record"]["empresa"], "Panadería Señor");
    assert_eq!(value["provenance"][0]["field"], "invoice_number");
}

#[test]
fn test_parse_csv_summary() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "scan.txt", INVOICE_TEXT);

    factura(&config)
        .args(["parse", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("field,value"))
        .stdout(predicate::str::contains("invoice_number,A-00123"))
        .stdout(predicate::str::contains("total,5.00"));
}

#[test]
fn test_parse_text_summary_limits_items() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "scan.txt", INVOICE_TEXT);

    factura(&config)
        .args(["parse", "--format", "text", "--items", "1"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice number: A-00123"))
        .stdout(predicate::str::contains("Items (1 of 2):"))
        .stdout(predicate::str::contains("  1. Pan francés 10 0.50 5.00"))
        .stdout(predicate::str::contains("  2. ").not());
}

#[test]
fn test_parse_writes_output_file() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "scan.txt", INVOICE_TEXT);
    let out = dir.path().join("out.json");

    factura(&config)
        .arg("parse")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["invoice_number"], "A-00123");
}

#[test]
fn test_parse_missing_file_fails() {
    let (dir, config) = workspace();

    factura(&config)
        .arg("parse")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_requires_credentials() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "scan.jpg", "not really an image");

    factura(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR endpoint is not configured"));
}

#[test]
fn test_batch_over_text_files() {
    let (dir, config) = workspace();
    let inputs = dir.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    write(&inputs, "one.txt", INVOICE_TEXT);
    write(&inputs, "two.txt", "ACME CORP\nRUC: 12345678901\n");
    let out = dir.path().join("out");

    let pattern = format!("{}/*.txt", inputs.display());
    factura(&config)
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(out.join("one.json").exists());
    assert!(out.join("two.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("one.txt,success,A-00123"));
    assert!(summary.contains("two.txt,success,,,ACME CORP,12345678901"));
}

#[test]
fn test_batch_empty_text_is_success() {
    let (dir, config) = workspace();
    let inputs = dir.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    write(&inputs, "blank.txt", "");
    write(&inputs, "no_lines.json", r#"{"status":"succeeded","analyzeResult":{"readResults":[]}}"#);
    let out = dir.path().join("out");

    let pattern = format!("{}/*", inputs.display());
    factura(&config)
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("blank.txt,success,,,,,,,,0,"));
    assert!(summary.contains("no_lines.json,success,,,,,,,,0,"));
    assert!(!summary.contains(",error,"));
}

#[test]
fn test_batch_keeps_inputs_next_to_outputs() {
    let (dir, config) = workspace();
    let saved = r#"{"status":"succeeded","analyzeResult":{"readResults":[{"page":1,"lines":[{"text":"Factura: A-7"}]}]}}"#;
    write(dir.path(), "scan.json", saved);
    write(dir.path(), "scan.txt", INVOICE_TEXT);

    let pattern = format!("{}/scan.*", dir.path().display());
    factura(&config)
        .args(["batch", &pattern, "--output-dir"])
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("scan.json")).unwrap(), saved);
    let from_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("scan.json.json")).unwrap()).unwrap();
    let from_txt: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("scan.txt.json")).unwrap()).unwrap();
    assert_eq!(from_json["invoice_number"], "A-7");
    assert_eq!(from_txt["invoice_number"], "A-00123");
}

#[test]
fn test_batch_no_matches_fails() {
    let (dir, config) = workspace();
    let pattern = format!("{}/*.txt", dir.path().display());

    factura(&config)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_config_get_from_explicit_file() {
    let (_dir, config) = workspace();

    factura(&config)
        .args(["config", "get", "ocr.poll.max_attempts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30"));
}
