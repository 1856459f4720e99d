//! Integration tests for the fintel binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn fintel() -> Command {
    Command::cargo_bin("fintel").unwrap()
}

#[test]
fn schemas_lists_all_document_types() {
    fintel()
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary Slip"))
        .stdout(predicate::str::contains("Bank Statement"))
        .stdout(predicate::str::contains("Balance Sheet"))
        .stdout(predicate::str::contains("Invoice"))
        .stdout(predicate::str::contains("Profit and Loss"))
        .stdout(predicate::str::contains("Invoice Amount"));
}

#[test]
fn config_path_points_at_config_json() {
    fintel()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn analyze_without_credential_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("slip.png");
    fs::write(&image, b"fake image bytes").unwrap();

    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{"engine": {"credential_var": "FINTEL_TEST_NO_SUCH_KEY"}}"#,
    )
    .unwrap();

    fintel()
        .args(["analyze", image.to_str().unwrap(), "--doc-type", "Invoice"])
        .args(["--config", config.to_str().unwrap()])
        .env_remove("FINTEL_TEST_NO_SUCH_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("FINTEL_TEST_NO_SUCH_KEY"));
}

#[test]
fn analyze_with_stub_engine_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("a.png");
    fs::write(&image, b"fake image bytes").unwrap();

    // The stub ignores the image path and prompt ($0/$1) and prints a
    // fixed answer. PATH stands in for the credential variable since it
    // is always present.
    let config = dir.path().join("config.json");
    let stub = r#"{"engine": {
        "command": ["sh", "-c",
            "printf '{\"Invoice Amount\": 500, \"Tax Amount\": 50, \"Total Amount\": 550, \"Discount Amount\": 0}'"],
        "credential_var": "PATH",
        "timeout_secs": 10
    }}"#;
    fs::write(&config, stub).unwrap();

    let report = dir.path().join("report.csv");
    fintel()
        .args(["analyze", image.to_str().unwrap(), "--doc-type", "Invoice"])
        .args(["--output", report.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Invoice Amount"))
        .stdout(predicate::str::contains("500.00"));

    let csv = fs::read_to_string(&report).unwrap();
    assert_eq!(
        csv,
        "Document,Invoice Amount,Tax Amount,Total Amount,Discount Amount\na.png,500,50,550,0\n"
    );
}

#[test]
fn all_failed_batch_prints_per_document_notices() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("a.png");
    fs::write(&image, b"fake image bytes").unwrap();

    // Every invocation fails, so the run errors overall, but the output
    // must still say what went wrong with each document.
    let config = dir.path().join("config.json");
    let stub = r#"{"engine": {
        "command": ["sh", "-c", "echo 'model unavailable' >&2; exit 3"],
        "credential_var": "PATH",
        "timeout_secs": 10
    }}"#;
    fs::write(&config, stub).unwrap();

    fintel()
        .args(["analyze", image.to_str().unwrap(), "--doc-type", "Invoice"])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("a.png"))
        .stdout(predicate::str::contains("model unavailable"))
        .stderr(predicate::str::contains("no data extracted"));
}

#[test]
fn unknown_document_type_is_rejected() {
    fintel()
        .args(["analyze", "x.png", "--doc-type", "Ledger"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown document type"));
}
