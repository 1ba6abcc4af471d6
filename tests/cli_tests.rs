//! CLI smoke tests for the edi-resolver binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("edi-resolver").unwrap()
}

#[test]
fn resolve_prints_segment_and_pattern() {
    cmd()
        .args(["resolve", "2010AANM109"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NM1"))
        .stdout(predicate::str::contains("NM1*85*"))
        .stdout(predicate::str::contains("EXACT"));
}

#[test]
fn resolve_json_output_is_parseable() {
    let output = cmd()
        .args(["resolve", "2300HI01-2 -- BK/ABK", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["segment_id"], "HI");
    assert_eq!(json["pattern"], "HI*ABK");
}

#[test]
fn resolve_unclassifiable_reference_fails() {
    cmd()
        .args(["resolve", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("12345"));
}

#[test]
fn resolve_verifies_against_document() {
    let mut doc = tempfile::NamedTempFile::new().unwrap();
    write!(doc, "ISA*00*x~NM1*IL*1*DOE~CLM*A1*100~").unwrap();

    cmd()
        .args(["resolve", "2010BANM109", "--document"])
        .arg(doc.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("FOUND"));

    cmd()
        .args(["resolve", "2400DTP03", "--document"])
        .arg(doc.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn batch_reports_per_row_outcomes() {
    let mut table = tempfile::NamedTempFile::with_suffix(".tsv").unwrap();
    writeln!(table, "display_name\treference").unwrap();
    writeln!(table, "Subscriber\t2010BANM109").unwrap();
    writeln!(table, "Claim ID\tCLM01").unwrap();
    writeln!(table, "Mystery\t99999").unwrap();

    cmd()
        .args(["batch"])
        .arg(table.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("NM1*IL*"))
        .stdout(predicate::str::contains("CLM*"))
        .stdout(predicate::str::contains("NOT FOUND"))
        .stdout(predicate::str::contains("Mystery (99999)"));
}

#[test]
fn batch_row_range_limits_processing() {
    let mut table = tempfile::NamedTempFile::with_suffix(".tsv").unwrap();
    writeln!(table, "Subscriber\t2010BANM109").unwrap();
    writeln!(table, "Claim ID\tCLM01").unwrap();

    cmd()
        .args(["batch", "--rows", "2"])
        .arg(table.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CLM*"))
        .stdout(predicate::str::contains("NM1*IL*").not());
}

#[test]
fn batch_tsv_output_has_header() {
    let mut table = tempfile::NamedTempFile::with_suffix(".tsv").unwrap();
    writeln!(table, "Claim ID\tCLM01").unwrap();

    cmd()
        .args(["batch", "--format", "tsv"])
        .arg(table.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "display_name\treference\tsegment_id\tpattern\tconfidence\tfound",
        ));
}

#[test]
fn registry_list_shows_segment_sets() {
    cmd()
        .args(["registry", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("837P"))
        .stdout(predicate::str::contains("NM1"))
        .stdout(predicate::str::contains("CLM"));
}

#[test]
fn registry_loops_filters_by_segment() {
    cmd()
        .args(["registry", "loops", "--segment", "REF"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2010AA"))
        .stdout(predicate::str::contains("NM1").not());
}

#[test]
fn custom_registry_flag_is_honored() {
    let mut registry = tempfile::NamedTempFile::with_suffix(".json").unwrap();
    write!(
        registry,
        r#"{{
            "version": "1.0.0",
            "created_at": "2024-01-01T00:00:00Z",
            "transaction_set": "835",
            "numbered_segments": ["NM1", "SVC"],
            "plain_segments": ["CLP", "BPR"],
            "two_letter_segments": [],
            "loop_qualifiers": []
        }}"#
    )
    .unwrap();

    cmd()
        .args(["resolve", "CLP01", "--registry"])
        .arg(registry.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CLP"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("registry"));
}
