//! CLI integration tests.
//!
//! Success paths over real workbooks are covered by the library crates
//! (the scanner is exercised against in-memory ranges); these tests pin
//! the binary's argument handling and error behavior.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn laporan() -> Command {
    Command::cargo_bin("laporan").expect("binary built")
}

#[test]
fn missing_workbook_exits_nonzero_with_message() {
    laporan()
        .arg("/no/such/file.xlsx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unreadable workbook"));
}

#[test]
fn garbage_file_is_unreadable() {
    let mut file = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .expect("temp file");
    file.write_all(b"definitely not a zip archive")
        .expect("write");

    laporan()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unreadable workbook"));
}

#[test]
fn workbook_argument_is_required() {
    laporan()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn output_flag_requires_template() {
    laporan()
        .args(["book.xlsx", "--output", "out.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn help_mentions_supported_formats() {
    laporan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(".xlsx"));
}
