//! CLI test cases. None of these need Tesseract: they either stop before OCR
//! or feed already-recognized text through `--text`.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;

/// Create a new `Command` with our binary.
fn cmd() -> Command {
    Command::cargo_bin("labscan").unwrap()
}

fn empty_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("labscan.toml");
    std::fs::write(&path, "").unwrap();
    path
}

#[test]
fn test_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_version() {
    cmd().arg("--version").assert().success();
}

#[test]
fn test_image_is_required() {
    cmd().assert().failure();
}

#[test]
fn test_text_input_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("report.txt");
    let out = dir.path().join("report.csv");
    std::fs::write(
        &text,
        "Pt. Name: Asha Verma\nHemoglobin: 13.5 g/dL\nWBC: 7,500/cmm\nPlatelets: 25O,OOO\n",
    )
    .unwrap();

    cmd()
        .arg("--text")
        .arg(&text)
        .arg("--output")
        .arg(&out)
        .arg("--config")
        .arg(empty_config(dir.path()))
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Patient Name,Parameter,Value\n\
         Asha Verma,Hemoglobin,13.5\n\
         Asha Verma,WBC,7500\n\
         Asha Verma,Platelets,250000\n"
    );
}

#[test]
fn test_text_without_values_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("blank.txt");
    let out = dir.path().join("blank.csv");
    std::fs::write(&text, "nothing to see here\n").unwrap();

    cmd()
        .arg("--text")
        .arg(&text)
        .arg("-o")
        .arg(&out)
        .arg("-c")
        .arg(empty_config(dir.path()))
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "Patient Name,Parameter,Value\n");
}

#[test]
fn test_undecodable_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    let out = dir.path().join("scan.csv");
    std::fs::write(&image, b"not really a png").unwrap();

    cmd()
        .arg(&image)
        .arg("-o")
        .arg(&out)
        .arg("-c")
        .arg(empty_config(dir.path()))
        .assert()
        .failure();

    assert!(!out.exists());
}

#[test]
fn test_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("--text")
        .arg(dir.path().join("report.txt"))
        .arg("-c")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure();
}
