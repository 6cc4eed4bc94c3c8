//! Exit codes of the `sentiserve-predict` binary

use std::io::Write;
use std::process::Command;

fn predict() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sentiserve-predict"));
    cmd.env_remove("SENTISERVE_CONFIG")
        .env("SENTISERVE__MODEL__BACKEND", "lexicon");
    cmd
}

#[test]
fn test_no_arguments_exits_1() {
    let output = predict().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_two_arguments_exit_1() {
    let output = predict().args(["a.txt", "b.txt"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_0() {
    let output = predict().arg("--help").output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("sentiserve-predict"));
}

#[test]
fn test_missing_file_exits_1() {
    let output = predict().arg("/nonexistent/review.txt").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_empty_file_exits_1() {
    let file = tempfile::NamedTempFile::new().unwrap();

    let output = predict().arg(file.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_classifies_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "This movie was terrible and boring").unwrap();

    let output = predict().arg(file.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let (_, json) = stdout.split_once("--- Classification Result ---").unwrap();
    let result: serde_json::Value = serde_json::from_str(json.trim()).unwrap();
    assert_eq!(result[0]["label"], "NEGATIVE");
}
