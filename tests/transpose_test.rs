//! Integration tests for the csvtranspose binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn csvtranspose() -> Command {
    Command::cargo_bin("csvtranspose").unwrap()
}

#[test]
fn test_transpose_file_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let in_path = temp_dir.path().join("in.csv");
    let out_path = temp_dir.path().join("out.csv");
    fs::write(&in_path, "1,2,3\n4,5,6\n")?;

    csvtranspose()
        .arg(in_path.to_str().unwrap())
        .arg(out_path.to_str().unwrap())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out_path)?, "1,4\n2,5\n3,6\n");
    Ok(())
}

#[test]
fn test_transpose_stdin_to_stdout() {
    csvtranspose()
        .args(["-", "-"])
        .write_stdin("a,b\nc,d\n")
        .assert()
        .success()
        .stdout(predicate::eq("a,c\nb,d\n"));
}

#[test]
fn test_ragged_input_truncates_to_shortest_row() {
    csvtranspose()
        .args(["-", "-"])
        .write_stdin("a,b,c\nd\n")
        .assert()
        .success()
        .stdout(predicate::eq("a,d\n"));
}

#[test]
fn test_missing_input_file_fails() {
    csvtranspose()
        .args(["no-such-file.csv", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-file.csv"));
}
