//! Integration tests for the csvjoin binary
//!
//! End-to-end runs against the static files in tests/data, plus
//! tempfile-backed cases for separators, pass-through fidelity, and error
//! handling.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn data(name: &str) -> String {
    PathBuf::from("tests/data")
        .join(name)
        .to_str()
        .unwrap()
        .to_string()
}

fn csvjoin() -> Command {
    Command::cargo_bin("csvjoin").unwrap()
}

#[test]
fn test_canonical_no_backtrack() {
    // NYC matches after table 1's cursor passes its LA row; the later LA row
    // of table 0 can therefore never match. Exactly one output row.
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "0:city"])
        .args(["--out-col", "0:pop"])
        .args(["--out-col", "1:area"])
        .assert()
        .success()
        .stdout(predicate::eq("NYC,8,300\n"));
}

#[test]
fn test_three_way_join() {
    csvjoin()
        .args(["-i", &data("users.csv")])
        .args(["-i", &data("orders.csv")])
        .args(["-i", &data("profiles.csv")])
        .args(["--join", "0:id", "1:user_id", "2:uid"])
        .args(["--out-col", "0:name"])
        .args(["--out-col", "1:total"])
        .args(["--out-col", "2:city"])
        .assert()
        .success()
        .stdout(predicate::eq("John,1200,NYC\nJane,800,LA\nBob,150,SF\n"));
}

#[test]
fn test_join_tokens_in_any_order() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "1:city", "0:city"])
        .args(["--out-col", "0:city"])
        .assert()
        .success()
        .stdout(predicate::eq("NYC\n"));
}

#[test]
fn test_formula_output_columns() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "0:pop + 1:area"])
        .args(["--out-col", "1:area / 0:pop"])
        .assert()
        .success()
        .stdout(predicate::eq("308,37.5\n"));
}

#[test]
fn test_no_output_columns_emits_blank_lines() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .assert()
        .success()
        .stdout(predicate::eq("\n"));
}

#[test]
fn test_stdin_input() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", "-"])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "1:area"])
        .write_stdin("# city, area\nLA, 500\nNYC, 300\n")
        .assert()
        .success()
        .stdout(predicate::eq("300\n"));
}

#[test]
fn test_output_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let out_path = temp_dir.path().join("out.csv");

    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "0:city"])
        .args(["-o", out_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::eq(""));

    assert_eq!(fs::read_to_string(&out_path)?, "NYC\n");
    Ok(())
}

#[test]
fn test_custom_separator_output_stays_comma() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let file0 = temp_dir.path().join("a.csv");
    let file1 = temp_dir.path().join("b.csv");
    fs::write(&file0, "# k; v\n1; foo\n")?;
    fs::write(&file1, "# k; w\n1; bar\n")?;

    csvjoin()
        .args(["--sep", ";"])
        .args(["-i", file0.to_str().unwrap(), "-i", file1.to_str().unwrap()])
        .args(["--join", "0:k", "1:k"])
        .args(["--out-col", "0:v"])
        .args(["--out-col", "1:w"])
        .assert()
        .success()
        .stdout(predicate::eq("foo,bar\n"));
    Ok(())
}

#[test]
fn test_pass_through_preserves_cell_text() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let file0 = temp_dir.path().join("a.csv");
    let file1 = temp_dir.path().join("b.csv");
    fs::write(&file0, "# k, code\n1, 007\n")?;
    fs::write(&file1, "# k\n1\n")?;

    csvjoin()
        .args(["-i", file0.to_str().unwrap(), "-i", file1.to_str().unwrap()])
        .args(["--join", "0:k", "1:k"])
        .args(["--out-col", "0:code"])
        .assert()
        .success()
        .stdout(predicate::eq("007\n"));
    Ok(())
}

#[test]
fn test_comment_lines_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let file0 = temp_dir.path().join("a.csv");
    let file1 = temp_dir.path().join("b.csv");
    fs::write(&file0, "# k, v\n# a note\n1, x\n\n2, y\n")?;
    fs::write(&file1, "# k\n1\n2\n")?;

    csvjoin()
        .args(["-i", file0.to_str().unwrap(), "-i", file1.to_str().unwrap()])
        .args(["--join", "0:k", "1:k"])
        .args(["--out-col", "0:v"])
        .assert()
        .success()
        .stdout(predicate::eq("x\ny\n"));
    Ok(())
}

#[test]
fn test_single_input_is_rejected() {
    csvjoin()
        .args(["-i", &data("cities0.csv")])
        .args(["--join", "0:city"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least two input files"));
}

#[test]
fn test_join_spec_cardinality_error() {
    // one token for two inputs
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid join spec"))
        .stderr(predicate::str::contains("one entry per input file"));
}

#[test]
fn test_join_spec_coverage_error() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "0:pop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid join spec"));
}

#[test]
fn test_unknown_join_column() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown column '1:nope'"));
}

#[test]
fn test_out_col_file_index_out_of_range() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "2:city"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown column '2:city'"));
}

#[test]
fn test_malformed_out_col_expression() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "0:pop +"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid expression"));
}

#[test]
fn test_non_numeric_operand_aborts_run() {
    // 0:city holds text; the formula fails at the first evaluated row and
    // nothing is emitted
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "0:city + 1:area"])
        .assert()
        .failure()
        .stdout(predicate::eq(""))
        .stderr(predicate::str::contains("non-numeric value 'NYC'"));
}

#[test]
fn test_division_by_zero_aborts_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let file0 = temp_dir.path().join("a.csv");
    let file1 = temp_dir.path().join("b.csv");
    fs::write(&file0, "# k, zero\n1, 0\n")?;
    fs::write(&file1, "# k, v\n1, 10\n")?;

    csvjoin()
        .args(["-i", file0.to_str().unwrap(), "-i", file1.to_str().unwrap()])
        .args(["--join", "0:k", "1:k"])
        .args(["--out-col", "1:v / 0:zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Division by zero"));
    Ok(())
}

#[test]
fn test_verbose_diagnostics_on_stderr() {
    csvjoin()
        .args(["-i", &data("cities0.csv"), "-i", &data("cities1.csv")])
        .args(["--join", "0:city", "1:city"])
        .args(["--out-col", "0:city"])
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::eq("NYC\n"))
        .stderr(predicate::str::contains("2 rows"))
        .stderr(predicate::str::contains("Matched 1 row tuples"));
}
