//! Column-append tool for single CSV files
//!
//! Reads one CSV file, evaluates an arithmetic equation for every data row,
//! and writes the file back out with the result appended as a new trailing
//! column. The equation references existing columns as `$n`, counting from 1.
//!
//! These inputs are plain CSV: the header, when present, is the first row
//! itself (not the `#` convention of the join inputs), and standard quoting
//! applies.

use crate::error::CsvJoinResult;
use crate::expr::Expression;
use crate::table::{open_input, open_output};

/// Append a computed column to a CSV file
///
/// The equation is compiled once against the file's column count (header
/// width when a header is present, first data row width otherwise), so a
/// `$n` reference out of range fails before any row is written.
///
/// # Arguments
/// * `infile` - Input path; `-` for stdin
/// * `outfile` - Output path; `-` for stdout
/// * `column_name` - Name of the new column, appended to the header
/// * `equation` - Arithmetic equation over `$n` column references
/// * `has_header` - Whether the first row carries column names
///
/// # Returns
/// * `Ok(())` if the file was processed and written
/// * `Err` - Compile errors before any output; evaluation errors abort at
///   the offending row
pub fn add_column(
    infile: &str,
    outfile: &str,
    column_name: &str,
    equation: &str,
    has_header: bool,
) -> CsvJoinResult<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(open_input(infile)?);

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    let header: Option<Vec<String>> = if has_header && !records.is_empty() {
        Some(records.remove(0))
    } else {
        None
    };
    let rows = records;

    let width = match &header {
        Some(names) => names.len(),
        None => rows.first().map(Vec::len).unwrap_or(0),
    };
    let expression = Expression::compile_equation(equation, width)?;

    let mut writer = csv::WriterBuilder::new().from_writer(open_output(outfile)?);
    if let Some(mut names) = header {
        names.push(column_name.to_string());
        writer.write_record(&names)?;
    }
    for mut row in rows {
        let value = expression.evaluate(&[row.as_slice()])?;
        row.push(value);
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}
