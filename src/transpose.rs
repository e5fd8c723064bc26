//! Row/column transpose for CSV files
//!
//! Unlike the join inputs, transposed files are plain CSV: standard quoting
//! applies and there is no comment or header convention. Ragged inputs
//! truncate to the shortest row, so a cell column present in only some rows
//! is dropped.

use crate::error::CsvJoinResult;
use crate::table::{open_input, open_output};

/// Transpose a grid of cells: output row `j` holds the `j`-th cell of every
/// input row, in input-row order
pub fn transpose_rows(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).min().unwrap_or(0);
    (0..width)
        .map(|column| rows.iter().map(|row| row[column].clone()).collect())
        .collect()
}

/// Read a CSV file, write its transpose
///
/// # Arguments
/// * `infile` - Input path; `-` for stdin
/// * `outfile` - Output path; `-` for stdout
pub fn run(infile: &str, outfile: &str) -> CsvJoinResult<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(open_input(infile)?);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    let mut writer = csv::WriterBuilder::new().from_writer(open_output(outfile)?);
    for row in transpose_rows(&rows) {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}
