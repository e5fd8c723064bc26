//! Table module for csvjoin
//!
//! This module provides the in-memory table representation shared by all
//! tools, plus the reading boundary that turns raw text into a header and an
//! ordered sequence of rows:
//!
//! - Optional header taken from a leading `# name, name, ...` line
//! - Comment-line filtering (any further line starting with `#`)
//! - Pure separator splitting with whitespace trimming (no quote processing)
//! - Stdin/stdout support through the `-` pseudo-path
//!
//! Tables are loaded fully into memory before matching begins. Row length is
//! not required to match header length; column-index resolution is bounds
//! checked where the index is used.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use crate::config::{JoinConfig, COMMENT_MARKER};
use crate::error::CsvJoinResult;

/// Represents a row in a table
///
/// Cells stay in their original string form; any numeric interpretation
/// happens later, in the expression evaluator.
pub type Row = Vec<String>;

/// An in-memory table: an optional ordered header plus ordered rows
#[derive(Debug, Clone)]
pub struct Table {
    /// Column names; empty when the input had no header line
    columns: Vec<String>,

    /// Map of column names to their indices (first occurrence wins)
    column_map: HashMap<String, usize>,

    /// Rows of data
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new(columns: Vec<String>) -> Self {
        let mut column_map = HashMap::new();
        for (i, name) in columns.iter().enumerate() {
            // keep the first occurrence of a duplicated name
            column_map.entry(name.clone()).or_insert(i);
        }
        Table {
            columns,
            column_map,
            rows: Vec::new(),
        }
    }

    /// Load a table from a file path, with `-` meaning stdin
    pub fn from_path(path: &str, config: &JoinConfig) -> CsvJoinResult<Table> {
        let mut raw = String::new();
        open_input(path)?.read_to_string(&mut raw)?;
        Table::from_text(&raw, config)
    }

    /// Parse a table from raw text
    ///
    /// The first line, if it starts with the comment marker, is the ordered
    /// column-name list: the text after the marker is split on the configured
    /// separator and each name is trimmed. Every other line starting with the
    /// marker is discarded as a comment, as are empty lines. The remaining
    /// lines are data rows, split on the separator with each cell trimmed;
    /// no quote processing is applied.
    ///
    /// # Arguments
    /// * `text` - The raw file contents
    /// * `config` - Separator and verbosity settings
    ///
    /// # Returns
    /// * `Ok(Table)` - The parsed table
    /// * `Err` - If the CSV reader fails on the data rows
    pub fn from_text(text: &str, config: &JoinConfig) -> CsvJoinResult<Table> {
        let mut columns = Vec::new();
        let mut data = String::new();

        for (i, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if i == 0 && trimmed.starts_with(COMMENT_MARKER) {
                let names = trimmed
                    .strip_prefix(COMMENT_MARKER)
                    .unwrap_or_default()
                    .trim();
                columns = names
                    .split(config.separator() as char)
                    .map(|name| name.trim().to_string())
                    .collect();
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                continue;
            }
            data.push_str(line);
            data.push('\n');
        }

        let mut table = Table::new(columns);

        // Quoting is disabled: a cell is whatever sits between separators,
        // minus surrounding whitespace.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.separator())
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        for result in reader.records() {
            let record = result?;
            table.add_row(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(table)
    }

    /// Get the column names of the table
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the input carried a header line
    pub fn has_header(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Look up a column index by name (first occurrence)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_map.get(name).copied()
    }

    /// Get the rows of the table
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row to the table
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }
}

/// Open an input source for reading, with `-` meaning stdin
pub fn open_input(path: &str) -> CsvJoinResult<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Open an output destination for writing, with `-` meaning stdout
pub fn open_output(path: &str) -> CsvJoinResult<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}
