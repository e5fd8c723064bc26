//! Column reference resolution for csvjoin
//!
//! A column reference names one column of one input file with the textual
//! form `<i>:<name>`, where `<i>` is the file index (counting from 0) and
//! `<name>` is looked up in that file's header. This module turns reference
//! tokens into concrete `(file, column)` pairs and validates the join spec.
//!
//! Resolution happens once at setup time; the resulting `ColumnRef`s are
//! reused for every row. There is no bare-numeric positional syntax: a
//! numeric name like `0:1` is resolved literally against the header.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{CsvJoinError, CsvJoinResult};
use crate::table::Table;

/// Textual form of a column reference: `<file-index>:<identifier>`
pub const COLUMN_REF_PATTERN: &str = r"[0-9]+:[A-Za-z0-9_]+";

/// Compile the unanchored reference pattern, for scanning embedded
/// references out of expression text
pub(crate) fn column_ref_regex() -> Regex {
    Regex::new(COLUMN_REF_PATTERN).expect("column reference pattern is valid")
}

/// A resolved column locator: an index into the input file list plus a
/// column index within that file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    /// Index into the ordered list of input tables
    pub file: usize,

    /// Column index within that table's rows
    pub column: usize,
}

/// Whether a token is exactly one column reference, end to end
pub fn is_column_ref(token: &str) -> bool {
    Regex::new(&format!("^(?:{COLUMN_REF_PATTERN})$"))
        .expect("column reference pattern is valid")
        .is_match(token)
}

/// Resolve a `<i>:<name>` token against the loaded tables
///
/// The name is matched exactly against table `<i>`'s header, first
/// occurrence. Every failure mode — malformed token, file index out of
/// range, missing header, name absent — reports the token as an unknown
/// column, since the caller cannot act on the distinction.
///
/// # Arguments
/// * `token` - The reference token
/// * `tables` - All loaded input tables, in file order
///
/// # Returns
/// * `Ok(ColumnRef)` - The resolved locator
/// * `Err(CsvJoinError::UnknownColumn)` - If the token does not resolve
pub fn resolve_column_ref(token: &str, tables: &[Table]) -> CsvJoinResult<ColumnRef> {
    let unknown = || CsvJoinError::UnknownColumn(token.to_string());

    let (file_part, name) = token.split_once(':').ok_or_else(unknown)?;
    let file: usize = file_part.parse().map_err(|_| unknown())?;
    let table = tables.get(file).ok_or_else(unknown)?;
    let column = table.column_index(name).ok_or_else(unknown)?;

    Ok(ColumnRef { file, column })
}

/// Resolve and validate the join spec
///
/// Every input table must participate in the join on exactly one column:
/// the token list must contain one entry per input file, and the file
/// indices referenced must cover `{0, ..., N-1}` with no duplicates and no
/// gaps. Both checks run before any row processing.
///
/// # Arguments
/// * `tokens` - The join-column tokens from the command line
/// * `tables` - All loaded input tables, in file order
///
/// # Returns
/// * `Ok(Vec<usize>)` - The join column index for each table, in file order
/// * `Err` - `InvalidJoinSpec` on cardinality or coverage mismatch,
///   `UnknownColumn` if a token does not resolve
pub fn resolve_join_spec(tokens: &[String], tables: &[Table]) -> CsvJoinResult<Vec<usize>> {
    if tokens.len() != tables.len() {
        return Err(CsvJoinError::InvalidJoinSpec(format!(
            "the join list must contain one entry per input file ({} files, {} entries)",
            tables.len(),
            tokens.len()
        )));
    }

    let mut by_file: HashMap<usize, usize> = HashMap::new();
    for token in tokens {
        let column_ref = resolve_column_ref(token, tables)?;
        by_file.insert(column_ref.file, column_ref.column);
    }

    let missing: Vec<usize> = (0..tables.len())
        .filter(|file| !by_file.contains_key(file))
        .collect();
    if !missing.is_empty() {
        return Err(CsvJoinError::InvalidJoinSpec(format!(
            "the join list must cover every input file; missing entries for files {missing:?}"
        )));
    }

    Ok((0..tables.len()).map(|file| by_file[&file]).collect())
}
