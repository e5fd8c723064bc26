//! Join matcher for csvjoin
//!
//! This module implements the N-way merge of the join pipeline: a stateful
//! multi-cursor matching procedure over fully loaded tables. One cursor per
//! table starts at row 0, and the whole run is driven by table 0's cursor.
//!
//! For each row of table 0, every other table is scanned forward from its
//! own cursor for a row whose join column holds the same value. If all
//! tables produce one, the tuple of row indices is emitted and every cursor
//! jumps to one past its contributed row; otherwise only table 0's cursor
//! advances and the other cursors stay put. The matcher never looks backward:
//! rows skipped in tables 1..N-1 are permanently out of consideration, so
//! inputs are expected to carry their join values in a consistent relative
//! order. Rows that never match produce no output and no diagnostic.
//!
//! Matching compares join cells as text, with no numeric coercion. Only
//! inner-join semantics are provided: a tuple is emitted only when every
//! input has a matching row.

use crate::table::Table;

/// One joined output record: a row index per input table
///
/// The join-column cells of all referenced rows are textually identical.
pub type MatchTuple = Vec<usize>;

/// The multi-cursor merge-join state machine
///
/// Holds the loaded tables and the resolved join column for each of them;
/// `run` performs the single forward pass and returns the emitted tuples in
/// order.
pub struct JoinMatcher<'a> {
    /// All input tables, in file order
    tables: &'a [Table],

    /// Join column index for each table, in file order
    join_columns: &'a [usize],
}

impl<'a> JoinMatcher<'a> {
    /// Create a matcher over resolved join columns
    ///
    /// `join_columns` must hold exactly one entry per table, as produced by
    /// `resolver::resolve_join_spec`.
    pub fn new(tables: &'a [Table], join_columns: &'a [usize]) -> Self {
        JoinMatcher {
            tables,
            join_columns,
        }
    }

    /// Run the matching procedure to completion
    ///
    /// Advances through each input exactly once in original row order and
    /// returns every match tuple found. The terminal condition is table 0's
    /// cursor reaching the end of its table; remaining rows of the other
    /// tables are never revisited.
    pub fn run(&self) -> Vec<MatchTuple> {
        let mut matches = Vec::new();
        if self.tables.is_empty() {
            return matches;
        }

        let mut cursors = vec![0usize; self.tables.len()];
        let first_rows = self.tables[0].rows();
        let first_column = self.join_columns[0];

        while cursors[0] < first_rows.len() {
            // A row too short to hold its join column cannot match anything.
            let join_value = match first_rows[cursors[0]].get(first_column) {
                Some(value) => value.as_str(),
                None => {
                    cursors[0] += 1;
                    continue;
                }
            };

            match self.find_candidate(&cursors, join_value) {
                Some(tuple) => {
                    // All cursors jump forward together, one past the rows
                    // consumed by this tuple.
                    for (table, &row) in tuple.iter().enumerate() {
                        cursors[table] = row + 1;
                    }
                    matches.push(tuple);
                }
                None => {
                    cursors[0] += 1;
                }
            }
        }

        matches
    }

    /// Try to complete one candidate tuple for the current join value
    ///
    /// Scans each table 1..N-1 forward from its cursor. Returns the full
    /// tuple if every table contributes a row, `None` as soon as one table
    /// is exhausted first.
    fn find_candidate(&self, cursors: &[usize], join_value: &str) -> Option<MatchTuple> {
        let mut tuple = vec![cursors[0]];

        for table in 1..self.tables.len() {
            let rows = self.tables[table].rows();
            let column = self.join_columns[table];

            let found = (cursors[table]..rows.len())
                .find(|&row| rows[row].get(column).map(String::as_str) == Some(join_value))?;
            tuple.push(found);
        }

        Some(tuple)
    }
}
