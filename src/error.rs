//! Error handling for csvjoin
//!
//! This module defines custom error types for the csvjoin tools.
//! It categorizes the different failure modes of the join pipeline,
//! supports error propagation, and supplies helpful error messages
//! identifying the offending token or column.
//!
//! The module uses thiserror to minimize boilerplate code and create
//! a consistent error handling approach throughout the codebase.

use thiserror::Error;

/// CsvJoinError represents all possible errors that can occur in the csvjoin tools
///
/// Setup-time errors (`UnknownColumn`, `InvalidJoinSpec`, `InvalidExpression`)
/// are raised before any row is processed. Evaluation-time errors
/// (`EvaluationError`, `DivideByZero`) are raised at the offending output row
/// and abort the run; no partial output row is emitted and no row is
/// skipped-and-continued. There are no retries anywhere.
#[derive(Error, Debug)]
pub enum CsvJoinError {
    /// Error during file system operations (reading/writing files)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while parsing or writing CSV data
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error when a referenced column is absent from the relevant header,
    /// the header is absent entirely, or the file index is out of range
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Error when the join spec does not contain exactly one entry per input
    /// file, or its file indices do not cover the input file range
    #[error("Invalid join spec: {0}")]
    InvalidJoinSpec(String),

    /// Error when an output-column spec does not parse under the arithmetic
    /// expression grammar
    #[error("Invalid expression '{spec}': {reason}")]
    InvalidExpression { spec: String, reason: String },

    /// Error when a formula's substituted cell values cannot be evaluated,
    /// e.g. a non-numeric operand
    #[error("Evaluation error: {0}")]
    EvaluationError(String),

    /// Error for division by zero in arithmetic operations
    #[error("Division by zero")]
    DivideByZero,
}

/// Result type alias for operations that can produce a CsvJoinError
pub type CsvJoinResult<T> = std::result::Result<T, CsvJoinError>;
