//! Configuration module for csvjoin
//!
//! This module provides a centralized configuration structure for the join
//! pipeline. Settings are captured once at startup and passed down to the
//! components that need them rather than living in global state.

/// Comment marker recognized at the start of a line in join inputs
///
/// The first marker line of a file carries the column names; every other
/// marker line is discarded.
pub const COMMENT_MARKER: char = '#';

/// Separator used for joined output rows, regardless of the input separator
pub const OUTPUT_SEPARATOR: u8 = b',';

/// Join pipeline configuration
///
/// This struct encapsulates the settings shared by the reader, resolver,
/// and matcher. It is created at startup from the command-line arguments
/// and is immutable from then on.
#[derive(Debug, Clone)]
pub struct JoinConfig {
    /// Field separator for input files
    separator: u8,

    /// Whether to show verbose diagnostics on stderr
    verbose: bool,
}

impl JoinConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `separator` - Input field separator byte
    /// * `verbose` - Whether to show verbose diagnostics
    pub fn new(separator: u8, verbose: bool) -> Self {
        JoinConfig { separator, verbose }
    }

    /// Get the input field separator
    pub fn separator(&self) -> u8 {
        self.separator
    }

    /// Get the verbose flag
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        JoinConfig {
            separator: b',',
            verbose: false,
        }
    }
}
