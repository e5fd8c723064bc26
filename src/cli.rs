//! CLI argument parsing module for csvjoin
//!
//! This module handles parsing command-line arguments using the clap crate.
//! It defines the command-line interface for the join tool: input files,
//! join-column tokens, output-column specs, and processing options.

use anyhow::Result;
use clap::Parser;

/// Command-line arguments for csvjoin
///
/// This struct represents all configurable aspects of a join run. It is
/// automatically populated by clap based on the provided arguments.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "N-way CSV joiner with derived output columns"
)]
pub struct CsvJoinArgs {
    /// Input files to join
    ///
    /// At least two inputs are required, each given with its own -i flag.
    /// Use '-' to read one input from stdin.
    /// Example: -i file0.csv -i file1.csv
    #[clap(
        short = 'i',
        long = "infile",
        required = true,
        help = "Input file(s); use '-' for stdin"
    )]
    pub infile: Vec<String>,

    /// Join columns, exactly one <i>:<name> token per input file
    ///
    /// <i> is the input file number (counting from 0) and <name> is looked
    /// up in that file's header line. The tokens may appear in any order,
    /// but together they must cover every input file exactly once.
    /// Example: --join 0:city 1:city
    #[clap(
        long = "join",
        num_args = 1..,
        required = true,
        help = "Join column tokens, one <i>:<name> per input"
    )]
    pub join: Vec<String>,

    /// Output column specs
    ///
    /// Each spec is either a bare column reference, emitted unmodified, or
    /// an arithmetic formula embedding references.
    /// Example: --out-col 0:city --out-col "0:pop + 1:area"
    #[clap(
        long = "out-col",
        help = "Output column: a <i>:<name> reference or an arithmetic formula"
    )]
    pub out_col: Vec<String>,

    /// Field separator for input files
    ///
    /// A single character; the joined output always uses commas.
    #[clap(long = "sep", default_value = ",", help = "Input field separator")]
    pub sep: char,

    /// Output destination
    #[clap(
        short = 'o',
        long = "outfile",
        default_value = "-",
        help = "Output file; use '-' for stdout"
    )]
    pub outfile: String,

    /// Enable verbose diagnostic output
    ///
    /// When enabled, shows per-file row counts and the number of matched
    /// tuples on stderr.
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Parse command-line arguments into the CsvJoinArgs structure
///
/// This function uses clap to handle argument parsing, validation, and help
/// text generation.
///
/// # Returns
/// * `Ok(CsvJoinArgs)` - Command-line arguments successfully parsed
/// * `Err` - Error during argument parsing (handled by clap, usually results
///   in help text display)
pub fn parse_args() -> Result<CsvJoinArgs> {
    Ok(CsvJoinArgs::parse())
}
