//! csvproc - append a computed column to a CSV file
//!
//! The new column's value is an arithmetic equation over the existing
//! columns, referenced as `$n` counting from 1. The first row is read as a
//! header unless --no-header is given.

use anyhow::{Context, Result};
use clap::Parser;

use csvjoin::addcol;

/// Command-line arguments for csvproc
#[derive(Parser, Debug)]
#[clap(author, version, about = "Append a computed column to a CSV file")]
struct CsvProcArgs {
    /// Name of the column to append
    #[clap(long = "add-column", required = true, help = "Name for the new column")]
    add_column: String,

    /// Equation computing the new column's value for each row
    ///
    /// Example: -e '$1 * $2'
    #[clap(
        short = 'e',
        long = "equation",
        required = true,
        help = "Arithmetic equation over $n column references"
    )]
    equation: String,

    /// Treat the first row as data rather than column names
    #[clap(long = "no-header", help = "Do not read a header from the first row")]
    no_header: bool,

    /// Input file
    #[clap(
        short = 'i',
        long = "infile",
        default_value = "-",
        help = "Input file; use '-' for stdin"
    )]
    infile: String,

    /// Output file
    #[clap(
        short = 'o',
        long = "outfile",
        default_value = "-",
        help = "Output file; use '-' for stdout"
    )]
    outfile: String,

    /// Enable verbose diagnostic output
    #[clap(short, long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = CsvProcArgs::parse();

    if args.verbose {
        eprintln!("Arguments: {args:?}");
    }

    addcol::add_column(
        &args.infile,
        &args.outfile,
        &args.add_column,
        &args.equation,
        !args.no_header,
    )
    .with_context(|| format!("Failed to process {}", args.infile))?;

    Ok(())
}
