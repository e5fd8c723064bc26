//! csvtranspose - transpose rows and columns of a CSV file

use anyhow::{Context, Result};
use clap::Parser;

use csvjoin::transpose;

/// Command-line arguments for csvtranspose
#[derive(Parser, Debug)]
#[clap(author, version, about = "Transpose rows and columns of a CSV file")]
struct CsvTransposeArgs {
    /// Input file
    #[clap(help = "Input file; use '-' for stdin")]
    infile: String,

    /// Output file
    #[clap(help = "Output file; use '-' for stdout")]
    outfile: String,

    /// Enable verbose diagnostic output
    #[clap(short, long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = CsvTransposeArgs::parse();

    if args.verbose {
        eprintln!("Arguments: {args:?}");
    }

    transpose::run(&args.infile, &args.outfile)
        .with_context(|| format!("Failed to transpose {}", args.infile))?;

    Ok(())
}
