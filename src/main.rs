//! csvjoin - an N-way CSV join utility
//!
//! This tool loads two or more CSV files into memory, matches their rows on
//! one designated join column per file, and emits one output row per match.
//! Output columns are either cells copied through from the matched rows or
//! arithmetic formulas computed over them.
//!
//! # Program Flow
//!
//! 1. Parse command-line arguments
//! 2. Load every input file into an in-memory table
//! 3. Resolve the join columns and compile the output-column expressions
//! 4. Run the forward-only multi-cursor matcher
//! 5. Evaluate the output columns for each match and write CSV rows
//!
//! Matching runs through each input exactly once in original row order: for
//! each row of the first file, the remaining files are scanned forward from
//! their own cursors for the same join value. On a match, every cursor jumps
//! past its matched row; on a miss, only the first file's cursor advances.
//! Rows skipped along the way are never revisited.

use std::io::Write;

use anyhow::{bail, Context, Result};

use csvjoin::cli;
use csvjoin::config::{JoinConfig, OUTPUT_SEPARATOR};
use csvjoin::error::CsvJoinResult;
use csvjoin::expr::Expression;
use csvjoin::join::{JoinMatcher, MatchTuple};
use csvjoin::resolver;
use csvjoin::table::{self, Table};

/// Main entry point for the csvjoin utility
///
/// Orchestrates the pipeline from argument parsing to CSV output, adding
/// context to errors at each step. All setup errors (unknown columns, bad
/// join specs, malformed expressions) surface before any row is processed.
fn main() -> Result<()> {
    // Step 1: Parse command-line arguments
    let args = cli::parse_args()?;

    if args.infile.len() < 2 {
        bail!("at least two input files are required");
    }

    if !args.sep.is_ascii() {
        bail!("separator must be a single ASCII character");
    }

    // Step 1b: Freeze the run configuration; components receive this rather
    // than reading global state
    let config = JoinConfig::new(args.sep as u8, args.verbose);

    if config.verbose() {
        eprintln!("Arguments: {args:?}");
    }

    // Step 2: Load every input fully into memory
    let mut tables = Vec::with_capacity(args.infile.len());
    for path in &args.infile {
        let table = Table::from_path(path, &config)
            .with_context(|| format!("Failed to load input file: {path}"))?;
        if config.verbose() {
            eprintln!("Loaded '{}': {} rows", path, table.row_count());
        }
        tables.push(table);
    }

    // Step 3: Resolve the join spec and compile the output columns, so every
    // configuration error is raised before matching begins
    let join_columns = resolver::resolve_join_spec(&args.join, &tables)
        .context("Failed to resolve join columns")?;
    let expressions = args
        .out_col
        .iter()
        .map(|spec| Expression::compile(spec, &tables))
        .collect::<CsvJoinResult<Vec<_>>>()
        .context("Failed to compile output columns")?;

    // Step 4: Run the matcher
    let matches = JoinMatcher::new(&tables, &join_columns).run();
    if config.verbose() {
        eprintln!("Matched {} row tuples", matches.len());
    }

    // Step 5: Evaluate the output columns per match and emit CSV rows
    let out = table::open_output(&args.outfile)
        .with_context(|| format!("Failed to open output file: {}", args.outfile))?;
    write_matches(out, &tables, &matches, &expressions).context("Failed to write joined output")?;

    Ok(())
}

/// Serialize one output row per match tuple
///
/// The joined output always uses the fixed comma separator with no quoting,
/// and carries no header line.
fn write_matches(
    mut out: Box<dyn Write>,
    tables: &[Table],
    matches: &[MatchTuple],
    expressions: &[Expression],
) -> CsvJoinResult<()> {
    if expressions.is_empty() {
        // no output columns requested: one empty line per match
        for _ in matches {
            out.write_all(b"\n")?;
        }
        out.flush()?;
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(OUTPUT_SEPARATOR)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(out);

    for tuple in matches {
        let rows: Vec<&[String]> = tuple
            .iter()
            .enumerate()
            .map(|(file, &row)| tables[file].rows()[row].as_slice())
            .collect();

        let mut cells = Vec::with_capacity(expressions.len());
        for expression in expressions {
            cells.push(expression.evaluate(&rows)?);
        }
        writer.write_record(&cells)?;
    }
    writer.flush()?;

    Ok(())
}
