//! Export a binary solution dump to a SQLite tablebase.
//!
//! Usage: export_sqlite [input.dat] [output.db]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rusqlite::Connection;
use tracing::info;

use matrioshka_solver::dump;
use matrioshka_solver::stats::format_bytes;
use matrioshka_solver::tablebase;

#[derive(Parser, Debug)]
#[command(name = "export_sqlite", about = "Convert a binary dump to SQLite")]
struct Args {
    #[arg(default_value = "data/solution.dat")]
    input: PathBuf,

    #[arg(default_value = "data/tablebase.db")]
    output: PathBuf,

    /// Rows between progress lines
    #[arg(long, default_value_t = 100_000)]
    batch: usize,
}

fn main() -> Result<()> {
    matrioshka_solver::init_logging();
    let args = Args::parse();

    info!(input = %args.input.display(), output = %args.output.display(), "Binary to SQLite export");

    let start = Instant::now();
    let records = dump::load_binary(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!("Loaded {} records in {:.2}s", records.len(), start.elapsed().as_secs_f64());

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if args.output.exists() {
        std::fs::remove_file(&args.output)
            .with_context(|| format!("removing old {}", args.output.display()))?;
    }
    let mut conn = Connection::open(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    tablebase::create(&conn)?;

    let start = Instant::now();
    let total = records.len();
    let inserted = tablebase::insert(&mut conn, &records, args.batch, |done| {
        let elapsed = start.elapsed().as_secs_f64();
        info!(
            "  {:>3.0}% ({}/{}) - {:.0} rows/sec",
            100.0 * done as f64 / total as f64,
            done,
            total,
            done as f64 / elapsed
        );
    })?;
    let insert_time = start.elapsed().as_secs_f64();
    info!(
        "Inserted {} positions in {:.2}s ({:.0} rows/sec)",
        inserted,
        insert_time,
        inserted as f64 / insert_time
    );

    // Spot-check a handful of rows across the dump
    info!("Verifying database...");
    let step = (records.len() / 5).max(1);
    for record in records.iter().step_by(step).take(5) {
        let state = record.state()?;
        let found = tablebase::lookup(&conn, &state)?;
        if found != Some((record.value, record.best)) {
            bail!("row mismatch for\n{}", record.board);
        }
    }
    let (wins, draws, losses) = tablebase::value_counts(&conn)?;
    info!(wins, draws, losses, "Verification passed");

    let input_size = std::fs::metadata(&args.input).map(|m| m.len()).unwrap_or(0);
    let output_size = std::fs::metadata(&args.output).map(|m| m.len()).unwrap_or(0);
    info!("Binary: {}", format_bytes(input_size));
    info!("SQLite: {}", format_bytes(output_size));
    info!(path = %args.output.display(), "Done");
    Ok(())
}
