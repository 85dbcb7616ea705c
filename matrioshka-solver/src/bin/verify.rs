//! Check a binary solution dump.
//!
//! Reloads every record, recomputes its value from its successors, and
//! prints the outcome distribution and the start position's value.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use matrioshka_solver::dump;
use matrioshka_solver::verify;

#[derive(Parser, Debug)]
#[command(name = "verify", about = "Check a binary solution dump")]
struct Args {
    /// Binary dump to check
    #[arg(default_value = "data/solution.dat")]
    input: PathBuf,

    /// Expected xxh64 checksum (hex) of the dump file
    #[arg(long)]
    checksum: Option<String>,

    /// Problems to print before giving up on the listing
    #[arg(long, default_value_t = 20)]
    max_problems: usize,
}

fn main() -> Result<()> {
    matrioshka_solver::init_logging();
    let args = Args::parse();

    if let Some(expected) = &args.checksum {
        let expected = u64::from_str_radix(expected.trim_start_matches("0x"), 16)
            .with_context(|| format!("parsing checksum {expected:?}"))?;
        let actual = dump::checksum_file(&args.input)
            .with_context(|| format!("hashing {}", args.input.display()))?;
        if actual != expected {
            bail!("checksum mismatch: file is {actual:016x}, expected {expected:016x}");
        }
        info!("Checksum {:016x} matches", actual);
    }

    info!(path = %args.input.display(), "Loading dump...");
    let start = Instant::now();
    let records = dump::load_binary(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!("Loaded {} records in {:.2}s", records.len(), start.elapsed().as_secs_f64());

    let start = Instant::now();
    let report = verify::check(&records);
    info!("Checked in {:.2}s", start.elapsed().as_secs_f64());

    let total = report.records.max(1) as f64;
    info!("Outcome distribution:");
    info!("  A wins: {} ({:.1}%)", report.wins, 100.0 * report.wins as f64 / total);
    info!("  Draws:  {} ({:.1}%)", report.draws, 100.0 * report.draws as f64 / total);
    info!("  B wins: {} ({:.1}%)", report.losses, 100.0 * report.losses as f64 / total);
    for (depth, count) in &report.by_depth {
        info!("  depth {:>2}: {}", depth, count);
    }

    match report.root {
        Some(value) => info!("Start position: {}", value),
        None => info!("Start position not in dump"),
    }

    if !report.is_ok() {
        for problem in report.problems.iter().take(args.max_problems) {
            error!("{}", problem);
        }
        bail!("{} problems found", report.problems.len());
    }
    info!("Verification passed");
    Ok(())
}
