//! Matrioshka Tic-Tac-Toe Solver
//!
//! Solves the game from the empty board by exhaustive minimax over
//! symmetry-reduced positions and writes every stored position to a dump.

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use matrioshka_core::{CancelToken, GameState, Record, Solver, TicTacToe};
use matrioshka_solver::config::{Cli, SolverConfig, Variant};
use matrioshka_solver::dump;
use matrioshka_solver::stats::SolverStats;

fn main() -> Result<()> {
    matrioshka_solver::init_logging();
    let cli = Cli::parse();
    let config = cli.config();

    info!(
        variant = ?cli.variant,
        memoize = config.memoize,
        log_interval = config.log_interval_secs,
        "Matrioshka solver"
    );

    // SIGINT stops the search; nothing is written for an unfinished solve
    let cancel = CancelToken::new();
    let token = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping solve");
        token.cancel();
    })
    .context("setting Ctrl-C handler")?;

    match cli.variant {
        Variant::Matrioshka => solve_matrioshka(&cli, config, cancel),
        Variant::TicTacToe => solve_tictactoe(config, cancel),
    }
}

fn solve_matrioshka(cli: &Cli, config: SolverConfig, cancel: CancelToken) -> Result<()> {
    let mut solver = Solver::with_config(config.search()).with_cancel(cancel);
    let mut stats = SolverStats::new(config.log_interval_secs);

    info!("Starting solve from the empty board...");
    let start = Instant::now();
    let Some(solution) = solver.solve_observed(GameState::start(), &mut stats) else {
        bail!("solve interrupted after {:.2}s", start.elapsed().as_secs_f64());
    };

    info!("Solve complete in {:.2}s", start.elapsed().as_secs_f64());
    stats.log_summary();
    info!(value = %solution.value, "Result");
    if let Some(best) = solution.best {
        info!("Best opening:\n{}", best);
    }

    if !config.memoize {
        warn!("Solved without a transposition table; no dump written");
        return Ok(());
    }

    let path = cli.output_path();
    let records = Record::from_table(&solver.table);
    info!(path = %path.display(), format = ?cli.format, "Writing dump...");
    let save_start = Instant::now();
    let summary = dump::save(&path, cli.format, &records)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(
        records = summary.records,
        checksum = %format!("{:016x}", summary.checksum),
        "Saved in {:.2}s",
        save_start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Plain tic-tac-toe: solved and reported, never dumped.
fn solve_tictactoe(config: SolverConfig, cancel: CancelToken) -> Result<()> {
    let mut solver = Solver::with_config(config.search()).with_cancel(cancel);
    let mut stats = SolverStats::new(config.log_interval_secs);

    let Some(solution) = solver.solve_observed(TicTacToe::start(), &mut stats) else {
        bail!("solve interrupted");
    };

    stats.log_summary();
    info!(value = %solution.value, table = solver.table.len(), "Result");
    for (ply, state) in solver
        .principal_variation(TicTacToe::start())
        .iter()
        .enumerate()
        .skip(1)
    {
        info!("Ply {}:\n{}", ply, state.board());
    }

    Ok(())
}
