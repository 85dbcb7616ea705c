//! Command line configuration for the solver binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use matrioshka_core::SearchConfig;

use crate::dump::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Nested-piece tic-tac-toe, symmetry reduced
    Matrioshka,
    /// Plain tic-tac-toe
    #[value(name = "tictactoe")]
    TicTacToe,
}

/// Solve a tic-tac-toe variant exhaustively and dump the solution.
#[derive(Parser, Debug)]
#[command(name = "solver", version, about)]
pub struct Cli {
    /// Game to solve
    #[arg(long, value_enum, default_value = "matrioshka")]
    pub variant: Variant,

    /// Dump format
    #[arg(long, value_enum, default_value = "bin")]
    pub format: Format,

    /// Dump path [default: data/solution.dat or data/solution.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Solve without the transposition table (slow, writes no dump)
    #[arg(long)]
    pub no_memo: bool,

    /// Seconds between progress lines
    #[arg(long, default_value_t = 5)]
    pub log_interval: u64,
}

/// Engine and reporting options derived from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    pub memoize: bool,
    pub log_interval_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            log_interval_secs: 5,
        }
    }
}

impl SolverConfig {
    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            memoize: self.memoize,
        }
    }
}

impl Cli {
    pub fn config(&self) -> SolverConfig {
        SolverConfig {
            memoize: !self.no_memo,
            log_interval_secs: self.log_interval,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.format.default_path()))
    }
}
