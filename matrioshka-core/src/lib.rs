//! Matrioshka tic-tac-toe game logic and exhaustive solver.
//!
//! # Board Encoding
//!
//! ```text
//! 9 cells, row-major, each an i8 in -3..=3:
//!    0      empty
//!    1..3   player A (maximizer) piece of that size
//!   -1..-3  player B (minimizer) piece of that size
//!
//! Cell indices:
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! # Canonical Form
//!
//! Positions are memoized by the lexicographically smallest of the board's 8
//! images under rotation and reflection. Piece inventories are not affected by
//! the symmetry and are kept as they are.
//!
//! # Values
//!
//! Every verdict and value is from player A's point of view: `Win` means A
//! wins with optimal play, `Loss` means B does.

pub mod board;
pub mod error;
pub mod matrioshka;
pub mod observer;
pub mod outcome;
pub mod pieces;
pub mod record;
pub mod search;
pub mod tictactoe;

pub use board::Board;
pub use error::StateError;
pub use matrioshka::GameState;
pub use observer::SearchObserver;
pub use outcome::{Outcome, Value};
pub use pieces::PieceSet;
pub use record::Record;
pub use search::{CancelToken, Entry, Game, SearchConfig, Solution, Solver, TranspositionTable};
pub use tictactoe::TicTacToe;
