//! Errors for rejected state construction.

use thiserror::Error;

/// A board, piece set or game state that cannot occur in play.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateError {
    #[error("cell {cell} holds {value}, expected a value in -3..=3")]
    CellOutOfRange { cell: usize, value: i8 },

    #[error("cell {cell} holds {value}, expected -1, 0 or 1")]
    NotTicTacToeCell { cell: usize, value: i8 },

    #[error("piece count {count} for size {size} is out of range 0..=2")]
    CountOutOfRange { size: usize, count: u8 },

    #[error("depth {depth} does not match {expected} pieces played")]
    DepthMismatch { depth: u8, expected: u8 },

    #[error("player A has placed {a} pieces and player B {b}; A must lead by 0 or 1")]
    TurnImbalance { a: u8, b: u8 },

    #[error("{count} pieces of size {size} on the board but only {placed} were placed")]
    InventoryMismatch { size: usize, count: u8, placed: u8 },
}
