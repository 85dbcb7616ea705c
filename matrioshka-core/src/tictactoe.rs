//! Plain tic-tac-toe on the same board type.
//!
//! X (`1`) is the maximizer and moves first, O (`-1`) the minimizer. Filled
//! cells are permanently blocked. Positions are not symmetry reduced.

use crate::board::{Board, CELLS};
use crate::error::StateError;
use crate::outcome::Outcome;
use crate::search::Game;

pub const X: i8 = 1;
pub const O: i8 = -1;

/// A tic-tac-toe position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TicTacToe {
    board: Board,
    depth: u8,
}

impl TicTacToe {
    /// Validate and build a position.
    pub fn new(board: Board, depth: u8) -> Result<TicTacToe, StateError> {
        let mut x = 0u8;
        let mut o = 0u8;
        for (cell, &value) in board.cells().iter().enumerate() {
            match value {
                X => x += 1,
                O => o += 1,
                0 => {}
                _ => return Err(StateError::NotTicTacToeCell { cell, value }),
            }
        }
        if depth != x + o {
            return Err(StateError::DepthMismatch { depth, expected: x + o });
        }
        if x != o && x != o + 1 {
            return Err(StateError::TurnImbalance { a: x, b: o });
        }
        Ok(TicTacToe { board, depth })
    }

    pub fn start() -> TicTacToe {
        TicTacToe { board: Board::new(), depth: 0 }
    }

    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Whether X moves next.
    #[inline]
    pub fn maximizer_to_move(&self) -> bool {
        self.depth % 2 == 0
    }

    /// Mark `cell` for the side to move, if empty.
    pub fn play(&self, cell: usize) -> Option<TicTacToe> {
        if cell >= CELLS || !self.board.is_empty(cell) {
            return None;
        }
        let mark = if self.maximizer_to_move() { X } else { O };
        Some(TicTacToe {
            board: self.board.with_cell(cell, mark),
            depth: self.depth + 1,
        })
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::start()
    }
}

impl Game for TicTacToe {
    fn depth(&self) -> u8 {
        self.depth
    }

    fn board(&self) -> Board {
        self.board
    }

    fn score(&self) -> Outcome {
        self.board.score()
    }

    fn successors(&self) -> Vec<Self> {
        // Lower cells give larger boards, so order explicitly
        let mut next: Vec<Self> = (0..CELLS).filter_map(|cell| self.play(cell)).collect();
        next.sort();
        next
    }
}
