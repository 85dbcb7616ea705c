//! Matrioshka tic-tac-toe: sized pieces that capture smaller enemy pieces.
//!
//! Each player holds two pieces of each size 1..=3. On their turn a player
//! places one piece on an empty cell, or on a cell holding a strictly smaller
//! enemy piece, which is removed from the game. Three cells owned by one side
//! in a line wins. A player with no legal placement ends the game in a draw.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CELLS};
use crate::error::StateError;
use crate::outcome::Outcome;
use crate::pieces::PieceSet;
use crate::search::Game;

/// A Matrioshka position, always held with its board in canonical form.
///
/// Fields are ordered so the derived `Ord` compares boards first, then
/// player A's pieces, then player B's.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    max_pieces: PieceSet,
    min_pieces: PieceSet,
    depth: u8,
}

impl GameState {
    /// Validate and build a state. The board is canonicalized.
    ///
    /// Rejects depths that disagree with the piece sets, turn imbalance, and
    /// boards showing more pieces of a size than the owner has placed.
    pub fn new(
        board: Board,
        max_pieces: PieceSet,
        min_pieces: PieceSet,
        depth: u8,
    ) -> Result<GameState, StateError> {
        let board = Board::from_cells(board.0)?;
        let max_pieces = PieceSet::new(max_pieces.0)?;
        let min_pieces = PieceSet::new(min_pieces.0)?;

        let (a, b) = (max_pieces.placed(), min_pieces.placed());
        if depth != a + b {
            return Err(StateError::DepthMismatch { depth, expected: a + b });
        }
        if a != b && a != b + 1 {
            return Err(StateError::TurnImbalance { a, b });
        }

        for (pieces, maximizer) in [(max_pieces, true), (min_pieces, false)] {
            let on_board = board.pieces_on_board(maximizer);
            for size in 1..=3u8 {
                let count = on_board[(size - 1) as usize];
                let placed = pieces.placed_of(size);
                if count > placed {
                    return Err(StateError::InventoryMismatch {
                        size: size as usize,
                        count,
                        placed,
                    });
                }
            }
        }

        Ok(GameState::from_parts(board, max_pieces, min_pieces, depth))
    }

    /// Build without validation. Callers guarantee the invariants.
    #[inline]
    fn from_parts(board: Board, max_pieces: PieceSet, min_pieces: PieceSet, depth: u8) -> GameState {
        GameState {
            board: board.canonical(),
            max_pieces,
            min_pieces,
            depth,
        }
    }

    /// Empty board, both players holding (2, 2, 2), A to move.
    pub fn start() -> GameState {
        GameState::from_parts(Board::new(), PieceSet::start(), PieceSet::start(), 0)
    }

    /// Canonical board.
    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    /// Player A's remaining pieces.
    #[inline]
    pub fn max_pieces(&self) -> PieceSet {
        self.max_pieces
    }

    /// Player B's remaining pieces.
    #[inline]
    pub fn min_pieces(&self) -> PieceSet {
        self.min_pieces
    }

    /// Plies played.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Whether player A (the maximizer) moves next.
    #[inline]
    pub fn maximizer_to_move(&self) -> bool {
        self.depth % 2 == 0
    }

    /// Terminal test for this position.
    #[inline]
    pub fn score(&self) -> Outcome {
        self.board.score()
    }

    /// Successor for placing `size` on `cell`, if legal.
    pub fn place(&self, size: u8, cell: usize) -> Option<GameState> {
        let is_max = self.maximizer_to_move();
        let pieces = if is_max { self.max_pieces } else { self.min_pieces };
        let next_pieces = pieces.take(size)?;
        let piece = if is_max { size as i8 } else { -(size as i8) };
        if cell >= CELLS || !self.board.can_place(cell, piece) {
            return None;
        }

        let (max_pieces, min_pieces) = if is_max {
            (next_pieces, self.min_pieces)
        } else {
            (self.max_pieces, next_pieces)
        };
        Some(GameState::from_parts(
            self.board.with_cell(cell, piece),
            max_pieces,
            min_pieces,
            self.depth + 1,
        ))
    }

    /// All distinct successor states, in ascending order.
    ///
    /// Placements whose boards are symmetric images of each other collapse
    /// into one successor. Empty when the mover has no legal placement.
    pub fn successors(&self) -> Vec<GameState> {
        let is_max = self.maximizer_to_move();
        let pieces = if is_max { self.max_pieces } else { self.min_pieces };

        let mut states = BTreeSet::new();
        for size in pieces.available() {
            let piece = if is_max { size as i8 } else { -(size as i8) };
            for cell in 0..CELLS {
                if !self.board.can_place(cell, piece) {
                    continue;
                }
                let next = self.place(size, cell);
                debug_assert!(next.is_some(), "legal placement refused");
                if let Some(next) = next {
                    states.insert(next);
                }
            }
        }
        states.into_iter().collect()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::start()
    }
}

impl Game for GameState {
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
        GameState::successors(self)
    }
}
