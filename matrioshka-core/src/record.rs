//! Flat solution records, one per stored Matrioshka position.

use crate::board::Board;
use crate::error::StateError;
use crate::matrioshka::GameState;
use crate::outcome::Value;
use crate::pieces::PieceSet;
use crate::search::TranspositionTable;

/// A solved position as it appears in a solution dump.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Record {
    pub board: Board,
    pub max_pieces: PieceSet,
    pub min_pieces: PieceSet,
    pub value: Value,
    pub best: Board,
}

impl Record {
    /// Plies played, derived from the inventories.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.max_pieces.placed() + self.min_pieces.placed()
    }

    /// Sort key: depth, then board, then inventories.
    #[inline]
    pub fn sort_key(&self) -> (u8, Board, PieceSet, PieceSet) {
        (self.depth(), self.board, self.max_pieces, self.min_pieces)
    }

    /// Rebuild and validate the position this record describes.
    pub fn state(&self) -> Result<GameState, StateError> {
        GameState::new(self.board, self.max_pieces, self.min_pieces, self.depth())
    }

    /// All records of a table, sorted by `sort_key` so equal tables always
    /// produce the same sequence.
    pub fn from_table(table: &TranspositionTable<GameState>) -> Vec<Record> {
        let mut records: Vec<Record> = table
            .iter()
            .map(|(state, entry)| Record {
                board: state.board(),
                max_pieces: state.max_pieces(),
                min_pieces: state.min_pieces(),
                value: entry.value,
                best: entry.best,
            })
            .collect();
        records.sort_by_key(Record::sort_key);
        records
    }
}
