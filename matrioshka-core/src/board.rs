//! The 3x3 board and its symmetry reduction.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::outcome::Outcome;

/// Largest piece size.
pub const MAX_SIZE: i8 = 3;

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// Immutable 9-cell board.
///
/// Cell values are signed sizes: `0` is empty, `1..=3` is a player A piece,
/// `-1..=-3` is a player B piece. The derived ordering compares cells
/// lexicographically, which is the order used to pick the canonical form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Board(pub [i8; CELLS]);

impl Board {
    /// Position mapping for each of the 8 D4 transformations.
    /// Each array maps new_pos -> old_pos for that transformation.
    ///
    /// ```text
    ///   0 1 2
    ///   3 4 5
    ///   6 7 8
    /// ```
    pub const TRANSFORMS: [[usize; CELLS]; 8] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8], // Identity
        [6, 3, 0, 7, 4, 1, 8, 5, 2], // Rotate 90° clockwise
        [8, 7, 6, 5, 4, 3, 2, 1, 0], // Rotate 180°
        [2, 5, 8, 1, 4, 7, 0, 3, 6], // Rotate 270° clockwise
        [2, 1, 0, 5, 4, 3, 8, 7, 6], // Reflect horizontal (flip left-right)
        [6, 7, 8, 3, 4, 5, 0, 1, 2], // Reflect vertical (flip top-bottom)
        [0, 3, 6, 1, 4, 7, 2, 5, 8], // Reflect main diagonal
        [8, 5, 2, 7, 4, 1, 6, 3, 0], // Reflect anti-diagonal
    ];

    /// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
    pub const LINES: [[usize; 3]; 8] = [
        [0, 1, 2], // Row 0
        [3, 4, 5], // Row 1
        [6, 7, 8], // Row 2
        [0, 3, 6], // Col 0
        [1, 4, 7], // Col 1
        [2, 5, 8], // Col 2
        [0, 4, 8], // Main diagonal
        [2, 4, 6], // Anti-diagonal
    ];

    /// Create a new empty board.
    #[inline]
    pub fn new() -> Board {
        Board([0; CELLS])
    }

    /// Create a board from raw cells, rejecting values outside `-3..=3`.
    pub fn from_cells(cells: [i8; CELLS]) -> Result<Board, StateError> {
        for (cell, &value) in cells.iter().enumerate() {
            if value.abs() > MAX_SIZE {
                return Err(StateError::CellOutOfRange { cell, value });
            }
        }
        Ok(Board(cells))
    }

    /// Raw cell values.
    #[inline]
    pub fn cells(&self) -> &[i8; CELLS] {
        &self.0
    }

    /// Value at a cell.
    #[inline]
    pub fn get(&self, cell: usize) -> i8 {
        self.0[cell]
    }

    /// Return a copy of this board with one cell replaced.
    #[inline]
    pub fn with_cell(&self, cell: usize, value: i8) -> Board {
        let mut cells = self.0;
        cells[cell] = value;
        Board(cells)
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, cell: usize) -> bool {
        self.0[cell] == 0
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|&&v| v != 0).count()
    }

    /// Count visible pieces of each size for one side.
    /// Returns [size1, size2, size3].
    pub fn pieces_on_board(&self, maximizer: bool) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for &value in &self.0 {
            if value != 0 && (value > 0) == maximizer {
                counts[(value.unsigned_abs() - 1) as usize] += 1;
            }
        }
        counts
    }

    /// Check whether a piece (signed size) may be placed on `cell`.
    ///
    /// Legal iff the cell is empty, or holds an opposing piece of strictly
    /// smaller size. Own pieces and equal or larger enemy pieces block.
    #[inline]
    pub fn can_place(&self, cell: usize, piece: i8) -> bool {
        let current = self.0[cell];
        current == 0 || (piece * current < 0 && piece.abs() > current.abs())
    }

    /// Evaluate the board for a completed line.
    ///
    /// A line is complete when all three cells are occupied by the same side,
    /// regardless of piece sizes. The first complete line in `LINES` order
    /// decides the verdict.
    pub fn score(&self) -> Outcome {
        for line in &Self::LINES {
            let [a, b, c] = line.map(|i| self.0[i]);
            if a > 0 && b > 0 && c > 0 {
                return Outcome::Win;
            }
            if a < 0 && b < 0 && c < 0 {
                return Outcome::Loss;
            }
        }
        Outcome::Unresolved
    }

    // ========== Symmetry & Canonicalization ==========

    /// Apply a transformation to the board.
    ///
    /// The transformation index corresponds to `TRANSFORMS`.
    pub fn transform(&self, t: usize) -> Board {
        let mapping = &Self::TRANSFORMS[t];
        let mut cells = [0i8; CELLS];
        for (new_pos, &old_pos) in mapping.iter().enumerate() {
            cells[new_pos] = self.0[old_pos];
        }
        Board(cells)
    }

    /// Get all 8 symmetry images of this board.
    pub fn symmetries(&self) -> [Board; 8] {
        std::array::from_fn(|t| self.transform(t))
    }

    /// Get the canonical form of this board.
    ///
    /// The canonical form is the lexicographically smallest image across all
    /// 8 D4 transformations, so symmetric boards map to the same value.
    pub fn canonical(&self) -> Board {
        let mut min = *self;
        for t in 1..8 {
            let transformed = self.transform(t);
            if transformed < min {
                min = transformed;
            }
        }
        min
    }

    /// Check if this board is already in canonical form.
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.canonical() == *self
    }
}

impl std::fmt::Display for Board {
    /// Renders three rows; A pieces as `1 2 3`, B pieces as `a b c`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.0.chunks(3) {
            let line: String = row
                .iter()
                .map(|&v| match v {
                    0 => '.',
                    1..=3 => (b'0' + v as u8) as char,
                    _ => (b'a' + (v.unsigned_abs() - 1)) as char,
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_new() {
        let board = Board::new();
        assert_eq!(board.occupied(), 0);
        assert!(board.is_canonical());
    }

    #[test]
    fn test_from_cells_rejects_out_of_range() {
        let mut cells = [0i8; CELLS];
        cells[4] = 4;
        assert_eq!(
            Board::from_cells(cells),
            Err(StateError::CellOutOfRange { cell: 4, value: 4 })
        );
    }

    #[test]
    fn test_with_cell_leaves_original() {
        let board = Board::new();
        let next = board.with_cell(4, 2);
        assert_eq!(board.get(4), 0);
        assert_eq!(next.get(4), 2);
    }

    #[test]
    fn test_can_place() {
        let board = Board([0, 1, -1, 2, -2, 3, -3, 0, 0]);

        // Empty cell takes anything
        assert!(board.can_place(0, 1));
        assert!(board.can_place(0, -3));

        // Larger enemy captures smaller
        assert!(board.can_place(2, 2));
        assert!(board.can_place(4, 3));
        assert!(board.can_place(1, -2));

        // Equal size blocks
        assert!(!board.can_place(2, 1));
        assert!(!board.can_place(4, 2));

        // Own pieces block, whatever the size
        assert!(!board.can_place(1, 3));
        assert!(!board.can_place(2, -3));

        // Nothing beats a size 3
        assert!(!board.can_place(5, -3));
        assert!(!board.can_place(6, 3));
    }

    #[test]
    fn test_pieces_on_board() {
        let board = Board([1, 1, -2, 3, 0, -3, -3, 0, 2]);
        assert_eq!(board.pieces_on_board(true), [2, 1, 1]);
        assert_eq!(board.pieces_on_board(false), [0, 1, 2]);
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(Board::new().score(), Outcome::Unresolved);
    }

    #[test]
    fn test_mixed_sizes_win() {
        // Sizes do not matter, only ownership
        let board = Board([1, 3, 2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.score(), Outcome::Win);

        let board = Board([-1, 0, 0, 0, -3, 0, 0, 0, -2]);
        assert_eq!(board.score(), Outcome::Loss);
    }

    #[test]
    fn test_all_winning_lines() {
        for line in &Board::LINES {
            let mut board = Board::new();
            for &i in line {
                board = board.with_cell(i, 2);
            }
            assert_eq!(board.score(), Outcome::Win, "line {:?}", line);

            let mut board = Board::new();
            for &i in line {
                board = board.with_cell(i, -1);
            }
            assert_eq!(board.score(), Outcome::Loss, "line {:?}", line);
        }
    }

    #[test]
    fn test_mixed_or_partial_line_no_verdict() {
        let board = Board([1, -1, 1, 2, 0, 3, -2, -3, 0]);
        assert_eq!(board.score(), Outcome::Unresolved);
    }

    #[test]
    fn test_rotate_90() {
        let board = Board::new().with_cell(0, 1);

        // After 90° rotation, (0,0) -> (0,2)
        let rotated = board.transform(1);
        assert_eq!(rotated.get(2), 1);
        assert_eq!(rotated.get(0), 0);
    }

    #[test]
    fn test_rotate_360_identity() {
        let board = Board([1, 0, -2, 0, 3, 0, 0, -1, 0]);
        let mut current = board;
        for _ in 0..4 {
            current = current.transform(1);
        }
        assert_eq!(current, board);
    }

    #[test]
    fn test_reflect_twice_identity() {
        let board = Board([1, -2, 0, 0, 3, 0, 0, -1, 2]);
        for t in 4..8 {
            assert_eq!(board.transform(t).transform(t), board, "transform {}", t);
        }
    }

    #[test]
    fn test_center_invariant() {
        let board = Board::new().with_cell(4, -3);
        for t in 0..8 {
            assert_eq!(board.transform(t).get(4), -3, "transform {}", t);
        }
    }

    #[test]
    fn test_all_corners_same_canonical() {
        let canonicals: Vec<Board> = [0, 2, 6, 8]
            .iter()
            .map(|&c| Board::new().with_cell(c, 2).canonical())
            .collect();
        for c in &canonicals[1..] {
            assert_eq!(*c, canonicals[0]);
        }
    }

    #[test]
    fn test_all_edges_same_canonical() {
        let canonicals: Vec<Board> = [1, 3, 5, 7]
            .iter()
            .map(|&c| Board::new().with_cell(c, -1).canonical())
            .collect();
        for c in &canonicals[1..] {
            assert_eq!(*c, canonicals[0]);
        }
    }

    #[test]
    fn test_canonical_is_minimum() {
        let board = Board([0, 1, 0, -2, 0, 0, 0, 0, 3]);
        let min = *board.symmetries().iter().min().unwrap();
        assert_eq!(board.canonical(), min);
    }

    #[test]
    fn test_corner_and_edge_differ() {
        let corner = Board::new().with_cell(0, 1).canonical();
        let edge = Board::new().with_cell(1, 1).canonical();
        let center = Board::new().with_cell(4, 1).canonical();
        assert_ne!(corner, edge);
        assert_ne!(corner, center);
        assert_ne!(edge, center);
    }

    #[test]
    fn test_display() {
        let board = Board([1, 0, -3, 0, 2, 0, -1, 0, 3]);
        assert_eq!(board.to_string(), "1.c\n.2.\na.3\n");
    }
}
