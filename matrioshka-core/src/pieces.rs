//! Remaining-piece inventory for one player.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Copies of each size a player starts with.
pub const COPIES: u8 = 2;

/// Counts of remaining size-1, size-2 and size-3 pieces.
///
/// Immutable; `take` returns a new set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct PieceSet(pub [u8; 3]);

impl PieceSet {
    /// The starting inventory: two of each size.
    #[inline]
    pub fn start() -> PieceSet {
        PieceSet([COPIES; 3])
    }

    /// Build a piece set, rejecting counts above `COPIES`.
    pub fn new(counts: [u8; 3]) -> Result<PieceSet, StateError> {
        for (size, &count) in counts.iter().enumerate() {
            if count > COPIES {
                return Err(StateError::CountOutOfRange { size: size + 1, count });
            }
        }
        Ok(PieceSet(counts))
    }

    /// Remaining copies of a size (1..=3); zero for any other size.
    #[inline]
    pub fn count(&self, size: u8) -> u8 {
        match size {
            1..=3 => self.0[(size - 1) as usize],
            _ => 0,
        }
    }

    /// Take one piece of `size`, or `None` if none remain or `size` is not
    /// 1..=3.
    #[inline]
    pub fn take(&self, size: u8) -> Option<PieceSet> {
        if !(1..=3).contains(&size) {
            return None;
        }
        let idx = (size - 1) as usize;
        let count = self.0[idx].checked_sub(1)?;
        let mut counts = self.0;
        counts[idx] = count;
        Some(PieceSet(counts))
    }

    /// Sizes with at least one copy left, smallest first.
    pub fn available(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=3u8).filter(move |&size| self.count(size) > 0)
    }

    /// Total pieces remaining.
    #[inline]
    pub fn remaining(&self) -> u8 {
        self.0.iter().sum()
    }

    /// Total pieces placed so far.
    #[inline]
    pub fn placed(&self) -> u8 {
        3 * COPIES - self.remaining()
    }

    /// Pieces of `size` placed so far.
    #[inline]
    pub fn placed_of(&self, size: u8) -> u8 {
        COPIES - self.count(size)
    }
}

impl Default for PieceSet {
    fn default() -> Self {
        Self::start()
    }
}
