//! Hooks the solver calls while it searches.

use crate::outcome::Value;

/// Receives search events. Every hook defaults to a no-op, and no hook can
/// influence the result of a solve.
pub trait SearchObserver {
    /// A position is about to have its successors searched.
    fn on_expand(&mut self, _depth: u8) {}

    /// A position was answered from the transposition table.
    fn on_cache_hit(&mut self, _depth: u8) {}

    /// A leaf was reached: a completed line, or no legal move (`Value::Draw`).
    fn on_terminal(&mut self, _depth: u8, _value: Value) {}

    /// A solved position was stored; `table_len` includes it.
    fn on_stored(&mut self, _depth: u8, _value: Value, _table_len: usize) {}
}

impl SearchObserver for () {}

impl<T: SearchObserver + ?Sized> SearchObserver for &mut T {
    fn on_expand(&mut self, depth: u8) {
        (**self).on_expand(depth)
    }

    fn on_cache_hit(&mut self, depth: u8) {
        (**self).on_cache_hit(depth)
    }

    fn on_terminal(&mut self, depth: u8, value: Value) {
        (**self).on_terminal(depth, value)
    }

    fn on_stored(&mut self, depth: u8, value: Value, table_len: usize) {
        (**self).on_stored(depth, value, table_len)
    }
}
