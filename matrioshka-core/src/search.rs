//! Minimax solver with a transposition table.
//!
//! The traversal is an explicit stack of frames, one per position whose
//! successors are being searched. A position is pushed only when it is not
//! already in the table, and it is stored when its frame pops, so every
//! position is solved at most once.

use std::collections::hash_map::{self, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::board::Board;
use crate::observer::SearchObserver;
use crate::outcome::{Outcome, Value};

/// A two-player game the solver can search.
///
/// Implementations hold positions in whatever reduced form they want
/// memoized; equal positions must have equal values.
pub trait Game: Copy + Eq + Hash + Ord + Debug {
    /// Plies played. Even depth means the maximizer moves next.
    fn depth(&self) -> u8;

    /// Whether the maximizer moves next.
    #[inline]
    fn maximizer_to_move(&self) -> bool {
        self.depth() % 2 == 0
    }

    /// The board of this position.
    fn board(&self) -> Board;

    /// Terminal test, from the maximizer's point of view.
    fn score(&self) -> Outcome;

    /// Distinct successors in ascending order. Empty when the side to move
    /// has no legal move.
    fn successors(&self) -> Vec<Self>;
}

/// A stored result: the value and the board of the chosen successor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Entry {
    pub value: Value,
    pub best: Board,
}

/// The value of a solved position and, unless it is a leaf, the board of
/// the successor that achieves it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Solution {
    pub value: Value,
    pub best: Option<Board>,
}

impl From<Entry> for Solution {
    fn from(entry: Entry) -> Self {
        Solution {
            value: entry.value,
            best: Some(entry.best),
        }
    }
}

/// Memoized results keyed by position.
#[derive(Debug, Clone)]
pub struct TranspositionTable<G> {
    entries: HashMap<G, Entry>,
}

impl<G: Game> TranspositionTable<G> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, state: &G) -> Option<&Entry> {
        self.entries.get(state)
    }

    /// Insert if absent, otherwise return the entry already stored.
    ///
    /// An existing entry is never overwritten.
    pub fn insert(&mut self, state: G, entry: Entry) -> Entry {
        match self.entries.entry(state) {
            hash_map::Entry::Occupied(existing) => {
                debug_assert_eq!(*existing.get(), entry, "position solved twice: {:?}", state);
                *existing.get()
            }
            hash_map::Entry::Vacant(slot) => *slot.insert(entry),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&G, &Entry)> {
        self.entries.iter()
    }
}

impl<G: Game> Default for TranspositionTable<G> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared flag that stops a running solve.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from a signal handler thread.
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Engine options.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Consult and fill the transposition table. Turning this off leaves the
    /// results unchanged and the search exponentially slower.
    pub memoize: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { memoize: true }
    }
}

/// Stack frame for the iterative search.
struct Frame<G> {
    state: G,
    /// Successors to explore, ascending
    children: Vec<G>,
    /// Index into children
    child_idx: usize,
    /// Best (value, successor board) found so far
    best: Option<(Value, Board)>,
    /// Whether the side to move is maximizing
    is_maximizing: bool,
}

impl<G: Game> Frame<G> {
    fn new(state: G, children: Vec<G>) -> Self {
        Frame {
            is_maximizing: state.maximizer_to_move(),
            state,
            children,
            child_idx: 0,
            best: None,
        }
    }

    #[inline]
    fn next_child(&mut self) -> Option<G> {
        let child = self.children.get(self.child_idx).copied()?;
        self.child_idx += 1;
        Some(child)
    }

    /// Keep the first strictly better child, so ties go to the smallest
    /// successor.
    #[inline]
    fn update_best(&mut self, value: Value, board: Board) {
        let better = match self.best {
            None => true,
            Some((best, _)) if self.is_maximizing => value > best,
            Some((best, _)) => value < best,
        };
        if better {
            self.best = Some((value, board));
        }
    }
}

/// What a position needs before its value is known.
enum Step<G> {
    Solved(Solution),
    Expand(Vec<G>),
}

/// Minimax solver with transposition table.
pub struct Solver<G: Game> {
    /// Transposition table: position -> (value, best successor board)
    pub table: TranspositionTable<G>,
    config: SearchConfig,
    cancel: CancelToken,
}

impl<G: Game> Solver<G> {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            table: TranspositionTable::new(),
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use `cancel` to stop this solver from elsewhere.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Solve `root`. Returns `None` if cancelled.
    pub fn solve(&mut self, root: G) -> Option<Solution> {
        self.solve_observed(root, &mut ())
    }

    /// Solve `root`, reporting progress to `observer`.
    ///
    /// Returns `None` if cancelled; the table then holds only positions whose
    /// subtrees were searched completely.
    pub fn solve_observed<O: SearchObserver>(&mut self, root: G, observer: &mut O) -> Option<Solution> {
        debug!(depth = root.depth(), memoize = self.config.memoize, "solve started");

        let children = match self.step(&root, observer) {
            Step::Solved(solution) => return Some(solution),
            Step::Expand(children) => children,
        };

        // Recursion depth is bounded by the number of plies
        let mut stack: Vec<Frame<G>> = Vec::with_capacity(16);
        observer.on_expand(root.depth());
        stack.push(Frame::new(root, children));

        loop {
            if self.cancel.is_cancelled() {
                debug!(table_len = self.table.len(), "solve cancelled");
                return None;
            }

            let frame = stack.last_mut()?;

            if let Some(child) = frame.next_child() {
                match self.step(&child, observer) {
                    Step::Solved(solution) => frame.update_best(solution.value, child.board()),
                    Step::Expand(children) => {
                        observer.on_expand(child.depth());
                        stack.push(Frame::new(child, children));
                    }
                }
                continue;
            }

            // No more children - pop frame and record outcome
            let frame = stack.pop()?;
            let (value, best) = frame.best?;
            if self.config.memoize {
                self.table.insert(frame.state, Entry { value, best });
                observer.on_stored(frame.state.depth(), value, self.table.len());
            }

            match stack.last_mut() {
                Some(parent) => parent.update_best(value, frame.state.board()),
                None => {
                    debug!(%value, table_len = self.table.len(), "solve finished");
                    return Some(Solution {
                        value,
                        best: Some(best),
                    });
                }
            }
        }
    }

    /// Resolve a position without expanding it when possible: table hit,
    /// completed line, or no legal move.
    fn step<O: SearchObserver>(&self, state: &G, observer: &mut O) -> Step<G> {
        if self.config.memoize {
            if let Some(&entry) = self.table.get(state) {
                observer.on_cache_hit(state.depth());
                return Step::Solved(entry.into());
            }
        }

        if let Some(value) = state.score().value() {
            observer.on_terminal(state.depth(), value);
            return Step::Solved(Solution { value, best: None });
        }

        let children = state.successors();
        if children.is_empty() {
            observer.on_terminal(state.depth(), Value::Draw);
            return Step::Solved(Solution {
                value: Value::Draw,
                best: None,
            });
        }
        Step::Expand(children)
    }

    /// The successor recorded as best for `state`, if `state` is stored.
    pub fn best_reply(&self, state: &G) -> Option<G> {
        let entry = self.table.get(state)?;
        state
            .successors()
            .into_iter()
            .find(|next| next.board() == entry.best)
    }

    /// Follow best replies from `state` until a position that is not stored
    /// (a leaf). The first element is `state` itself.
    pub fn principal_variation(&self, state: G) -> Vec<G> {
        let mut line = vec![state];
        let mut current = state;
        while let Some(next) = self.best_reply(&current) {
            line.push(next);
            current = next;
        }
        line
    }
}

impl<G: Game> Default for Solver<G> {
    fn default() -> Self {
        Self::new()
    }
}
