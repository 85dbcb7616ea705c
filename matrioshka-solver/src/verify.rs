//! Re-check a solution dump without trusting the solver.
//!
//! Every record is rebuilt into a position and its value recomputed from
//! its successors' values: stored successors come from the dump itself,
//! leaves are scored directly. A dump of a complete solve from the start
//! passes with no problems.

use std::collections::{BTreeMap, HashMap};

use matrioshka_core::{Board, GameState, Record, StateError, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    #[error("record {index}: invalid position: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: StateError,
    },

    #[error("record {index}: board is not in canonical form")]
    NotCanonical { index: usize },

    #[error("record {index}: position already recorded")]
    Duplicate { index: usize },

    #[error("record {index}: out of order")]
    Unsorted { index: usize },

    #[error("record {index}: a successor is neither a leaf nor recorded")]
    MissingSuccessor { index: usize },

    #[error("record {index}: value {recorded} but successors give {computed}")]
    ValueMismatch {
        index: usize,
        recorded: Value,
        computed: Value,
    },

    #[error("record {index}: best successor differs from the first best move")]
    BestMismatch { index: usize, expected: Board },
}

/// Summary of a checked dump.
#[derive(Debug, Default)]
pub struct Report {
    pub records: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub by_depth: BTreeMap<u8, usize>,
    /// Value of the start position, when the dump contains it
    pub root: Option<Value>,
    pub problems: Vec<Problem>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Value of a successor: from the dump when stored, otherwise as a leaf.
fn successor_value(values: &HashMap<GameState, Value>, state: &GameState) -> Option<Value> {
    if let Some(&value) = values.get(state) {
        return Some(value);
    }
    if let Some(value) = state.score().value() {
        return Some(value);
    }
    // Positions with moves left must have been stored
    state.successors().is_empty().then_some(Value::Draw)
}

/// Check `records` for consistency.
pub fn check(records: &[Record]) -> Report {
    let mut report = Report {
        records: records.len(),
        ..Default::default()
    };

    let mut values: HashMap<GameState, Value> = HashMap::with_capacity(records.len());
    let mut states: Vec<(usize, GameState)> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match record.value {
            Value::Win => report.wins += 1,
            Value::Loss => report.losses += 1,
            Value::Draw => report.draws += 1,
        }
        *report.by_depth.entry(record.depth()).or_default() += 1;

        if index > 0 && records[index - 1].sort_key() > record.sort_key() {
            report.problems.push(Problem::Unsorted { index });
        }

        let state = match record.state() {
            Ok(state) => state,
            Err(source) => {
                report.problems.push(Problem::Invalid { index, source });
                continue;
            }
        };
        if state.board() != record.board {
            report.problems.push(Problem::NotCanonical { index });
            continue;
        }
        if values.insert(state, record.value).is_some() {
            report.problems.push(Problem::Duplicate { index });
            continue;
        }
        states.push((index, state));
    }

    report.root = values.get(&GameState::start()).copied();

    for (index, state) in states {
        let record = &records[index];
        let maximizing = state.maximizer_to_move();

        let mut best: Option<(Value, Board)> = None;
        let mut missing = false;
        for next in state.successors() {
            let Some(value) = successor_value(&values, &next) else {
                missing = true;
                break;
            };
            let better = match best {
                None => true,
                Some((current, _)) if maximizing => value > current,
                Some((current, _)) => value < current,
            };
            if better {
                best = Some((value, next.board()));
            }
        }

        if missing {
            report.problems.push(Problem::MissingSuccessor { index });
            continue;
        }
        let Some((computed, expected)) = best else {
            // Stored leaves never come out of the solver
            report.problems.push(Problem::MissingSuccessor { index });
            continue;
        };
        if computed != record.value {
            report.problems.push(Problem::ValueMismatch {
                index,
                recorded: record.value,
                computed,
            });
        } else if expected != record.best {
            report.problems.push(Problem::BestMismatch { index, expected });
        }
    }

    report
}
