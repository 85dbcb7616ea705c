//! Evaluator verdicts and solved values.
//!
//! Both are expressed from player A's (the maximizer's) point of view.

use serde::{Deserialize, Serialize};

/// Verdict of the terminal test on a single board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Outcome {
    /// Player A owns a complete line.
    Win,
    /// Player B owns a complete line.
    Loss,
    /// No complete line; the game goes on.
    Unresolved,
}

impl Outcome {
    /// The solved value of a terminal verdict, if any.
    #[inline]
    pub fn value(self) -> Option<Value> {
        match self {
            Outcome::Win => Some(Value::Win),
            Outcome::Loss => Some(Value::Loss),
            Outcome::Unresolved => None,
        }
    }
}

/// Game-theoretic value of a position under optimal play.
///
/// Ordered `Loss < Draw < Win` so the maximizer takes the greatest value and
/// the minimizer the least.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i8)]
pub enum Value {
    Loss = -1,
    Draw = 0,
    Win = 1,
}

impl Value {
    /// Convert from the -1/0/1 dump encoding.
    #[inline]
    pub fn from_i32(raw: i32) -> Option<Value> {
        match raw {
            -1 => Some(Value::Loss),
            0 => Some(Value::Draw),
            1 => Some(Value::Win),
            _ => None,
        }
    }

    /// The -1/0/1 dump encoding.
    #[inline]
    pub fn to_i32(self) -> i32 {
        self as i8 as i32
    }

    /// Re-express this value relative to one side.
    ///
    /// `Value::Loss.for_side(false)` is `Value::Win`: player B wins.
    #[inline]
    pub fn for_side(self, maximizer: bool) -> Value {
        if maximizer {
            self
        } else {
            match self {
                Value::Win => Value::Loss,
                Value::Draw => Value::Draw,
                Value::Loss => Value::Win,
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Value::Win => "A wins",
            Value::Draw => "draw",
            Value::Loss => "B wins",
        };
        f.write_str(s)
    }
}
