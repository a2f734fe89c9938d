//! G-code word values: literals, parameter references, and omitted words.
//!
//! Generated coordinates accumulate floating round-off, so literal
//! comparison is tolerance-based: two literals within [`VALUE_EPS`] of
//! each other are the same value. Display rendering normalizes
//! near-zero literals to `0` for the same reason; that is a formatting
//! concern only and does not change the stored value.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for literal equality and display normalization.
pub const VALUE_EPS: f64 = 0.001;

/// The value carried by a single G-code word.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A concrete number, e.g. `X12.5`.
    Literal(f64),
    /// A numbered parameter reference, e.g. `X#5`.
    Variable(i64),
    /// The word is absent from the instruction.
    Omitted,
}

impl Value {
    /// Shorthand for `Value::Literal`.
    pub fn literal(v: f64) -> Self {
        Value::Literal(v)
    }

    /// Returns true if the word is absent.
    pub fn is_omitted(&self) -> bool {
        matches!(self, Value::Omitted)
    }

    /// Returns the literal number, if this is a literal.
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            Value::Literal(v) => Some(*v),
            _ => None,
        }
    }

    /// Tolerance equality with a caller-supplied epsilon.
    ///
    /// Literals compare within `eps`; variables compare by index;
    /// omitted equals omitted. Values of different kinds are never
    /// equal, regardless of epsilon.
    pub fn approx_eq(&self, other: &Value, eps: f64) -> bool {
        match (self, other) {
            (Value::Literal(a), Value::Literal(b)) => (a - b).abs() <= eps,
            (Value::Variable(a), Value::Variable(b)) => a == b,
            (Value::Omitted, Value::Omitted) => true,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, VALUE_EPS)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Omitted
    }
}

impl fmt::Display for Value {
    /// Renders the canonical word text.
    ///
    /// Literals within [`VALUE_EPS`] of zero render as `0`; other
    /// literals render with up to four decimal places, trailing zeros
    /// trimmed. Variables render as `#n`. Omitted renders as nothing;
    /// callers are expected to skip the word entirely.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(v) => {
                if v.abs() < VALUE_EPS {
                    return write!(f, "0");
                }
                let text = format!("{v:.4}");
                let text = text.trim_end_matches('0').trim_end_matches('.');
                write!(f, "{text}")
            }
            Value::Variable(n) => write!(f, "#{n}"),
            Value::Omitted => Ok(()),
        }
    }
}
