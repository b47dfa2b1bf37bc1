//! The `Score` trait and score literal parsing.

use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use thiserror::Error;

use super::ScoreLevel;

/// A totally ordered, multi-level measure of solution quality.
///
/// Higher is better. Levels are compared lexicographically from the highest
/// priority level down, so a single hard point outweighs any number of soft
/// points.
///
/// The engine never computes a score itself. It only compares scores,
/// subtracts them to obtain per-level deltas, and reads their level numbers
/// (for example to estimate progress towards a target score).
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + Eq
    + Ord
    + std::hash::Hash
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true when every hard level is non-negative.
    fn is_feasible(&self) -> bool;

    /// The additive identity.
    fn zero() -> Self;

    /// Number of levels, hard levels first.
    fn levels_count() -> usize;

    /// Level values ordered from highest to lowest priority.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Builds a score from level values ordered like [`Score::to_level_numbers`].
    ///
    /// Missing trailing levels are treated as zero and surplus levels are ignored.
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Multiplies every level by `multiplicand`, rounding to the nearest integer.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Divides every level by `divisor`, rounding to the nearest integer.
    fn divide(&self, divisor: f64) -> Self;

    /// Returns the level-wise absolute value.
    fn abs(&self) -> Self;

    /// Classifies the level at `index`.
    ///
    /// Returns `None` when `index >= levels_count()`.
    fn level_label(index: usize) -> Option<ScoreLevel>;

    /// Returns true if this score is strictly better than `other`.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns true if this score is strictly worse than `other`.
    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }
}

/// A score that can be read from and written to a textual literal.
///
/// Literals appear in configuration files, for example as a best score
/// limit or as a simulated annealing starting temperature.
pub trait ParseableScore: Score {
    /// Parses a literal such as `"-5"`, `"0hard/-20soft"` or
    /// `"[0/0]hard/[-1/-2]soft"`.
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Formats the score as a literal accepted by [`ParseableScore::parse`].
    fn to_string_repr(&self) -> String;
}

/// A score literal could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
