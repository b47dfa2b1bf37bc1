//! SimpleScore - single-level score.

use std::cmp::Ordering;
use std::fmt;

use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A score with a single integer level.
///
/// # Examples
///
/// ```
/// use planwright_core::{Score, SimpleScore};
///
/// let worse = SimpleScore::of(-5);
/// let better = SimpleScore::of(-3);
///
/// assert!(better > worse);
/// assert!(!worse.is_feasible());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleScore {
    score: i64,
}

impl SimpleScore {
    pub const ZERO: SimpleScore = SimpleScore { score: 0 };

    #[inline]
    pub const fn of(score: i64) -> Self {
        SimpleScore { score }
    }

    #[inline]
    pub const fn score(&self) -> i64 {
        self.score
    }
}

impl Score for SimpleScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.score >= 0
    }

    #[inline]
    fn zero() -> Self {
        SimpleScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        1
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        vec![self.score]
    }

    fn from_level_numbers(levels: &[i64]) -> Self {
        SimpleScore::of(levels.first().copied().unwrap_or(0))
    }

    impl_score_scale!(SimpleScore { score } => of);

    fn level_label(index: usize) -> Option<ScoreLevel> {
        (index == 0).then_some(ScoreLevel::Soft)
    }
}

impl Ord for SimpleScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

impl_score_ops!(SimpleScore { score } => of);

impl fmt::Debug for SimpleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleScore({})", self.score)
    }
}

impl fmt::Display for SimpleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.score)
    }
}

impl ParseableScore for SimpleScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let s = s.trim();
        s.parse::<i64>()
            .map(SimpleScore::of)
            .map_err(|e| ScoreParseError::new(format!("invalid SimpleScore '{}': {}", s, e)))
    }

    fn to_string_repr(&self) -> String {
        self.score.to_string()
    }
}

impl From<i64> for SimpleScore {
    fn from(score: i64) -> Self {
        SimpleScore::of(score)
    }
}
