//! BendableScore - score with a compile-time number of hard and soft levels.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A score with `H` hard levels followed by `S` soft levels.
///
/// # Examples
///
/// ```
/// use planwright_core::{BendableScore, ParseableScore, Score};
///
/// let score = BendableScore::<1, 2>::of([-1], [-10, -20]);
/// assert!(!score.is_feasible());
/// assert_eq!(score.to_string_repr(), "[-1]hard/[-10/-20]soft");
/// assert_eq!(BendableScore::<1, 2>::parse("[-1]hard/[-10/-20]soft"), Ok(score));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BendableScore<const H: usize, const S: usize> {
    hard: [i64; H],
    soft: [i64; S],
}

impl<const H: usize, const S: usize> BendableScore<H, S> {
    pub const fn of(hard: [i64; H], soft: [i64; S]) -> Self {
        BendableScore { hard, soft }
    }

    pub fn hard_scores(&self) -> &[i64] {
        &self.hard
    }

    pub fn soft_scores(&self) -> &[i64] {
        &self.soft
    }

    fn map(&self, f: impl Fn(i64) -> i64) -> Self {
        BendableScore {
            hard: self.hard.map(&f),
            soft: self.soft.map(&f),
        }
    }

    fn zip(&self, other: &Self, f: impl Fn(i64, i64) -> i64) -> Self {
        let mut result = *self;
        for (a, b) in result.hard.iter_mut().zip(other.hard) {
            *a = f(*a, b);
        }
        for (a, b) in result.soft.iter_mut().zip(other.soft) {
            *a = f(*a, b);
        }
        result
    }
}

impl<const H: usize, const S: usize> Default for BendableScore<H, S> {
    fn default() -> Self {
        BendableScore {
            hard: [0; H],
            soft: [0; S],
        }
    }
}

impl<const H: usize, const S: usize> Score for BendableScore<H, S> {
    fn is_feasible(&self) -> bool {
        self.hard.iter().all(|&level| level >= 0)
    }

    fn zero() -> Self {
        Self::default()
    }

    fn levels_count() -> usize {
        H + S
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        self.hard.iter().chain(self.soft.iter()).copied().collect()
    }

    fn from_level_numbers(levels: &[i64]) -> Self {
        let mut score = Self::default();
        for (i, slot) in score.hard.iter_mut().chain(score.soft.iter_mut()).enumerate() {
            *slot = levels.get(i).copied().unwrap_or(0);
        }
        score
    }

    fn multiply(&self, multiplicand: f64) -> Self {
        self.map(|level| (level as f64 * multiplicand).round() as i64)
    }

    fn divide(&self, divisor: f64) -> Self {
        self.map(|level| (level as f64 / divisor).round() as i64)
    }

    fn abs(&self) -> Self {
        self.map(i64::abs)
    }

    fn level_label(index: usize) -> Option<ScoreLevel> {
        if index < H {
            Some(ScoreLevel::Hard)
        } else if index < H + S {
            Some(ScoreLevel::Soft)
        } else {
            None
        }
    }
}

impl<const H: usize, const S: usize> Ord for BendableScore<H, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard
            .cmp(&other.hard)
            .then_with(|| self.soft.cmp(&other.soft))
    }
}

impl<const H: usize, const S: usize> PartialOrd for BendableScore<H, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const H: usize, const S: usize> Add for BendableScore<H, S> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip(&other, |a, b| a + b)
    }
}

impl<const H: usize, const S: usize> Sub for BendableScore<H, S> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip(&other, |a, b| a - b)
    }
}

impl<const H: usize, const S: usize> Neg for BendableScore<H, S> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|level| -level)
    }
}

fn join_levels(levels: &[i64]) -> String {
    levels
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_levels<const N: usize>(part: &str, label: &str) -> Result<[i64; N], ScoreParseError> {
    let inner = part
        .trim()
        .strip_prefix('[')
        .and_then(|p| p.strip_suffix(']'))
        .ok_or_else(|| ScoreParseError::new(format!("{} levels '{}' must be bracketed", label, part)))?;
    let mut levels = [0; N];
    let mut count = 0;
    for token in inner.split('/').filter(|t| !t.trim().is_empty()) {
        let slot = levels.get_mut(count).ok_or_else(|| {
            ScoreParseError::new(format!("expected {} {} levels in '{}'", N, label, part))
        })?;
        *slot = token
            .trim()
            .parse::<i64>()
            .map_err(|e| ScoreParseError::new(format!("invalid {} level '{}': {}", label, token, e)))?;
        count += 1;
    }
    if count != N {
        return Err(ScoreParseError::new(format!(
            "expected {} {} levels in '{}'",
            N, label, part
        )));
    }
    Ok(levels)
}

impl<const H: usize, const S: usize> ParseableScore for BendableScore<H, S> {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let s = s.trim();
        let (hard, soft) = s
            .split_once("hard/")
            .ok_or_else(|| ScoreParseError::new(format!("'{}' is not shaped like '[..]hard/[..]soft'", s)))?;
        let soft = soft
            .trim()
            .strip_suffix("soft")
            .ok_or_else(|| ScoreParseError::new(format!("'{}' must end with 'soft'", s)))?;
        Ok(BendableScore {
            hard: parse_levels::<H>(hard, "hard")?,
            soft: parse_levels::<S>(soft, "soft")?,
        })
    }

    fn to_string_repr(&self) -> String {
        format!("[{}]hard/[{}]soft", join_levels(&self.hard), join_levels(&self.soft))
    }
}

impl<const H: usize, const S: usize> fmt::Debug for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BendableScore({:?}, {:?})", self.hard, self.soft)
    }
}

impl<const H: usize, const S: usize> fmt::Display for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_repr())
    }
}
