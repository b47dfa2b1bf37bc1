//! Termination conditions and progress estimation.
//!
//! A [`Termination`] is a tree of leaf criteria joined by AND/OR nodes. It
//! answers two questions about a [`TerminationProgress`] snapshot: has
//! solving (or the current phase) finished, and how far along is it. The
//! second answer, the time gradient, drives time-aware acceptors such as
//! simulated annealing.

mod progress;
mod score_attained;

#[cfg(test)]
mod tests;

use std::fmt;
use std::time::Duration;

use planwright_config::CompositionStyle;
use planwright_core::score::Score;

pub use progress::TerminationProgress;
pub use score_attained::score_time_gradient;

/// Returned by a time gradient that cannot be estimated.
pub const UNSUPPORTED_TIME_GRADIENT: f64 = -1.0;

/// A stop criterion and progress estimator.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use planwright_config::CompositionStyle;
/// use planwright_core::SimpleScore;
/// use planwright_solver::termination::{Termination, TerminationProgress};
///
/// let termination = Termination::combine(
///     CompositionStyle::Or,
///     vec![
///         Termination::StepCount { limit: 100 },
///         Termination::ScoreAttained { target: SimpleScore::of(0) },
///     ],
/// );
///
/// let progress = TerminationProgress {
///     elapsed: Duration::from_secs(1),
///     step_count: 40,
///     unimproved_step_count: 3,
///     starting_score: Some(SimpleScore::of(-10)),
///     best_score: Some(SimpleScore::of(-5)),
/// };
/// assert!(!termination.is_terminated(&progress));
/// // The slowest criterion sets the pace: 40 of 100 steps beats 5 of 10 points.
/// assert_eq!(termination.time_gradient(&progress), 0.4);
/// ```
#[derive(Clone, PartialEq)]
pub enum Termination<Sc> {
    /// Stops once `limit` steps have completed.
    StepCount { limit: u64 },
    /// Stops once `limit` steps have completed since the best score last improved.
    UnimprovedStepCount { limit: u64 },
    /// Stops once the best score is at least `target`.
    ScoreAttained { target: Sc },
    /// Stops once `limit` has elapsed.
    TimeSpent { limit: Duration },
    /// Stops when every child stops. An empty node never stops.
    And(Vec<Termination<Sc>>),
    /// Stops when any child stops.
    Or(Vec<Termination<Sc>>),
}

impl<Sc: Score> Termination<Sc> {
    /// Joins `children` with `style`; a single child is returned as is.
    pub fn combine(style: CompositionStyle, mut children: Vec<Termination<Sc>>) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        match style {
            CompositionStyle::And => Termination::And(children),
            CompositionStyle::Or => Termination::Or(children),
        }
    }

    pub fn is_terminated(&self, progress: &TerminationProgress<Sc>) -> bool {
        match self {
            Termination::StepCount { limit } => progress.step_count >= *limit,
            Termination::UnimprovedStepCount { limit } => {
                progress.unimproved_step_count >= *limit
            }
            Termination::ScoreAttained { target } => {
                progress.best_score.is_some_and(|best| best >= *target)
            }
            Termination::TimeSpent { limit } => progress.elapsed >= *limit,
            Termination::And(children) => {
                !children.is_empty() && children.iter().all(|t| t.is_terminated(progress))
            }
            Termination::Or(children) => children.iter().any(|t| t.is_terminated(progress)),
        }
    }

    /// Progress in `[0, 1]`, or [`UNSUPPORTED_TIME_GRADIENT`].
    ///
    /// Composites report the minimum of their children's supported
    /// gradients, AND and OR alike.
    pub fn time_gradient(&self, progress: &TerminationProgress<Sc>) -> f64 {
        match self {
            Termination::StepCount { limit } => {
                if *limit == 0 {
                    1.0
                } else {
                    (progress.step_count as f64 / *limit as f64).min(1.0)
                }
            }
            // Progress resets whenever the best score improves.
            Termination::UnimprovedStepCount { .. } => UNSUPPORTED_TIME_GRADIENT,
            Termination::ScoreAttained { target } => {
                match (progress.starting_score, progress.best_score) {
                    (Some(start), Some(best)) => score_time_gradient(&start, target, &best),
                    _ => 0.0,
                }
            }
            Termination::TimeSpent { limit } => {
                if limit.is_zero() {
                    1.0
                } else {
                    (progress.elapsed.as_secs_f64() / limit.as_secs_f64()).min(1.0)
                }
            }
            Termination::And(children) | Termination::Or(children) => {
                min_time_gradient(children.iter().map(|t| t.time_gradient(progress)))
            }
        }
    }

    /// True when [`Termination::time_gradient`] never reports
    /// [`UNSUPPORTED_TIME_GRADIENT`].
    pub fn supports_time_gradient(&self) -> bool {
        match self {
            Termination::UnimprovedStepCount { .. } => false,
            Termination::And(children) | Termination::Or(children) => {
                children.iter().any(Termination::supports_time_gradient)
            }
            _ => true,
        }
    }
}

/// Minimum of the supported gradients, or [`UNSUPPORTED_TIME_GRADIENT`]
/// when none is supported.
pub fn min_time_gradient(gradients: impl IntoIterator<Item = f64>) -> f64 {
    gradients
        .into_iter()
        .filter(|g| *g >= 0.0)
        .fold(None, |min: Option<f64>, g| Some(min.map_or(g, |m| m.min(g))))
        .map_or(UNSUPPORTED_TIME_GRADIENT, |g| g.min(1.0))
}

impl<Sc: fmt::Display> fmt::Debug for Termination<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::StepCount { limit } => write!(f, "StepCount({limit})"),
            Termination::UnimprovedStepCount { limit } => {
                write!(f, "UnimprovedStepCount({limit})")
            }
            Termination::ScoreAttained { target } => write!(f, "ScoreAttained({target})"),
            Termination::TimeSpent { limit } => write!(f, "TimeSpent({limit:?})"),
            Termination::And(children) => f.debug_tuple("And").field(children).finish(),
            Termination::Or(children) => f.debug_tuple("Or").field(children).finish(),
        }
    }
}
