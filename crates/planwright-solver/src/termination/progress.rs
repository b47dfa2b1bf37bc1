//! Snapshot of search progress read by terminations.

use std::time::Duration;

use planwright_core::domain::PlanningSolution;
use planwright_scoring::ScoreDirector;

use crate::scope::{PhaseContext, SolverScope};

/// What a [`Termination`](super::Termination) looks at.
///
/// Solver-level snapshots count from the start of solving, phase-level ones
/// from the start of the current phase. The best score is always the
/// solver's best, and absent while no initialized solution has been seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminationProgress<Sc> {
    pub elapsed: Duration,
    pub step_count: u64,
    pub unimproved_step_count: u64,
    pub starting_score: Option<Sc>,
    pub best_score: Option<Sc>,
}

impl<Sc: Copy> TerminationProgress<Sc> {
    pub fn of_solver<S, D>(scope: &SolverScope<S, D>) -> Self
    where
        S: PlanningSolution<Score = Sc>,
        D: ScoreDirector<S>,
    {
        Self {
            elapsed: scope.elapsed(),
            step_count: scope.total_step_count(),
            unimproved_step_count: scope
                .total_step_count()
                .saturating_sub(scope.best_score_step()),
            starting_score: scope.starting_score().copied(),
            best_score: initialized_best_score(scope),
        }
    }

    pub fn of_phase<S, D>(scope: &SolverScope<S, D>, phase: &PhaseContext<Sc>) -> Self
    where
        S: PlanningSolution<Score = Sc>,
        D: ScoreDirector<S>,
    {
        Self {
            elapsed: phase.elapsed(),
            step_count: phase.step_count(),
            unimproved_step_count: phase.unimproved_step_count(),
            starting_score: phase.starting_score().copied(),
            best_score: initialized_best_score(scope),
        }
    }
}

fn initialized_best_score<S, D>(scope: &SolverScope<S, D>) -> Option<S::Score>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    scope
        .best_score()
        .copied()
        .filter(|_| scope.is_best_initialized())
}
