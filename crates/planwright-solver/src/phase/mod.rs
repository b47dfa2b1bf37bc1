//! Solver phases.
//!
//! - [`ConstructionHeuristicPhase`](construction::ConstructionHeuristicPhase):
//!   assigns every uninitialized entity
//! - [`LocalSearchPhase`](localsearch::LocalSearchPhase): improves an
//!   initialized solution step by step

pub mod construction;
pub mod localsearch;

use std::fmt::Debug;

use planwright_core::domain::PlanningSolution;
use planwright_core::{PlanwrightError, Result};
use planwright_scoring::ScoreDirector;

use crate::heuristic::Move;
use crate::scope::SolverScope;

/// A phase of the solving process.
///
/// Phases run in sequence on one [`SolverScope`]. Each leaves the working
/// solution in place for the next and offers every improvement as the new
/// best solution.
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Runs the phase until its termination, the solver termination or a
    /// stall stops it.
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>, phase_index: usize) -> Result<()>;

    fn phase_type_name(&self) -> &'static str;
}

/// Scores `candidate` without keeping it: applies it, reads the score and
/// applies its undo.
///
/// In an asserted environment the restored score is recomputed and must
/// equal `restored_score`, the score before the move.
pub(crate) fn evaluate_move<S, D>(
    scope: &mut SolverScope<S, D>,
    candidate: &Move<S>,
    restored_score: &S::Score,
) -> Result<S::Score>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    let undo = candidate.apply(scope.score_director_mut())?;
    let score = scope.calculate_score();
    undo.apply(scope.score_director_mut())?;

    if scope.environment_mode().is_asserted() {
        let restored = scope.calculate_score();
        if restored != *restored_score {
            return Err(PlanwrightError::Internal(format!(
                "undo of {candidate:?} restored score {restored}, expected {restored_score}"
            )));
        }
    }
    Ok(score)
}

/// Checks, in an asserted environment, that the working solution scores
/// `expected` after a step.
pub(crate) fn assert_step_score<S, D>(scope: &mut SolverScope<S, D>, expected: &S::Score) -> Result<()>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    if !scope.environment_mode().is_asserted() {
        return Ok(());
    }
    let actual = scope.calculate_score();
    if actual != *expected {
        return Err(PlanwrightError::Internal(format!(
            "step score {actual} differs from the evaluated score {expected}"
        )));
    }
    Ok(())
}
