//! Per-step decision of a local search phase.

use std::fmt;

use planwright_core::domain::PlanningSolution;
use planwright_core::Result;
use planwright_scoring::ScoreDirector;
use tracing::trace;

use super::{AcceptedCountForager, Acceptor};
use crate::heuristic::{BoxedSelector, Move, Selector};
use crate::phase::evaluate_move;
use crate::scope::{SolverScope, StepContext};

/// Pulls candidates from the move selector, evaluates them, asks the
/// acceptor and lets the forager pick the step's move.
///
/// Every candidate is applied, scored and undone before the next one is
/// drawn, so the working solution is the same before and after
/// [`LocalSearchDecider::decide_next_step`].
pub struct LocalSearchDecider<S: PlanningSolution> {
    move_selector: BoxedSelector<S, Move<S>>,
    acceptor: Acceptor<S>,
    forager: AcceptedCountForager<S>,
    selected_count_limit: Option<usize>,
}

impl<S: PlanningSolution> LocalSearchDecider<S> {
    pub fn new(
        move_selector: BoxedSelector<S, Move<S>>,
        acceptor: Acceptor<S>,
        forager: AcceptedCountForager<S>,
    ) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            selected_count_limit: None,
        }
    }

    /// Caps the candidates drawn per step.
    pub fn with_selected_count_limit(mut self, limit: usize) -> Self {
        self.selected_count_limit = Some(limit.max(1));
        self
    }

    pub fn acceptor(&self) -> &Acceptor<S> {
        &self.acceptor
    }

    pub fn forager(&self) -> &AcceptedCountForager<S> {
        &self.forager
    }

    pub fn phase_started<D: ScoreDirector<S>>(
        &mut self,
        scope: &mut SolverScope<S, D>,
        starting_score: S::Score,
    ) {
        let mut ctx = scope.selection_context();
        self.move_selector.phase_started(&mut ctx);
        self.acceptor.phase_started(starting_score);
    }

    pub fn step_started<D: ScoreDirector<S>>(
        &mut self,
        scope: &mut SolverScope<S, D>,
        step: &StepContext<S::Score>,
    ) {
        let mut ctx = scope.selection_context();
        self.move_selector.step_started(&mut ctx);
        self.acceptor.step_started(step);
        self.forager.step_started();
    }

    /// Number of candidates one step may draw.
    ///
    /// Finite selectors are walked to the end unless a limit is set. A
    /// never-ending selector without a limit draws as many candidates as it
    /// reports distinct ones.
    fn candidate_budget<D: ScoreDirector<S>>(&self, scope: &SolverScope<S, D>) -> Option<usize> {
        match self.selected_count_limit {
            Some(limit) => Some(limit),
            None if self.move_selector.is_never_ending() => Some(
                self.move_selector
                    .size(scope.working_solution())
                    .max(1),
            ),
            None => None,
        }
    }

    /// Evaluates candidates and returns the forager's pick with its score.
    ///
    /// Updates the selected and accepted counts of `step`. Returns `None`
    /// when no candidate was accepted.
    pub fn decide_next_step<D: ScoreDirector<S>>(
        &mut self,
        scope: &mut SolverScope<S, D>,
        step: &mut StepContext<S::Score>,
    ) -> Result<Option<(Move<S>, S::Score)>> {
        let budget = self.candidate_budget(scope);
        {
            let mut ctx = scope.selection_context();
            self.move_selector.restart(&mut ctx);
        }

        let mut drawn = 0usize;
        while budget.map_or(true, |budget| drawn < budget) {
            let candidate = {
                let mut ctx = scope.selection_context();
                self.move_selector.select_next(&mut ctx)
            };
            let Some(candidate) = candidate else {
                break;
            };
            drawn += 1;
            if !candidate.is_doable(scope.working_solution()) {
                continue;
            }
            step.selected_move_count += 1;

            let score = evaluate_move(scope, &candidate, &step.last_step_score)?;
            let accepted = self
                .acceptor
                .is_accepted(&candidate, &score, step, scope.rng());
            trace!(
                event = "move_evaluated",
                step = step.step_index,
                kind = candidate.kind_name(),
                candidate = ?candidate,
                score = %score,
                accepted,
            );
            if accepted {
                step.accepted_move_count += 1;
                self.forager.add_move(candidate, score, step);
                if self.forager.is_quit_early() {
                    break;
                }
            }
        }
        Ok(self.forager.pick_move())
    }

    /// Closes a step; `picked` is the applied move and its undo.
    pub fn step_ended(&mut self, step: &StepContext<S::Score>, picked: Option<(&Move<S>, &Move<S>)>) {
        if let Some((step_move, undo)) = picked {
            self.acceptor.step_ended(step, step_move, undo);
        }
        self.move_selector.step_ended();
    }

    pub fn phase_ended(&mut self) {
        self.move_selector.phase_ended();
        self.acceptor.phase_ended();
    }
}

impl<S: PlanningSolution> fmt::Debug for LocalSearchDecider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchDecider")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("selected_count_limit", &self.selected_count_limit)
            .finish()
    }
}
