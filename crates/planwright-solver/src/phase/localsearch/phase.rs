//! Local search phase.

use std::fmt;

use planwright_core::domain::PlanningSolution;
use planwright_core::{PlanwrightError, Result};
use planwright_scoring::ScoreDirector;
use tracing::{debug, info, warn};

use super::LocalSearchDecider;
use crate::heuristic::Move;
use crate::phase::{assert_step_score, Phase};
use crate::scope::{PhaseContext, SolverScope, StepContext};
use crate::termination::{min_time_gradient, Termination, TerminationProgress};

const PHASE_TYPE: &str = "local_search";

/// Improves an initialized solution one move per step.
///
/// Each step the decider evaluates candidates and the forager picks one,
/// which is applied for good. A step that accepts nothing still counts and
/// the next one redraws. The phase ends when its own termination or the
/// solver termination fires, or when a step selects no doable move.
pub struct LocalSearchPhase<S: PlanningSolution> {
    decider: LocalSearchDecider<S>,
    termination: Option<Termination<S::Score>>,
}

impl<S: PlanningSolution> LocalSearchPhase<S> {
    pub fn new(decider: LocalSearchDecider<S>) -> Self {
        Self {
            decider,
            termination: None,
        }
    }

    pub fn with_termination(mut self, termination: Termination<S::Score>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn decider(&self) -> &LocalSearchDecider<S> {
        &self.decider
    }

    fn is_terminated<D: ScoreDirector<S>>(
        &self,
        scope: &SolverScope<S, D>,
        phase: &PhaseContext<S::Score>,
    ) -> bool {
        if scope.is_solver_terminated() {
            return true;
        }
        self.termination
            .as_ref()
            .is_some_and(|t| t.is_terminated(&TerminationProgress::of_phase(scope, phase)))
    }

    /// The least advanced of the phase and solver progress estimates.
    fn time_gradient<D: ScoreDirector<S>>(
        &self,
        scope: &SolverScope<S, D>,
        phase: &PhaseContext<S::Score>,
    ) -> f64 {
        let phase_gradient = self.termination.as_ref().map(|t| {
            t.time_gradient(&TerminationProgress::of_phase(scope, phase))
        });
        min_time_gradient(phase_gradient.into_iter().chain([scope.solver_time_gradient()]))
    }

    fn has_termination<D: ScoreDirector<S>>(&self, scope: &SolverScope<S, D>) -> bool {
        self.termination.is_some() || scope.termination().is_some()
    }

    /// Ends a step in which candidates were selected but none was accepted.
    ///
    /// The step still counts, so step-based terminations advance; the next
    /// step redraws from the selector.
    fn skip_step<D: ScoreDirector<S>>(
        &mut self,
        scope: &mut SolverScope<S, D>,
        phase: &mut PhaseContext<S::Score>,
        step: &StepContext<S::Score>,
        last_step_score: S::Score,
    ) {
        scope.increment_step_count();
        phase.complete_step(last_step_score, false);
        self.decider.step_ended(step, None);
        debug!(
            event = "step_end",
            phase_index = phase.phase_index(),
            step = step.step_index,
            score = %last_step_score,
            selected = step.selected_move_count,
            accepted = 0,
            time_gradient = step.time_gradient,
        );
        scope.events().fire_step_ended(step.step_index, &last_step_score);
    }

    fn apply_step<D: ScoreDirector<S>>(
        &mut self,
        scope: &mut SolverScope<S, D>,
        phase: &mut PhaseContext<S::Score>,
        step: &mut StepContext<S::Score>,
        step_move: Move<S>,
        step_score: S::Score,
    ) -> Result<()> {
        let undo = step_move.apply(scope.score_director_mut())?;
        assert_step_score(scope, &step_score)?;
        step.step_score = Some(step_score);

        scope.increment_step_count();
        let improved = scope.update_best_solution(step_score);
        phase.complete_step(step_score, improved);
        self.decider.step_ended(step, Some((&step_move, &undo)));

        debug!(
            event = "step_end",
            phase_index = phase.phase_index(),
            step = step.step_index,
            step_move = ?step_move,
            score = %step_score,
            best_score = %step.best_score.max(step_score),
            selected = step.selected_move_count,
            accepted = step.accepted_move_count,
            time_gradient = step.time_gradient,
        );
        scope.events().fire_step_ended(step.step_index, &step_score);
        Ok(())
    }
}

impl<S: PlanningSolution> fmt::Debug for LocalSearchPhase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("decider", &self.decider)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, D> Phase<S, D> for LocalSearchPhase<S>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn solve(&mut self, scope: &mut SolverScope<S, D>, phase_index: usize) -> Result<()> {
        let starting_score = scope.calculate_score();
        let mut phase = PhaseContext::new(phase_index, PHASE_TYPE, Some(starting_score));
        self.decider.phase_started(scope, starting_score);
        info!(
            event = "phase_start",
            phase_index,
            phase_type = PHASE_TYPE,
            score = %starting_score,
        );
        scope.events().fire_phase_started(phase_index, PHASE_TYPE);

        let mut last_step_accepted = true;
        while !self.is_terminated(scope, &phase) {
            let last_step_score = phase.last_step_score().copied().unwrap_or(starting_score);
            let best_score = scope.best_score().copied().unwrap_or(last_step_score);
            let mut step = StepContext::new(
                phase.step_count(),
                self.time_gradient(scope, &phase),
                last_step_score,
                best_score,
            );
            scope.events().fire_step_started(step.step_index);
            self.decider.step_started(scope, &step);

            match self.decider.decide_next_step(scope, &mut step)? {
                Some((step_move, step_score)) => {
                    last_step_accepted = true;
                    self.apply_step(scope, &mut phase, &mut step, step_move, step_score)?;
                }
                None if step.selected_move_count == 0 => {
                    self.decider.step_ended(&step, None);
                    if !scope.score_director().is_working_solution_initialized() {
                        self.decider.phase_ended();
                        return Err(PlanwrightError::Stall(format!(
                            "local search phase {phase_index} found no doable move on an \
                             uninitialized solution; run a construction heuristic first"
                        )));
                    }
                    warn!(
                        event = "stall",
                        phase_index,
                        step = step.step_index,
                        "no doable move, ending the phase early"
                    );
                    last_step_accepted = true;
                    break;
                }
                None => {
                    last_step_accepted = false;
                    if !self.has_termination(scope) {
                        // Nothing would ever end the phase.
                        self.decider.step_ended(&step, None);
                        break;
                    }
                    self.skip_step(scope, &mut phase, &step, last_step_score);
                }
            }
        }
        if !last_step_accepted {
            warn!(
                event = "stall",
                phase_index,
                steps = phase.step_count(),
                "the last step accepted no move"
            );
        }

        self.decider.phase_ended();
        let best = scope.best_score().map(|s| s.to_string());
        info!(
            event = "phase_end",
            phase_index,
            phase_type = PHASE_TYPE,
            steps = phase.step_count(),
            best_score = best.as_deref().unwrap_or("none"),
            elapsed_ms = phase.elapsed().as_millis() as u64,
        );
        scope.events().fire_phase_ended(phase_index, PHASE_TYPE);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        PHASE_TYPE
    }
}
