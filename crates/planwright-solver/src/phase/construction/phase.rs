//! Construction heuristic phase implementation.

use std::fmt;

use planwright_core::domain::PlanningSolution;
use planwright_core::{PlanwrightError, Result};
use planwright_scoring::ScoreDirector;
use tracing::{debug, info};

use super::Placer;
use crate::phase::{assert_step_score, evaluate_move, Phase};
use crate::scope::{PhaseContext, SolverScope, StepContext};
use crate::termination::{Termination, TerminationProgress};

const PHASE_TYPE: &str = "construction_heuristic";

/// Builds an initial solution, first fit.
///
/// Each step takes the next uninitialized entity from the [`Placer`],
/// scores every candidate move of its placement and keeps the best one.
/// Among equal scores the earliest candidate wins. The phase ends when
/// every entity has a value or a termination fires.
///
/// # Example
///
/// ```
/// use planwright_core::SimpleScore;
/// use planwright_scoring::SimpleScoreDirector;
/// use planwright_solver::heuristic::PlainVariable;
/// use planwright_solver::phase::construction::{ConstructionHeuristicPhase, Placer};
/// use planwright_solver::phase::Phase;
/// use planwright_solver::scope::SolverScope;
/// # use planwright_core::domain::PlanningSolution;
/// # #[derive(Clone, Debug)]
/// # struct Shifts { staff: Vec<Option<usize>>, score: Option<SimpleScore> }
/// # impl PlanningSolution for Shifts {
/// #     type Score = SimpleScore;
/// #     fn score(&self) -> Option<SimpleScore> { self.score }
/// #     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// #     fn is_initialized(&self) -> bool { self.staff.iter().all(Option::is_some) }
/// # }
///
/// fn get(s: &Shifts, i: usize) -> Option<usize> { s.staff[i] }
/// fn set(s: &mut Shifts, i: usize, v: Option<usize>) { s.staff[i] = v; }
/// fn shift_count(s: &Shifts) -> usize { s.staff.len() }
/// fn employee_count(_: &Shifts) -> usize { 3 }
/// // Prefer the employee whose index matches the shift.
/// fn score(s: &Shifts) -> SimpleScore {
///     let mismatches = s.staff.iter().enumerate()
///         .filter(|(i, e)| e.is_some_and(|e| e != *i))
///         .count();
///     SimpleScore::of(-(mismatches as i64))
/// }
///
/// let shifts = Shifts { staff: vec![None; 3], score: None };
/// let mut scope = SolverScope::with_seed(SimpleScoreDirector::new(shifts, score), 0);
/// scope.start_solving();
///
/// let employee = PlainVariable::new("employee", 0, get, set);
/// let mut phase = ConstructionHeuristicPhase::new(Placer::plain(employee, shift_count, employee_count));
/// phase.solve(&mut scope, 0).unwrap();
///
/// assert_eq!(scope.working_solution().staff, vec![Some(0), Some(1), Some(2)]);
/// assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
/// ```
pub struct ConstructionHeuristicPhase<S: PlanningSolution> {
    placer: Placer<S>,
    termination: Option<Termination<S::Score>>,
}

impl<S: PlanningSolution> ConstructionHeuristicPhase<S> {
    pub fn new(placer: Placer<S>) -> Self {
        Self {
            placer,
            termination: None,
        }
    }

    pub fn with_termination(mut self, termination: Termination<S::Score>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn placer(&self) -> &Placer<S> {
        &self.placer
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
}

impl<S: PlanningSolution> fmt::Debug for ConstructionHeuristicPhase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionHeuristicPhase")
            .field("placer", &self.placer)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, D> Phase<S, D> for ConstructionHeuristicPhase<S>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn solve(&mut self, scope: &mut SolverScope<S, D>, phase_index: usize) -> Result<()> {
        let starting_score = scope.calculate_score();
        let mut phase = PhaseContext::new(phase_index, PHASE_TYPE, Some(starting_score));
        info!(
            event = "phase_start",
            phase_index,
            phase_type = PHASE_TYPE,
            variable = self.placer.variable_name(),
            uninitialized = self.placer.uninitialized_count(scope.working_solution()),
            score = %starting_score,
        );
        scope.events().fire_phase_started(phase_index, PHASE_TYPE);

        while !self.is_terminated(scope, &phase) {
            let Some(mut placement) = self.placer.next_placement(scope.working_solution()) else {
                break;
            };
            let last_step_score = phase.last_step_score().copied().unwrap_or(starting_score);
            let best_score = scope.best_score().copied().unwrap_or(last_step_score);
            let mut step = StepContext::new(phase.step_count(), 0.0, last_step_score, best_score);
            scope.events().fire_step_started(step.step_index);

            let mut winner: Option<(usize, S::Score)> = None;
            for (index, candidate) in placement.moves.iter().enumerate() {
                if !candidate.is_doable(scope.working_solution()) {
                    continue;
                }
                step.selected_move_count += 1;
                let score = evaluate_move(scope, candidate, &last_step_score)?;
                if winner.map_or(true, |(_, best)| score > best) {
                    winner = Some((index, score));
                }
            }
            let Some((index, step_score)) = winner else {
                return Err(PlanwrightError::Stall(format!(
                    "construction heuristic phase {phase_index} found no doable move for {:?}",
                    placement.entity
                )));
            };
            step.accepted_move_count = step.selected_move_count;

            let step_move = placement.take_move(index);
            step_move.apply(scope.score_director_mut())?;
            assert_step_score(scope, &step_score)?;
            step.step_score = Some(step_score);
            scope.increment_step_count();
            let improved = scope.update_best_solution(step_score);
            phase.complete_step(step_score, improved);

            debug!(
                event = "step_end",
                phase_index,
                step = step.step_index,
                entity = ?placement.entity,
                step_move = ?step_move,
                score = %step_score,
                selected = step.selected_move_count,
            );
            scope.events().fire_step_ended(step.step_index, &step_score);
        }

        let best = scope.best_score().map(|s| s.to_string());
        info!(
            event = "phase_end",
            phase_index,
            phase_type = PHASE_TYPE,
            steps = phase.step_count(),
            uninitialized = self.placer.uninitialized_count(scope.working_solution()),
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
