//! Solver implementation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use planwright_config::EnvironmentMode;
use planwright_core::domain::PlanningSolution;
use planwright_core::{PlanwrightError, Result};
use planwright_scoring::ScoreDirector;
use tracing::{info, warn};

use crate::event::SolverEventSupport;
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Runs phases in sequence on one working solution and returns the best
/// solution found.
///
/// # Example
///
/// ```
/// use planwright_core::{PlanningSolution, Result, SimpleScore};
/// use planwright_scoring::{ScoreDirector, SimpleScoreDirector};
/// use planwright_solver::phase::Phase;
/// use planwright_solver::scope::SolverScope;
/// use planwright_solver::solver::Solver;
/// use planwright_solver::termination::Termination;
///
/// #[derive(Clone, Debug)]
/// struct Counter { value: i64, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Counter {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// #[derive(Debug)]
/// struct NoOpPhase;
///
/// impl<D: ScoreDirector<Counter>> Phase<Counter, D> for NoOpPhase {
///     fn solve(&mut self, _: &mut SolverScope<Counter, D>, _: usize) -> Result<()> { Ok(()) }
///     fn phase_type_name(&self) -> &'static str { "no_op" }
/// }
///
/// let mut solver = Solver::new()
///     .with_phase(NoOpPhase)
///     .with_termination(Termination::StepCount { limit: 10 });
/// let director = SimpleScoreDirector::new(
///     Counter { value: 3, score: None },
///     |c: &Counter| SimpleScore::of(-c.value),
/// );
/// let best = solver.solve(director).unwrap();
/// assert_eq!(best.score, Some(SimpleScore::of(-3)));
/// ```
pub struct Solver<S: PlanningSolution, D: ScoreDirector<S>> {
    phases: Vec<Box<dyn Phase<S, D>>>,
    termination: Option<Termination<S::Score>>,
    environment_mode: EnvironmentMode,
    random_seed: Option<u64>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    events: SolverEventSupport<S>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Default for Solver<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Solver<S, D> {
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            termination: None,
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
            events: SolverEventSupport::new(),
        }
    }

    /// Appends a phase; phases run in the order they were added.
    pub fn with_phase(mut self, phase: impl Phase<S, D> + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    pub fn with_boxed_phase(mut self, phase: Box<dyn Phase<S, D>>) -> Self {
        self.phases.push(phase);
        self
    }

    /// Solver-wide termination, checked between steps and between phases.
    pub fn with_termination(mut self, termination: Termination<S::Score>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Seeds the random number generator; `None` seeds from the OS.
    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_events(mut self, events: SolverEventSupport<S>) -> Self {
        self.events = events;
        self
    }

    pub fn events_mut(&mut self) -> &mut SolverEventSupport<S> {
        &mut self.events
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn phase_type_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|p| p.phase_type_name()).collect()
    }

    pub fn termination(&self) -> Option<&Termination<S::Score>> {
        self.termination.as_ref()
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }

    /// Requests early termination of a running solve.
    ///
    /// Returns false, and does nothing, when no solve is running.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// The flag a running solve polls between steps. Setting it from
    /// another thread stops the solve after the current step.
    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Solves the working solution held by `score_director` and returns the
    /// best solution found.
    ///
    /// Fails with [`PlanwrightError::Cancelled`] when early termination
    /// was already requested before solving started; the request is
    /// consumed.
    pub fn solve(&mut self, score_director: D) -> Result<S> {
        if self.terminate_early_flag.swap(false, Ordering::SeqCst) {
            warn!(event = "solving_cancelled", "early termination requested before solving");
            return Err(PlanwrightError::Cancelled);
        }
        self.solving.store(true, Ordering::SeqCst);

        let scope = match self.random_seed {
            Some(seed) => SolverScope::with_seed(score_director, seed),
            None => SolverScope::new(score_director),
        };
        let mut scope = scope
            .with_environment_mode(self.environment_mode)
            .with_events(self.events.clone());
        if let Some(termination) = &self.termination {
            scope = scope.with_termination(termination.clone());
        }
        scope.set_terminate_early_flag(Arc::clone(&self.terminate_early_flag));
        scope.start_solving();

        let outcome = self.run_phases(&mut scope);
        let terminated_early = self.terminate_early_flag.swap(false, Ordering::SeqCst);
        self.solving.store(false, Ordering::SeqCst);
        outcome?;

        let best = scope.best_score().map(|s| s.to_string());
        info!(
            event = "solving_end",
            best_score = best.as_deref().unwrap_or("none"),
            steps = scope.total_step_count(),
            elapsed_ms = scope.elapsed().as_millis() as u64,
            terminated_early,
        );
        if let Some(best) = scope.best_solution() {
            scope.events().fire_solving_ended(best, terminated_early);
        }
        Ok(scope.take_best_or_working_solution())
    }

    fn run_phases(&mut self, scope: &mut SolverScope<S, D>) -> Result<()> {
        for (index, phase) in self.phases.iter_mut().enumerate() {
            if scope.is_solver_terminated() {
                break;
            }
            phase.solve(scope, index)?;
        }
        Ok(())
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> fmt::Debug for Solver<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_seed", &self.random_seed)
            .finish()
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
