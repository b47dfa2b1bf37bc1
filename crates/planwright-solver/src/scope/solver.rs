//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use planwright_config::EnvironmentMode;
use planwright_core::domain::PlanningSolution;
use planwright_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::event::SolverEventSupport;
use crate::heuristic::SelectionContext;
use crate::termination::{Termination, TerminationProgress, UNSUPPORTED_TIME_GRADIENT};

/// State shared by every phase of one solving run.
///
/// Owns the score director (and through it the working solution), the best
/// solution found so far, the random number generator and the solver-wide
/// step counter.
pub struct SolverScope<S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    best_solution: Option<S>,
    best_score: Option<S::Score>,
    best_initialized: bool,
    starting_score: Option<S::Score>,
    best_score_step: u64,
    rng: StdRng,
    start_time: Option<Instant>,
    total_step_count: u64,
    termination: Option<Termination<S::Score>>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    environment_mode: EnvironmentMode,
    events: SolverEventSupport<S>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> SolverScope<S, D> {
    pub fn new(score_director: D) -> Self {
        Self::with_rng(score_director, StdRng::from_os_rng())
    }

    pub fn with_seed(score_director: D, seed: u64) -> Self {
        Self::with_rng(score_director, StdRng::seed_from_u64(seed))
    }

    fn with_rng(score_director: D, rng: StdRng) -> Self {
        Self {
            score_director,
            best_solution: None,
            best_score: None,
            best_initialized: false,
            starting_score: None,
            best_score_step: 0,
            rng,
            start_time: None,
            total_step_count: 0,
            termination: None,
            terminate_early_flag: None,
            environment_mode: EnvironmentMode::default(),
            events: SolverEventSupport::new(),
        }
    }

    pub fn with_termination(mut self, termination: Termination<S::Score>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_events(mut self, events: SolverEventSupport<S>) -> Self {
        self.events = events;
        self
    }

    /// Scores the working solution, makes it the first best solution and
    /// announces the start of solving.
    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
        self.best_score_step = 0;

        let score = self.score_director.calculate_score();
        let initialized = self.score_director.is_working_solution_initialized();
        let mut best = self.score_director.clone_working_solution();
        best.set_score(Some(score));
        self.best_solution = Some(best);
        self.best_score = Some(score);
        self.best_initialized = initialized;
        self.starting_score = initialized.then_some(score);

        info!(
            event = "solving_start",
            score = %score,
            initialized,
            environment_mode = ?self.environment_mode,
        );
        self.events
            .fire_solving_started(self.score_director.working_solution());
    }

    /// Time since [`SolverScope::start_solving`], zero before it.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<&S::Score> {
        self.best_score.as_ref()
    }

    pub fn is_best_initialized(&self) -> bool {
        self.best_initialized
    }

    /// Score of the first initialized working solution.
    pub fn starting_score(&self) -> Option<&S::Score> {
        self.starting_score.as_ref()
    }

    /// Value of the solver step counter when the best score last improved.
    pub fn best_score_step(&self) -> u64 {
        self.best_score_step
    }

    /// Offers the working solution, scored `score`, as the new best.
    ///
    /// An initialized solution beats any uninitialized one; otherwise the
    /// score must be strictly better. Returns true when the best changed.
    pub fn update_best_solution(&mut self, score: S::Score) -> bool {
        let initialized = self.score_director.is_working_solution_initialized();
        let improves = match self.best_score {
            None => true,
            Some(best) if initialized == self.best_initialized => score > best,
            Some(_) => initialized,
        };
        if initialized && self.starting_score.is_none() {
            self.starting_score = Some(score);
        }
        if !improves {
            return false;
        }

        let mut best = self.score_director.clone_working_solution();
        best.set_score(Some(score));
        self.events.fire_best_solution_changed(&best, &score);
        self.best_solution = Some(best);
        self.best_score = Some(score);
        self.best_initialized = initialized;
        self.best_score_step = self.total_step_count;
        true
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// The working solution and the random number generator, for selectors.
    pub fn selection_context(&mut self) -> SelectionContext<'_, S> {
        SelectionContext::new(self.score_director.working_solution(), &mut self.rng)
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn events(&self) -> &SolverEventSupport<S> {
        &self.events
    }

    pub fn termination(&self) -> Option<&Termination<S::Score>> {
        self.termination.as_ref()
    }

    /// True when the solver termination fires or early termination was requested.
    pub fn is_solver_terminated(&self) -> bool {
        if self.is_terminate_early() {
            return true;
        }
        self.termination
            .as_ref()
            .is_some_and(|t| t.is_terminated(&TerminationProgress::of_solver(self)))
    }

    /// Time gradient of the solver termination, or
    /// [`UNSUPPORTED_TIME_GRADIENT`] without one.
    pub fn solver_time_gradient(&self) -> f64 {
        self.termination.as_ref().map_or(UNSUPPORTED_TIME_GRADIENT, |t| {
            t.time_gradient(&TerminationProgress::of_solver(self))
        })
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn take_best_or_working_solution(self) -> S {
        match self.best_solution {
            Some(best) => best,
            None => self.score_director.clone_working_solution(),
        }
    }
}
