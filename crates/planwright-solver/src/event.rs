//! Lifecycle events of a solving run.
//!
//! Listeners observe the run without taking part in it. Three listener
//! traits cover the three granularities:
//!
//! - [`SolverEventListener`]: solving started and ended, new best solution
//! - [`PhaseLifecycleListener`]: phase started and ended
//! - [`StepLifecycleListener`]: step started and ended
//!
//! [`SolverEventSupport`] holds the registered listeners and broadcasts to
//! them synchronously, in registration order.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use planwright_solver::event::{SolverEventListener, SolverEventSupport};
//! use planwright_core::{PlanningSolution, SimpleScore};
//!
//! #[derive(Clone, Debug)]
//! struct Plan { score: Option<SimpleScore> }
//!
//! impl PlanningSolution for Plan {
//!     type Score = SimpleScore;
//!     fn score(&self) -> Option<SimpleScore> { self.score }
//!     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
//! }
//!
//! #[derive(Debug)]
//! struct PrintBest;
//!
//! impl SolverEventListener<Plan> for PrintBest {
//!     fn on_best_solution_changed(&self, _solution: &Plan, score: &SimpleScore) {
//!         println!("new best: {score}");
//!     }
//! }
//!
//! let mut events = SolverEventSupport::<Plan>::new();
//! events.add_solver_listener(Arc::new(PrintBest));
//! events.fire_best_solution_changed(&Plan { score: None }, &SimpleScore::of(-3));
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use planwright_core::domain::PlanningSolution;
use tracing::{debug, info};

/// Listener for solver-level events.
pub trait SolverEventListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called each time the best solution improves.
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score);

    fn on_solving_started(&self, _solution: &S) {}

    /// Called with the best solution once solving has stopped.
    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {}
}

/// Listener for phase transitions.
pub trait PhaseLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    fn on_phase_started(&self, phase_index: usize, phase_type: &str);

    fn on_phase_ended(&self, phase_index: usize, phase_type: &str);
}

/// Listener for the steps of a phase. Step indices restart at zero in every
/// phase.
pub trait StepLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    fn on_step_started(&self, step_index: u64);

    /// `score` is the step score: the score of the working solution once the
    /// step's move was applied.
    fn on_step_ended(&self, step_index: u64, score: &S::Score);
}

/// Broadcasts events to the registered listeners.
///
/// Cloning shares the listeners, not the registration list: listeners added
/// to a clone are not seen by the original.
pub struct SolverEventSupport<S: PlanningSolution> {
    solver_listeners: Vec<Arc<dyn SolverEventListener<S>>>,
    phase_listeners: Vec<Arc<dyn PhaseLifecycleListener<S>>>,
    step_listeners: Vec<Arc<dyn StepLifecycleListener<S>>>,
}

impl<S: PlanningSolution> SolverEventSupport<S> {
    pub fn new() -> Self {
        Self {
            solver_listeners: Vec::new(),
            phase_listeners: Vec::new(),
            step_listeners: Vec::new(),
        }
    }

    pub fn add_solver_listener(&mut self, listener: Arc<dyn SolverEventListener<S>>) {
        self.solver_listeners.push(listener);
    }

    pub fn add_phase_listener(&mut self, listener: Arc<dyn PhaseLifecycleListener<S>>) {
        self.phase_listeners.push(listener);
    }

    pub fn add_step_listener(&mut self, listener: Arc<dyn StepLifecycleListener<S>>) {
        self.step_listeners.push(listener);
    }

    /// Registers one listener for all three kinds of events.
    pub fn add_listener<L>(&mut self, listener: Arc<L>)
    where
        L: SolverEventListener<S> + PhaseLifecycleListener<S> + StepLifecycleListener<S> + 'static,
    {
        self.solver_listeners.push(listener.clone());
        self.phase_listeners.push(listener.clone());
        self.step_listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.solver_listeners.clear();
        self.phase_listeners.clear();
        self.step_listeners.clear();
    }

    pub fn fire_best_solution_changed(&self, solution: &S, score: &S::Score) {
        for listener in &self.solver_listeners {
            listener.on_best_solution_changed(solution, score);
        }
    }

    pub fn fire_solving_started(&self, solution: &S) {
        for listener in &self.solver_listeners {
            listener.on_solving_started(solution);
        }
    }

    pub fn fire_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        for listener in &self.solver_listeners {
            listener.on_solving_ended(solution, is_terminated_early);
        }
    }

    pub fn fire_phase_started(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_started(phase_index, phase_type);
        }
    }

    pub fn fire_phase_ended(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_ended(phase_index, phase_type);
        }
    }

    pub fn fire_step_started(&self, step_index: u64) {
        for listener in &self.step_listeners {
            listener.on_step_started(step_index);
        }
    }

    pub fn fire_step_ended(&self, step_index: u64, score: &S::Score) {
        for listener in &self.step_listeners {
            listener.on_step_ended(step_index, score);
        }
    }

    /// Number of registered listeners per kind.
    pub fn listener_counts(&self) -> ListenerCounts {
        ListenerCounts {
            solver: self.solver_listeners.len(),
            phase: self.phase_listeners.len(),
            step: self.step_listeners.len(),
        }
    }

    pub fn has_listeners(&self) -> bool {
        !self.solver_listeners.is_empty()
            || !self.phase_listeners.is_empty()
            || !self.step_listeners.is_empty()
    }
}

/// Registered listeners of a [`SolverEventSupport`], per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerCounts {
    pub solver: usize,
    pub phase: usize,
    pub step: usize,
}

impl<S: PlanningSolution> Clone for SolverEventSupport<S> {
    fn clone(&self) -> Self {
        Self {
            solver_listeners: self.solver_listeners.clone(),
            phase_listeners: self.phase_listeners.clone(),
            step_listeners: self.step_listeners.clone(),
        }
    }
}

impl<S: PlanningSolution> Default for SolverEventSupport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Debug for SolverEventSupport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverEventSupport")
            .field("solver_listeners", &self.solver_listeners.len())
            .field("phase_listeners", &self.phase_listeners.len())
            .field("step_listeners", &self.step_listeners.len())
            .finish()
    }
}

/// Forwards every event to `tracing`.
///
/// Solver and phase events are logged at `info`, step events at `debug`,
/// all under the `planwright_solver::event` target.
#[derive(Debug, Clone, Default)]
pub struct TracingEventListener {
    name: Option<String>,
}

impl TracingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every record with `listener = name`, to tell runs apart.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for TracingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, score: &S::Score) {
        info!(listener = self.name(), event = "best_solution_changed", score = %score);
    }

    fn on_solving_started(&self, _solution: &S) {
        info!(listener = self.name(), event = "solving_started");
    }

    fn on_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        let score = solution.score().map(|s| s.to_string());
        info!(
            listener = self.name(),
            event = "solving_ended",
            score = score.as_deref().unwrap_or("uninitialized"),
            terminated_early = is_terminated_early,
        );
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for TracingEventListener {
    fn on_phase_started(&self, phase_index: usize, phase_type: &str) {
        info!(listener = self.name(), event = "phase_started", phase_index, phase_type);
    }

    fn on_phase_ended(&self, phase_index: usize, phase_type: &str) {
        info!(listener = self.name(), event = "phase_ended", phase_index, phase_type);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for TracingEventListener {
    fn on_step_started(&self, step_index: u64) {
        debug!(listener = self.name(), event = "step_started", step_index);
    }

    fn on_step_ended(&self, step_index: u64, score: &S::Score) {
        debug!(listener = self.name(), event = "step_ended", step_index, score = %score);
    }
}

/// An event broadcast by [`SolverEventSupport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BestSolutionChanged,
    SolvingStarted,
    SolvingEnded,
    PhaseStarted,
    PhaseEnded,
    StepStarted,
    StepEnded,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::BestSolutionChanged,
        EventKind::SolvingStarted,
        EventKind::SolvingEnded,
        EventKind::PhaseStarted,
        EventKind::PhaseEnded,
        EventKind::StepStarted,
        EventKind::StepEnded,
    ];
}

/// Counts every event it receives, per [`EventKind`].
#[derive(Debug, Default)]
pub struct CountingEventListener {
    counts: [AtomicUsize; EventKind::ALL.len()],
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.counts[kind as usize].load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        for counter in &self.counts {
            counter.store(0, Ordering::SeqCst);
        }
    }

    fn record(&self, kind: EventKind) {
        self.counts[kind as usize].fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for CountingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, _score: &S::Score) {
        self.record(EventKind::BestSolutionChanged);
    }

    fn on_solving_started(&self, _solution: &S) {
        self.record(EventKind::SolvingStarted);
    }

    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {
        self.record(EventKind::SolvingEnded);
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for CountingEventListener {
    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {
        self.record(EventKind::PhaseStarted);
    }

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {
        self.record(EventKind::PhaseEnded);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for CountingEventListener {
    fn on_step_started(&self, _step_index: u64) {
        self.record(EventKind::StepStarted);
    }

    fn on_step_ended(&self, _step_index: u64, _score: &S::Score) {
        self.record(EventKind::StepEnded);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
