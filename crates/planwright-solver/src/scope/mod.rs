//! Scope hierarchy for solver execution.
//!
//! - [`SolverScope`]: the whole run; owns the working and best solutions
//! - [`PhaseContext`]: per-phase counters, passed by reference
//! - [`StepContext`]: per-step scores and counts, passed by reference

mod phase;
mod solver;
mod step;

pub use phase::PhaseContext;
pub use solver::SolverScope;
pub use step::StepContext;

#[cfg(test)]
mod tests;
