//! Builds solver components from `planwright-config` data.
//!
//! Configuration names variables and selector plugins as strings; a
//! [`SelectorRegistry`] resolves them. Every builder validates its
//! configuration first and fails fast with [`PlanwrightError::Config`].
//!
//! - [`TerminationBuilder`] - `TerminationConfig` to [`Termination`](crate::termination::Termination)
//! - [`AcceptorBuilder`] / [`ForagerBuilder`] - local search acceptance and foraging
//! - [`MoveSelectorBuilder`] - move selectors with decorated entity and value selectors
//! - [`PhaseBuilder`] / [`SolverBuilder`] - whole phases and solvers

mod acceptor;
mod phase;
mod registry;
mod selector;
mod solver;
mod termination;

#[cfg(test)]
mod tests;

use planwright_config::ConfigError;
use planwright_core::PlanwrightError;

pub use acceptor::{AcceptorBuilder, ForagerBuilder};
pub use phase::PhaseBuilder;
pub use registry::{
    MimicRecorders, PluginTable, RegisteredVariable, SelectorItem, SelectorRegistry, Source,
};
pub use selector::MoveSelectorBuilder;
pub use solver::SolverBuilder;
pub use termination::TerminationBuilder;

pub(crate) fn config_error(error: ConfigError) -> PlanwrightError {
    PlanwrightError::Config(error.to_string())
}
