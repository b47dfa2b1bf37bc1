//! Configuration system for Planwright.
//!
//! Solver, phase, termination, acceptor, forager and selector settings are
//! plain serde data, loaded from TOML or YAML and validated before a solver
//! is built from them.
//!
//! # Examples
//!
//! ```
//! use planwright_config::{PhaseConfig, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     late_acceptance_size = 400
//!     [phases.termination]
//!     unimproved_step_count_limit = 1000
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert!(matches!(config.phases[1], PhaseConfig::LocalSearch(_)));
//! config.validate().unwrap();
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod nearby;
mod phase;
mod selector;
mod termination;


pub use nearby::{NearbyDistributionFamily, NearbySelectionConfig};
pub use phase::{
    AcceptorConfig, ConstructionHeuristicConfig, ConstructionHeuristicType, ForagerConfig,
    LocalSearchConfig, PhaseConfig, PickEarlyType,
};
pub use selector::{
    ChangeMoveSelectorConfig, MoveSelectorConfig, SelectionCacheType, SelectionOrder,
    SelectorConfig, SortOrder, SubChainChangeMoveSelectorConfig, UnionMoveSelectorConfig,
};
pub use termination::{CompositionStyle, TerminationConfig};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Seed of the solver's random number generator.
    #[serde(default)]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Solver-level time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Validates every phase, selector and termination in the tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(termination) = &self.termination {
            termination.validate()?;
        }
        self.phases.iter().try_for_each(PhaseConfig::validate)
    }

    /// The seed to use, taking the environment mode into account.
    ///
    /// Reproducible modes fall back to a fixed seed of 0.
    pub fn effective_seed(&self) -> Option<u64> {
        match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => None,
            (None, _) => Some(0),
        }
    }
}

/// Environment mode affecting reproducibility and assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Seeded from the operating system unless `random_seed` is set.
    #[default]
    NonReproducible,

    /// Deterministic for a given seed.
    Reproducible,

    /// Reproducible, and every undo move is checked to restore the score
    /// of the solution it was applied to.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(self) -> bool {
        self == EnvironmentMode::FullAssert
    }
}
