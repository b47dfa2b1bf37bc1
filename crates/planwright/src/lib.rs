//! Planwright - a local search planning engine in Rust
//!
//! Register the planning variables of your solution, describe the search
//! in a TOML or YAML configuration and let the solver improve the solution.
//!
//! # Example
//!
//! ```rust
//! use planwright::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//!
//! // So is the configuration model
//! let config = SolverConfig::from_toml_str("random_seed = 1").unwrap();
//! assert_eq!(config.effective_seed(), Some(1));
//! ```

pub mod logging;

mod solver;
pub use solver::{run_solver, solve_with_config, CONFIG_FILE};

// Score types
pub use planwright_core::score::{
    BendableScore, HardSoftScore, ParseableScore, Score, SimpleScore,
};

// Domain model
pub use planwright_core::{
    ChainError, ChainGraph, Handle, PlanningSolution, PlanwrightError, Result, SubChain,
};

// Score directors
pub use planwright_scoring::{RecordingScoreDirector, ScoreDirector, SimpleScoreDirector};

// Configuration
pub use planwright_config::{
    AcceptorConfig, ConfigError, EnvironmentMode, ForagerConfig, LocalSearchConfig,
    MoveSelectorConfig, NearbySelectionConfig, PhaseConfig, SelectorConfig, SolverConfig,
    TerminationConfig,
};

// Engine
pub use planwright_solver::{
    event, heuristic, phase, ChainedVariable, PlainVariable, SelectorRegistry, Solver,
    SolverBuilder, Source, Termination,
};

pub mod prelude {
    pub use super::{
        BendableScore, HardSoftScore, ParseableScore, Score, SimpleScore,
    };
    pub use super::{ChainGraph, Handle, PlanningSolution, SubChain};
    pub use super::{ChainedVariable, PlainVariable, SelectorRegistry, SolverBuilder, Source};
    pub use super::{SimpleScoreDirector, SolverConfig};
}
