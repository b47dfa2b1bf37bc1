//! Phase, acceptor and forager configuration.

use serde::{Deserialize, Serialize};

use crate::selector::{MoveSelectorConfig, SelectionOrder};
use crate::termination::TerminationConfig;
use crate::ConfigError;

/// One phase of the solver.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    ConstructionHeuristic(ConstructionHeuristicConfig),
    LocalSearch(LocalSearchConfig),
}

impl PhaseConfig {
    pub fn termination(&self) -> Option<&TerminationConfig> {
        match self {
            PhaseConfig::ConstructionHeuristic(config) => config.termination.as_ref(),
            PhaseConfig::LocalSearch(config) => config.termination.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PhaseConfig::ConstructionHeuristic(config) => config.validate(),
            PhaseConfig::LocalSearch(config) => config.validate(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicType {
    /// Places entities in order, each at its best-scoring value.
    #[default]
    FirstFit,
}

/// Construction heuristic phase.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ConstructionHeuristicConfig {
    pub construction_heuristic_type: ConstructionHeuristicType,
    /// Registered variable to initialize; may be omitted when exactly one is registered.
    pub variable_name: Option<String>,
    pub termination: Option<TerminationConfig>,
}

impl ConstructionHeuristicConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.termination {
            Some(termination) => termination.validate(),
            None => Ok(()),
        }
    }
}

/// Local search phase.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct LocalSearchConfig {
    pub acceptor: Option<AcceptorConfig>,
    pub forager: Option<ForagerConfig>,
    pub move_selector: Option<MoveSelectorConfig>,
    pub termination: Option<TerminationConfig>,
    /// Caps the number of candidates drawn per step from never-ending selectors.
    pub selected_count_limit: Option<usize>,
}

impl LocalSearchConfig {
    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = Some(acceptor);
        self
    }

    pub fn with_forager(mut self, forager: ForagerConfig) -> Self {
        self.forager = Some(forager);
        self
    }

    pub fn with_move_selector(mut self, move_selector: MoveSelectorConfig) -> Self {
        self.move_selector = Some(move_selector);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(acceptor) = &self.acceptor {
            acceptor.validate()?;
        }
        if let Some(forager) = &self.forager {
            forager.validate()?;
        }
        if let Some(move_selector) = &self.move_selector {
            move_selector.validate(SelectionOrder::Random)?;
        }
        if let Some(termination) = &self.termination {
            termination.validate()?;
        }
        if self.selected_count_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "selected_count_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Acceptors of a local search phase.
///
/// Every configured option adds one acceptor; a move has to pass all of
/// them. With nothing configured the phase uses hill climbing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AcceptorConfig {
    pub entity_tabu_size: Option<usize>,
    pub value_tabu_size: Option<usize>,
    pub move_tabu_size: Option<usize>,
    pub undo_move_tabu_size: Option<usize>,
    /// Lets a tabu move through when it improves the best score. Defaults to true.
    pub aspiration_enabled: Option<bool>,
    /// Score literal holding the per-level starting temperature.
    pub simulated_annealing_starting_temperature: Option<String>,
    pub late_acceptance_size: Option<usize>,
    /// Late acceptance also accepts moves not worse than the last step. Defaults to true.
    pub late_acceptance_hill_climbing: Option<bool>,
}

impl AcceptorConfig {
    pub fn with_entity_tabu_size(mut self, size: usize) -> Self {
        self.entity_tabu_size = Some(size);
        self
    }

    pub fn with_value_tabu_size(mut self, size: usize) -> Self {
        self.value_tabu_size = Some(size);
        self
    }

    pub fn with_move_tabu_size(mut self, size: usize) -> Self {
        self.move_tabu_size = Some(size);
        self
    }

    pub fn with_undo_move_tabu_size(mut self, size: usize) -> Self {
        self.undo_move_tabu_size = Some(size);
        self
    }

    pub fn with_simulated_annealing(mut self, starting_temperature: impl Into<String>) -> Self {
        self.simulated_annealing_starting_temperature = Some(starting_temperature.into());
        self
    }

    pub fn with_late_acceptance_size(mut self, size: usize) -> Self {
        self.late_acceptance_size = Some(size);
        self
    }

    pub fn aspiration_enabled(&self) -> bool {
        self.aspiration_enabled.unwrap_or(true)
    }

    pub fn late_acceptance_hill_climbing(&self) -> bool {
        self.late_acceptance_hill_climbing.unwrap_or(true)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [
            ("entity_tabu_size", self.entity_tabu_size),
            ("value_tabu_size", self.value_tabu_size),
            ("move_tabu_size", self.move_tabu_size),
            ("undo_move_tabu_size", self.undo_move_tabu_size),
            ("late_acceptance_size", self.late_acceptance_size),
        ] {
            if size == Some(0) {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}

/// Collects accepted moves during a step and picks the winner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ForagerConfig {
    pub accepted_count_limit: Option<usize>,
    pub pick_early_type: Option<PickEarlyType>,
}

impl ForagerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_count_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "accepted_count_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickEarlyType {
    #[default]
    Never,
    /// Stop the step at the first accepted move that beats the best score.
    FirstBestScoreImproving,
    /// Stop the step at the first accepted move that beats the last step score.
    FirstLastStepScoreImproving,
}
