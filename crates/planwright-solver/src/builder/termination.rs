use planwright_config::TerminationConfig;
use planwright_core::score::ParseableScore;
use planwright_core::{PlanwrightError, Result};

use super::config_error;
use crate::termination::Termination;

/// Builds terminations from configuration.
pub struct TerminationBuilder;

impl TerminationBuilder {
    /// Turns every configured limit into a leaf and joins the leaves and
    /// nested terminations with the configured composition style.
    ///
    /// Returns `None` when nothing is configured anywhere in the tree.
    pub fn build<Sc: ParseableScore>(config: &TerminationConfig) -> Result<Option<Termination<Sc>>> {
        config.validate().map_err(config_error)?;
        if config.is_empty() {
            return Ok(None);
        }
        Self::build_node(config).map(Some)
    }

    fn build_node<Sc: ParseableScore>(config: &TerminationConfig) -> Result<Termination<Sc>> {
        let mut children = Vec::new();
        if let Some(limit) = config.time_limit() {
            children.push(Termination::TimeSpent { limit });
        }
        if let Some(limit) = config.step_count_limit {
            children.push(Termination::StepCount { limit });
        }
        if let Some(limit) = config.unimproved_step_count_limit {
            children.push(Termination::UnimprovedStepCount { limit });
        }
        if let Some(literal) = &config.best_score_limit {
            let target = Sc::parse(literal).map_err(|e| {
                PlanwrightError::Config(format!("best_score_limit ({literal}): {e}"))
            })?;
            children.push(Termination::ScoreAttained { target });
        }
        for child in config.terminations.iter().filter(|c| !c.is_empty()) {
            children.push(Self::build_node(child)?);
        }
        Ok(Termination::combine(config.composition_style(), children))
    }
}
