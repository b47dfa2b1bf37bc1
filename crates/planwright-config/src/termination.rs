//! Termination configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the criteria of one [`TerminationConfig`] are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStyle {
    /// Terminate when every criterion is met.
    And,
    /// Terminate as soon as one criterion is met.
    #[default]
    Or,
}

/// Termination criteria of the solver or of one phase.
///
/// Every configured limit becomes one leaf; the leaves and the nested
/// `terminations` are combined with `termination_composition_style`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TerminationConfig {
    pub seconds_spent_limit: Option<u64>,
    pub milliseconds_spent_limit: Option<u64>,
    pub step_count_limit: Option<u64>,
    pub unimproved_step_count_limit: Option<u64>,
    /// Score literal, for example `"0hard/-100soft"`.
    pub best_score_limit: Option<String>,
    pub termination_composition_style: Option<CompositionStyle>,
    pub terminations: Vec<TerminationConfig>,
}

impl TerminationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seconds_spent_limit(mut self, seconds: u64) -> Self {
        self.seconds_spent_limit = Some(seconds);
        self
    }

    pub fn with_milliseconds_spent_limit(mut self, milliseconds: u64) -> Self {
        self.milliseconds_spent_limit = Some(milliseconds);
        self
    }

    pub fn with_step_count_limit(mut self, steps: u64) -> Self {
        self.step_count_limit = Some(steps);
        self
    }

    pub fn with_unimproved_step_count_limit(mut self, steps: u64) -> Self {
        self.unimproved_step_count_limit = Some(steps);
        self
    }

    pub fn with_best_score_limit(mut self, score: impl Into<String>) -> Self {
        self.best_score_limit = Some(score.into());
        self
    }

    pub fn with_composition_style(mut self, style: CompositionStyle) -> Self {
        self.termination_composition_style = Some(style);
        self
    }

    pub fn with_termination(mut self, child: TerminationConfig) -> Self {
        self.terminations.push(child);
        self
    }

    /// Sum of the configured time limits.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds = self.seconds_spent_limit.map(Duration::from_secs);
        let millis = self.milliseconds_spent_limit.map(Duration::from_millis);
        match (seconds, millis) {
            (None, None) => None,
            (s, m) => Some(s.unwrap_or_default() + m.unwrap_or_default()),
        }
    }

    pub fn composition_style(&self) -> CompositionStyle {
        self.termination_composition_style.unwrap_or_default()
    }

    /// True when no criterion is configured anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.best_score_limit.is_none()
            && self.terminations.iter().all(TerminationConfig::is_empty)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = &self.best_score_limit {
            if limit.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "best_score_limit must not be empty".to_string(),
                ));
            }
        }
        self.terminations.iter().try_for_each(TerminationConfig::validate)
    }
}
