//! Errors raised while assembling selectors.

use planwright_config::{SelectionCacheType, SelectionOrder};
use planwright_core::PlanwrightError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectorError {
    #[error("selection order {order:?} needs a step or phase cache, not {cache_type:?}")]
    UncachedOrder {
        order: SelectionOrder,
        cache_type: SelectionCacheType,
    },

    #[error("{0} cannot cache a never-ending child selector")]
    NeverEndingChild(&'static str),

    #[error("invalid nearby distribution: {0}")]
    InvalidDistribution(String),

    #[error("no selector records mimic id '{0}'")]
    UnknownMimicId(String),

    #[error("mimic id '{0}' is recorded by more than one selector")]
    DuplicateMimicId(String),

    #[error("no {kind} registered under '{name}'")]
    UnknownPlugin { kind: &'static str, name: String },

    #[error("invalid selector configuration: {0}")]
    Invalid(String),
}

impl From<SelectorError> for PlanwrightError {
    fn from(error: SelectorError) -> Self {
        PlanwrightError::Config(error.to_string())
    }
}
