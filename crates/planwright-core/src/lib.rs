//! Planwright Core - score types, the planning solution contract and the
//! chain arena shared by every other Planwright crate.

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{ChainError, ChainGraph, Handle, NodeKind, PlanningSolution, SubChain};
pub use error::{PlanwrightError, Result};
pub use score::{
    BendableScore, HardSoftScore, ParseableScore, Score, ScoreLevel, ScoreParseError, SimpleScore,
};
