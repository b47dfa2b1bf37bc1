//! Score types for representing solution quality.
//!
//! Scores are immutable values. The search engine compares them, subtracts
//! them and reads their level numbers, but never computes them.

#[macro_use]
mod macros;

mod bendable;
mod hard_soft;
mod level;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use bendable::BendableScore;
pub use hard_soft::HardSoftScore;
pub use level::ScoreLevel;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreParseError};
