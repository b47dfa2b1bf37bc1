//! Construction heuristic phase.
//!
//! Builds an initial solution by assigning a value to every uninitialized
//! planning variable, one entity per step.

mod phase;
mod placer;


pub use phase::ConstructionHeuristicPhase;
pub use placer::{Placement, Placer};
