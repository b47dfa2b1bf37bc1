//! Domain model: the planning solution contract and the chain arena.

mod chain;
mod traits;


pub use chain::{ChainError, ChainGraph, Handle, LinkChange, NodeKind, SplicePlan, SubChain};
pub use traits::PlanningSolution;
