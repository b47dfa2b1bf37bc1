//! Planwright Solver Engine
//!
//! This crate provides the search engine:
//! - Solver and the configuration builders that assemble it
//! - Phases (construction heuristic, local search)
//! - Moves and selectors over plain and chained variables
//! - Termination conditions
//! - Event system for monitoring

pub mod builder;
pub mod event;
pub mod heuristic;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod termination;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{
    AcceptorBuilder, ForagerBuilder, MoveSelectorBuilder, PhaseBuilder, SelectorRegistry,
    SolverBuilder, Source, TerminationBuilder,
};
pub use event::{
    CountingEventListener, EventKind, ListenerCounts, PhaseLifecycleListener, SolverEventListener,
    SolverEventSupport, StepLifecycleListener, TracingEventListener,
};
pub use heuristic::{
    BoxedSelector, ChainedVariable, ChangeMoveSelector, ChangeVariable, Move, NearbyDistanceMeter,
    NearbyRandom, PlainVariable, SelectionContext, Selector, SelectorError,
    SubChainChangeMoveSelector, SubChainSelector,
};
pub use phase::{
    construction::{ConstructionHeuristicPhase, Placer},
    localsearch::{AcceptedCountForager, Acceptor, LocalSearchDecider, LocalSearchPhase},
    Phase,
};
pub use scope::{PhaseContext, SolverScope, StepContext};
pub use solver::Solver;
pub use termination::{Termination, TerminationProgress};
