//! Heuristic building blocks of the search.
//!
//! - Moves: reversible changes to plain and chained planning variables
//! - Selectors: lazy candidate streams of entities, values, sub-chains and moves

pub mod r#move;
pub mod selector;

pub use r#move::{
    ChainedVariable, ChangeVariable, Move, PlainVariable, PlanningRef, PlanningRefs,
};

pub use selector::{
    BoxedSelector, CachingSelector, ChangeMoveSelector, FilteringSelector, FromSolutionSelector,
    MimicRecorder, MimicRecordingSelector, MimicReplayingSelector, NearbyDistanceMatrix,
    NearbyDistanceMeter, NearbyRandom, NearbySelector, ProbabilitySelector,
    SelectedCountLimitSelector, SelectionContext, Selector, SelectorError, ShufflingSelector,
    SortingSelector, SubChainChangeMoveSelector, SubChainSelector, UnionSelector,
};
