//! Selectors for entities, values, and moves.
//!
//! Every selector is a cursor over candidates driven by the phase:
//! [`Selector::restart`] begins a pass and [`Selector::select_next`] yields
//! the next candidate, or `None` when the pass is over. Random selectors
//! never end a pass on their own; the phase bounds how many candidates it
//! draws per step.
//!
//! Decorators wrap a child selector and redeclare cache scope and order:
//!
//! - [`CachingSelector`] - materializes the child per step or per phase
//! - [`ShufflingSelector`] - one random permutation per pass
//! - [`SortingSelector`] - ascending or descending by a weight
//! - [`ProbabilitySelector`] - roulette-wheel draws by a weight
//! - [`FilteringSelector`] - drops candidates rejected by a predicate
//! - [`SelectedCountLimitSelector`] - caps the candidates per pass
//! - [`UnionSelector`] - draws from several children
//! - [`MimicRecordingSelector`] / [`MimicReplayingSelector`] - echo one pick
//! - [`NearbySelector`] - ranks destinations by distance to a recorded origin

pub mod decorator;
pub mod nearby;

mod change;
mod error;
mod from_solution;
mod mimic;
mod sub_chain;
mod sub_chain_change;

use std::fmt::Debug;

use rand::rngs::StdRng;

pub use change::ChangeMoveSelector;
pub use decorator::{
    CachingSelector, FilteringSelector, ProbabilitySelector, SelectedCountLimitSelector,
    ShufflingSelector, SortingSelector, UnionSelector,
};
pub use error::SelectorError;
pub use from_solution::FromSolutionSelector;
pub use mimic::{MimicRecorder, MimicRecordingSelector, MimicReplayingSelector};
pub use nearby::{
    NearbyDistanceMatrix, NearbyDistanceMeter, NearbyRandom, NearbySelector,
};
pub use planwright_config::{SelectionCacheType, SelectionOrder, SortOrder};
pub use sub_chain::SubChainSelector;
pub use sub_chain_change::SubChainChangeMoveSelector;

/// What a selector sees while producing candidates: the working solution
/// and the solver's random number generator.
pub struct SelectionContext<'a, S> {
    solution: &'a S,
    rng: &'a mut StdRng,
}

impl<'a, S> SelectionContext<'a, S> {
    pub fn new(solution: &'a S, rng: &'a mut StdRng) -> Self {
        Self { solution, rng }
    }

    pub fn solution(&self) -> &'a S {
        self.solution
    }

    pub fn rng(&mut self) -> &mut StdRng {
        self.rng
    }
}

/// A lazy source of candidates.
///
/// Lifecycle hooks are called by the phase in this order: `phase_started`,
/// then per step `step_started`, `restart`, any number of `select_next`,
/// `step_ended`, and finally `phase_ended`. Decorators forward every hook
/// to their children.
pub trait Selector<S>: Debug + Send {
    type Item;

    /// When this selector materializes its candidates.
    fn cache_type(&self) -> SelectionCacheType {
        SelectionCacheType::JustInTime
    }

    /// True when a pass never runs out of candidates on its own.
    fn is_never_ending(&self) -> bool;

    /// Number of distinct candidates, or an estimate for never-ending selectors.
    fn size(&self, solution: &S) -> usize;

    fn phase_started(&mut self, _ctx: &mut SelectionContext<'_, S>) {}

    fn step_started(&mut self, _ctx: &mut SelectionContext<'_, S>) {}

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}

    /// Begins a new pass over the candidates.
    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>);

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<Self::Item>;
}

/// A type-erased selector.
pub type BoxedSelector<S, T> = Box<dyn Selector<S, Item = T>>;

impl<S, X: Selector<S> + ?Sized> Selector<S> for Box<X> {
    type Item = X::Item;

    fn cache_type(&self) -> SelectionCacheType {
        (**self).cache_type()
    }

    fn is_never_ending(&self) -> bool {
        (**self).is_never_ending()
    }

    fn size(&self, solution: &S) -> usize {
        (**self).size(solution)
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        (**self).phase_started(ctx)
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        (**self).step_started(ctx)
    }

    fn step_ended(&mut self) {
        (**self).step_ended()
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        (**self).restart(ctx)
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<Self::Item> {
        (**self).select_next(ctx)
    }
}

/// Draws the next candidate, starting one new pass if the current one is
/// exhausted. Used where a single candidate is needed per request.
pub(crate) fn select_or_restart<S, X>(
    selector: &mut X,
    ctx: &mut SelectionContext<'_, S>,
) -> Option<X::Item>
where
    X: Selector<S> + ?Sized,
{
    if let Some(item) = selector.select_next(ctx) {
        return Some(item);
    }
    selector.restart(ctx);
    selector.select_next(ctx)
}

#[cfg(test)]
mod tests;
