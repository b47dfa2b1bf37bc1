//! Selector decorators for caching, ordering, filtering and combining candidates.
//!
//! Decorators wrap an inner [`Selector`] and keep its item type. The ordering
//! decorators ([`ShufflingSelector`], [`SortingSelector`] and
//! [`ProbabilitySelector`]) need a materialized candidate list and refuse a
//! just-in-time cache when they are built.
//!
//! - [`CachingSelector`] - materializes the child per step or per phase
//! - [`FilteringSelector`] - drops candidates rejected by a predicate
//! - [`ProbabilitySelector`] - roulette-wheel draws weighted per candidate
//! - [`SelectedCountLimitSelector`] - caps the candidates per pass
//! - [`ShufflingSelector`] - one random permutation per pass
//! - [`SortingSelector`] - orders candidates by a weight
//! - [`UnionSelector`] - draws from several children

mod caching;
mod count_limit;
mod filtering;
mod probability;
mod shuffling;
mod sorting;
#[cfg(test)]
mod test_utils;
mod union;

use std::sync::Arc;

use super::{SelectionCacheType, SelectionContext, SelectionOrder, Selector, SelectorError};

pub use caching::CachingSelector;
pub use count_limit::SelectedCountLimitSelector;
pub use filtering::FilteringSelector;
pub use probability::ProbabilitySelector;
pub use shuffling::ShufflingSelector;
pub use sorting::SortingSelector;
pub use union::UnionSelector;

/// Keeps a candidate when it returns true.
pub type SelectionFilter<S, T> = Arc<dyn Fn(&S, &T) -> bool + Send + Sync>;

/// Sort key or probability weight of a candidate.
pub type SelectionWeight<S, T> = Arc<dyn Fn(&S, &T) -> f64 + Send + Sync>;

/// Fails unless `cache_type` materializes candidates and the child ends.
fn check_cacheable(
    owner: &'static str,
    order: SelectionOrder,
    cache_type: SelectionCacheType,
    child_never_ending: bool,
) -> Result<(), SelectorError> {
    if !cache_type.is_cached() {
        return Err(SelectorError::UncachedOrder { order, cache_type });
    }
    if child_never_ending {
        return Err(SelectorError::NeverEndingChild(owner));
    }
    Ok(())
}

/// Candidates of a child selector, materialized at the start of a step or
/// of a phase and dropped when that scope ends.
struct Materialized<T> {
    scope: SelectionCacheType,
    items: Vec<T>,
    filled: bool,
}

impl<T> Materialized<T> {
    fn new(scope: SelectionCacheType) -> Self {
        Self {
            scope,
            items: Vec::new(),
            filled: false,
        }
    }

    fn fill<S, C>(&mut self, child: &mut C, ctx: &mut SelectionContext<'_, S>)
    where
        C: Selector<S, Item = T> + ?Sized,
    {
        self.items.clear();
        child.restart(ctx);
        while let Some(item) = child.select_next(ctx) {
            self.items.push(item);
        }
        self.filled = true;
    }

    /// Forwards the hook and fills a phase cache. Returns true when filled.
    fn phase_started<S, C>(&mut self, child: &mut C, ctx: &mut SelectionContext<'_, S>) -> bool
    where
        C: Selector<S, Item = T> + ?Sized,
    {
        child.phase_started(ctx);
        if self.scope == SelectionCacheType::Phase {
            self.fill(child, ctx);
            return true;
        }
        false
    }

    /// Forwards the hook and fills a step cache. Returns true when filled.
    fn step_started<S, C>(&mut self, child: &mut C, ctx: &mut SelectionContext<'_, S>) -> bool
    where
        C: Selector<S, Item = T> + ?Sized,
    {
        child.step_started(ctx);
        if self.scope == SelectionCacheType::Step {
            self.fill(child, ctx);
            return true;
        }
        false
    }

    fn step_ended<S, C>(&mut self, child: &mut C)
    where
        C: Selector<S, Item = T> + ?Sized,
    {
        child.step_ended();
        if self.scope == SelectionCacheType::Step {
            self.clear();
        }
    }

    fn phase_ended<S, C>(&mut self, child: &mut C)
    where
        C: Selector<S, Item = T> + ?Sized,
    {
        child.phase_ended();
        self.clear();
    }

    fn clear(&mut self) {
        self.items.clear();
        self.filled = false;
    }

    fn size<S, C>(&self, child: &C, solution: &S) -> usize
    where
        C: Selector<S, Item = T> + ?Sized,
    {
        if self.filled {
            self.items.len()
        } else {
            child.size(solution)
        }
    }
}
