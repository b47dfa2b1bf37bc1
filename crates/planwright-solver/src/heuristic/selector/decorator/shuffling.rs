//! Shuffling selector decorator.
//!
//! Each pass replays the cached candidates in a fresh random permutation,
//! so every candidate is visited exactly once per pass.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use rand::seq::SliceRandom;

use super::{check_cacheable, Materialized};
use crate::heuristic::selector::{
    SelectionCacheType, SelectionContext, SelectionOrder, Selector, SelectorError,
};

pub struct ShufflingSelector<S, C: Selector<S>> {
    child: C,
    cache: Materialized<C::Item>,
    cursor: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C: Selector<S>> ShufflingSelector<S, C> {
    /// Fails for a just-in-time `cache_type` or a never-ending child.
    pub fn new(child: C, cache_type: SelectionCacheType) -> Result<Self, SelectorError> {
        check_cacheable(
            "shuffling selector",
            SelectionOrder::Shuffled,
            cache_type,
            child.is_never_ending(),
        )?;
        Ok(Self {
            child,
            cache: Materialized::new(cache_type),
            cursor: 0,
            _phantom: PhantomData,
        })
    }
}

impl<S, C: Selector<S>> Debug for ShufflingSelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShufflingSelector")
            .field("child", &self.child)
            .field("cache_type", &self.cache.scope)
            .finish()
    }
}

impl<S, C> Selector<S> for ShufflingSelector<S, C>
where
    C: Selector<S>,
    C::Item: Clone + Send,
{
    type Item = C::Item;

    fn cache_type(&self) -> SelectionCacheType {
        self.cache.scope
    }

    fn is_never_ending(&self) -> bool {
        false
    }

    fn size(&self, solution: &S) -> usize {
        self.cache.size(&self.child, solution)
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.cache.phase_started(&mut self.child, ctx);
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.cache.step_started(&mut self.child, ctx);
    }

    fn step_ended(&mut self) {
        self.cache.step_ended(&mut self.child);
    }

    fn phase_ended(&mut self) {
        self.cache.phase_ended(&mut self.child);
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.cache.items.shuffle(ctx.rng());
        self.cursor = 0;
    }

    fn select_next(&mut self, _ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        let item = self.cache.items.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(item)
    }
}
