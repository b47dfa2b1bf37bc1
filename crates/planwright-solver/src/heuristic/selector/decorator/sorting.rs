//! Sorting selector decorator.
//!
//! Orders the cached candidates of a finite child by a weight. The sort is
//! stable, so candidates with equal weights keep the child's order.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use super::{check_cacheable, Materialized, SelectionWeight};
use crate::heuristic::selector::{
    SelectionCacheType, SelectionContext, SelectionOrder, Selector, SelectorError, SortOrder,
};

pub struct SortingSelector<S, C: Selector<S>> {
    child: C,
    cache: Materialized<C::Item>,
    key: SelectionWeight<S, C::Item>,
    order: SortOrder,
    cursor: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C: Selector<S>> SortingSelector<S, C> {
    /// Fails for a just-in-time `cache_type` or a never-ending child.
    pub fn new(
        child: C,
        cache_type: SelectionCacheType,
        key: SelectionWeight<S, C::Item>,
        order: SortOrder,
    ) -> Result<Self, SelectorError> {
        check_cacheable(
            "sorting selector",
            SelectionOrder::Sorted,
            cache_type,
            child.is_never_ending(),
        )?;
        Ok(Self {
            child,
            cache: Materialized::new(cache_type),
            key,
            order,
            cursor: 0,
            _phantom: PhantomData,
        })
    }

    fn sort(&mut self, solution: &S) {
        let key = &self.key;
        let mut keyed: Vec<(f64, C::Item)> = self
            .cache
            .items
            .drain(..)
            .map(|item| (key(solution, &item), item))
            .collect();
        match self.order {
            SortOrder::Ascending => keyed.sort_by(|a, b| a.0.total_cmp(&b.0)),
            SortOrder::Descending => keyed.sort_by(|a, b| b.0.total_cmp(&a.0)),
        }
        self.cache.items.extend(keyed.into_iter().map(|(_, item)| item));
    }
}

impl<S, C: Selector<S>> Debug for SortingSelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortingSelector")
            .field("child", &self.child)
            .field("cache_type", &self.cache.scope)
            .field("order", &self.order)
            .finish()
    }
}

impl<S, C> Selector<S> for SortingSelector<S, C>
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
        if self.cache.phase_started(&mut self.child, ctx) {
            self.sort(ctx.solution());
        }
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if self.cache.step_started(&mut self.child, ctx) {
            self.sort(ctx.solution());
        }
    }

    fn step_ended(&mut self) {
        self.cache.step_ended(&mut self.child);
    }

    fn phase_ended(&mut self) {
        self.cache.phase_ended(&mut self.child);
    }

    fn restart(&mut self, _ctx: &mut SelectionContext<'_, S>) {
        self.cursor = 0;
    }

    fn select_next(&mut self, _ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        let item = self.cache.items.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(item)
    }
}
