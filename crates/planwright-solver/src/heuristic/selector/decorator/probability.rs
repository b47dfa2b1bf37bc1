//! Probability selector decorator.
//!
//! Roulette-wheel selection over the cached candidates of a finite child:
//! each draw picks a candidate with probability proportional to its weight.
//! Negative weights count as zero and a zero-weight candidate is never drawn.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use rand::Rng;

use super::{check_cacheable, Materialized, SelectionWeight};
use crate::heuristic::selector::{
    SelectionCacheType, SelectionContext, SelectionOrder, Selector, SelectorError,
};

pub struct ProbabilitySelector<S, C: Selector<S>> {
    child: C,
    cache: Materialized<C::Item>,
    weight: SelectionWeight<S, C::Item>,
    // Running totals of the weights, aligned with `cache.items`.
    cumulative: Vec<f64>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C: Selector<S>> ProbabilitySelector<S, C> {
    /// Fails for a just-in-time `cache_type` or a never-ending child.
    pub fn new(
        child: C,
        cache_type: SelectionCacheType,
        weight: SelectionWeight<S, C::Item>,
    ) -> Result<Self, SelectorError> {
        check_cacheable(
            "probability selector",
            SelectionOrder::Probabilistic,
            cache_type,
            child.is_never_ending(),
        )?;
        Ok(Self {
            child,
            cache: Materialized::new(cache_type),
            weight,
            cumulative: Vec::new(),
            _phantom: PhantomData,
        })
    }

    fn weigh(&mut self, solution: &S) {
        self.cumulative.clear();
        let mut total = 0.0;
        for item in &self.cache.items {
            total += (self.weight)(solution, item).max(0.0);
            self.cumulative.push(total);
        }
    }

    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

impl<S, C: Selector<S>> Debug for ProbabilitySelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbabilitySelector")
            .field("child", &self.child)
            .field("cache_type", &self.cache.scope)
            .field("total_weight", &self.total())
            .finish()
    }
}

impl<S, C> Selector<S> for ProbabilitySelector<S, C>
where
    C: Selector<S>,
    C::Item: Clone + Send,
{
    type Item = C::Item;

    fn cache_type(&self) -> SelectionCacheType {
        self.cache.scope
    }

    fn is_never_ending(&self) -> bool {
        true
    }

    fn size(&self, solution: &S) -> usize {
        self.cache.size(&self.child, solution)
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if self.cache.phase_started(&mut self.child, ctx) {
            self.weigh(ctx.solution());
        }
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if self.cache.step_started(&mut self.child, ctx) {
            self.weigh(ctx.solution());
        }
    }

    fn step_ended(&mut self) {
        self.cache.step_ended(&mut self.child);
        if !self.cache.filled {
            self.cumulative.clear();
        }
    }

    fn phase_ended(&mut self) {
        self.cache.phase_ended(&mut self.child);
        self.cumulative.clear();
    }

    fn restart(&mut self, _ctx: &mut SelectionContext<'_, S>) {}

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let r = ctx.rng().random_range(0.0..total);
        let index = self.cumulative.partition_point(|&c| c <= r);
        self.cache.items.get(index).cloned()
    }
}
