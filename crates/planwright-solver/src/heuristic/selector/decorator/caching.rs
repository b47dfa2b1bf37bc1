//! Caching selector decorator.
//!
//! Materializes the candidates of a finite child once per step or once per
//! phase and replays them, in original order or by uniform random draws.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use rand::Rng;

use super::{check_cacheable, Materialized};
use crate::heuristic::selector::{
    SelectionCacheType, SelectionContext, SelectionOrder, Selector, SelectorError,
};

/// Replays the candidates of a child materialized at a step or phase start.
pub struct CachingSelector<S, C: Selector<S>> {
    child: C,
    cache: Materialized<C::Item>,
    random: bool,
    cursor: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C: Selector<S>> CachingSelector<S, C> {
    /// Fails for a just-in-time `cache_type` or a never-ending child.
    pub fn new(child: C, cache_type: SelectionCacheType, random: bool) -> Result<Self, SelectorError> {
        check_cacheable(
            "caching selector",
            SelectionOrder::from_random_selection(random),
            cache_type,
            child.is_never_ending(),
        )?;
        Ok(Self {
            child,
            cache: Materialized::new(cache_type),
            random,
            cursor: 0,
            _phantom: PhantomData,
        })
    }
}

impl<S, C: Selector<S>> Debug for CachingSelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingSelector")
            .field("child", &self.child)
            .field("cache_type", &self.cache.scope)
            .field("random", &self.random)
            .field("cached", &self.cache.items.len())
            .finish()
    }
}

impl<S, C> Selector<S> for CachingSelector<S, C>
where
    C: Selector<S>,
    C::Item: Clone + Send,
{
    type Item = C::Item;

    fn cache_type(&self) -> SelectionCacheType {
        self.cache.scope
    }

    fn is_never_ending(&self) -> bool {
        self.random
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

    fn restart(&mut self, _ctx: &mut SelectionContext<'_, S>) {
        self.cursor = 0;
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        let items = &self.cache.items;
        if self.random {
            if items.is_empty() {
                return None;
            }
            let index = ctx.rng().random_range(0..items.len());
            return Some(items[index].clone());
        }
        let item = items.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::selector::decorator::test_utils::{listed, pass, rng};

    #[test]
    fn step_cache_is_filled_once_per_step() {
        let mut rng = rng();
        let mut ctx = SelectionContext::new(&(), &mut rng);
        let mut caching =
            CachingSelector::<(), _>::new(listed(&[3, 1, 2]), SelectionCacheType::Step, false).unwrap();

        caching.phase_started(&mut ctx);
        caching.step_started(&mut ctx);
        assert_eq!(pass(&mut caching, &mut ctx), vec![3, 1, 2]);
        assert_eq!(pass(&mut caching, &mut ctx), vec![3, 1, 2]);
        assert_eq!(caching.child.restarts, 1);
        assert_eq!(caching.size(&()), 3);

        caching.step_ended();
        caching.step_started(&mut ctx);
        assert_eq!(caching.child.restarts, 2);
    }

    #[test]
    fn phase_cache_survives_steps() {
        let mut rng = rng();
        let mut ctx = SelectionContext::new(&(), &mut rng);
        let mut caching =
            CachingSelector::<(), _>::new(listed(&[5, 6]), SelectionCacheType::Phase, false).unwrap();
        caching.phase_started(&mut ctx);
        for _ in 0..3 {
            caching.step_started(&mut ctx);
            assert_eq!(pass(&mut caching, &mut ctx), vec![5, 6]);
            caching.step_ended();
        }
        assert_eq!(caching.child.restarts, 1);
    }

    #[test]
    fn random_draws_from_cache() {
        let mut rng = rng();
        let mut ctx = SelectionContext::new(&(), &mut rng);
        let mut caching =
            CachingSelector::<(), _>::new(listed(&[7, 8, 9]), SelectionCacheType::Phase, true).unwrap();
        assert!(caching.is_never_ending());
        caching.phase_started(&mut ctx);
        caching.restart(&mut ctx);
        for _ in 0..50 {
            assert!([7, 8, 9].contains(&caching.select_next(&mut ctx).unwrap()));
        }
    }

    #[test]
    fn just_in_time_is_rejected() {
        let result =
            CachingSelector::<(), _>::new(listed(&[1]), SelectionCacheType::JustInTime, false);
        assert!(matches!(result, Err(SelectorError::UncachedOrder { .. })));
    }
}
