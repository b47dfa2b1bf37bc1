//! Filtering selector decorator.
//!
//! Skips the candidates a predicate rejects. Over a never-ending child the
//! search for an accepted candidate gives up after `10 * size` consecutive
//! rejections, so an all-rejecting filter cannot hang a step.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use tracing::trace;

use super::SelectionFilter;
use crate::heuristic::selector::{SelectionCacheType, SelectionContext, Selector};

const REJECTION_FACTOR: usize = 10;

pub struct FilteringSelector<S, C: Selector<S>> {
    child: C,
    filter: SelectionFilter<S, C::Item>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C: Selector<S>> FilteringSelector<S, C> {
    pub fn new(child: C, filter: SelectionFilter<S, C::Item>) -> Self {
        Self {
            child,
            filter,
            _phantom: PhantomData,
        }
    }
}

impl<S, C: Selector<S>> Debug for FilteringSelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringSelector")
            .field("child", &self.child)
            .finish()
    }
}

impl<S, C: Selector<S>> Selector<S> for FilteringSelector<S, C> {
    type Item = C::Item;

    fn cache_type(&self) -> SelectionCacheType {
        self.child.cache_type()
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
    }

    /// Upper bound: the child's size.
    fn size(&self, solution: &S) -> usize {
        self.child.size(solution)
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.phase_started(ctx);
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.step_started(ctx);
    }

    fn step_ended(&mut self) {
        self.child.step_ended();
    }

    fn phase_ended(&mut self) {
        self.child.phase_ended();
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.restart(ctx);
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        let solution = ctx.solution();
        let bail_out = if self.child.is_never_ending() {
            Some((self.child.size(solution) * REJECTION_FACTOR).max(1))
        } else {
            None
        };
        let mut rejected = 0usize;
        loop {
            let item = self.child.select_next(ctx)?;
            if (self.filter)(solution, &item) {
                return Some(item);
            }
            rejected += 1;
            if bail_out.is_some_and(|limit| rejected >= limit) {
                trace!(event = "filter_bail_out", rejected);
                return None;
            }
        }
    }
}
