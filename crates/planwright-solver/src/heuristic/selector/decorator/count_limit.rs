//! Count limit selector decorator.
//!
//! Ends a pass after a fixed number of candidates. This is how a never-ending
//! child is bounded per step.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use crate::heuristic::selector::{SelectionCacheType, SelectionContext, Selector};

pub struct SelectedCountLimitSelector<S, C> {
    child: C,
    limit: usize,
    selected: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C> SelectedCountLimitSelector<S, C> {
    pub fn new(child: C, limit: usize) -> Self {
        Self {
            child,
            limit,
            selected: 0,
            _phantom: PhantomData,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<S, C: Debug> Debug for SelectedCountLimitSelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedCountLimitSelector")
            .field("child", &self.child)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<S, C: Selector<S>> Selector<S> for SelectedCountLimitSelector<S, C> {
    type Item = C::Item;

    fn cache_type(&self) -> SelectionCacheType {
        self.child.cache_type()
    }

    fn is_never_ending(&self) -> bool {
        false
    }

    fn size(&self, solution: &S) -> usize {
        self.child.size(solution).min(self.limit)
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
        self.selected = 0;
        self.child.restart(ctx);
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        if self.selected >= self.limit {
            return None;
        }
        let item = self.child.select_next(ctx)?;
        self.selected += 1;
        Some(item)
    }
}
