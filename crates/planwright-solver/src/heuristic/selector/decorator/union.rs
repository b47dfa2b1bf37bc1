//! Union selector combinator.
//!
//! In original order a pass yields every candidate of the first child, then
//! of the second, and so on. In random order each draw first picks a child,
//! weighted by its size, and then draws one candidate from it.

use std::fmt::{self, Debug};

use rand::Rng;

use crate::heuristic::selector::{
    select_or_restart, BoxedSelector, SelectionContext, Selector,
};

pub struct UnionSelector<S, T> {
    children: Vec<BoxedSelector<S, T>>,
    random: bool,
    current: usize,
}

impl<S, T> UnionSelector<S, T> {
    pub fn new(children: Vec<BoxedSelector<S, T>>, random: bool) -> Self {
        Self {
            children,
            random,
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn select_random(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<T> {
        let solution = ctx.solution();
        let sizes: Vec<usize> = self.children.iter().map(|c| c.size(solution)).collect();
        let total: usize = sizes.iter().sum();
        if total == 0 {
            return None;
        }
        let mut r = ctx.rng().random_range(0..total);
        let mut picked = 0;
        for (index, &size) in sizes.iter().enumerate() {
            if r < size {
                picked = index;
                break;
            }
            r -= size;
        }
        if let Some(item) = select_or_restart(&mut self.children[picked], ctx) {
            return Some(item);
        }
        // The picked child came up empty this time; fall back to the others.
        for index in (0..self.children.len()).filter(|&i| i != picked) {
            if let Some(item) = select_or_restart(&mut self.children[index], ctx) {
                return Some(item);
            }
        }
        None
    }
}

impl<S, T> Debug for UnionSelector<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionSelector")
            .field("children", &self.children)
            .field("random", &self.random)
            .finish()
    }
}

impl<S, T> Selector<S> for UnionSelector<S, T> {
    type Item = T;

    fn is_never_ending(&self) -> bool {
        self.random || self.children.iter().any(|c| c.is_never_ending())
    }

    fn size(&self, solution: &S) -> usize {
        self.children.iter().map(|c| c.size(solution)).sum()
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        for child in &mut self.children {
            child.phase_started(ctx);
        }
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        for child in &mut self.children {
            child.step_started(ctx);
        }
    }

    fn step_ended(&mut self) {
        for child in &mut self.children {
            child.step_ended();
        }
    }

    fn phase_ended(&mut self) {
        for child in &mut self.children {
            child.phase_ended();
        }
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.current = 0;
        for child in &mut self.children {
            child.restart(ctx);
        }
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<T> {
        if self.random {
            return self.select_random(ctx);
        }
        while let Some(child) = self.children.get_mut(self.current) {
            if let Some(item) = child.select_next(ctx) {
                return Some(item);
            }
            self.current += 1;
        }
        None
    }
}
