//! Leaf selector reading candidates straight from the working solution.

use std::fmt;

use rand::Rng;

use super::{SelectionContext, Selector};

/// Selects the `i`-th candidate of a solution-defined collection.
///
/// `count` returns the collection size and `get` the candidate at an index.
/// In original order a pass walks indices `0..count`; in random order every
/// request is an independent uniform draw and the pass never ends.
///
/// # Example
///
/// ```
/// use planwright_solver::heuristic::selector::FromSolutionSelector;
/// use planwright_solver::heuristic::Selector;
///
/// struct Board { rows: usize }
///
/// let values = FromSolutionSelector::<Board, usize>::indices(|b| b.rows, false);
/// assert_eq!(values.size(&Board { rows: 8 }), 8);
/// assert!(!values.is_never_ending());
/// ```
pub struct FromSolutionSelector<S, T> {
    count: fn(&S) -> usize,
    get: fn(&S, usize) -> T,
    random: bool,
    cursor: usize,
}

impl<S, T> FromSolutionSelector<S, T> {
    pub fn new(count: fn(&S) -> usize, get: fn(&S, usize) -> T, random: bool) -> Self {
        Self {
            count,
            get,
            random,
            cursor: 0,
        }
    }
}

impl<S> FromSolutionSelector<S, usize> {
    /// Selects the indices `0..count` themselves.
    pub fn indices(count: fn(&S) -> usize, random: bool) -> Self {
        Self::new(count, index_of, random)
    }
}

fn index_of<S>(_: &S, index: usize) -> usize {
    index
}

impl<S, T> fmt::Debug for FromSolutionSelector<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromSolutionSelector")
            .field("random", &self.random)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<S, T> Selector<S> for FromSolutionSelector<S, T>
where
    T: Send + 'static,
{
    type Item = T;

    fn is_never_ending(&self) -> bool {
        self.random
    }

    fn size(&self, solution: &S) -> usize {
        (self.count)(solution)
    }

    fn restart(&mut self, _ctx: &mut SelectionContext<'_, S>) {
        self.cursor = 0;
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<T> {
        let solution = ctx.solution();
        let count = (self.count)(solution);
        if self.random {
            if count == 0 {
                return None;
            }
            let index = ctx.rng().random_range(0..count);
            return Some((self.get)(solution, index));
        }
        if self.cursor >= count {
            return None;
        }
        let item = (self.get)(solution, self.cursor);
        self.cursor += 1;
        Some(item)
    }
}
