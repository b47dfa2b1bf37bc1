//! Finite selectors over fixed candidate lists for decorator tests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::heuristic::selector::{SelectionContext, Selector};

#[derive(Debug)]
pub struct Listed {
    pub items: Vec<i64>,
    pub cursor: usize,
    pub restarts: usize,
}

pub fn listed(items: &[i64]) -> Listed {
    Listed {
        items: items.to_vec(),
        cursor: 0,
        restarts: 0,
    }
}

impl Selector<()> for Listed {
    type Item = i64;

    fn is_never_ending(&self) -> bool {
        false
    }

    fn size(&self, _: &()) -> usize {
        self.items.len()
    }

    fn restart(&mut self, _: &mut SelectionContext<'_, ()>) {
        self.cursor = 0;
        self.restarts += 1;
    }

    fn select_next(&mut self, _: &mut SelectionContext<'_, ()>) -> Option<i64> {
        let item = self.items.get(self.cursor).copied();
        self.cursor += 1;
        item
    }
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Runs one full pass of a finite selector.
pub fn pass<X: Selector<(), Item = i64>>(
    selector: &mut X,
    ctx: &mut SelectionContext<'_, ()>,
) -> Vec<i64> {
    selector.restart(ctx);
    std::iter::from_fn(|| selector.select_next(ctx)).collect()
}
