//! Selector of contiguous sub-chains of a chained variable.

use std::fmt;

use planwright_core::domain::{Handle, SubChain};
use rand::Rng;

use super::{SelectionCacheType, SelectionContext, Selector, SelectorError};
use crate::heuristic::ChainedVariable;

/// Number of sub-chains of a chain of `len` entities with sizes in
/// `[minimum, maximum]`.
///
/// With `n = len - minimum + 1` and `m = max(len - maximum, 0)` this is
/// `n(n+1)/2 - m(m+1)/2`.
pub fn sub_chain_count(len: usize, minimum: usize, maximum: usize) -> usize {
    if len < minimum {
        return 0;
    }
    let n = len - minimum + 1;
    let m = len.saturating_sub(maximum);
    n * (n + 1) / 2 - m * (m + 1) / 2
}

/// Selects the sub-chains of every anchor's trailing chain whose size lies
/// in `[minimum, maximum]`.
///
/// The chains are read from the working solution when the cache scope
/// starts: at every pass for a just-in-time cache, at the step start or at
/// the phase start otherwise. Original order walks the sub-chains chain by
/// chain, by start and then by end. Random order draws a chain uniformly,
/// then one of its sub-chains uniformly.
pub struct SubChainSelector<S> {
    variable: ChainedVariable<S>,
    minimum: usize,
    maximum: usize,
    cache_type: SelectionCacheType,
    random: bool,
    chains: Vec<Vec<Handle>>,
    // Position of the next sub-chain in original order.
    chain: usize,
    from: usize,
    to: usize,
}

impl<S> SubChainSelector<S> {
    pub fn new(
        variable: ChainedVariable<S>,
        minimum: usize,
        maximum: usize,
        cache_type: SelectionCacheType,
        random: bool,
    ) -> Result<Self, SelectorError> {
        if minimum < 1 {
            return Err(SelectorError::Invalid(format!(
                "sub-chain minimum size ({minimum}) must be at least 1"
            )));
        }
        if maximum < minimum {
            return Err(SelectorError::Invalid(format!(
                "sub-chain maximum size ({maximum}) is below the minimum ({minimum})"
            )));
        }
        Ok(Self {
            variable,
            minimum,
            maximum,
            cache_type,
            random,
            chains: Vec::new(),
            chain: 0,
            from: 0,
            to: 0,
        })
    }

    pub fn variable(&self) -> ChainedVariable<S> {
        self.variable
    }

    fn load_chains(&mut self, solution: &S) {
        let graph = self.variable.graph(solution);
        let minimum = self.minimum;
        self.chains = graph
            .anchors()
            .map(|anchor| graph.trailing_chain(anchor))
            .filter(|chain| chain.len() >= minimum)
            .collect();
    }

    fn chain_count(&self, chain: &[Handle]) -> usize {
        sub_chain_count(chain.len(), self.minimum, self.maximum)
    }

    fn sub_chain(chain: &[Handle], from: usize, to: usize) -> Option<SubChain> {
        SubChain::new(chain.get(from..=to)?.to_vec()).ok()
    }

    /// Translates `index` below the chain's count into its `(from, to)`.
    fn nth_bounds(&self, len: usize, mut index: usize) -> Option<(usize, usize)> {
        for from in 0..len {
            let first_to = from + self.minimum - 1;
            if first_to >= len {
                break;
            }
            let last_to = from.saturating_add(self.maximum - 1).min(len - 1);
            let count = last_to - first_to + 1;
            if index < count {
                return Some((from, first_to + index));
            }
            index -= count;
        }
        None
    }

    fn select_random(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<SubChain> {
        if self.chains.is_empty() {
            return None;
        }
        let chain_index = ctx.rng().random_range(0..self.chains.len());
        let chain = &self.chains[chain_index];
        let count = self.chain_count(chain);
        if count == 0 {
            return None;
        }
        let index = ctx.rng().random_range(0..count);
        let (from, to) = self.nth_bounds(chain.len(), index)?;
        Self::sub_chain(chain, from, to)
    }

    fn select_original(&mut self) -> Option<SubChain> {
        while let Some(chain) = self.chains.get(self.chain) {
            let len = chain.len();
            let first_to = self.from + self.minimum - 1;
            if first_to >= len {
                self.chain += 1;
                self.from = 0;
                self.to = self.minimum - 1;
                continue;
            }
            let last_to = self.from.saturating_add(self.maximum - 1).min(len - 1);
            if self.to < first_to {
                self.to = first_to;
            }
            if self.to > last_to {
                self.from += 1;
                self.to = self.from + self.minimum - 1;
                continue;
            }
            let (from, to) = (self.from, self.to);
            self.to += 1;
            return Self::sub_chain(chain, from, to);
        }
        None
    }
}

impl<S> fmt::Debug for SubChainSelector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubChainSelector")
            .field("variable", &self.variable)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("cache_type", &self.cache_type)
            .field("random", &self.random)
            .finish()
    }
}

impl<S> Selector<S> for SubChainSelector<S> {
    type Item = SubChain;

    fn cache_type(&self) -> SelectionCacheType {
        self.cache_type
    }

    fn is_never_ending(&self) -> bool {
        self.random
    }

    fn size(&self, solution: &S) -> usize {
        let graph = self.variable.graph(solution);
        graph
            .anchors()
            .map(|anchor| self.chain_count(&graph.trailing_chain(anchor)))
            .sum()
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if self.cache_type == SelectionCacheType::Phase {
            self.load_chains(ctx.solution());
        }
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if self.cache_type == SelectionCacheType::Step {
            self.load_chains(ctx.solution());
        }
    }

    fn step_ended(&mut self) {
        if self.cache_type == SelectionCacheType::Step {
            self.chains.clear();
        }
    }

    fn phase_ended(&mut self) {
        self.chains.clear();
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if !self.cache_type.is_cached() {
            self.load_chains(ctx.solution());
        }
        self.chain = 0;
        self.from = 0;
        self.to = self.minimum - 1;
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<SubChain> {
        if self.random {
            self.select_random(ctx)
        } else {
            self.select_original()
        }
    }
}
