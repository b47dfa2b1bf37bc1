//! Sub-chain change move selector.

use std::fmt;

use planwright_core::domain::{Handle, SubChain};
use rand::Rng;

use super::{select_or_restart, BoxedSelector, SelectionContext, Selector};
use crate::heuristic::{ChainedVariable, Move};

/// Moves a selected sub-chain after a selected destination, optionally also
/// in reverse.
///
/// In original order every sub-chain is paired with every destination and
/// each pair yields the plain move followed by the reversing one. In random
/// order a draw picks the reversing move half of the time. A sub-chain of
/// one entity never yields a reversing move.
pub struct SubChainChangeMoveSelector<S> {
    variable: ChainedVariable<S>,
    sub_chains: BoxedSelector<S, SubChain>,
    values: BoxedSelector<S, Handle>,
    select_reversing_move_too: bool,
    random: bool,
    current: Option<SubChain>,
    pending_reverse: Option<Move<S>>,
}

impl<S: 'static> SubChainChangeMoveSelector<S> {
    pub fn new(
        variable: ChainedVariable<S>,
        sub_chains: BoxedSelector<S, SubChain>,
        values: BoxedSelector<S, Handle>,
        select_reversing_move_too: bool,
        random: bool,
    ) -> Self {
        Self {
            variable,
            sub_chains,
            values,
            select_reversing_move_too,
            random,
            current: None,
            pending_reverse: None,
        }
    }

    fn reverses(&self, sub_chain: &SubChain) -> bool {
        self.select_reversing_move_too && sub_chain.len() > 1
    }
}

impl<S> fmt::Debug for SubChainChangeMoveSelector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubChainChangeMoveSelector")
            .field("variable", &self.variable)
            .field("sub_chains", &self.sub_chains)
            .field("values", &self.values)
            .field("select_reversing_move_too", &self.select_reversing_move_too)
            .field("random", &self.random)
            .finish()
    }
}

impl<S: 'static> Selector<S> for SubChainChangeMoveSelector<S> {
    type Item = Move<S>;

    fn is_never_ending(&self) -> bool {
        self.random || self.sub_chains.is_never_ending() || self.values.is_never_ending()
    }

    fn size(&self, solution: &S) -> usize {
        let pairs = self
            .sub_chains
            .size(solution)
            .saturating_mul(self.values.size(solution));
        if self.select_reversing_move_too {
            pairs.saturating_mul(2)
        } else {
            pairs
        }
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.sub_chains.phase_started(ctx);
        self.values.phase_started(ctx);
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.sub_chains.step_started(ctx);
        self.values.step_started(ctx);
    }

    fn step_ended(&mut self) {
        self.sub_chains.step_ended();
        self.values.step_ended();
    }

    fn phase_ended(&mut self) {
        self.sub_chains.phase_ended();
        self.values.phase_ended();
        self.current = None;
        self.pending_reverse = None;
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.current = None;
        self.pending_reverse = None;
        self.sub_chains.restart(ctx);
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<Move<S>> {
        if self.random {
            let sub_chain = select_or_restart(&mut self.sub_chains, ctx)?;
            let to = select_or_restart(&mut self.values, ctx)?;
            let reversing = self.reverses(&sub_chain) && ctx.rng().random_bool(0.5);
            return Some(self.variable.change_part_move(sub_chain, to, reversing));
        }
        if let Some(reverse) = self.pending_reverse.take() {
            return Some(reverse);
        }
        loop {
            let sub_chain = match &self.current {
                Some(sub_chain) => sub_chain.clone(),
                None => {
                    let sub_chain = self.sub_chains.select_next(ctx)?;
                    self.current = Some(sub_chain.clone());
                    self.values.restart(ctx);
                    sub_chain
                }
            };
            if let Some(to) = self.values.select_next(ctx) {
                if self.reverses(&sub_chain) {
                    self.pending_reverse =
                        Some(self.variable.change_part_move(sub_chain.clone(), to, true));
                }
                return Some(self.variable.change_part_move(sub_chain, to, false));
            }
            self.current = None;
        }
    }
}
