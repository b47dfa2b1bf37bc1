//! Change move selector: one entity gets one value.

use std::fmt;

use super::{select_or_restart, BoxedSelector, SelectionContext, Selector};
use crate::heuristic::{ChangeVariable, Move};

/// Builds change moves from an entity selector and a value selector.
///
/// In original order every entity is combined with every value; the value
/// selector is restarted after each entity is drawn, so a value selector
/// that mimics or is nearby to the entity sees the current one. In random
/// order each move draws one entity and one value.
pub struct ChangeMoveSelector<S, V: ChangeVariable<S>> {
    variable: V,
    entities: BoxedSelector<S, V::Entity>,
    values: BoxedSelector<S, V::Value>,
    random: bool,
    current_entity: Option<V::Entity>,
}

impl<S, V: ChangeVariable<S>> ChangeMoveSelector<S, V> {
    pub fn new(
        variable: V,
        entities: BoxedSelector<S, V::Entity>,
        values: BoxedSelector<S, V::Value>,
        random: bool,
    ) -> Self {
        Self {
            variable,
            entities,
            values,
            random,
            current_entity: None,
        }
    }

    pub fn variable(&self) -> V {
        self.variable
    }
}

impl<S, V: ChangeVariable<S>> fmt::Debug for ChangeMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("variable", &self.variable)
            .field("entities", &self.entities)
            .field("values", &self.values)
            .field("random", &self.random)
            .finish()
    }
}

impl<S, V: ChangeVariable<S>> Selector<S> for ChangeMoveSelector<S, V> {
    type Item = Move<S>;

    fn is_never_ending(&self) -> bool {
        self.random || self.entities.is_never_ending() || self.values.is_never_ending()
    }

    fn size(&self, solution: &S) -> usize {
        self.entities
            .size(solution)
            .saturating_mul(self.values.size(solution))
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.entities.phase_started(ctx);
        self.values.phase_started(ctx);
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.entities.step_started(ctx);
        self.values.step_started(ctx);
    }

    fn step_ended(&mut self) {
        self.entities.step_ended();
        self.values.step_ended();
    }

    fn phase_ended(&mut self) {
        self.entities.phase_ended();
        self.values.phase_ended();
        self.current_entity = None;
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.current_entity = None;
        self.entities.restart(ctx);
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<Move<S>> {
        if self.random {
            let entity = select_or_restart(&mut self.entities, ctx)?;
            let value = select_or_restart(&mut self.values, ctx)?;
            return Some(self.variable.change_move(entity, value));
        }
        loop {
            let entity = match self.current_entity {
                Some(entity) => entity,
                None => {
                    let entity = self.entities.select_next(ctx)?;
                    self.current_entity = Some(entity);
                    self.values.restart(ctx);
                    entity
                }
            };
            if let Some(value) = self.values.select_next(ctx) {
                return Some(self.variable.change_move(entity, value));
            }
            self.current_entity = None;
        }
    }
}
