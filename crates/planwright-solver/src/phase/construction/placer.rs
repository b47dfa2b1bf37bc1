//! Entity placers for the construction heuristic.
//!
//! A placer finds the next entity that still needs a value and lists the
//! moves that would assign one.

use std::fmt;

use planwright_core::domain::{ChainGraph, Handle};

use crate::heuristic::{ChainedVariable, Move, PlainVariable, PlanningRef};

/// One uninitialized entity with the candidate moves that initialize it.
pub struct Placement<S> {
    pub entity: PlanningRef,
    pub moves: Vec<Move<S>>,
}

impl<S> Placement<S> {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Takes ownership of the move at `index`.
    pub fn take_move(&mut self, index: usize) -> Move<S> {
        self.moves.swap_remove(index)
    }
}

impl<S> fmt::Debug for Placement<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placement")
            .field("entity", &self.entity)
            .field("move_count", &self.moves.len())
            .finish()
    }
}

/// Places the entities of one planning variable, in index order.
pub enum Placer<S> {
    /// Every value in `0..value_count` is a candidate for the first
    /// entity in `0..entity_count` that has none.
    Plain {
        variable: PlainVariable<S>,
        entity_count: fn(&S) -> usize,
        value_count: fn(&S) -> usize,
    },
    /// An unassigned chained entity may follow any anchor or any entity
    /// that already hangs off an anchor.
    Chained { variable: ChainedVariable<S> },
}

impl<S> Placer<S> {
    pub fn plain(
        variable: PlainVariable<S>,
        entity_count: fn(&S) -> usize,
        value_count: fn(&S) -> usize,
    ) -> Self {
        Placer::Plain {
            variable,
            entity_count,
            value_count,
        }
    }

    pub fn chained(variable: ChainedVariable<S>) -> Self {
        Placer::Chained { variable }
    }

    pub fn variable_name(&self) -> &'static str {
        match self {
            Placer::Plain { variable, .. } => variable.name(),
            Placer::Chained { variable } => variable.name(),
        }
    }

    /// Number of entities still waiting for a value.
    pub fn uninitialized_count(&self, solution: &S) -> usize {
        match self {
            Placer::Plain {
                variable,
                entity_count,
                ..
            } => (0..entity_count(solution))
                .filter(|&entity| variable.get(solution, entity).is_none())
                .count(),
            Placer::Chained { variable } => variable.graph(solution).unassigned_count(),
        }
    }

    /// The first uninitialized entity and its candidate moves, or `None`
    /// once every entity has a value.
    pub fn next_placement(&self, solution: &S) -> Option<Placement<S>> {
        match self {
            Placer::Plain {
                variable,
                entity_count,
                value_count,
            } => {
                let entity =
                    (0..entity_count(solution)).find(|&e| variable.get(solution, e).is_none())?;
                let moves = (0..value_count(solution))
                    .map(|value| Move::Change {
                        variable: *variable,
                        entity,
                        to: Some(value),
                    })
                    .collect();
                Some(Placement {
                    entity: PlanningRef {
                        descriptor_index: variable.descriptor_index(),
                        index: entity,
                    },
                    moves,
                })
            }
            Placer::Chained { variable } => {
                let graph = variable.graph(solution);
                let entity = graph
                    .entities()
                    .find(|&e| graph.predecessor(e).is_none())?;
                let moves = destinations(graph, entity)
                    .map(|to| Move::ChainedChange {
                        variable: *variable,
                        entity,
                        to: Some(to),
                    })
                    .collect();
                Some(Placement {
                    entity: PlanningRef {
                        descriptor_index: variable.descriptor_index(),
                        index: entity.index(),
                    },
                    moves,
                })
            }
        }
    }
}

/// Anchors first, then entities already connected to an anchor.
fn destinations(graph: &ChainGraph, entity: Handle) -> impl Iterator<Item = Handle> + '_ {
    graph.anchors().chain(
        graph
            .entities()
            .filter(move |&e| e != entity && graph.anchor_of(e).is_some()),
    )
}

impl<S> fmt::Debug for Placer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placer::Plain { variable, .. } => f.debug_tuple("Plain").field(variable).finish(),
            Placer::Chained { variable } => f.debug_tuple("Chained").field(variable).finish(),
        }
    }
}
