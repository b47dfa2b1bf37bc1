//! Reversible moves over plain and chained planning variables.
//!
//! A [`Move`] is a value: applying it through a score director mutates the
//! working solution and returns the exact inverse move. Applying the inverse
//! restores every planning variable, including the trailing links a chained
//! relocation had to repair, and emits the change notifications of the
//! original application in reverse order.
//!
//! - [`Move::Change`] - assigns a value to a plain variable
//! - [`Move::ChainedChange`] - relocates one chained entity
//! - [`Move::ChangePart`] - relocates a run of chained entities, keeping its order
//! - [`Move::ReverseChangePart`] - relocates a run of chained entities, reversed
//! - [`Move::Composite`] - several moves applied in sequence

mod variable;


use std::fmt;
use std::hash::{Hash, Hasher};

use planwright_core::domain::{ChainError, Handle, PlanningSolution, SubChain};
use planwright_scoring::ScoreDirector;
use smallvec::SmallVec;
use tracing::warn;

pub use variable::{ChainedVariable, ChangeVariable, PlainVariable};

/// An entity or value touched by a move, for tabu bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanningRef {
    pub descriptor_index: usize,
    pub index: usize,
}

pub type PlanningRefs = SmallVec<[PlanningRef; 4]>;

/// A reversible change to the working solution.
///
/// # Example
///
/// ```
/// use planwright_core::domain::{ChainGraph, Handle, PlanningSolution};
/// use planwright_core::SimpleScore;
/// use planwright_scoring::{ScoreDirector, SimpleScoreDirector};
/// use planwright_solver::heuristic::{ChainedVariable, Move};
///
/// #[derive(Clone, Debug)]
/// struct Route { graph: ChainGraph, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Route {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// fn graph(r: &Route) -> &ChainGraph { &r.graph }
/// fn graph_mut(r: &mut Route) -> &mut ChainGraph { &mut r.graph }
///
/// let mut route = Route { graph: ChainGraph::new(), score: None };
/// let depot = route.graph.add_anchor();
/// let stops: Vec<Handle> = (0..3).map(|_| route.graph.add_entity()).collect();
/// route.graph.append(depot, &stops).unwrap();
///
/// let previous = ChainedVariable::new("previous", 0, graph, graph_mut);
/// let mut director = SimpleScoreDirector::new(route, |_: &Route| SimpleScore::of(0));
///
/// let relocate = Move::ChainedChange { variable: previous, entity: stops[2], to: Some(depot) };
/// let undo = relocate.apply(&mut director).unwrap();
/// assert_eq!(director.working_solution().graph.trailing_chain(depot), vec![stops[2], stops[0], stops[1]]);
///
/// undo.apply(&mut director).unwrap();
/// assert_eq!(director.working_solution().graph.trailing_chain(depot), stops);
/// ```
pub enum Move<S> {
    /// Assigns `to` to a plain variable; `None` unassigns.
    Change {
        variable: PlainVariable<S>,
        entity: usize,
        to: Option<usize>,
    },
    /// Places one chained entity directly after `to`; `None` unassigns.
    ChainedChange {
        variable: ChainedVariable<S>,
        entity: Handle,
        to: Option<Handle>,
    },
    /// Places a run of chained entities after `to`, head first.
    ChangePart {
        variable: ChainedVariable<S>,
        sub_chain: SubChain,
        to: Option<Handle>,
    },
    /// Places a run of chained entities after `to`, tail first.
    ReverseChangePart {
        variable: ChainedVariable<S>,
        sub_chain: SubChain,
        to: Option<Handle>,
    },
    /// Applies its parts in order.
    Composite(Vec<Move<S>>),
}

impl<S: PlanningSolution> Move<S> {
    /// True when applying the move would change the working solution.
    ///
    /// Chained moves that the chain graph rejects, such as a destination
    /// inside the moving run, are not doable.
    pub fn is_doable(&self, solution: &S) -> bool {
        match self {
            Move::Change {
                variable,
                entity,
                to,
            } => variable.get(solution, *entity) != *to,
            Move::ChainedChange {
                variable,
                entity,
                to,
            } => changes_graph(variable, solution, &SubChain::single(*entity), *to, false),
            Move::ChangePart {
                variable,
                sub_chain,
                to,
            } => changes_graph(variable, solution, sub_chain, *to, false),
            Move::ReverseChangePart {
                variable,
                sub_chain,
                to,
            } => changes_graph(variable, solution, sub_chain, *to, true),
            Move::Composite(moves) => moves.iter().any(|m| m.is_doable(solution)),
        }
    }

    /// Applies the move and returns its inverse.
    ///
    /// Every changed variable is bracketed by `before_variable_changed` and
    /// `after_variable_changed`; unchanged variables are not notified. A
    /// rejected chained move fails before anything is written. A composite
    /// whose part fails rolls back the parts it already applied.
    pub fn apply<D>(&self, director: &mut D) -> Result<Move<S>, ChainError>
    where
        D: ScoreDirector<S> + ?Sized,
    {
        match self {
            Move::Change {
                variable,
                entity,
                to,
            } => {
                let old = variable.get(director.working_solution(), *entity);
                if old != *to {
                    director.before_variable_changed(
                        variable.descriptor_index(),
                        *entity,
                        variable.name(),
                    );
                    variable.set(director.working_solution_mut(), *entity, *to);
                    director.after_variable_changed(
                        variable.descriptor_index(),
                        *entity,
                        variable.name(),
                    );
                }
                Ok(Move::Change {
                    variable: *variable,
                    entity: *entity,
                    to: old,
                })
            }
            Move::ChainedChange {
                variable,
                entity,
                to,
            } => {
                let old = splice(director, variable, &SubChain::single(*entity), *to, false)?;
                Ok(Move::ChainedChange {
                    variable: *variable,
                    entity: *entity,
                    to: old,
                })
            }
            Move::ChangePart {
                variable,
                sub_chain,
                to,
            } => {
                let old = splice(director, variable, sub_chain, *to, false)?;
                Ok(Move::ChangePart {
                    variable: *variable,
                    sub_chain: sub_chain.clone(),
                    to: old,
                })
            }
            Move::ReverseChangePart {
                variable,
                sub_chain,
                to,
            } => {
                let old = splice(director, variable, sub_chain, *to, true)?;
                Ok(Move::ReverseChangePart {
                    variable: *variable,
                    sub_chain: sub_chain.reversed(),
                    to: old,
                })
            }
            Move::Composite(moves) => {
                let mut undos = Vec::with_capacity(moves.len());
                for part in moves {
                    match part.apply(director) {
                        Ok(undo) => undos.push(undo),
                        Err(error) => {
                            for undo in undos.iter().rev() {
                                if let Err(rollback) = undo.apply(director) {
                                    warn!(
                                        event = "composite_rollback_failed",
                                        error = %rollback,
                                    );
                                }
                            }
                            return Err(error);
                        }
                    }
                }
                undos.reverse();
                Ok(Move::Composite(undos))
            }
        }
    }
}

impl<S> Move<S> {
    /// Entities whose variables the move writes.
    pub fn planning_entities(&self) -> PlanningRefs {
        let mut refs = PlanningRefs::new();
        self.collect_entities(&mut refs);
        refs
    }

    /// Values the move assigns.
    pub fn planning_values(&self) -> PlanningRefs {
        let mut refs = PlanningRefs::new();
        self.collect_values(&mut refs);
        refs
    }

    fn collect_entities(&self, refs: &mut PlanningRefs) {
        match self {
            Move::Change {
                variable, entity, ..
            } => refs.push(PlanningRef {
                descriptor_index: variable.descriptor_index(),
                index: *entity,
            }),
            Move::ChainedChange {
                variable, entity, ..
            } => refs.push(PlanningRef {
                descriptor_index: variable.descriptor_index(),
                index: entity.index(),
            }),
            Move::ChangePart {
                variable,
                sub_chain,
                ..
            }
            | Move::ReverseChangePart {
                variable,
                sub_chain,
                ..
            } => refs.extend(sub_chain.iter().map(|h| PlanningRef {
                descriptor_index: variable.descriptor_index(),
                index: h.index(),
            })),
            Move::Composite(moves) => moves.iter().for_each(|m| m.collect_entities(refs)),
        }
    }

    fn collect_values(&self, refs: &mut PlanningRefs) {
        let (descriptor_index, value) = match self {
            Move::Change { variable, to, .. } => (variable.descriptor_index(), *to),
            Move::ChainedChange { variable, to, .. }
            | Move::ChangePart { variable, to, .. }
            | Move::ReverseChangePart { variable, to, .. } => {
                (variable.descriptor_index(), to.map(Handle::index))
            }
            Move::Composite(moves) => {
                moves.iter().for_each(|m| m.collect_values(refs));
                return;
            }
        };
        if let Some(index) = value {
            refs.push(PlanningRef {
                descriptor_index,
                index,
            });
        }
    }

    /// Short name of the move kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Move::Change { .. } => "change",
            Move::ChainedChange { .. } => "chained_change",
            Move::ChangePart { .. } => "change_part",
            Move::ReverseChangePart { .. } => "reverse_change_part",
            Move::Composite(_) => "composite",
        }
    }
}

fn changes_graph<S>(
    variable: &ChainedVariable<S>,
    solution: &S,
    sub_chain: &SubChain,
    to: Option<Handle>,
    reversing: bool,
) -> bool {
    variable
        .graph(solution)
        .plan_move(sub_chain, to, reversing)
        .is_ok_and(|plan| !plan.is_empty())
}

/// Writes the planned links one at a time, each inside its own
/// notification bracket. Returns the run head's previous predecessor.
fn splice<S, D>(
    director: &mut D,
    variable: &ChainedVariable<S>,
    sub_chain: &SubChain,
    to: Option<Handle>,
    reversing: bool,
) -> Result<Option<Handle>, ChainError>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + ?Sized,
{
    let plan = variable
        .graph(director.working_solution())
        .plan_move(sub_chain, to, reversing)?;
    for link in plan.links() {
        let entity_index = link.entity.index();
        director.before_variable_changed(variable.descriptor_index(), entity_index, variable.name());
        let written = variable
            .graph_mut(director.working_solution_mut())
            .set_predecessor(link.entity, link.to);
        director.after_variable_changed(variable.descriptor_index(), entity_index, variable.name());
        written?;
    }
    Ok(plan.old_predecessor())
}

impl<S> Clone for Move<S> {
    fn clone(&self) -> Self {
        match self {
            Move::Change {
                variable,
                entity,
                to,
            } => Move::Change {
                variable: *variable,
                entity: *entity,
                to: *to,
            },
            Move::ChainedChange {
                variable,
                entity,
                to,
            } => Move::ChainedChange {
                variable: *variable,
                entity: *entity,
                to: *to,
            },
            Move::ChangePart {
                variable,
                sub_chain,
                to,
            } => Move::ChangePart {
                variable: *variable,
                sub_chain: sub_chain.clone(),
                to: *to,
            },
            Move::ReverseChangePart {
                variable,
                sub_chain,
                to,
            } => Move::ReverseChangePart {
                variable: *variable,
                sub_chain: sub_chain.clone(),
                to: *to,
            },
            Move::Composite(moves) => Move::Composite(moves.clone()),
        }
    }
}

impl<S> PartialEq for Move<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Move::Change {
                    variable: v1,
                    entity: e1,
                    to: t1,
                },
                Move::Change {
                    variable: v2,
                    entity: e2,
                    to: t2,
                },
            ) => v1 == v2 && e1 == e2 && t1 == t2,
            (
                Move::ChainedChange {
                    variable: v1,
                    entity: e1,
                    to: t1,
                },
                Move::ChainedChange {
                    variable: v2,
                    entity: e2,
                    to: t2,
                },
            ) => v1 == v2 && e1 == e2 && t1 == t2,
            (
                Move::ChangePart {
                    variable: v1,
                    sub_chain: s1,
                    to: t1,
                },
                Move::ChangePart {
                    variable: v2,
                    sub_chain: s2,
                    to: t2,
                },
            )
            | (
                Move::ReverseChangePart {
                    variable: v1,
                    sub_chain: s1,
                    to: t1,
                },
                Move::ReverseChangePart {
                    variable: v2,
                    sub_chain: s2,
                    to: t2,
                },
            ) => v1 == v2 && s1 == s2 && t1 == t2,
            (Move::Composite(a), Move::Composite(b)) => a == b,
            _ => false,
        }
    }
}

impl<S> Eq for Move<S> {}

impl<S> Hash for Move<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Move::Change {
                variable,
                entity,
                to,
            } => {
                variable.hash(state);
                entity.hash(state);
                to.hash(state);
            }
            Move::ChainedChange {
                variable,
                entity,
                to,
            } => {
                variable.hash(state);
                entity.hash(state);
                to.hash(state);
            }
            Move::ChangePart {
                variable,
                sub_chain,
                to,
            }
            | Move::ReverseChangePart {
                variable,
                sub_chain,
                to,
            } => {
                variable.hash(state);
                sub_chain.hash(state);
                to.hash(state);
            }
            Move::Composite(moves) => moves.hash(state),
        }
    }
}

impl<S> fmt::Debug for Move<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Change {
                variable,
                entity,
                to,
            } => f
                .debug_struct("Change")
                .field("variable", &variable.name())
                .field("entity", entity)
                .field("to", to)
                .finish(),
            Move::ChainedChange {
                variable,
                entity,
                to,
            } => f
                .debug_struct("ChainedChange")
                .field("variable", &variable.name())
                .field("entity", entity)
                .field("to", to)
                .finish(),
            Move::ChangePart {
                variable,
                sub_chain,
                to,
            } => f
                .debug_struct("ChangePart")
                .field("variable", &variable.name())
                .field("sub_chain", sub_chain)
                .field("to", to)
                .finish(),
            Move::ReverseChangePart {
                variable,
                sub_chain,
                to,
            } => f
                .debug_struct("ReverseChangePart")
                .field("variable", &variable.name())
                .field("sub_chain", sub_chain)
                .field("to", to)
                .finish(),
            Move::Composite(moves) => f.debug_tuple("Composite").field(moves).finish(),
        }
    }
}
