//! Typed accessors for the planning variables a move can write.
//!
//! A variable is a name, the descriptor index of its entity class and a pair
//! of plain function pointers into the solution. Two variables are equal when
//! they share descriptor index and name; the accessors are not compared.

use std::fmt;
use std::hash::{Hash, Hasher};

use planwright_core::domain::{ChainGraph, Handle, SubChain};

use super::Move;

/// A plain planning variable holding an optional value index.
pub struct PlainVariable<S> {
    name: &'static str,
    descriptor_index: usize,
    getter: fn(&S, usize) -> Option<usize>,
    setter: fn(&mut S, usize, Option<usize>),
}

impl<S> PlainVariable<S> {
    pub fn new(
        name: &'static str,
        descriptor_index: usize,
        getter: fn(&S, usize) -> Option<usize>,
        setter: fn(&mut S, usize, Option<usize>),
    ) -> Self {
        Self {
            name,
            descriptor_index,
            getter,
            setter,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    /// Current value of `entity`.
    pub fn get(&self, solution: &S, entity: usize) -> Option<usize> {
        (self.getter)(solution, entity)
    }

    /// Raw write without notifications.
    pub(crate) fn set(&self, solution: &mut S, entity: usize, value: Option<usize>) {
        (self.setter)(solution, entity, value)
    }
}

/// A chained planning variable stored in a [`ChainGraph`].
///
/// The entity index reported to the score director is the handle's arena
/// index.
pub struct ChainedVariable<S> {
    name: &'static str,
    descriptor_index: usize,
    graph: fn(&S) -> &ChainGraph,
    graph_mut: fn(&mut S) -> &mut ChainGraph,
}

impl<S> ChainedVariable<S> {
    pub fn new(
        name: &'static str,
        descriptor_index: usize,
        graph: fn(&S) -> &ChainGraph,
        graph_mut: fn(&mut S) -> &mut ChainGraph,
    ) -> Self {
        Self {
            name,
            descriptor_index,
            graph,
            graph_mut,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    pub fn graph<'a>(&self, solution: &'a S) -> &'a ChainGraph {
        (self.graph)(solution)
    }

    pub(crate) fn graph_mut<'a>(&self, solution: &'a mut S) -> &'a mut ChainGraph {
        (self.graph_mut)(solution)
    }
}

macro_rules! impl_variable_identity {
    ($ty:ident) => {
        impl<S> Clone for $ty<S> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<S> Copy for $ty<S> {}

        impl<S> PartialEq for $ty<S> {
            fn eq(&self, other: &Self) -> bool {
                self.descriptor_index == other.descriptor_index && self.name == other.name
            }
        }

        impl<S> Eq for $ty<S> {}

        impl<S> Hash for $ty<S> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.descriptor_index.hash(state);
                self.name.hash(state);
            }
        }

        impl<S> fmt::Debug for $ty<S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("name", &self.name)
                    .field("descriptor_index", &self.descriptor_index)
                    .finish()
            }
        }
    };
}

impl_variable_identity!(PlainVariable);
impl_variable_identity!(ChainedVariable);

/// A variable for which a change move can be built from an entity and a
/// value drawn by selectors.
pub trait ChangeVariable<S>: Copy + fmt::Debug + Send + Sync + 'static {
    type Entity: Copy + fmt::Debug + Send + 'static;
    type Value: Copy + fmt::Debug + Send + 'static;

    fn name(&self) -> &'static str;

    fn change_move(&self, entity: Self::Entity, value: Self::Value) -> Move<S>;
}

impl<S: 'static> ChangeVariable<S> for PlainVariable<S> {
    type Entity = usize;
    type Value = usize;

    fn name(&self) -> &'static str {
        self.name
    }

    fn change_move(&self, entity: usize, value: usize) -> Move<S> {
        Move::Change {
            variable: *self,
            entity,
            to: Some(value),
        }
    }
}

impl<S: 'static> ChangeVariable<S> for ChainedVariable<S> {
    type Entity = Handle;
    type Value = Handle;

    fn name(&self) -> &'static str {
        self.name
    }

    fn change_move(&self, entity: Handle, value: Handle) -> Move<S> {
        Move::ChainedChange {
            variable: *self,
            entity,
            to: Some(value),
        }
    }
}

impl<S: 'static> ChainedVariable<S> {
    /// Move relocating `sub_chain` after `to`, reversed when `reversing`.
    pub fn change_part_move(&self, sub_chain: SubChain, to: Handle, reversing: bool) -> Move<S> {
        if reversing {
            Move::ReverseChangePart {
                variable: *self,
                sub_chain,
                to: Some(to),
            }
        } else {
            Move::ChangePart {
                variable: *self,
                sub_chain,
                to: Some(to),
            }
        }
    }
}
