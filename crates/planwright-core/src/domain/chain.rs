//! Arena of chained planning entities.
//!
//! A chained planning variable points at a predecessor, which is either an
//! anchor or another entity. Following predecessors from any assigned entity
//! always ends at exactly one anchor, and every node has at most one
//! successor. [`ChainGraph`] stores the predecessor of every node by stable
//! [`Handle`] and keeps a successor index in sync on every write, so trailing
//! lookups never scan the arena.
//!
//! Mutation happens in two stages. [`ChainGraph::plan_move`] validates a
//! requested relocation and computes the exact set of links that change,
//! without touching the graph. The caller then writes those links one at a
//! time, which lets the move layer bracket each write with score director
//! notifications.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Stable address of a node in a [`ChainGraph`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(usize);

impl Handle {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Handle(index)
    }

    /// Position of the node in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a node is a chain root or a movable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Anchor,
    Entity,
}

/// A chain operation was rejected or a chain invariant is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("unknown handle {0}")]
    UnknownHandle(Handle),

    #[error("anchor {0} cannot be moved")]
    AnchorNotMovable(Handle),

    #[error("placing {moving} after {destination} would create a cycle")]
    Cycle { moving: Handle, destination: Handle },

    #[error("{0} is not connected to an anchor")]
    Detached(Handle),

    #[error("sub-chain is not contiguous at {0}")]
    NonContiguous(Handle),

    #[error("sub-chain is empty")]
    EmptySubChain,

    #[error("{0} has more than one successor")]
    DuplicateSuccessor(Handle),

    #[error("successor index is stale at {0}")]
    StaleSuccessor(Handle),

    #[error("anchor {0} has a predecessor")]
    AnchorWithPredecessor(Handle),
}

/// A contiguous, non-empty run of chained entities in chain order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubChain {
    entities: Vec<Handle>,
}

impl SubChain {
    /// Creates a sub-chain from entities listed head first.
    ///
    /// Contiguity is checked against a graph when the sub-chain is moved.
    pub fn new(entities: Vec<Handle>) -> Result<Self, ChainError> {
        if entities.is_empty() {
            return Err(ChainError::EmptySubChain);
        }
        Ok(SubChain { entities })
    }

    pub fn single(entity: Handle) -> Self {
        SubChain {
            entities: vec![entity],
        }
    }

    pub fn first(&self) -> Handle {
        self.entities[0]
    }

    pub fn last(&self) -> Handle {
        self.entities[self.entities.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// A sub-chain is never empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entities.contains(&handle)
    }

    pub fn entities(&self) -> &[Handle] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entities.iter().copied()
    }

    /// The same entities, tail first.
    pub fn reversed(&self) -> SubChain {
        let mut entities = self.entities.clone();
        entities.reverse();
        SubChain { entities }
    }
}

impl fmt::Debug for SubChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entities).finish()
    }
}

/// One predecessor write computed by [`ChainGraph::plan_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkChange {
    pub entity: Handle,
    pub from: Option<Handle>,
    pub to: Option<Handle>,
}

/// The predecessor writes that realise a relocation, in application order.
///
/// Only links whose value actually changes are listed, and each entity
/// appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicePlan {
    old_predecessor: Option<Handle>,
    links: Vec<LinkChange>,
}

impl SplicePlan {
    /// Predecessor of the moved run's head before the move.
    pub fn old_predecessor(&self) -> Option<Handle> {
        self.old_predecessor
    }

    pub fn links(&self) -> &[LinkChange] {
        &self.links
    }

    /// True when the relocation would leave the graph unchanged.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    kind: NodeKind,
    predecessor: Option<Handle>,
}

/// Arena of anchors and chained entities.
///
/// # Example
///
/// ```
/// use planwright_core::domain::{ChainGraph, SubChain};
///
/// let mut graph = ChainGraph::new();
/// let depot = graph.add_anchor();
/// let a = graph.add_entity();
/// let b = graph.add_entity();
/// let c = graph.add_entity();
/// graph.append(depot, &[a, b, c]).unwrap();
///
/// let plan = graph.plan_move(&SubChain::single(c), Some(depot), false).unwrap();
/// assert_eq!(plan.links().len(), 2);
/// graph.apply_plan(&plan).unwrap();
/// assert_eq!(graph.trailing_chain(depot), vec![c, a, b]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainGraph {
    nodes: Vec<Node>,
    successor_of: HashMap<Handle, Handle>,
}

impl ChainGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_anchor(&mut self) -> Handle {
        self.push(NodeKind::Anchor)
    }

    /// Adds an unassigned entity.
    pub fn add_entity(&mut self) -> Handle {
        self.push(NodeKind::Entity)
    }

    fn push(&mut self, kind: NodeKind) -> Handle {
        let handle = Handle(self.nodes.len());
        self.nodes.push(Node {
            kind,
            predecessor: None,
        });
        handle
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        handle.0 < self.nodes.len()
    }

    pub fn kind(&self, handle: Handle) -> Option<NodeKind> {
        self.nodes.get(handle.0).map(|node| node.kind)
    }

    pub fn is_anchor(&self, handle: Handle) -> bool {
        self.kind(handle) == Some(NodeKind::Anchor)
    }

    pub fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle.0).and_then(|node| node.predecessor)
    }

    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        self.successor_of.get(&handle).copied()
    }

    pub fn anchors(&self) -> impl Iterator<Item = Handle> + '_ {
        self.handles_of(NodeKind::Anchor)
    }

    pub fn entities(&self) -> impl Iterator<Item = Handle> + '_ {
        self.handles_of(NodeKind::Entity)
    }

    fn handles_of(&self, kind: NodeKind) -> impl Iterator<Item = Handle> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.kind == kind)
            .map(|(i, _)| Handle(i))
    }

    /// Number of entities without a predecessor.
    pub fn unassigned_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Entity && node.predecessor.is_none())
            .count()
    }

    /// Follows predecessors up to the anchor.
    ///
    /// Returns the handle itself for an anchor and `None` for unassigned or
    /// detached entities.
    pub fn anchor_of(&self, handle: Handle) -> Option<Handle> {
        let mut current = handle;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(current.0)? {
                Node {
                    kind: NodeKind::Anchor,
                    ..
                } => return Some(current),
                Node {
                    predecessor: Some(predecessor),
                    ..
                } => current = *predecessor,
                _ => return None,
            }
        }
        None
    }

    /// Entities following `start`, nearest first.
    pub fn trailing_chain(&self, start: Handle) -> Vec<Handle> {
        let mut chain = Vec::new();
        let mut current = start;
        while let Some(next) = self.successor(current) {
            if chain.len() >= self.nodes.len() {
                break;
            }
            chain.push(next);
            current = next;
        }
        chain
    }

    /// Writes a single predecessor link and returns the previous value.
    ///
    /// This is the raw primitive used while a plan is being applied; it does
    /// not check the chain invariant, which may be transiently broken
    /// between the writes of one plan. The successor index stays exact as
    /// long as each entity is written at most once per plan.
    pub fn set_predecessor(
        &mut self,
        entity: Handle,
        predecessor: Option<Handle>,
    ) -> Result<Option<Handle>, ChainError> {
        if let Some(p) = predecessor {
            if !self.contains(p) {
                return Err(ChainError::UnknownHandle(p));
            }
        }
        let node = self
            .nodes
            .get_mut(entity.0)
            .ok_or(ChainError::UnknownHandle(entity))?;
        if node.kind == NodeKind::Anchor {
            return Err(ChainError::AnchorNotMovable(entity));
        }
        let old = std::mem::replace(&mut node.predecessor, predecessor);
        if let Some(p) = old {
            if self.successor_of.get(&p) == Some(&entity) {
                self.successor_of.remove(&p);
            }
        }
        if let Some(p) = predecessor {
            self.successor_of.insert(p, entity);
        }
        Ok(old)
    }

    /// Appends unassigned entities, in order, after the end of the chain
    /// that `start` belongs to.
    pub fn append(&mut self, start: Handle, entities: &[Handle]) -> Result<(), ChainError> {
        let mut last = self.trailing_chain(start).last().copied().unwrap_or(start);
        for &entity in entities {
            let plan = self.plan_move(&SubChain::single(entity), Some(last), false)?;
            self.apply_plan(&plan)?;
            last = entity;
        }
        Ok(())
    }

    /// Computes the link writes that relocate `sub_chain` after `to`.
    ///
    /// With `to == None` the run is unassigned. With `reversing` the run is
    /// inserted tail first. The graph is not modified; the result lists only
    /// links that change, ordered as: the old trailing entity, the run
    /// (tail first when reversing), then the new trailing entity. In an
    /// in-place reversal the old and new trailing entity coincide; its link
    /// leads when the run's head has the lower handle and closes otherwise.
    ///
    /// Rejected before anything is written: unknown handles, anchors in the
    /// run, a non-contiguous run, a destination inside the run, and a
    /// destination that is not connected to an anchor.
    pub fn plan_move(
        &self,
        sub_chain: &SubChain,
        to: Option<Handle>,
        reversing: bool,
    ) -> Result<SplicePlan, ChainError> {
        for entity in sub_chain.iter() {
            match self.kind(entity) {
                None => return Err(ChainError::UnknownHandle(entity)),
                Some(NodeKind::Anchor) => return Err(ChainError::AnchorNotMovable(entity)),
                Some(NodeKind::Entity) => {}
            }
        }
        for pair in sub_chain.entities().windows(2) {
            if self.predecessor(pair[1]) != Some(pair[0]) {
                return Err(ChainError::NonContiguous(pair[1]));
            }
        }
        let head = sub_chain.first();
        let tail = sub_chain.last();
        if let Some(destination) = to {
            if !self.contains(destination) {
                return Err(ChainError::UnknownHandle(destination));
            }
            if sub_chain.contains(destination) {
                return Err(ChainError::Cycle {
                    moving: head,
                    destination,
                });
            }
            if self.anchor_of(destination).is_none() {
                return Err(ChainError::Detached(destination));
            }
        }

        let old_predecessor = self.predecessor(head);
        let old_trailing = self.successor(tail);
        if !reversing && to == old_predecessor {
            return Ok(SplicePlan {
                old_predecessor,
                links: Vec::new(),
            });
        }
        let new_trailing = match to {
            None => None,
            Some(_) if to == old_predecessor => old_trailing,
            Some(destination) => self.successor(destination),
        };

        let mut writes: Vec<(Handle, Option<Handle>)> = Vec::with_capacity(sub_chain.len() + 2);
        if let Some(trailing) = old_trailing {
            write_link(&mut writes, trailing, old_predecessor);
        }
        let inserted_last = if reversing {
            write_link(&mut writes, tail, to);
            let run = sub_chain.entities();
            for i in (0..run.len() - 1).rev() {
                write_link(&mut writes, run[i], Some(run[i + 1]));
            }
            head
        } else {
            write_link(&mut writes, head, to);
            tail
        };
        if let Some(trailing) = new_trailing {
            write_link(&mut writes, trailing, Some(inserted_last));
        }
        // An in-place reversal and its undo have the same shape, so the
        // trailing link goes first or last by run orientation. Applying the
        // undo then writes the links in exactly the reverse order.
        if reversing && to == old_predecessor && old_trailing.is_some() && head > tail {
            writes.rotate_left(1);
        }

        let links = writes
            .into_iter()
            .filter_map(|(entity, value)| {
                let current = self.predecessor(entity);
                (current != value).then_some(LinkChange {
                    entity,
                    from: current,
                    to: value,
                })
            })
            .collect();
        Ok(SplicePlan {
            old_predecessor,
            links,
        })
    }

    /// Writes every link of `plan` without notifications.
    pub fn apply_plan(&mut self, plan: &SplicePlan) -> Result<(), ChainError> {
        for link in plan.links() {
            self.set_predecessor(link.entity, link.to)?;
        }
        Ok(())
    }

    /// Checks the full chain invariant and the successor index.
    pub fn validate(&self) -> Result<(), ChainError> {
        let mut seen: HashMap<Handle, Handle> = HashMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(predecessor) = node.predecessor else {
                continue;
            };
            if node.kind == NodeKind::Anchor {
                return Err(ChainError::AnchorWithPredecessor(Handle(i)));
            }
            if seen.insert(predecessor, Handle(i)).is_some() {
                return Err(ChainError::DuplicateSuccessor(predecessor));
            }
        }
        for (&predecessor, &entity) in &seen {
            if self.successor(predecessor) != Some(entity) {
                return Err(ChainError::StaleSuccessor(predecessor));
            }
            if self.anchor_of(entity).is_none() {
                return Err(ChainError::Detached(entity));
            }
        }
        if let Some(stale) = self.successor_of.keys().find(|key| !seen.contains_key(key)) {
            return Err(ChainError::StaleSuccessor(*stale));
        }
        Ok(())
    }
}

fn write_link(writes: &mut Vec<(Handle, Option<Handle>)>, entity: Handle, value: Option<Handle>) {
    match writes.iter_mut().find(|(e, _)| *e == entity) {
        Some(slot) => slot.1 = value,
        None => writes.push((entity, value)),
    }
}
