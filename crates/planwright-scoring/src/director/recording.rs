//! Recording score director for inspecting notification sequences.
//!
//! Wraps another director, forwards everything to it and keeps an ordered
//! log of the change notifications that went through. Comparing the log of
//! a move with the log of its undo move shows whether the undo replays the
//! exact reverse sequence.

use planwright_core::domain::PlanningSolution;

use super::ScoreDirector;

/// One change notification seen by a [`RecordingScoreDirector`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Notification {
    BeforeVariableChanged {
        descriptor_index: usize,
        entity_index: usize,
        variable_name: String,
    },
    AfterVariableChanged {
        descriptor_index: usize,
        entity_index: usize,
        variable_name: String,
    },
    BeforeEntityAdded {
        descriptor_index: usize,
        entity_index: usize,
    },
    AfterEntityAdded {
        descriptor_index: usize,
        entity_index: usize,
    },
}

impl Notification {
    /// `(descriptor_index, entity_index)` of the notified entity.
    pub fn entity(&self) -> (usize, usize) {
        match *self {
            Notification::BeforeVariableChanged {
                descriptor_index,
                entity_index,
                ..
            }
            | Notification::AfterVariableChanged {
                descriptor_index,
                entity_index,
                ..
            }
            | Notification::BeforeEntityAdded {
                descriptor_index,
                entity_index,
            }
            | Notification::AfterEntityAdded {
                descriptor_index,
                entity_index,
            } => (descriptor_index, entity_index),
        }
    }

    /// True for the opening half of a bracket.
    pub fn is_before(&self) -> bool {
        matches!(
            self,
            Notification::BeforeVariableChanged { .. } | Notification::BeforeEntityAdded { .. }
        )
    }
}

/// A score director wrapper that logs every change notification.
pub struct RecordingScoreDirector<'a, S: PlanningSolution> {
    inner: &'a mut dyn ScoreDirector<S>,
    log: Vec<Notification>,
}

impl<'a, S: PlanningSolution> RecordingScoreDirector<'a, S> {
    pub fn new(inner: &'a mut dyn ScoreDirector<S>) -> Self {
        Self {
            inner,
            log: Vec::with_capacity(16),
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.log
    }

    /// Returns the log and starts a fresh one.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.log)
    }

    /// Entities of the `before` notifications, in order.
    pub fn changed_entities(&self) -> Vec<(usize, usize)> {
        self.log
            .iter()
            .filter(|n| n.is_before())
            .map(Notification::entity)
            .collect()
    }

    /// True when every opening notification is closed by a matching one
    /// for the same entity before the next bracket opens.
    pub fn is_balanced(&self) -> bool {
        self.log.len() % 2 == 0
            && self.log.chunks(2).all(|pair| {
                pair[0].is_before() && !pair[1].is_before() && pair[0].entity() == pair[1].entity()
            })
    }
}

impl<S: PlanningSolution> ScoreDirector<S> for RecordingScoreDirector<'_, S> {
    fn working_solution(&self) -> &S {
        self.inner.working_solution()
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.inner.working_solution_mut()
    }

    fn calculate_score(&mut self) -> S::Score {
        self.inner.calculate_score()
    }

    fn clone_working_solution(&self) -> S {
        self.inner.clone_working_solution()
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.log.push(Notification::BeforeVariableChanged {
            descriptor_index,
            entity_index,
            variable_name: variable_name.to_string(),
        });
        self.inner
            .before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.inner
            .after_variable_changed(descriptor_index, entity_index, variable_name);
        self.log.push(Notification::AfterVariableChanged {
            descriptor_index,
            entity_index,
            variable_name: variable_name.to_string(),
        });
    }

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.log.push(Notification::BeforeEntityAdded {
            descriptor_index,
            entity_index,
        });
        self.inner.before_entity_added(descriptor_index, entity_index);
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.after_entity_added(descriptor_index, entity_index);
        self.log.push(Notification::AfterEntityAdded {
            descriptor_index,
            entity_index,
        });
    }

    fn is_working_solution_initialized(&self) -> bool {
        self.inner.is_working_solution_initialized()
    }

    fn calculation_count(&self) -> u64 {
        self.inner.calculation_count()
    }
}
