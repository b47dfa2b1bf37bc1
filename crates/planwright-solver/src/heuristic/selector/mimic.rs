//! Mimic selectors for synchronized selection across multiple selectors.
//!
//! A recording selector publishes each candidate it yields through a shared
//! [`MimicRecorder`]. Replaying selectors and nearby selectors read the
//! recorded candidate, which keeps the parts of one move consistent: the
//! value selector of a change move can, for example, rank its values by
//! distance to the entity the entity selector just picked.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use super::{SelectionCacheType, SelectionContext, Selector};

/// Shared slot holding the last candidate of a recording selector.
#[derive(Clone)]
pub struct MimicRecorder<T> {
    id: Arc<str>,
    recorded: Arc<RwLock<Option<T>>>,
}

impl<T: Clone> MimicRecorder<T> {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            recorded: Arc::new(RwLock::new(None)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn record(&self, item: T) {
        *self.recorded.write().unwrap_or_else(PoisonError::into_inner) = Some(item);
    }

    /// The last recorded candidate, if the recording selector yielded one
    /// since its last restart.
    pub fn recorded(&self) -> Option<T> {
        self.recorded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        *self.recorded.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<T> fmt::Debug for MimicRecorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimicRecorder").field("id", &self.id).finish()
    }
}

/// Wraps a child selector and records every candidate it yields.
pub struct MimicRecordingSelector<S, C: Selector<S>> {
    child: C,
    recorder: MimicRecorder<C::Item>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C> MimicRecordingSelector<S, C>
where
    C: Selector<S>,
    C::Item: Clone,
{
    pub fn new(child: C, recorder: MimicRecorder<C::Item>) -> Self {
        Self {
            child,
            recorder,
            _phantom: PhantomData,
        }
    }

    /// The recorder shared with replaying selectors.
    pub fn recorder(&self) -> MimicRecorder<C::Item> {
        self.recorder.clone()
    }
}

impl<S, C: Selector<S>> fmt::Debug for MimicRecordingSelector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimicRecordingSelector")
            .field("child", &self.child)
            .field("recorder_id", &self.recorder.id)
            .finish()
    }
}

impl<S, C> Selector<S> for MimicRecordingSelector<S, C>
where
    C: Selector<S>,
    C::Item: Clone + Send + Sync,
{
    type Item = C::Item;

    fn cache_type(&self) -> SelectionCacheType {
        self.child.cache_type()
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
    }

    fn size(&self, solution: &S) -> usize {
        self.child.size(solution)
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.phase_started(ctx);
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.step_started(ctx);
    }

    fn step_ended(&mut self) {
        self.child.step_ended();
    }

    fn phase_ended(&mut self) {
        self.child.phase_ended();
        self.recorder.clear();
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.recorder.clear();
        self.child.restart(ctx);
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<C::Item> {
        let item = self.child.select_next(ctx)?;
        self.recorder.record(item.clone());
        Some(item)
    }
}

/// Yields the candidate currently recorded by a [`MimicRecordingSelector`],
/// once per pass.
pub struct MimicReplayingSelector<T> {
    recorder: MimicRecorder<T>,
    replayed: bool,
}

impl<T> MimicReplayingSelector<T> {
    pub fn new(recorder: MimicRecorder<T>) -> Self {
        Self {
            recorder,
            replayed: false,
        }
    }
}

impl<T> fmt::Debug for MimicReplayingSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimicReplayingSelector")
            .field("recorder_id", &self.recorder.id)
            .field("replayed", &self.replayed)
            .finish()
    }
}

impl<S, T> Selector<S> for MimicReplayingSelector<T>
where
    T: Clone + Send + Sync,
{
    type Item = T;

    fn is_never_ending(&self) -> bool {
        false
    }

    fn size(&self, _solution: &S) -> usize {
        1
    }

    fn restart(&mut self, _ctx: &mut SelectionContext<'_, S>) {
        self.replayed = false;
    }

    fn select_next(&mut self, _ctx: &mut SelectionContext<'_, S>) -> Option<T> {
        if self.replayed {
            return None;
        }
        let item = self.recorder.recorded()?;
        self.replayed = true;
        Some(item)
    }
}
