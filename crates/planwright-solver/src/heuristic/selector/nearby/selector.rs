//! Destination selector ranked by distance to a mimicked origin.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use super::{NearbyDistanceMatrix, NearbyDistanceMeter, NearbyRandom};
use crate::heuristic::selector::{
    BoxedSelector, MimicRecorder, SelectionContext, Selector, SelectorError,
};

/// Yields destinations of a finite child ordered by distance to the origin
/// currently recorded under a mimic id.
///
/// In original order a pass walks the ranking of the origin recorded at the
/// start of the pass, nearest first. In random order every draw reads the
/// current origin and picks a rank from the distribution, so the selector
/// never ends.
pub struct NearbySelector<S, T> {
    child: BoxedSelector<S, T>,
    origin: MimicRecorder<T>,
    meter: Arc<dyn NearbyDistanceMeter<S, T>>,
    random: Option<NearbyRandom>,
    limit: Option<usize>,
    matrix: Option<NearbyDistanceMatrix<T>>,
    pass_origin: Option<T>,
    rank: usize,
}

impl<S, T> NearbySelector<S, T>
where
    T: Clone + Eq + Hash,
{
    /// `random` selects the distribution for random order, `None` means
    /// original order. `limit` caps the ranking kept per origin.
    pub fn new(
        child: BoxedSelector<S, T>,
        origin: MimicRecorder<T>,
        meter: Arc<dyn NearbyDistanceMeter<S, T>>,
        random: Option<NearbyRandom>,
        limit: Option<usize>,
    ) -> Result<Self, SelectorError> {
        if child.is_never_ending() {
            return Err(SelectorError::NeverEndingChild("nearby selector"));
        }
        Ok(Self {
            child,
            origin,
            meter,
            random,
            limit,
            matrix: None,
            pass_origin: None,
            rank: 0,
        })
    }

    fn build_matrix(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.restart(ctx);
        let mut destinations = Vec::new();
        while let Some(destination) = self.child.select_next(ctx) {
            destinations.push(destination);
        }
        debug!(
            event = "nearby_matrix",
            origin = self.origin.id(),
            destinations = destinations.len()
        );
        self.matrix = Some(NearbyDistanceMatrix::new(destinations, self.limit));
    }

    fn destination(&mut self, solution: &S, origin: &T, rank: usize) -> Option<T> {
        let meter = &self.meter;
        self.matrix
            .as_mut()?
            .get_destination(origin, rank, |a, b| meter.distance(solution, a, b))
            .cloned()
    }
}

impl<S, T> fmt::Debug for NearbySelector<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbySelector")
            .field("child", &self.child)
            .field("origin", &self.origin)
            .field("random", &self.random)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<S, T> Selector<S> for NearbySelector<S, T>
where
    T: Clone + Eq + Hash + Send + Sync,
{
    type Item = T;

    fn is_never_ending(&self) -> bool {
        self.random.is_some()
    }

    fn size(&self, solution: &S) -> usize {
        match &self.matrix {
            Some(matrix) => matrix.row_len(),
            None => {
                let size = self.child.size(solution);
                self.limit.map_or(size, |limit| limit.min(size))
            }
        }
    }

    fn phase_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.phase_started(ctx);
        self.build_matrix(ctx);
    }

    fn step_started(&mut self, ctx: &mut SelectionContext<'_, S>) {
        self.child.step_started(ctx);
    }

    fn step_ended(&mut self) {
        self.child.step_ended();
    }

    fn phase_ended(&mut self) {
        self.child.phase_ended();
        self.matrix = None;
        self.pass_origin = None;
    }

    fn restart(&mut self, ctx: &mut SelectionContext<'_, S>) {
        if self.matrix.is_none() {
            self.build_matrix(ctx);
        }
        self.rank = 0;
        self.pass_origin = self.origin.recorded();
    }

    fn select_next(&mut self, ctx: &mut SelectionContext<'_, S>) -> Option<T> {
        let solution = ctx.solution();
        match self.random {
            None => {
                let origin = self.pass_origin.clone()?;
                let destination = self.destination(solution, &origin, self.rank)?;
                self.rank += 1;
                Some(destination)
            }
            Some(random) => {
                let origin = self.origin.recorded()?;
                let bound = self.matrix.as_ref()?.row_len();
                if bound == 0 {
                    return None;
                }
                let rank = random.next_index(ctx.rng(), bound);
                self.destination(solution, &origin, rank)
            }
        }
    }
}
