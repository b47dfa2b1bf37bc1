//! Nearby selection: destinations ranked by distance to an origin.
//!
//! The origin is the candidate another selector just picked, read through
//! a [`MimicRecorder`](super::MimicRecorder). A [`NearbyDistanceMatrix`]
//! caches the ranking per origin and a [`NearbyRandom`] distribution biases
//! random draws towards the nearest ranks.

mod matrix;
mod random;
mod selector;

pub use matrix::NearbyDistanceMatrix;
pub use random::NearbyRandom;
pub use selector::NearbySelector;

/// Measures the distance from an origin to a destination.
///
/// Distances need not be symmetric. Implemented for any closure of the
/// same shape, so registering a meter is usually a one-liner.
pub trait NearbyDistanceMeter<S, T>: Send + Sync {
    fn distance(&self, solution: &S, origin: &T, destination: &T) -> f64;
}

impl<S, T, F> NearbyDistanceMeter<S, T> for F
where
    F: Fn(&S, &T, &T) -> f64 + Send + Sync,
{
    fn distance(&self, solution: &S, origin: &T, destination: &T) -> f64 {
        self(solution, origin, destination)
    }
}
