//! Score director implementations.
//!
//! - [`SimpleScoreDirector`] - full recalculation with a cached score
//! - [`RecordingScoreDirector`] - wrapper that logs change notifications

mod simple;
mod traits;

pub mod recording;

#[cfg(test)]
mod tests;

pub use recording::{Notification, RecordingScoreDirector};
pub use simple::SimpleScoreDirector;
pub use traits::ScoreDirector;
