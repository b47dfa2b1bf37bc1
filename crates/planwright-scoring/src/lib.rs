//! Score director contract for Planwright.
//!
//! The search engine never computes scores. It mutates the working solution
//! through a [`ScoreDirector`], announcing every planning variable write, and
//! asks the director for the resulting score.

pub mod director;

pub use director::{Notification, RecordingScoreDirector, ScoreDirector, SimpleScoreDirector};
