//! Phase-level context.

use std::time::{Duration, Instant};

/// Progress of the running phase.
///
/// Created by a phase when it starts and passed by reference to its
/// terminations and acceptors; dropped when the phase ends.
#[derive(Debug, Clone)]
pub struct PhaseContext<Sc> {
    phase_index: usize,
    phase_type: &'static str,
    start_time: Instant,
    starting_score: Option<Sc>,
    step_count: u64,
    best_score_step: u64,
    last_step_score: Option<Sc>,
}

impl<Sc: Copy> PhaseContext<Sc> {
    pub fn new(phase_index: usize, phase_type: &'static str, starting_score: Option<Sc>) -> Self {
        Self {
            phase_index,
            phase_type,
            start_time: Instant::now(),
            starting_score,
            step_count: 0,
            best_score_step: 0,
            last_step_score: starting_score,
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn phase_type(&self) -> &'static str {
        self.phase_type
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn starting_score(&self) -> Option<&Sc> {
        self.starting_score.as_ref()
    }

    /// Steps completed in this phase.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Steps completed since the best score last improved in this phase.
    pub fn unimproved_step_count(&self) -> u64 {
        self.step_count - self.best_score_step
    }

    /// Score after the last completed step, or the starting score.
    pub fn last_step_score(&self) -> Option<&Sc> {
        self.last_step_score.as_ref()
    }

    /// Records a completed step; `improved_best` marks a new best score.
    pub fn complete_step(&mut self, step_score: Sc, improved_best: bool) {
        self.step_count += 1;
        self.last_step_score = Some(step_score);
        if improved_best {
            self.best_score_step = self.step_count;
        }
    }
}
