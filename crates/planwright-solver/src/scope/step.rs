//! Step-level context.

/// What acceptors and foragers know about the running step.
#[derive(Debug, Clone)]
pub struct StepContext<Sc> {
    pub step_index: u64,
    /// Phase progress in `[0, 1]`, or negative when unknown.
    pub time_gradient: f64,
    /// Score of the working solution when the step started.
    pub last_step_score: Sc,
    pub best_score: Sc,
    pub selected_move_count: u64,
    pub accepted_move_count: u64,
    /// Score of the winning move, once picked.
    pub step_score: Option<Sc>,
}

impl<Sc> StepContext<Sc> {
    pub fn new(step_index: u64, time_gradient: f64, last_step_score: Sc, best_score: Sc) -> Self {
        Self {
            step_index,
            time_gradient,
            last_step_score,
            best_score,
            selected_move_count: 0,
            accepted_move_count: 0,
            step_score: None,
        }
    }
}
