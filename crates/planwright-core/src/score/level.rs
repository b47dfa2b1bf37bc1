/// Semantic class of a score level.
///
/// Returned by [`Score::level_label`](super::Score::level_label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Must be satisfied for the solution to be feasible.
    Hard,
    /// Optimization objective.
    Soft,
}
