//! Core domain traits

use crate::score::Score;

/// A planning solution: the problem facts, the planning entities and the
/// score of their current assignment.
///
/// # Example
///
/// ```
/// use planwright_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct NQueens {
///     rows: Vec<Option<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for NQueens {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
///
///     fn is_initialized(&self) -> bool {
///         self.rows.iter().all(Option::is_some)
///     }
/// }
/// ```
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the last calculated score, if any.
    fn score(&self) -> Option<Self::Score>;

    fn set_score(&mut self, score: Option<Self::Score>);

    /// Returns true once every planning variable is assigned.
    fn is_initialized(&self) -> bool {
        true
    }
}
