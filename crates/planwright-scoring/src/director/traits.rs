//! Score director trait definition.

use planwright_core::domain::PlanningSolution;

/// Owns the working solution and turns it into a score.
///
/// This is the only contract the search engine has with score calculation.
/// Every write to a planning variable is bracketed by
/// [`before_variable_changed`](ScoreDirector::before_variable_changed) and
/// [`after_variable_changed`](ScoreDirector::after_variable_changed), and
/// [`calculate_score`](ScoreDirector::calculate_score) is only called once
/// every bracket is closed.
pub trait ScoreDirector<S: PlanningSolution> {
    fn working_solution(&self) -> &S;

    /// Mutable access for the engine; callers notify around every write.
    fn working_solution_mut(&mut self) -> &mut S;

    /// Calculates and returns the score of the working solution.
    fn calculate_score(&mut self) -> S::Score;

    fn clone_working_solution(&self) -> S;

    /// Called before a planning variable of an entity is written.
    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    /// Called after a planning variable of an entity is written.
    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    /// Called before an entity is added to the working solution.
    fn before_entity_added(&mut self, _descriptor_index: usize, _entity_index: usize) {}

    /// Called after an entity is added to the working solution.
    fn after_entity_added(&mut self, _descriptor_index: usize, _entity_index: usize) {}

    fn is_working_solution_initialized(&self) -> bool {
        self.working_solution().is_initialized()
    }

    /// Number of score calculations performed so far.
    fn calculation_count(&self) -> u64 {
        0
    }
}
