//! Simple score director with full recalculation.

use std::fmt;

use planwright_core::domain::PlanningSolution;

use super::traits::ScoreDirector;

/// A score director that recalculates the full score from scratch.
///
/// The calculator is stored as a generic type parameter. The score is cached
/// until the next variable change notification. Notifications are counted so
/// that an unbalanced `before`/`after` pair is caught in debug builds before
/// a score is calculated.
///
/// # Example
///
/// ```
/// use planwright_core::{PlanningSolution, SimpleScore};
/// use planwright_scoring::{ScoreDirector, SimpleScoreDirector};
///
/// #[derive(Clone)]
/// struct Counter { value: i64, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Counter {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// let mut director = SimpleScoreDirector::new(
///     Counter { value: 3, score: None },
///     |c: &Counter| SimpleScore::of(-c.value),
/// );
/// assert_eq!(director.calculate_score(), SimpleScore::of(-3));
///
/// director.before_variable_changed(0, 0, "value");
/// director.working_solution_mut().value = 1;
/// director.after_variable_changed(0, 0, "value");
/// assert_eq!(director.calculate_score(), SimpleScore::of(-1));
/// assert_eq!(director.calculation_count(), 2);
/// ```
pub struct SimpleScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    score_calculator: C,
    score_dirty: bool,
    cached_score: Option<S::Score>,
    open_notifications: usize,
    calculation_count: u64,
}

impl<S, C> SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score,
{
    pub fn new(solution: S, score_calculator: C) -> Self {
        SimpleScoreDirector {
            working_solution: solution,
            score_calculator,
            score_dirty: true,
            cached_score: None,
            open_notifications: 0,
            calculation_count: 0,
        }
    }

    /// True when every `before_variable_changed` has its matching `after`.
    pub fn is_notification_balanced(&self) -> bool {
        self.open_notifications == 0
    }

    /// Consumes the director and returns the working solution.
    pub fn into_working_solution(self) -> S {
        self.working_solution
    }
}

impl<S, C> ScoreDirector<S> for SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.score_dirty = true;
        &mut self.working_solution
    }

    fn calculate_score(&mut self) -> S::Score {
        debug_assert!(
            self.is_notification_balanced(),
            "score calculated inside an open variable change"
        );
        if !self.score_dirty {
            if let Some(score) = self.cached_score {
                return score;
            }
        }
        let score = (self.score_calculator)(&self.working_solution);
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        self.score_dirty = false;
        self.calculation_count += 1;
        score
    }

    fn clone_working_solution(&self) -> S {
        self.working_solution.clone()
    }

    fn before_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        self.open_notifications += 1;
        self.score_dirty = true;
    }

    fn after_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        self.open_notifications = self.open_notifications.saturating_sub(1);
    }

    fn before_entity_added(&mut self, _descriptor_index: usize, _entity_index: usize) {
        self.open_notifications += 1;
        self.score_dirty = true;
    }

    fn after_entity_added(&mut self, _descriptor_index: usize, _entity_index: usize) {
        self.open_notifications = self.open_notifications.saturating_sub(1);
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }
}

impl<S: PlanningSolution, C> fmt::Debug for SimpleScoreDirector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleScoreDirector")
            .field("score_dirty", &self.score_dirty)
            .field("cached_score", &self.cached_score)
            .field("open_notifications", &self.open_notifications)
            .field("calculation_count", &self.calculation_count)
            .finish()
    }
}
