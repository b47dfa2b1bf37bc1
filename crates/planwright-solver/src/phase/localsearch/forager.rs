//! Forager: gathers the accepted moves of a step and picks the winner.

use std::fmt;

use planwright_config::PickEarlyType;
use planwright_core::domain::PlanningSolution;

use crate::heuristic::Move;
use crate::scope::StepContext;

/// Collects accepted moves until `accepted_count_limit` of them arrived or
/// a pick-early rule fires, then picks the best-scoring one. Among equal
/// scores the earliest accepted move wins.
pub struct AcceptedCountForager<S: PlanningSolution> {
    accepted_count_limit: usize,
    pick_early_type: PickEarlyType,
    accepted_count: usize,
    best: Option<(Move<S>, S::Score)>,
    picked_early: bool,
}

impl<S: PlanningSolution> AcceptedCountForager<S> {
    /// A limit of zero is raised to one.
    pub fn new(accepted_count_limit: usize, pick_early_type: PickEarlyType) -> Self {
        Self {
            accepted_count_limit: accepted_count_limit.max(1),
            pick_early_type,
            accepted_count: 0,
            best: None,
            picked_early: false,
        }
    }

    pub fn accepted_count_limit(&self) -> usize {
        self.accepted_count_limit
    }

    pub fn pick_early_type(&self) -> PickEarlyType {
        self.pick_early_type
    }

    pub fn step_started(&mut self) {
        self.accepted_count = 0;
        self.best = None;
        self.picked_early = false;
    }

    pub fn add_move(&mut self, accepted: Move<S>, score: S::Score, step: &StepContext<S::Score>) {
        self.accepted_count += 1;
        self.picked_early = match self.pick_early_type {
            PickEarlyType::Never => false,
            PickEarlyType::FirstBestScoreImproving => score > step.best_score,
            PickEarlyType::FirstLastStepScoreImproving => score > step.last_step_score,
        };
        let improves = self.best.as_ref().map_or(true, |(_, best)| score > *best);
        if improves || self.picked_early {
            self.best = Some((accepted, score));
        }
    }

    /// True once the step does not need more candidates.
    pub fn is_quit_early(&self) -> bool {
        self.picked_early || self.accepted_count >= self.accepted_count_limit
    }

    /// Takes the winning move and its score, if any move was accepted.
    pub fn pick_move(&mut self) -> Option<(Move<S>, S::Score)> {
        self.best.take()
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }
}

impl<S: PlanningSolution> fmt::Debug for AcceptedCountForager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptedCountForager")
            .field("accepted_count_limit", &self.accepted_count_limit)
            .field("pick_early_type", &self.pick_early_type)
            .field("accepted_count", &self.accepted_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::ChangeVariable;
    use crate::test_utils::{row_variable, NQueensSolution};
    use planwright_core::score::SimpleScore;

    fn step(last: i64, best: i64) -> StepContext<SimpleScore> {
        StepContext::new(0, 0.0, SimpleScore::of(last), SimpleScore::of(best))
    }

    fn change(entity: usize, value: usize) -> Move<NQueensSolution> {
        row_variable().change_move(entity, value)
    }

    #[test]
    fn picks_the_best_and_the_earliest_among_ties() {
        let mut forager = AcceptedCountForager::new(10, PickEarlyType::Never);
        let step = step(-5, -5);
        forager.step_started();
        forager.add_move(change(0, 1), SimpleScore::of(-6), &step);
        forager.add_move(change(1, 1), SimpleScore::of(-4), &step);
        forager.add_move(change(2, 1), SimpleScore::of(-4), &step);
        assert!(!forager.is_quit_early());

        let (picked, score) = forager.pick_move().unwrap();
        assert_eq!(picked, change(1, 1));
        assert_eq!(score, SimpleScore::of(-4));
        assert!(forager.pick_move().is_none());
    }

    #[test]
    fn quits_at_the_accepted_count_limit() {
        let mut forager = AcceptedCountForager::new(2, PickEarlyType::Never);
        let step = step(-5, -5);
        forager.step_started();
        forager.add_move(change(0, 1), SimpleScore::of(-9), &step);
        assert!(!forager.is_quit_early());
        forager.add_move(change(0, 2), SimpleScore::of(-8), &step);
        assert!(forager.is_quit_early());
        assert_eq!(forager.accepted_count(), 2);

        forager.step_started();
        assert!(!forager.is_quit_early());
        assert!(forager.pick_move().is_none());
    }

    #[test]
    fn pick_early_on_best_score_improvement() {
        let mut forager = AcceptedCountForager::new(100, PickEarlyType::FirstBestScoreImproving);
        let step = step(-5, -3);
        forager.step_started();
        forager.add_move(change(0, 1), SimpleScore::of(-4), &step);
        assert!(!forager.is_quit_early());
        forager.add_move(change(0, 2), SimpleScore::of(-2), &step);
        assert!(forager.is_quit_early());
        assert_eq!(forager.pick_move().map(|(m, _)| m), Some(change(0, 2)));
    }

    #[test]
    fn pick_early_on_last_step_score_improvement() {
        let mut forager =
            AcceptedCountForager::new(100, PickEarlyType::FirstLastStepScoreImproving);
        let step = step(-5, -3);
        forager.step_started();
        forager.add_move(change(0, 1), SimpleScore::of(-5), &step);
        assert!(!forager.is_quit_early());
        forager.add_move(change(1, 1), SimpleScore::of(-4), &step);
        assert!(forager.is_quit_early());
        assert_eq!(forager.pick_move().map(|(_, s)| s), Some(SimpleScore::of(-4)));
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        let forager = AcceptedCountForager::<NQueensSolution>::new(0, PickEarlyType::Never);
        assert_eq!(forager.accepted_count_limit(), 1);
    }
}
