//! Tests for scope types.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use planwright_core::score::SimpleScore;
use planwright_scoring::ScoreDirector;

use super::*;
use crate::event::{CountingEventListener, EventKind, SolverEventSupport};
use crate::heuristic::{ChangeVariable, FromSolutionSelector, Selector};
use crate::termination::Termination;
use crate::test_utils::{
    nqueens_director, nqueens_scope, queen_count, row_variable, uninitialized_nqueens_director,
};

#[test]
fn start_solving_scores_the_working_solution() {
    let listener = Arc::new(CountingEventListener::new());
    let mut events = SolverEventSupport::new();
    events.add_solver_listener(listener.clone());

    let mut scope =
        SolverScope::with_seed(nqueens_director(&[1, 3, 0, 2]), 7).with_events(events);
    scope.start_solving();

    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
    assert_eq!(scope.starting_score(), Some(&SimpleScore::of(0)));
    assert_eq!(
        scope.best_solution().and_then(|s| s.score),
        Some(SimpleScore::of(0))
    );
    assert_eq!(listener.count(EventKind::SolvingStarted), 1);
    assert_eq!(listener.count(EventKind::BestSolutionChanged), 0);
}

#[test]
fn best_solution_only_moves_on_strict_improvement() {
    let mut scope = nqueens_scope(&[0, 1, 2, 3]);
    let variable = row_variable();

    scope.increment_step_count();
    variable
        .change_move(0, 2)
        .apply(scope.score_director_mut())
        .unwrap();
    let score = scope.calculate_score();
    assert!(score > SimpleScore::of(-6));
    assert!(scope.update_best_solution(score));
    assert_eq!(scope.best_score(), Some(&score));
    assert_eq!(scope.best_score_step(), 1);

    scope.increment_step_count();
    assert!(!scope.update_best_solution(score));
    assert_eq!(scope.best_score_step(), 1);
}

#[test]
fn initialized_solution_beats_uninitialized_one() {
    let mut scope = SolverScope::with_seed(uninitialized_nqueens_director(2), 3);
    scope.start_solving();
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
    assert_eq!(scope.starting_score(), None);

    let variable = row_variable();
    variable.change_move(0, 0).apply(scope.score_director_mut()).unwrap();
    let half = scope.calculate_score();
    assert!(!scope.update_best_solution(half));

    variable.change_move(1, 0).apply(scope.score_director_mut()).unwrap();
    let full = scope.calculate_score();
    assert_eq!(full, SimpleScore::of(-1));
    assert!(scope.update_best_solution(full));
    assert_eq!(scope.starting_score(), Some(&SimpleScore::of(-1)));
    assert!(scope
        .best_solution()
        .is_some_and(|s| s.rows() == vec![Some(0), Some(0)]));
}

#[test]
fn solver_termination_and_early_flag() {
    let mut scope = SolverScope::with_seed(nqueens_director(&[0, 1, 2, 3]), 1)
        .with_termination(Termination::StepCount { limit: 2 });
    scope.start_solving();
    assert!(!scope.is_solver_terminated());
    assert_eq!(scope.solver_time_gradient(), 0.0);

    scope.increment_step_count();
    assert_eq!(scope.solver_time_gradient(), 0.5);
    scope.increment_step_count();
    assert!(scope.is_solver_terminated());

    let flag = Arc::new(AtomicBool::new(true));
    let mut idle = SolverScope::with_seed(nqueens_director(&[0, 1]), 1);
    idle.start_solving();
    assert!(!idle.is_solver_terminated());
    idle.set_terminate_early_flag(flag);
    assert!(idle.is_solver_terminated());
}

#[test]
fn selection_context_reads_the_working_solution() {
    let mut scope = nqueens_scope(&[0, 1, 2]);
    let mut queens = FromSolutionSelector::indices(queen_count, false);
    let mut ctx = scope.selection_context();
    queens.restart(&mut ctx);
    let drawn: Vec<usize> = std::iter::from_fn(|| queens.select_next(&mut ctx)).collect();
    assert_eq!(drawn, vec![0, 1, 2]);
}

#[test]
fn phase_context_counts_unimproved_steps() {
    let mut phase = PhaseContext::new(0, "local_search", Some(SimpleScore::of(-5)));
    assert_eq!(phase.last_step_score(), Some(&SimpleScore::of(-5)));

    phase.complete_step(SimpleScore::of(-4), true);
    phase.complete_step(SimpleScore::of(-4), false);
    phase.complete_step(SimpleScore::of(-6), false);
    assert_eq!(phase.step_count(), 3);
    assert_eq!(phase.unimproved_step_count(), 2);
    assert_eq!(phase.last_step_score(), Some(&SimpleScore::of(-6)));

    phase.complete_step(SimpleScore::of(-3), true);
    assert_eq!(phase.unimproved_step_count(), 0);
}

#[test]
fn director_is_reachable_through_the_scope() {
    let scope = nqueens_scope(&[1, 3, 0, 2]);
    assert!(scope.score_director().is_working_solution_initialized());
    assert!(scope.elapsed() < std::time::Duration::from_secs(60));
}
