//! Tests for terminations and their time gradients.

use std::time::Duration;

use planwright_config::CompositionStyle;
use planwright_core::score::{HardSoftScore, SimpleScore};

use super::*;
use crate::scope::{PhaseContext, SolverScope};
use crate::test_utils::{nqueens_scope, uninitialized_nqueens_director};

fn progress(step_count: u64) -> TerminationProgress<SimpleScore> {
    TerminationProgress {
        elapsed: Duration::ZERO,
        step_count,
        unimproved_step_count: 0,
        starting_score: None,
        best_score: None,
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn step_count_gradient_clamps_at_one() {
    let termination = Termination::<SimpleScore>::StepCount { limit: 100 };
    assert!(!termination.is_terminated(&progress(40)));
    assert_eq!(termination.time_gradient(&progress(40)), 0.4);
    assert!(termination.is_terminated(&progress(100)));
    assert_eq!(termination.time_gradient(&progress(100)), 1.0);
    assert_eq!(termination.time_gradient(&progress(250)), 1.0);
}

#[test]
fn unimproved_step_count_has_no_gradient() {
    let termination = Termination::<SimpleScore>::UnimprovedStepCount { limit: 3 };
    let mut p = progress(10);
    p.unimproved_step_count = 2;
    assert!(!termination.is_terminated(&p));
    p.unimproved_step_count = 3;
    assert!(termination.is_terminated(&p));
    assert_eq!(termination.time_gradient(&p), UNSUPPORTED_TIME_GRADIENT);
    assert!(!termination.supports_time_gradient());
}

#[test]
fn time_spent() {
    let termination = Termination::<SimpleScore>::TimeSpent {
        limit: Duration::from_secs(10),
    };
    let mut p = progress(0);
    p.elapsed = Duration::from_secs(4);
    assert!(!termination.is_terminated(&p));
    assert_close(termination.time_gradient(&p), 0.4);
    p.elapsed = Duration::from_secs(12);
    assert!(termination.is_terminated(&p));
    assert_eq!(termination.time_gradient(&p), 1.0);
}

#[test]
fn score_attained() {
    let termination = Termination::ScoreAttained {
        target: SimpleScore::of(0),
    };
    let mut p = progress(0);
    assert!(!termination.is_terminated(&p));
    assert_eq!(termination.time_gradient(&p), 0.0);

    p.starting_score = Some(SimpleScore::of(-10));
    p.best_score = Some(SimpleScore::of(-4));
    assert!(!termination.is_terminated(&p));
    assert_close(termination.time_gradient(&p), 0.6);

    p.best_score = Some(SimpleScore::of(0));
    assert!(termination.is_terminated(&p));
    p.best_score = Some(SimpleScore::of(3));
    assert!(termination.is_terminated(&p));
    assert_eq!(termination.time_gradient(&p), 1.0);
}

#[test]
fn simple_score_gradient() {
    let gradient = |start: i64, end: i64, score: i64| {
        score_time_gradient(
            &SimpleScore::of(start),
            &SimpleScore::of(end),
            &SimpleScore::of(score),
        )
    };
    assert_eq!(gradient(0, 10, 0), 0.0);
    assert_close(gradient(0, 10, 6), 0.6);
    assert_eq!(gradient(0, 10, 10), 1.0);
    assert_eq!(gradient(0, 10, 11), 1.0);
    assert_close(gradient(-10, 30, 0), 0.25);
    assert_close(gradient(10, 40, 20), 0.33333);
}

#[test]
fn hard_soft_score_gradient() {
    let gradient = |start: (i64, i64), end: (i64, i64), score: (i64, i64)| {
        score_time_gradient(
            &HardSoftScore::of(start.0, start.1),
            &HardSoftScore::of(end.0, end.1),
            &HardSoftScore::of(score.0, score.1),
        )
    };
    let (start, end) = ((-20, -400), (-10, -300));
    assert_close(gradient(start, end, (-14, -340)), 0.6);
    // Hard reached, soft not moved.
    assert_close(gradient(start, end, (-10, -400)), 0.75);
    // Hard not moved, soft reached.
    assert_close(gradient(start, end, (-20, -300)), 0.25);
    // Soft below its start earns nothing.
    assert_close(gradient(start, end, (-10, -900)), 0.75);
    // Hard below its start earns nothing for either level.
    assert_close(gradient(start, end, (-90, -300)), 0.0);
    assert_close(gradient(end, end, end), 1.0);
    assert_close(gradient(start, end, start), 0.0);

    // Hard level already at its target.
    let (start, end) = ((-10, -400), (-10, -300));
    assert_close(gradient(start, end, (-10, -340)), 0.75 + 0.6 * 0.25);
    assert_close(gradient(start, end, (-20, -340)), 0.0);
    // Beating the hard target beats the target outright.
    assert_close(gradient(start, end, (0, -340)), 1.0);

    // Soft level already at its target.
    let (start, end) = ((-20, -300), (-10, -300));
    assert_close(gradient(start, end, (-14, -300)), 0.6 * 0.75 + 0.25);
    assert_close(gradient(start, end, (-14, -400)), 0.6 * 0.75);
    assert_close(gradient(start, end, (-14, 0)), 0.6 * 0.75 + 0.25);
}

#[test]
fn and_or_composites() {
    let steps = Termination::<SimpleScore>::StepCount { limit: 10 };
    let unimproved = Termination::UnimprovedStepCount { limit: 2 };

    let mut p = progress(5);
    p.unimproved_step_count = 2;
    let and = Termination::combine(CompositionStyle::And, vec![steps.clone(), unimproved.clone()]);
    let or = Termination::combine(CompositionStyle::Or, vec![steps.clone(), unimproved.clone()]);
    assert!(!and.is_terminated(&p));
    assert!(or.is_terminated(&p));

    // Composites ignore the unsupported child.
    assert_close(and.time_gradient(&p), 0.5);
    assert_close(or.time_gradient(&p), 0.5);
    assert!(and.supports_time_gradient());

    p.step_count = 10;
    assert!(and.is_terminated(&p));
}

#[test]
fn composite_gradient_is_the_minimum() {
    let composite = Termination::combine(
        CompositionStyle::Or,
        vec![
            Termination::StepCount { limit: 10 },
            Termination::TimeSpent {
                limit: Duration::from_secs(10),
            },
        ],
    );
    let mut p = progress(8);
    p.elapsed = Duration::from_secs(3);
    assert_close(composite.time_gradient(&p), 0.3);

    p.step_count = 30;
    p.elapsed = Duration::from_secs(30);
    assert_eq!(composite.time_gradient(&p), 1.0);
}

#[test]
fn combine_unwraps_a_single_child() {
    let only = Termination::<SimpleScore>::StepCount { limit: 3 };
    assert_eq!(
        Termination::combine(CompositionStyle::And, vec![only.clone()]),
        only
    );
}

#[test]
fn empty_composites_never_terminate() {
    let and = Termination::<SimpleScore>::And(Vec::new());
    let or = Termination::<SimpleScore>::Or(Vec::new());
    assert!(!and.is_terminated(&progress(1_000)));
    assert!(!or.is_terminated(&progress(1_000)));
    assert_eq!(and.time_gradient(&progress(0)), UNSUPPORTED_TIME_GRADIENT);
    assert!(!or.supports_time_gradient());
}

#[test]
fn min_time_gradient_skips_unsupported() {
    assert_eq!(min_time_gradient([0.7, -1.0, 0.2]), 0.2);
    assert_eq!(min_time_gradient([-1.0]), UNSUPPORTED_TIME_GRADIENT);
    assert_eq!(min_time_gradient([3.0]), 1.0);
}

#[test]
fn progress_snapshots_from_scopes() {
    let mut scope = nqueens_scope(&[0, 1, 2, 3]);
    scope.increment_step_count();
    scope.increment_step_count();

    let solver = TerminationProgress::of_solver(&scope);
    assert_eq!(solver.step_count, 2);
    assert_eq!(solver.unimproved_step_count, 2);
    assert_eq!(solver.starting_score, Some(SimpleScore::of(-6)));
    assert_eq!(solver.best_score, Some(SimpleScore::of(-6)));

    let mut phase = PhaseContext::new(1, "local_search", Some(SimpleScore::of(-6)));
    phase.complete_step(SimpleScore::of(-6), false);
    let phase_progress = TerminationProgress::of_phase(&scope, &phase);
    assert_eq!(phase_progress.step_count, 1);
    assert_eq!(phase_progress.unimproved_step_count, 1);
}

#[test]
fn uninitialized_best_score_never_attains_a_target() {
    let mut scope = SolverScope::with_seed(uninitialized_nqueens_director(4), 0);
    scope.start_solving();
    let target = Termination::ScoreAttained {
        target: SimpleScore::of(0),
    };

    let progress = TerminationProgress::of_solver(&scope);
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
    assert_eq!(progress.best_score, None);
    assert!(!target.is_terminated(&progress));
}
