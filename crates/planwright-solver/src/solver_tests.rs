use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use planwright_config::{EnvironmentMode, PickEarlyType};
use planwright_core::score::SimpleScore;
use planwright_core::{PlanningSolution, PlanwrightError, Result};

use super::*;
use crate::event::{CountingEventListener, EventKind};
use crate::heuristic::{BoxedSelector, ChangeMoveSelector, FromSolutionSelector, Move};
use crate::phase::construction::{ConstructionHeuristicPhase, Placer};
use crate::phase::localsearch::{
    AcceptedCountForager, Acceptor, LocalSearchDecider, LocalSearchPhase, TabuAcceptor,
};
use crate::test_utils::{
    calculate_conflicts, nqueens_director, queen_count, row_count, row_variable,
    uninitialized_nqueens_director, NQueensDirector, NQueensSolution,
};

type NQueensSolver = Solver<NQueensSolution, NQueensDirector>;

fn construction() -> ConstructionHeuristicPhase<NQueensSolution> {
    ConstructionHeuristicPhase::new(Placer::plain(row_variable(), queen_count, row_count))
}

fn local_search(random: bool) -> LocalSearchPhase<NQueensSolution> {
    let moves: BoxedSelector<NQueensSolution, Move<NQueensSolution>> =
        Box::new(ChangeMoveSelector::new(
            row_variable(),
            Box::new(FromSolutionSelector::indices(queen_count, random)),
            Box::new(FromSolutionSelector::indices(row_count, random)),
            random,
        ));
    LocalSearchPhase::new(LocalSearchDecider::new(
        moves,
        Acceptor::EntityTabu(TabuAcceptor::new(2, false)),
        AcceptedCountForager::new(1000, PickEarlyType::Never),
    ))
}

/// Raises the early termination flag as soon as it runs.
#[derive(Debug)]
struct InterruptPhase {
    flag: Arc<AtomicBool>,
}

impl Phase<NQueensSolution, NQueensDirector> for InterruptPhase {
    fn solve(
        &mut self,
        _: &mut SolverScope<NQueensSolution, NQueensDirector>,
        _: usize,
    ) -> Result<()> {
        self.flag.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "interrupt"
    }
}

#[test]
fn construction_then_local_search() {
    let mut solver = NQueensSolver::new()
        .with_phase(construction())
        .with_phase(local_search(false))
        .with_termination(Termination::Or(vec![
            Termination::ScoreAttained {
                target: SimpleScore::of(0),
            },
            Termination::StepCount { limit: 200 },
        ]))
        .with_random_seed(Some(5));
    assert_eq!(
        solver.phase_type_names(),
        vec!["construction_heuristic", "local_search"]
    );

    let best = solver.solve(uninitialized_nqueens_director(6)).unwrap();

    assert!(best.is_initialized());
    assert_eq!(best.score, Some(calculate_conflicts(&best)));
    assert!(!solver.is_solving());
}

#[test]
fn solver_termination_skips_remaining_phases() {
    let counter = Arc::new(CountingEventListener::new());
    let mut solver = NQueensSolver::new()
        .with_phase(construction())
        .with_phase(local_search(false))
        .with_termination(Termination::StepCount { limit: 4 });
    solver.events_mut().add_listener(counter.clone());

    let best = solver.solve(uninitialized_nqueens_director(4)).unwrap();

    assert!(best.is_initialized());
    assert_eq!(counter.count(EventKind::PhaseStarted), 1);
    assert_eq!(counter.count(EventKind::StepEnded), 4);
    assert_eq!(counter.count(EventKind::SolvingStarted), 1);
    assert_eq!(counter.count(EventKind::SolvingEnded), 1);
}

#[test]
fn early_termination_stops_between_phases() {
    let solver = NQueensSolver::new();
    let flag = solver.terminate_early_flag();
    let mut solver = solver
        .with_phase(InterruptPhase { flag })
        .with_phase(local_search(false));

    let best = solver.solve(nqueens_director(&[0, 1, 2, 3])).unwrap();

    assert_eq!(best.score, Some(SimpleScore::of(-6)));
    assert!(!solver.terminate_early_flag().load(Ordering::SeqCst));
}

#[test]
fn request_before_solving_cancels_once() {
    let mut solver = NQueensSolver::new().with_phase(local_search(false)).with_termination(
        Termination::StepCount { limit: 3 },
    );
    assert!(!solver.terminate_early());

    solver.terminate_early_flag().store(true, Ordering::SeqCst);
    let cancelled = solver.solve(nqueens_director(&[0, 1, 2, 3]));
    assert!(matches!(cancelled, Err(PlanwrightError::Cancelled)));

    let best = solver.solve(nqueens_director(&[0, 1, 2, 3])).unwrap();
    assert!(best.score.unwrap() > SimpleScore::of(-6));
}

#[test]
fn phase_errors_reach_the_caller() {
    let mut solver = NQueensSolver::new()
        .with_phase(local_search(false))
        .with_termination(Termination::StepCount { limit: 3 });

    fn no_rows(_: &NQueensSolution) -> usize {
        0
    }
    let mut stalled = NQueensSolver::new().with_phase(ConstructionHeuristicPhase::new(
        Placer::plain(row_variable(), queen_count, no_rows),
    ));

    assert!(matches!(
        stalled.solve(uninitialized_nqueens_director(3)),
        Err(PlanwrightError::Stall(_))
    ));
    assert!(!stalled.is_solving());
    assert!(solver.solve(nqueens_director(&[0, 0, 0])).is_ok());
}

#[test]
fn same_seed_same_result() {
    let run = || {
        NQueensSolver::new()
            .with_phase(local_search(true))
            .with_termination(Termination::StepCount { limit: 30 })
            .with_environment_mode(EnvironmentMode::Reproducible)
            .with_random_seed(Some(17))
            .solve(nqueens_director(&[0, 0, 0, 0, 0, 0]))
            .unwrap()
    };

    assert_eq!(run().rows(), run().rows());
}
