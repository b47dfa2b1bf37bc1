//! Acceptors decide which evaluated moves a local search step may pick.
//!
//! Every acceptor sees the candidate move, its score and the running
//! [`StepContext`]. A [`Acceptor::Composite`] accepts only what all of its
//! parts accept, so tabu can be layered over late acceptance, for example.

mod late_acceptance;
mod simulated_annealing;
mod tabu;


use std::fmt;

use planwright_core::domain::PlanningSolution;
use rand::rngs::StdRng;

pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;
pub use tabu::TabuAcceptor;

use crate::heuristic::{Move, PlanningRef};
use crate::scope::StepContext;

/// A move acceptance policy.
pub enum Acceptor<S: PlanningSolution> {
    /// Accepts moves not worse than the last step score.
    HillClimbing,
    /// Rejects moves touching an entity that a recent step moved.
    EntityTabu(TabuAcceptor<PlanningRef>),
    /// Rejects moves assigning a value that a recent step assigned.
    ValueTabu(TabuAcceptor<PlanningRef>),
    /// Rejects moves equal to a recent step move.
    MoveTabu(TabuAcceptor<Move<S>>),
    /// Rejects moves that would revert a recent step.
    UndoMoveTabu(TabuAcceptor<Move<S>>),
    SimulatedAnnealing(SimulatedAnnealingAcceptor<S::Score>),
    LateAcceptance(LateAcceptanceAcceptor<S::Score>),
    /// Accepts what every part accepts.
    Composite(Vec<Acceptor<S>>),
}

impl<S: PlanningSolution> Acceptor<S> {
    /// Joins acceptors: none gives hill climbing, one is returned as is.
    pub fn combine(mut acceptors: Vec<Acceptor<S>>) -> Self {
        match acceptors.len() {
            0 => Acceptor::HillClimbing,
            1 => acceptors.remove(0),
            _ => Acceptor::Composite(acceptors),
        }
    }

    /// True when this acceptor reads the phase time gradient.
    pub fn needs_time_gradient(&self) -> bool {
        match self {
            Acceptor::SimulatedAnnealing(_) => true,
            Acceptor::Composite(parts) => parts.iter().any(Acceptor::needs_time_gradient),
            _ => false,
        }
    }

    pub fn has_tabu(&self) -> bool {
        match self {
            Acceptor::EntityTabu(_)
            | Acceptor::ValueTabu(_)
            | Acceptor::MoveTabu(_)
            | Acceptor::UndoMoveTabu(_) => true,
            Acceptor::Composite(parts) => parts.iter().any(Acceptor::has_tabu),
            _ => false,
        }
    }

    pub fn phase_started(&mut self, starting_score: S::Score) {
        match self {
            Acceptor::HillClimbing => {}
            Acceptor::EntityTabu(tabu) | Acceptor::ValueTabu(tabu) => tabu.clear(),
            Acceptor::MoveTabu(tabu) | Acceptor::UndoMoveTabu(tabu) => tabu.clear(),
            Acceptor::SimulatedAnnealing(annealing) => annealing.phase_started(),
            Acceptor::LateAcceptance(late) => late.phase_started(starting_score),
            Acceptor::Composite(parts) => parts
                .iter_mut()
                .for_each(|part| part.phase_started(starting_score)),
        }
    }

    pub fn step_started(&mut self, step: &StepContext<S::Score>) {
        match self {
            Acceptor::HillClimbing | Acceptor::LateAcceptance(_) => {}
            Acceptor::EntityTabu(tabu) | Acceptor::ValueTabu(tabu) => {
                tabu.step_started(step.step_index)
            }
            Acceptor::MoveTabu(tabu) | Acceptor::UndoMoveTabu(tabu) => {
                tabu.step_started(step.step_index)
            }
            Acceptor::SimulatedAnnealing(annealing) => annealing.step_started(step.time_gradient),
            Acceptor::Composite(parts) => parts.iter_mut().for_each(|part| part.step_started(step)),
        }
    }

    /// Whether `candidate`, scored `move_score`, may be picked in this step.
    pub fn is_accepted(
        &self,
        candidate: &Move<S>,
        move_score: &S::Score,
        step: &StepContext<S::Score>,
        rng: &mut StdRng,
    ) -> bool {
        match self {
            Acceptor::HillClimbing => *move_score >= step.last_step_score,
            Acceptor::EntityTabu(tabu) => {
                tabu.accepts(&candidate.planning_entities(), move_score, &step.best_score)
            }
            Acceptor::ValueTabu(tabu) => {
                tabu.accepts(&candidate.planning_values(), move_score, &step.best_score)
            }
            Acceptor::MoveTabu(tabu) | Acceptor::UndoMoveTabu(tabu) => {
                tabu.accepts([candidate], move_score, &step.best_score)
            }
            Acceptor::SimulatedAnnealing(annealing) => {
                annealing.is_accepted(&step.last_step_score, move_score, rng)
            }
            Acceptor::LateAcceptance(late) => late.is_accepted(&step.last_step_score, move_score),
            Acceptor::Composite(parts) => parts
                .iter()
                .all(|part| part.is_accepted(candidate, move_score, step, rng)),
        }
    }

    /// Records the step: `step_move` was applied and `undo` reverts it.
    pub fn step_ended(&mut self, step: &StepContext<S::Score>, step_move: &Move<S>, undo: &Move<S>) {
        match self {
            Acceptor::HillClimbing | Acceptor::SimulatedAnnealing(_) => {}
            Acceptor::EntityTabu(tabu) => tabu.record(step_move.planning_entities(), step.step_index),
            Acceptor::ValueTabu(tabu) => tabu.record(step_move.planning_values(), step.step_index),
            Acceptor::MoveTabu(tabu) => tabu.record([step_move.clone()], step.step_index),
            Acceptor::UndoMoveTabu(tabu) => tabu.record([undo.clone()], step.step_index),
            Acceptor::LateAcceptance(late) => {
                if let Some(score) = step.step_score {
                    late.step_ended(score);
                }
            }
            Acceptor::Composite(parts) => parts
                .iter_mut()
                .for_each(|part| part.step_ended(step, step_move, undo)),
        }
    }

    pub fn phase_ended(&mut self) {
        match self {
            Acceptor::HillClimbing | Acceptor::SimulatedAnnealing(_) => {}
            Acceptor::EntityTabu(tabu) | Acceptor::ValueTabu(tabu) => tabu.clear(),
            Acceptor::MoveTabu(tabu) | Acceptor::UndoMoveTabu(tabu) => tabu.clear(),
            Acceptor::LateAcceptance(late) => late.phase_ended(),
            Acceptor::Composite(parts) => parts.iter_mut().for_each(Acceptor::phase_ended),
        }
    }
}

impl<S: PlanningSolution> fmt::Debug for Acceptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acceptor::HillClimbing => f.write_str("HillClimbing"),
            Acceptor::EntityTabu(tabu) => f.debug_tuple("EntityTabu").field(tabu).finish(),
            Acceptor::ValueTabu(tabu) => f.debug_tuple("ValueTabu").field(tabu).finish(),
            Acceptor::MoveTabu(tabu) => f.debug_tuple("MoveTabu").field(tabu).finish(),
            Acceptor::UndoMoveTabu(tabu) => f.debug_tuple("UndoMoveTabu").field(tabu).finish(),
            Acceptor::SimulatedAnnealing(annealing) => {
                f.debug_tuple("SimulatedAnnealing").field(annealing).finish()
            }
            Acceptor::LateAcceptance(late) => f.debug_tuple("LateAcceptance").field(late).finish(),
            Acceptor::Composite(parts) => f.debug_tuple("Composite").field(parts).finish(),
        }
    }
}
