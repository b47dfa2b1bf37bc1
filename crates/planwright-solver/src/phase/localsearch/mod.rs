//! Local search phase.
//!
//! Improves an initialized solution by applying one move per step. A step
//! draws candidates from the move selector, scores each one, asks the
//! [`Acceptor`] whether it may be taken and lets the
//! [`AcceptedCountForager`] pick the winner among the accepted ones.

mod acceptor;
mod decider;
mod forager;
mod phase;


pub use acceptor::{Acceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor, TabuAcceptor};
pub use decider::LocalSearchDecider;
pub use forager::AcceptedCountForager;
pub use phase::LocalSearchPhase;
