use planwright_config::{AcceptorConfig, ForagerConfig};
use planwright_core::domain::PlanningSolution;
use planwright_core::score::ParseableScore;
use planwright_core::{PlanwrightError, Result};

use super::config_error;
use crate::phase::localsearch::{
    AcceptedCountForager, Acceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor,
    TabuAcceptor,
};

/// Accepted count limit of a tabu search step, which evaluates many moves.
const TABU_ACCEPTED_COUNT_LIMIT: usize = 1000;

/// Builds acceptors from configuration.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    /// One acceptor per configured option, combined so that a move must
    /// pass all of them. Nothing configured gives hill climbing.
    pub fn build<S>(config: &AcceptorConfig) -> Result<Acceptor<S>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
    {
        config.validate().map_err(config_error)?;
        let aspiration = config.aspiration_enabled();
        let mut acceptors = Vec::new();

        if let Some(size) = config.entity_tabu_size {
            acceptors.push(Acceptor::EntityTabu(TabuAcceptor::new(size, aspiration)));
        }
        if let Some(size) = config.value_tabu_size {
            acceptors.push(Acceptor::ValueTabu(TabuAcceptor::new(size, aspiration)));
        }
        if let Some(size) = config.move_tabu_size {
            acceptors.push(Acceptor::MoveTabu(TabuAcceptor::new(size, aspiration)));
        }
        if let Some(size) = config.undo_move_tabu_size {
            acceptors.push(Acceptor::UndoMoveTabu(TabuAcceptor::new(size, aspiration)));
        }
        if let Some(literal) = &config.simulated_annealing_starting_temperature {
            let temperature = S::Score::parse(literal).map_err(|e| {
                PlanwrightError::Config(format!(
                    "simulated_annealing_starting_temperature ({literal}): {e}"
                ))
            })?;
            acceptors.push(Acceptor::SimulatedAnnealing(
                SimulatedAnnealingAcceptor::new(temperature)?,
            ));
        }
        if let Some(size) = config.late_acceptance_size {
            acceptors.push(Acceptor::LateAcceptance(LateAcceptanceAcceptor::new(
                size,
                config.late_acceptance_hill_climbing(),
            )));
        }
        Ok(Acceptor::combine(acceptors))
    }
}

/// Builds foragers from configuration.
pub struct ForagerBuilder;

impl ForagerBuilder {
    /// Without a configured limit a tabu acceptor gets a large one and
    /// every other acceptor takes the first accepted move.
    pub fn build<S: PlanningSolution>(
        config: &ForagerConfig,
        acceptor: &Acceptor<S>,
    ) -> Result<AcceptedCountForager<S>> {
        config.validate().map_err(config_error)?;
        let limit = config.accepted_count_limit.unwrap_or(if acceptor.has_tabu() {
            TABU_ACCEPTED_COUNT_LIMIT
        } else {
            1
        });
        Ok(AcceptedCountForager::new(
            limit,
            config.pick_early_type.unwrap_or_default(),
        ))
    }
}
