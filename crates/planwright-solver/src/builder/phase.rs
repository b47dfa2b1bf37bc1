use planwright_config::{
    ConstructionHeuristicConfig, LocalSearchConfig, PhaseConfig, SelectionOrder, TerminationConfig,
};
use planwright_core::domain::PlanningSolution;
use planwright_core::score::ParseableScore;
use planwright_core::{PlanwrightError, Result};
use planwright_scoring::ScoreDirector;

use super::registry::{RegisteredVariable, SelectorRegistry};
use super::{AcceptorBuilder, ForagerBuilder, MoveSelectorBuilder, TerminationBuilder};
use crate::phase::construction::{ConstructionHeuristicPhase, Placer};
use crate::phase::localsearch::{LocalSearchDecider, LocalSearchPhase};
use crate::phase::Phase;
use crate::termination::Termination;

/// Builds phases from configuration.
pub struct PhaseBuilder;

impl PhaseBuilder {
    /// `solver_termination` is the termination the phase runs under; a time
    /// gradient may come from it when the phase has none of its own.
    pub fn build<S, D>(
        config: &PhaseConfig,
        registry: &SelectorRegistry<S>,
        solver_termination: Option<&Termination<S::Score>>,
    ) -> Result<Box<dyn Phase<S, D>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
    {
        match config {
            PhaseConfig::ConstructionHeuristic(config) => {
                Ok(Box::new(Self::construction_heuristic(config, registry)?))
            }
            PhaseConfig::LocalSearch(config) => Ok(Box::new(Self::local_search(
                config,
                registry,
                solver_termination,
            )?)),
        }
    }

    pub fn construction_heuristic<S>(
        config: &ConstructionHeuristicConfig,
        registry: &SelectorRegistry<S>,
    ) -> Result<ConstructionHeuristicPhase<S>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
    {
        let placer = placer(registry.variable(config.variable_name.as_deref())?);
        let mut phase = ConstructionHeuristicPhase::new(placer);
        if let Some(termination) = phase_termination(config.termination.as_ref())? {
            phase = phase.with_termination(termination);
        }
        Ok(phase)
    }

    /// Fails when the acceptor needs a time gradient that neither the phase
    /// nor the solver termination can estimate.
    pub fn local_search<S>(
        config: &LocalSearchConfig,
        registry: &SelectorRegistry<S>,
        solver_termination: Option<&Termination<S::Score>>,
    ) -> Result<LocalSearchPhase<S>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
    {
        config.validate().map_err(super::config_error)?;
        let termination = phase_termination(config.termination.as_ref())?;

        let mut selectors = MoveSelectorBuilder::new(registry);
        let move_selector = match &config.move_selector {
            Some(move_selector) => selectors.build(move_selector, SelectionOrder::Random)?,
            None => selectors.build_default(SelectionOrder::Random)?,
        };
        let acceptor = AcceptorBuilder::build::<S>(&config.acceptor.clone().unwrap_or_default())?;
        if acceptor.needs_time_gradient() {
            let supported = termination
                .iter()
                .chain(solver_termination)
                .any(Termination::supports_time_gradient);
            if !supported {
                return Err(PlanwrightError::Config(
                    "simulated annealing needs a phase or solver termination with a time gradient, \
                     such as a time, step count or best score limit"
                        .to_string(),
                ));
            }
        }
        let forager = ForagerBuilder::build(&config.forager.clone().unwrap_or_default(), &acceptor)?;

        let mut decider = LocalSearchDecider::new(move_selector, acceptor, forager);
        if let Some(limit) = config.selected_count_limit {
            decider = decider.with_selected_count_limit(limit);
        }
        let mut phase = LocalSearchPhase::new(decider);
        if let Some(termination) = termination {
            phase = phase.with_termination(termination);
        }
        Ok(phase)
    }

    /// One first fit construction phase per registered variable, then a
    /// local search over all of them.
    pub fn defaults<S, D>(
        registry: &SelectorRegistry<S>,
        solver_termination: Option<&Termination<S::Score>>,
    ) -> Result<Vec<Box<dyn Phase<S, D>>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
    {
        let mut phases: Vec<Box<dyn Phase<S, D>>> = registry
            .variables()
            .iter()
            .map(|variable| {
                Box::new(ConstructionHeuristicPhase::new(placer(variable))) as Box<dyn Phase<S, D>>
            })
            .collect();
        phases.push(Box::new(Self::local_search(
            &LocalSearchConfig::default(),
            registry,
            solver_termination,
        )?));
        Ok(phases)
    }
}

fn placer<S>(variable: &RegisteredVariable<S>) -> Placer<S> {
    match variable {
        RegisteredVariable::Plain {
            variable,
            entity_count,
            value_count,
        } => Placer::plain(*variable, *entity_count, *value_count),
        RegisteredVariable::Chained { variable, .. } => Placer::chained(*variable),
    }
}

fn phase_termination<Sc: ParseableScore>(
    config: Option<&TerminationConfig>,
) -> Result<Option<Termination<Sc>>> {
    match config {
        Some(config) => TerminationBuilder::build(config),
        None => Ok(None),
    }
}
