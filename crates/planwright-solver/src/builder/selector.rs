//! Move selectors and their entity, value and sub-chain children built from
//! configuration.

use planwright_config::{
    ChangeMoveSelectorConfig, MoveSelectorConfig, NearbySelectionConfig, SelectionOrder,
    SelectorConfig, SubChainChangeMoveSelectorConfig,
};
use planwright_core::domain::{PlanningSolution, SubChain};
use planwright_core::{PlanwrightError, Result};
use tracing::debug;

use super::config_error;
use super::registry::{MimicRecorders, RegisteredVariable, SelectorItem, SelectorRegistry, Source};
use crate::heuristic::selector::{
    CachingSelector, ChangeMoveSelector, FilteringSelector, FromSolutionSelector,
    MimicRecordingSelector, MimicReplayingSelector, NearbyRandom, NearbySelector,
    ProbabilitySelector, SelectedCountLimitSelector, ShufflingSelector, SortingSelector,
    SubChainChangeMoveSelector, SubChainSelector, UnionSelector,
};
use crate::heuristic::{BoxedSelector, Move};

/// Builds the move selector of one phase.
///
/// Selector ids are scoped to the builder: a selector may mimic, or use as
/// nearby origin, any selector with an id built before it by the same
/// builder.
pub struct MoveSelectorBuilder<'r, S> {
    registry: &'r SelectorRegistry<S>,
    recorders: MimicRecorders,
}

impl<'r, S: PlanningSolution> MoveSelectorBuilder<'r, S> {
    pub fn new(registry: &'r SelectorRegistry<S>) -> Self {
        Self {
            registry,
            recorders: MimicRecorders::new(),
        }
    }

    /// Builds `config`, whose selectors inherit `inherited` as their order.
    pub fn build(
        &mut self,
        config: &MoveSelectorConfig,
        inherited: SelectionOrder,
    ) -> Result<BoxedSelector<S, Move<S>>> {
        config.validate(inherited).map_err(config_error)?;
        self.build_move_selector(config, inherited)
    }

    /// A change move selector per registered variable, joined in a union
    /// when there is more than one.
    pub fn build_default(&mut self, inherited: SelectionOrder) -> Result<BoxedSelector<S, Move<S>>> {
        let registry = self.registry;
        let mut children = registry
            .variables()
            .iter()
            .map(|variable| self.change_move_selector(variable, None, None, inherited))
            .collect::<Result<Vec<_>>>()?;
        match children.len() {
            0 => Err(PlanwrightError::Config(
                "no planning variable is registered".to_string(),
            )),
            1 => Ok(children.remove(0)),
            _ => Ok(Box::new(UnionSelector::new(
                children,
                inherited == SelectionOrder::Random,
            ))),
        }
    }

    fn build_move_selector(
        &mut self,
        config: &MoveSelectorConfig,
        inherited: SelectionOrder,
    ) -> Result<BoxedSelector<S, Move<S>>> {
        match config {
            MoveSelectorConfig::ChangeMoveSelector(config) => self.change(config, inherited),
            MoveSelectorConfig::SubChainChangeMoveSelector(config) => {
                self.sub_chain_change(config, inherited)
            }
            MoveSelectorConfig::UnionMoveSelector(config) => {
                let children = config
                    .selectors
                    .iter()
                    .map(|child| self.build_move_selector(child, inherited))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(UnionSelector::new(
                    children,
                    inherited == SelectionOrder::Random,
                )))
            }
        }
    }

    fn change(
        &mut self,
        config: &ChangeMoveSelectorConfig,
        inherited: SelectionOrder,
    ) -> Result<BoxedSelector<S, Move<S>>> {
        let registry = self.registry;
        let variable = registry.variable(config.variable_name.as_deref())?;
        self.change_move_selector(
            variable,
            config.entity_selector.as_ref(),
            config.value_selector.as_ref(),
            inherited,
        )
    }

    fn change_move_selector(
        &mut self,
        variable: &RegisteredVariable<S>,
        entity_config: Option<&SelectorConfig>,
        value_config: Option<&SelectorConfig>,
        inherited: SelectionOrder,
    ) -> Result<BoxedSelector<S, Move<S>>> {
        let random = inherited == SelectionOrder::Random;
        let selector: BoxedSelector<S, Move<S>> = match variable {
            RegisteredVariable::Plain {
                variable,
                entity_count,
                value_count,
            } => {
                let entities =
                    self.leaf(Source::indices(*entity_count), entity_config, inherited)?;
                let values = self.leaf(Source::indices(*value_count), value_config, inherited)?;
                Box::new(ChangeMoveSelector::new(*variable, entities, values, random))
            }
            RegisteredVariable::Chained {
                variable,
                entities,
                values,
            } => {
                let entities = self.leaf(*entities, entity_config, inherited)?;
                let values = self.leaf(*values, value_config, inherited)?;
                Box::new(ChangeMoveSelector::new(*variable, entities, values, random))
            }
        };
        debug!(
            event = "move_selector_built",
            kind = "change",
            variable = variable.name(),
            random,
        );
        Ok(selector)
    }

    fn sub_chain_change(
        &mut self,
        config: &SubChainChangeMoveSelectorConfig,
        inherited: SelectionOrder,
    ) -> Result<BoxedSelector<S, Move<S>>> {
        let registry = self.registry;
        let RegisteredVariable::Chained {
            variable, values, ..
        } = registry.variable(config.variable_name.as_deref())?
        else {
            return Err(PlanwrightError::Config(format!(
                "sub_chain_change_move_selector needs a chained variable, got {:?}",
                config.variable_name
            )));
        };

        let default = SelectorConfig::default();
        let sub_chain_config = config.sub_chain_selector.as_ref().unwrap_or(&default);
        let cache_type = sub_chain_config.resolved_cache_type();
        let order = sub_chain_config.resolved_order(inherited);
        let sub_chains: BoxedSelector<S, SubChain> = match order {
            SelectionOrder::Shuffled => Box::new(ShufflingSelector::new(
                SubChainSelector::new(
                    *variable,
                    config.minimum_size(),
                    config.maximum_size(),
                    cache_type,
                    false,
                )?,
                cache_type,
            )?),
            _ => Box::new(SubChainSelector::new(
                *variable,
                config.minimum_size(),
                config.maximum_size(),
                cache_type,
                order == SelectionOrder::Random,
            )?),
        };
        let values = self.leaf(*values, config.value_selector.as_ref(), inherited)?;
        let random = inherited == SelectionOrder::Random;
        debug!(
            event = "move_selector_built",
            kind = "sub_chain_change",
            variable = variable.name(),
            minimum = config.minimum_size(),
            random,
        );
        Ok(Box::new(SubChainChangeMoveSelector::new(
            *variable,
            sub_chains,
            values,
            config.select_reversing_move_too.unwrap_or(true),
            random,
        )))
    }

    /// An entity or value selector over `source`, decorated as `config`
    /// asks.
    ///
    /// Decorators wrap in a fixed order: nearby ranking of the source,
    /// filtering, the ordering decorator or cache, the count limit and
    /// finally mimic recording, so a recorded candidate is exactly what
    /// this selector yields.
    pub fn leaf<T: SelectorItem<S>>(
        &mut self,
        source: Source<S, T>,
        config: Option<&SelectorConfig>,
        inherited: SelectionOrder,
    ) -> Result<BoxedSelector<S, T>> {
        let default = SelectorConfig::default();
        let config = config.unwrap_or(&default);
        config.validate(inherited).map_err(config_error)?;

        if let Some(id) = &config.mimic_selector_ref {
            let recorder = self.recorders.get::<S, T>(id)?;
            return Ok(Box::new(MimicReplayingSelector::new(recorder)));
        }

        let cache_type = config.resolved_cache_type();
        let order = config.resolved_order(inherited);
        let random = order == SelectionOrder::Random;
        let registry = self.registry;
        let plugins = registry.plugins::<T>();

        let mut selector: BoxedSelector<S, T> = match &config.nearby_selection {
            Some(nearby) => {
                let destinations: BoxedSelector<S, T> =
                    Box::new(FromSolutionSelector::new(source.count, source.at, false));
                self.nearby(destinations, nearby, random)?
            }
            None => Box::new(FromSolutionSelector::new(
                source.count,
                source.at,
                random && !cache_type.is_cached(),
            )),
        };
        if let Some(name) = &config.filter {
            selector = Box::new(FilteringSelector::new(selector, plugins.filter(name)?));
        }
        selector = match order {
            SelectionOrder::Sorted => {
                let name = config.sorter.as_deref().unwrap_or_default();
                Box::new(SortingSelector::new(
                    selector,
                    cache_type,
                    plugins.sorter(name)?,
                    config.sorter_order.unwrap_or_default(),
                )?)
            }
            SelectionOrder::Probabilistic => {
                let name = config.probability_weight.as_deref().unwrap_or_default();
                Box::new(ProbabilitySelector::new(
                    selector,
                    cache_type,
                    plugins.probability_weight(name)?,
                )?)
            }
            SelectionOrder::Shuffled => Box::new(ShufflingSelector::new(selector, cache_type)?),
            _ if cache_type.is_cached() => {
                Box::new(CachingSelector::new(selector, cache_type, random)?)
            }
            _ => selector,
        };
        if let Some(limit) = config.selected_count_limit {
            selector = Box::new(SelectedCountLimitSelector::new(selector, limit));
        }
        if let Some(id) = &config.id {
            let recorder = self.recorders.create::<S, T>(id)?;
            selector = Box::new(MimicRecordingSelector::new(selector, recorder));
        }
        Ok(selector)
    }

    fn nearby<T: SelectorItem<S>>(
        &mut self,
        destinations: BoxedSelector<S, T>,
        config: &NearbySelectionConfig,
        random: bool,
    ) -> Result<BoxedSelector<S, T>> {
        let origin_id = config.origin_selector_ref.as_deref().unwrap_or_default();
        let origin = self.recorders.get::<S, T>(origin_id)?;
        let meter_name = config.distance_meter.as_deref().unwrap_or_default();
        let registry = self.registry;
        let meter = registry.plugins::<T>().distance_meter(meter_name)?;
        let distribution = if random {
            Some(NearbyRandom::from_config(config)?)
        } else {
            None
        };
        Ok(Box::new(NearbySelector::new(
            destinations,
            origin,
            meter,
            distribution,
            None,
        )?))
    }
}
