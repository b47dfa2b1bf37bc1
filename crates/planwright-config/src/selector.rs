//! Selector configuration.
//!
//! Selectors are described as data: cache scope, order and the names of
//! filter, sorter, probability weight and distance meter plugins, which are
//! resolved against a registry when the selector is built.

use serde::{Deserialize, Serialize};

use crate::nearby::NearbySelectionConfig;
use crate::ConfigError;

/// When a selector materializes its candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCacheType {
    /// Candidates are produced on demand and never stored.
    #[default]
    JustInTime,
    /// Candidates are materialized at the start of each step.
    Step,
    /// Candidates are materialized once at the start of the phase.
    Phase,
}

impl SelectionCacheType {
    pub fn is_cached(self) -> bool {
        self != SelectionCacheType::JustInTime
    }
}

/// Order in which a selector yields its candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Use the order of the enclosing selector or phase.
    #[default]
    Inherit,
    Original,
    /// Independent uniform draw per request; never ends.
    Random,
    /// One random permutation of the cached candidates per pass.
    Shuffled,
    /// Cached candidates ordered by a sorter.
    Sorted,
    /// Roulette-wheel draws over the cached candidates; never ends.
    Probabilistic,
}

impl SelectionOrder {
    pub fn resolve(self, inherited: SelectionOrder) -> SelectionOrder {
        match self {
            SelectionOrder::Inherit => inherited,
            order => order,
        }
    }

    pub fn from_random_selection(random: bool) -> SelectionOrder {
        if random {
            SelectionOrder::Random
        } else {
            SelectionOrder::Original
        }
    }

    /// True for orders that need a materialized candidate list.
    pub fn requires_cache(self) -> bool {
        matches!(
            self,
            SelectionOrder::Shuffled | SelectionOrder::Sorted | SelectionOrder::Probabilistic
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// An entity or value selector.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SelectorConfig {
    /// Makes this selector a mimic recording source under that id.
    pub id: Option<String>,
    /// Replays the picks of the recording selector with that id.
    pub mimic_selector_ref: Option<String>,
    pub cache_type: Option<SelectionCacheType>,
    pub selection_order: Option<SelectionOrder>,
    pub filter: Option<String>,
    pub sorter: Option<String>,
    pub sorter_order: Option<SortOrder>,
    pub probability_weight: Option<String>,
    pub selected_count_limit: Option<usize>,
    pub nearby_selection: Option<NearbySelectionConfig>,
}

impl SelectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mimic(id: impl Into<String>) -> Self {
        Self {
            mimic_selector_ref: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_cache_type(mut self, cache_type: SelectionCacheType) -> Self {
        self.cache_type = Some(cache_type);
        self
    }

    pub fn with_selection_order(mut self, order: SelectionOrder) -> Self {
        self.selection_order = Some(order);
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(name.into());
        self
    }

    pub fn with_sorter(mut self, name: impl Into<String>, order: SortOrder) -> Self {
        self.sorter = Some(name.into());
        self.sorter_order = Some(order);
        self
    }

    pub fn with_probability_weight(mut self, name: impl Into<String>) -> Self {
        self.probability_weight = Some(name.into());
        self
    }

    pub fn with_selected_count_limit(mut self, limit: usize) -> Self {
        self.selected_count_limit = Some(limit);
        self
    }

    pub fn with_nearby_selection(mut self, nearby: NearbySelectionConfig) -> Self {
        self.nearby_selection = Some(nearby);
        self
    }

    pub fn resolved_cache_type(&self) -> SelectionCacheType {
        self.cache_type.unwrap_or_default()
    }

    pub fn resolved_order(&self, inherited: SelectionOrder) -> SelectionOrder {
        self.selection_order.unwrap_or_default().resolve(inherited)
    }

    /// Names of the properties set next to `mimic_selector_ref`.
    fn properties_besides_mimic(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        let checks: [(&'static str, bool); 9] = [
            ("id", self.id.is_some()),
            ("cache_type", self.cache_type.is_some()),
            ("selection_order", self.selection_order.is_some()),
            ("filter", self.filter.is_some()),
            ("sorter", self.sorter.is_some()),
            ("sorter_order", self.sorter_order.is_some()),
            ("probability_weight", self.probability_weight.is_some()),
            ("selected_count_limit", self.selected_count_limit.is_some()),
            ("nearby_selection", self.nearby_selection.is_some()),
        ];
        for (name, present) in checks {
            if present {
                set.push(name);
            }
        }
        set
    }

    /// Checks the cache, order and plugin combination.
    ///
    /// `inherited` is the order used when `selection_order` is absent or
    /// `inherit`.
    pub fn validate(&self, inherited: SelectionOrder) -> Result<(), ConfigError> {
        if let Some(reference) = &self.mimic_selector_ref {
            let extra = self.properties_besides_mimic();
            if !extra.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "selector with mimic_selector_ref ({}) cannot also set {}",
                    reference,
                    extra.join(", ")
                )));
            }
            return Ok(());
        }

        let cache_type = self.resolved_cache_type();
        let order = self.resolved_order(inherited);
        if order.requires_cache() && !cache_type.is_cached() {
            return Err(ConfigError::Invalid(format!(
                "selection_order {:?} needs a cached selector, but cache_type is {:?}",
                order, cache_type
            )));
        }
        match (order, self.sorter.is_some()) {
            (SelectionOrder::Sorted, false) => {
                return Err(ConfigError::Invalid(
                    "selection_order sorted needs a sorter".to_string(),
                ))
            }
            (o, true) if o != SelectionOrder::Sorted => {
                return Err(ConfigError::Invalid(format!(
                    "sorter is only allowed with selection_order sorted, not {:?}",
                    o
                )))
            }
            _ => {}
        }
        match (order, self.probability_weight.is_some()) {
            (SelectionOrder::Probabilistic, false) => {
                return Err(ConfigError::Invalid(
                    "selection_order probabilistic needs a probability_weight".to_string(),
                ))
            }
            (o, true) if o != SelectionOrder::Probabilistic => {
                return Err(ConfigError::Invalid(format!(
                    "probability_weight is only allowed with selection_order probabilistic, not {:?}",
                    o
                )))
            }
            _ => {}
        }
        if let Some(nearby) = &self.nearby_selection {
            if cache_type.is_cached() {
                return Err(ConfigError::Invalid(format!(
                    "nearby selection cannot be cached (cache_type {:?})",
                    cache_type
                )));
            }
            if !matches!(order, SelectionOrder::Original | SelectionOrder::Random) {
                return Err(ConfigError::Invalid(format!(
                    "nearby selection needs selection_order original or random, not {:?}",
                    order
                )));
            }
            nearby.validate(order == SelectionOrder::Random)?;
        }
        Ok(())
    }
}

/// A move selector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSelectorConfig {
    /// Changes one planning variable of one entity, plain or chained.
    ChangeMoveSelector(ChangeMoveSelectorConfig),
    /// Moves a run of chained entities, optionally reversed.
    SubChainChangeMoveSelector(SubChainChangeMoveSelectorConfig),
    /// Draws from several move selectors.
    UnionMoveSelector(UnionMoveSelectorConfig),
}

impl MoveSelectorConfig {
    pub fn validate(&self, inherited: SelectionOrder) -> Result<(), ConfigError> {
        match self {
            MoveSelectorConfig::ChangeMoveSelector(config) => config.validate(inherited),
            MoveSelectorConfig::SubChainChangeMoveSelector(config) => config.validate(inherited),
            MoveSelectorConfig::UnionMoveSelector(config) => {
                if config.selectors.is_empty() {
                    return Err(ConfigError::Invalid(
                        "union_move_selector needs at least one child selector".to_string(),
                    ));
                }
                config
                    .selectors
                    .iter()
                    .try_for_each(|child| child.validate(inherited))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ChangeMoveSelectorConfig {
    /// Registered variable name; may be omitted when exactly one is registered.
    pub variable_name: Option<String>,
    pub entity_selector: Option<SelectorConfig>,
    pub value_selector: Option<SelectorConfig>,
}

impl ChangeMoveSelectorConfig {
    pub fn validate(&self, inherited: SelectionOrder) -> Result<(), ConfigError> {
        if let Some(entity) = &self.entity_selector {
            entity.validate(inherited)?;
        }
        if let Some(value) = &self.value_selector {
            value.validate(inherited)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SubChainChangeMoveSelectorConfig {
    pub variable_name: Option<String>,
    pub minimum_sub_chain_size: Option<usize>,
    pub maximum_sub_chain_size: Option<usize>,
    /// Also yields the reversing variant of every move. Defaults to true.
    pub select_reversing_move_too: Option<bool>,
    pub sub_chain_selector: Option<SelectorConfig>,
    pub value_selector: Option<SelectorConfig>,
}

impl SubChainChangeMoveSelectorConfig {
    pub fn minimum_size(&self) -> usize {
        self.minimum_sub_chain_size.unwrap_or(1)
    }

    pub fn maximum_size(&self) -> usize {
        self.maximum_sub_chain_size.unwrap_or(usize::MAX)
    }

    pub fn validate(&self, inherited: SelectionOrder) -> Result<(), ConfigError> {
        if self.minimum_size() < 1 {
            return Err(ConfigError::Invalid(
                "minimum_sub_chain_size must be at least 1".to_string(),
            ));
        }
        if self.maximum_size() < self.minimum_size() {
            return Err(ConfigError::Invalid(format!(
                "maximum_sub_chain_size ({}) is below minimum_sub_chain_size ({})",
                self.maximum_size(),
                self.minimum_size()
            )));
        }
        if let Some(sub_chain) = &self.sub_chain_selector {
            if sub_chain.mimic_selector_ref.is_some()
                || sub_chain.nearby_selection.is_some()
                || sub_chain.probability_weight.is_some()
                || sub_chain.sorter.is_some()
                || sub_chain.filter.is_some()
            {
                return Err(ConfigError::Invalid(
                    "sub_chain_selector only supports cache_type and selection_order".to_string(),
                ));
            }
            sub_chain.validate(inherited)?;
        }
        if let Some(value) = &self.value_selector {
            value.validate(inherited)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct UnionMoveSelectorConfig {
    pub selectors: Vec<MoveSelectorConfig>,
}
