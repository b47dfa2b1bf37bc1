//! Named variables and selector plugins resolved while building from config.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use planwright_core::domain::Handle;
use planwright_core::{PlanwrightError, Result};

use crate::heuristic::selector::decorator::{SelectionFilter, SelectionWeight};
use crate::heuristic::selector::{MimicRecorder, NearbyDistanceMeter, SelectorError};
use crate::heuristic::{ChainedVariable, PlainVariable};

/// Count and accessor of one solution-defined collection.
pub struct Source<S, T> {
    pub count: fn(&S) -> usize,
    pub at: fn(&S, usize) -> T,
}

impl<S> Source<S, usize> {
    /// The indices `0..count` themselves.
    pub fn indices(count: fn(&S) -> usize) -> Self {
        Self {
            count,
            at: index_at,
        }
    }
}

fn index_at<S>(_: &S, index: usize) -> usize {
    index
}

impl<S, T> Clone for Source<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Source<S, T> {}

/// A planning variable the builders can target by name.
pub enum RegisteredVariable<S> {
    /// Entities and values are the indices `0..entity_count` and
    /// `0..value_count`.
    Plain {
        variable: PlainVariable<S>,
        entity_count: fn(&S) -> usize,
        value_count: fn(&S) -> usize,
    },
    /// `entities` lists the movable chained entities, `values` every
    /// possible predecessor, anchors included.
    Chained {
        variable: ChainedVariable<S>,
        entities: Source<S, Handle>,
        values: Source<S, Handle>,
    },
}

impl<S> RegisteredVariable<S> {
    pub fn name(&self) -> &'static str {
        match self {
            RegisteredVariable::Plain { variable, .. } => variable.name(),
            RegisteredVariable::Chained { variable, .. } => variable.name(),
        }
    }
}

impl<S> fmt::Debug for RegisteredVariable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisteredVariable::Plain { variable, .. } => {
                f.debug_tuple("Plain").field(variable).finish()
            }
            RegisteredVariable::Chained { variable, .. } => {
                f.debug_tuple("Chained").field(variable).finish()
            }
        }
    }
}

/// Filters, sorters, probability weights and distance meters over one
/// candidate type.
pub struct PluginTable<S, T> {
    filters: HashMap<String, SelectionFilter<S, T>>,
    sorters: HashMap<String, SelectionWeight<S, T>>,
    probability_weights: HashMap<String, SelectionWeight<S, T>>,
    distance_meters: HashMap<String, Arc<dyn NearbyDistanceMeter<S, T>>>,
}

impl<S, T> Default for PluginTable<S, T> {
    fn default() -> Self {
        Self {
            filters: HashMap::new(),
            sorters: HashMap::new(),
            probability_weights: HashMap::new(),
            distance_meters: HashMap::new(),
        }
    }
}

fn lookup<V: Clone>(
    table: &HashMap<String, V>,
    kind: &'static str,
    name: &str,
) -> std::result::Result<V, SelectorError> {
    table
        .get(name)
        .cloned()
        .ok_or_else(|| SelectorError::UnknownPlugin {
            kind,
            name: name.to_string(),
        })
}

impl<S, T> PluginTable<S, T> {
    pub fn filter(&self, name: &str) -> std::result::Result<SelectionFilter<S, T>, SelectorError> {
        lookup(&self.filters, "filter", name)
    }

    pub fn sorter(&self, name: &str) -> std::result::Result<SelectionWeight<S, T>, SelectorError> {
        lookup(&self.sorters, "sorter", name)
    }

    pub fn probability_weight(
        &self,
        name: &str,
    ) -> std::result::Result<SelectionWeight<S, T>, SelectorError> {
        lookup(&self.probability_weights, "probability weight", name)
    }

    pub fn distance_meter(
        &self,
        name: &str,
    ) -> std::result::Result<Arc<dyn NearbyDistanceMeter<S, T>>, SelectorError> {
        lookup(&self.distance_meters, "distance meter", name)
    }
}

/// Mimic recorders created while one phase's selectors are built, keyed by
/// selector id.
#[derive(Default)]
pub struct MimicRecorders {
    indices: HashMap<String, MimicRecorder<usize>>,
    handles: HashMap<String, MimicRecorder<Handle>>,
}

impl MimicRecorders {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, id: &str) -> bool {
        self.indices.contains_key(id) || self.handles.contains_key(id)
    }

    /// Creates the recorder for `id`; every id is recorded by one selector.
    pub fn create<S, T: SelectorItem<S>>(
        &mut self,
        id: &str,
    ) -> std::result::Result<MimicRecorder<T>, SelectorError> {
        if self.contains(id) {
            return Err(SelectorError::DuplicateMimicId(id.to_string()));
        }
        let recorder = MimicRecorder::new(id);
        T::recorders(self).insert(id.to_string(), recorder.clone());
        Ok(recorder)
    }

    /// The recorder of an earlier selector with this id.
    pub fn get<S, T: SelectorItem<S>>(
        &mut self,
        id: &str,
    ) -> std::result::Result<MimicRecorder<T>, SelectorError> {
        T::recorders(self)
            .get(id)
            .cloned()
            .ok_or_else(|| SelectorError::UnknownMimicId(id.to_string()))
    }
}

impl fmt::Debug for MimicRecorders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.indices.keys().chain(self.handles.keys()).collect();
        ids.sort();
        f.debug_struct("MimicRecorders").field("ids", &ids).finish()
    }
}

/// A candidate type with its own plugin table and recorders: value and
/// entity indices of plain variables, handles of chained ones.
pub trait SelectorItem<S>: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    fn plugins(registry: &SelectorRegistry<S>) -> &PluginTable<S, Self>;

    fn plugins_mut(registry: &mut SelectorRegistry<S>) -> &mut PluginTable<S, Self>;

    fn recorders(recorders: &mut MimicRecorders) -> &mut HashMap<String, MimicRecorder<Self>>;
}

impl<S> SelectorItem<S> for usize {
    fn plugins(registry: &SelectorRegistry<S>) -> &PluginTable<S, Self> {
        &registry.indices
    }

    fn plugins_mut(registry: &mut SelectorRegistry<S>) -> &mut PluginTable<S, Self> {
        &mut registry.indices
    }

    fn recorders(recorders: &mut MimicRecorders) -> &mut HashMap<String, MimicRecorder<Self>> {
        &mut recorders.indices
    }
}

impl<S> SelectorItem<S> for Handle {
    fn plugins(registry: &SelectorRegistry<S>) -> &PluginTable<S, Self> {
        &registry.handles
    }

    fn plugins_mut(registry: &mut SelectorRegistry<S>) -> &mut PluginTable<S, Self> {
        &mut registry.handles
    }

    fn recorders(recorders: &mut MimicRecorders) -> &mut HashMap<String, MimicRecorder<Self>> {
        &mut recorders.handles
    }
}

/// Everything a configuration refers to by name.
///
/// Configuration is plain data; the registry binds its names to the
/// planning variables of a concrete solution type and to the filter,
/// sorter, probability weight and distance meter functions its selectors
/// use.
///
/// # Example
///
/// ```
/// use planwright_core::{PlanningSolution, SimpleScore};
/// use planwright_solver::builder::SelectorRegistry;
/// use planwright_solver::heuristic::PlainVariable;
///
/// #[derive(Clone, Debug)]
/// struct Board { rows: Vec<Option<usize>>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Board {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// fn get(b: &Board, i: usize) -> Option<usize> { b.rows[i] }
/// fn set(b: &mut Board, i: usize, v: Option<usize>) { b.rows[i] = v; }
/// fn count(b: &Board) -> usize { b.rows.len() }
///
/// let mut registry = SelectorRegistry::new();
/// registry
///     .register_plain_variable(PlainVariable::new("row", 0, get, set), count, count)
///     .register_filter::<usize>("even", |_: &Board, row: &usize| row % 2 == 0);
///
/// assert!(registry.variable(Some("row")).is_ok());
/// assert!(registry.variable(None).is_ok());
/// assert!(registry.variable(Some("column")).is_err());
/// ```
pub struct SelectorRegistry<S> {
    variables: Vec<RegisteredVariable<S>>,
    indices: PluginTable<S, usize>,
    handles: PluginTable<S, Handle>,
}

impl<S> Default for SelectorRegistry<S> {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            indices: PluginTable::default(),
            handles: PluginTable::default(),
        }
    }
}

impl<S> SelectorRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_plain_variable(
        &mut self,
        variable: PlainVariable<S>,
        entity_count: fn(&S) -> usize,
        value_count: fn(&S) -> usize,
    ) -> &mut Self {
        self.variables.push(RegisteredVariable::Plain {
            variable,
            entity_count,
            value_count,
        });
        self
    }

    pub fn register_chained_variable(
        &mut self,
        variable: ChainedVariable<S>,
        entities: Source<S, Handle>,
        values: Source<S, Handle>,
    ) -> &mut Self {
        self.variables.push(RegisteredVariable::Chained {
            variable,
            entities,
            values,
        });
        self
    }

    pub fn register_filter<T: SelectorItem<S>>(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&S, &T) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        T::plugins_mut(self)
            .filters
            .insert(name.into(), Arc::new(filter));
        self
    }

    /// Registers the sort key of a sorted selector.
    pub fn register_sorter<T: SelectorItem<S>>(
        &mut self,
        name: impl Into<String>,
        key: impl Fn(&S, &T) -> f64 + Send + Sync + 'static,
    ) -> &mut Self {
        T::plugins_mut(self).sorters.insert(name.into(), Arc::new(key));
        self
    }

    pub fn register_probability_weight<T: SelectorItem<S>>(
        &mut self,
        name: impl Into<String>,
        weight: impl Fn(&S, &T) -> f64 + Send + Sync + 'static,
    ) -> &mut Self {
        T::plugins_mut(self)
            .probability_weights
            .insert(name.into(), Arc::new(weight));
        self
    }

    pub fn register_distance_meter<T, M>(&mut self, name: impl Into<String>, meter: M) -> &mut Self
    where
        T: SelectorItem<S>,
        M: NearbyDistanceMeter<S, T> + 'static,
    {
        T::plugins_mut(self)
            .distance_meters
            .insert(name.into(), Arc::new(meter));
        self
    }

    pub fn variables(&self) -> &[RegisteredVariable<S>] {
        &self.variables
    }

    /// The variable called `name`, or the only registered one when `name`
    /// is `None`.
    pub fn variable(&self, name: Option<&str>) -> Result<&RegisteredVariable<S>> {
        match name {
            Some(name) => self
                .variables
                .iter()
                .find(|v| v.name() == name)
                .ok_or_else(|| {
                    SelectorError::UnknownPlugin {
                        kind: "variable",
                        name: name.to_string(),
                    }
                    .into()
                }),
            None => match self.variables.as_slice() {
                [only] => Ok(only),
                [] => Err(PlanwrightError::Config(
                    "no planning variable is registered".to_string(),
                )),
                _ => Err(PlanwrightError::Config(format!(
                    "variable_name is required when {} variables are registered",
                    self.variables.len()
                ))),
            },
        }
    }

    pub fn plugins<T: SelectorItem<S>>(&self) -> &PluginTable<S, T> {
        T::plugins(self)
    }
}

impl<S> fmt::Debug for SelectorRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorRegistry")
            .field("variables", &self.variables)
            .finish()
    }
}
