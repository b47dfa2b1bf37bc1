use planwright_config::SolverConfig;
use planwright_core::domain::PlanningSolution;
use planwright_core::score::ParseableScore;
use planwright_core::Result;
use planwright_scoring::ScoreDirector;
use tracing::debug;

use super::registry::SelectorRegistry;
use super::{config_error, PhaseBuilder, TerminationBuilder};
use crate::solver::Solver;

/// Builds a [`Solver`] from a [`SolverConfig`].
///
/// Without configured phases the solver runs one construction heuristic
/// per registered variable followed by a local search.
///
/// # Example
///
/// ```
/// use planwright_config::SolverConfig;
/// use planwright_core::{PlanningSolution, SimpleScore};
/// use planwright_scoring::SimpleScoreDirector;
/// use planwright_solver::builder::{SelectorRegistry, SolverBuilder};
/// use planwright_solver::heuristic::PlainVariable;
///
/// #[derive(Clone, Debug)]
/// struct Slots { values: Vec<Option<usize>>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Slots {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
///     fn is_initialized(&self) -> bool { self.values.iter().all(Option::is_some) }
/// }
///
/// fn get(s: &Slots, i: usize) -> Option<usize> { s.values[i] }
/// fn set(s: &mut Slots, i: usize, v: Option<usize>) { s.values[i] = v; }
/// fn slot_count(s: &Slots) -> usize { s.values.len() }
/// fn value_count(_: &Slots) -> usize { 5 }
/// // Every slot wants the value 4.
/// fn score(s: &Slots) -> SimpleScore {
///     SimpleScore::of(-s.values.iter().flatten().map(|v| 4 - *v as i64).sum::<i64>())
/// }
///
/// let config = SolverConfig::from_toml_str(r#"
///     random_seed = 3
///     [termination]
///     best_score_limit = "0"
///     step_count_limit = 200
/// "#).unwrap();
///
/// let mut registry = SelectorRegistry::new();
/// registry.register_plain_variable(PlainVariable::new("value", 0, get, set), slot_count, value_count);
///
/// let mut solver = SolverBuilder::build(&config, &registry).unwrap();
/// let director = SimpleScoreDirector::new(Slots { values: vec![None; 3], score: None }, score);
/// let best = solver.solve(director).unwrap();
/// assert_eq!(best.values, vec![Some(4); 3]);
/// ```
pub struct SolverBuilder;

impl SolverBuilder {
    pub fn build<S, D>(config: &SolverConfig, registry: &SelectorRegistry<S>) -> Result<Solver<S, D>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S>,
    {
        config.validate().map_err(config_error)?;
        let termination = match &config.termination {
            Some(termination) => TerminationBuilder::build(termination)?,
            None => None,
        };

        let phases = if config.phases.is_empty() {
            PhaseBuilder::defaults(registry, termination.as_ref())?
        } else {
            config
                .phases
                .iter()
                .map(|phase| PhaseBuilder::build(phase, registry, termination.as_ref()))
                .collect::<Result<Vec<_>>>()?
        };

        let mut solver = Solver::new()
            .with_environment_mode(config.environment_mode)
            .with_random_seed(config.effective_seed());
        if let Some(termination) = termination {
            solver = solver.with_termination(termination);
        }
        for phase in phases {
            solver = solver.with_boxed_phase(phase);
        }
        debug!(
            event = "solver_built",
            phases = ?solver.phase_type_names(),
            environment_mode = ?config.environment_mode,
            seed = ?config.effective_seed(),
        );
        Ok(solver)
    }
}
