//! Solver entry point that hides the director and builder wiring.

use std::io;
use std::path::Path;

use planwright_config::{ConfigError, SolverConfig};
use planwright_core::score::ParseableScore;
use planwright_core::{PlanningSolution, PlanwrightError, Result};
use planwright_scoring::SimpleScoreDirector;
use planwright_solver::{SelectorRegistry, SolverBuilder};
use tracing::info;

/// Default configuration file read by [`run_solver`].
pub const CONFIG_FILE: &str = "solver.toml";

/// Solves `solution` with the configuration in `solver.toml`, or the
/// default configuration when that file does not exist.
///
/// Scores are recalculated in full by `calculator` after every change.
pub fn run_solver<S, C>(solution: S, calculator: C, registry: &SelectorRegistry<S>) -> Result<S>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    C: Fn(&S) -> S::Score + Send + 'static,
{
    let config = load_or_default(CONFIG_FILE)?;
    solve_with_config(solution, calculator, registry, &config)
}

/// Solves `solution` with an explicit configuration.
pub fn solve_with_config<S, C>(
    solution: S,
    calculator: C,
    registry: &SelectorRegistry<S>,
    config: &SolverConfig,
) -> Result<S>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    C: Fn(&S) -> S::Score + Send + 'static,
{
    let mut solver = SolverBuilder::build(config, registry)?;
    solver.solve(SimpleScoreDirector::new(solution, calculator))
}

fn load_or_default(path: impl AsRef<Path>) -> Result<SolverConfig> {
    let path = path.as_ref();
    match SolverConfig::load(path) {
        Ok(config) => {
            info!(event = "config_loaded", path = %path.display());
            Ok(config)
        }
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(SolverConfig::default()),
        Err(e) => Err(PlanwrightError::Config(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_config::TerminationConfig;
    use planwright_solver::PlainVariable;
    use planwright_test::nqueens::{
        calculate_conflicts, get_queen_row, queen_count, row_count, set_queen_row, NQueensSolution,
    };

    fn registry() -> SelectorRegistry<NQueensSolution> {
        let mut registry = SelectorRegistry::new();
        registry.register_plain_variable(
            PlainVariable::new("row", 0, get_queen_row, set_queen_row),
            queen_count,
            row_count,
        );
        registry
    }

    #[test]
    fn missing_file_means_default_config() {
        let config = load_or_default("does/not/exist/solver.toml").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn solves_queens_with_explicit_config() {
        let config = SolverConfig::new()
            .with_random_seed(7)
            .with_termination(TerminationConfig::new().with_step_count_limit(100));

        let best = solve_with_config(
            NQueensSolution::uninitialized(5),
            calculate_conflicts,
            &registry(),
            &config,
        )
        .unwrap();

        assert!(best.is_initialized());
        assert_eq!(best.score, Some(calculate_conflicts(&best)));
    }
}
