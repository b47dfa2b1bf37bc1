//! Test utilities for planwright-solver
//!
//! Directors, variables and scopes over the `planwright-test` fixtures.

use planwright_core::score::{HardSoftScore, SimpleScore};
use planwright_scoring::SimpleScoreDirector;

use crate::heuristic::{ChainedVariable, PlainVariable};
use crate::scope::SolverScope;

pub use planwright_test::nqueens::{
    calculate_conflicts, get_queen_row, queen_count, row_count, set_queen_row, NQueensSolution,
};
pub use planwright_test::routing::{
    calculate_route_score, manhattan, routing_graph, routing_graph_mut, stop_handles,
    RoutingSolution,
};

pub type NQueensDirector =
    SimpleScoreDirector<NQueensSolution, fn(&NQueensSolution) -> SimpleScore>;

pub type RoutingDirector =
    SimpleScoreDirector<RoutingSolution, fn(&RoutingSolution) -> HardSoftScore>;

/// The `row` variable of the N-Queens fixture.
pub fn row_variable() -> PlainVariable<NQueensSolution> {
    PlainVariable::new("row", 0, get_queen_row, set_queen_row)
}

/// The `previous` variable of the routing fixture.
pub fn previous_variable() -> ChainedVariable<RoutingSolution> {
    ChainedVariable::new("previous", 0, routing_graph, routing_graph_mut)
}

pub fn nqueens_director(rows: &[usize]) -> NQueensDirector {
    SimpleScoreDirector::new(
        NQueensSolution::with_rows(rows),
        calculate_conflicts as fn(&NQueensSolution) -> SimpleScore,
    )
}

pub fn uninitialized_nqueens_director(n: usize) -> NQueensDirector {
    SimpleScoreDirector::new(
        NQueensSolution::uninitialized(n),
        calculate_conflicts as fn(&NQueensSolution) -> SimpleScore,
    )
}

pub fn routing_director(solution: RoutingSolution) -> RoutingDirector {
    SimpleScoreDirector::new(
        solution,
        calculate_route_score as fn(&RoutingSolution) -> HardSoftScore,
    )
}

const DEPOTS: [(i64, i64); 2] = [(0, 0), (0, 10)];
const CUSTOMERS: [(i64, i64); 5] = [(1, 0), (2, 0), (3, 0), (1, 10), (2, 10)];

/// Two depots; customers 0, 1, 2 behind depot 0 and 3, 4 behind depot 1.
///
/// Depots take handles 0 and 1, customer `i` has handle `i + 2`.
pub fn two_routes() -> RoutingSolution {
    RoutingSolution::with_routes(&DEPOTS, &CUSTOMERS, &[&[0, 1, 2], &[3, 4]])
}

/// The customers of [`two_routes`], none of them assigned.
pub fn unassigned_routes() -> RoutingSolution {
    RoutingSolution::unassigned(&DEPOTS, &CUSTOMERS)
}

pub fn nqueens_scope(rows: &[usize]) -> SolverScope<NQueensSolution, NQueensDirector> {
    let mut scope = SolverScope::with_seed(nqueens_director(rows), 42);
    scope.start_solving();
    scope
}

pub fn routing_scope(solution: RoutingSolution) -> SolverScope<RoutingSolution, RoutingDirector> {
    let mut scope = SolverScope::with_seed(routing_director(solution), 42);
    scope.start_solving();
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_scoring::ScoreDirector;

    #[test]
    fn two_routes_layout() {
        let solution = two_routes();
        assert_eq!(solution.routes(), vec![vec![0, 1, 2], vec![3, 4]]);
        assert_eq!(solution.customer(0).index(), 2);
        assert_eq!(calculate_route_score(&solution), HardSoftScore::of(0, -5));
    }

    #[test]
    fn scope_starts_with_best_solution() {
        let scope = nqueens_scope(&[0, 1, 2, 3]);
        assert_eq!(scope.total_step_count(), 0);
        assert_eq!(scope.best_score(), Some(&SimpleScore::of(-6)));
        assert_eq!(scope.score_director().working_solution().rows().len(), 4);
    }
}
