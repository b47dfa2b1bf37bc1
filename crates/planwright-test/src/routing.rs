//! Chained routing fixtures.
//!
//! Depots are anchors and customers are chained entities. Every customer
//! points at the depot or customer visited just before it. The hard level
//! counts unassigned customers and the soft level is the negated Manhattan
//! length of all links.

use planwright_core::domain::{ChainGraph, Handle, PlanningSolution};
use planwright_core::score::HardSoftScore;

#[derive(Clone, Debug)]
pub struct RoutingSolution {
    pub graph: ChainGraph,
    pub depots: Vec<Handle>,
    pub customers: Vec<Handle>,
    /// Indexed by `Handle::index`.
    pub locations: Vec<(i64, i64)>,
    pub score: Option<HardSoftScore>,
}

impl RoutingSolution {
    /// Depots and customers at the given locations, every customer unassigned.
    pub fn unassigned(depots: &[(i64, i64)], customers: &[(i64, i64)]) -> Self {
        let mut graph = ChainGraph::new();
        let mut locations = Vec::with_capacity(depots.len() + customers.len());
        let depots = depots
            .iter()
            .map(|&location| {
                locations.push(location);
                graph.add_anchor()
            })
            .collect();
        let customers = customers
            .iter()
            .map(|&location| {
                locations.push(location);
                graph.add_entity()
            })
            .collect();
        Self {
            graph,
            depots,
            customers,
            locations,
            score: None,
        }
    }

    /// Builds routes from customer positions: `routes[d]` lists the customer
    /// indices visited from depot `d`, in order.
    pub fn with_routes(
        depots: &[(i64, i64)],
        customers: &[(i64, i64)],
        routes: &[&[usize]],
    ) -> Self {
        let mut solution = Self::unassigned(depots, customers);
        for (depot, route) in routes.iter().enumerate() {
            let handles: Vec<Handle> = route.iter().map(|&c| solution.customers[c]).collect();
            if let Some(&anchor) = solution.depots.get(depot) {
                solution
                    .graph
                    .append(anchor, &handles)
                    .unwrap_or_else(|e| panic!("invalid fixture route: {e}"));
            }
        }
        solution
    }

    /// Customer indices per depot, in visiting order.
    pub fn routes(&self) -> Vec<Vec<usize>> {
        self.depots
            .iter()
            .map(|&depot| {
                self.graph
                    .trailing_chain(depot)
                    .into_iter()
                    .filter_map(|h| self.customers.iter().position(|&c| c == h))
                    .collect()
            })
            .collect()
    }

    pub fn customer(&self, index: usize) -> Handle {
        self.customers[index]
    }

    pub fn depot(&self, index: usize) -> Handle {
        self.depots[index]
    }
}

impl PlanningSolution for RoutingSolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.graph.unassigned_count() == 0
    }
}

pub fn routing_graph(s: &RoutingSolution) -> &ChainGraph {
    &s.graph
}

pub fn routing_graph_mut(s: &mut RoutingSolution) -> &mut ChainGraph {
    &mut s.graph
}

/// Manhattan distance between two nodes.
pub fn manhattan(s: &RoutingSolution, a: Handle, b: Handle) -> i64 {
    let (ax, ay) = s.locations[a.index()];
    let (bx, by) = s.locations[b.index()];
    (ax - bx).abs() + (ay - by).abs()
}

/// Depots then customers: the candidate values of the chained variable.
pub fn stop_handles(s: &RoutingSolution) -> Vec<Handle> {
    s.depots.iter().chain(s.customers.iter()).copied().collect()
}

pub fn calculate_route_score(s: &RoutingSolution) -> HardSoftScore {
    let mut unassigned = 0;
    let mut length = 0;
    for &customer in &s.customers {
        match s.graph.predecessor(customer) {
            Some(previous) => length += manhattan(s, previous, customer),
            None => unassigned += 1,
        }
    }
    HardSoftScore::of(-unassigned, -length)
}
