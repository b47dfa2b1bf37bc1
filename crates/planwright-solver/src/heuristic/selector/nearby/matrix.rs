//! Per-origin rankings of destinations by distance.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Caches, per origin, the destinations sorted by ascending distance.
///
/// Rows are computed on first use and kept for the lifetime of the matrix,
/// which is one phase. Equal distances keep the order of the destination
/// list. With a destination limit only the nearest `limit` destinations of
/// each row are kept.
///
/// # Example
///
/// ```
/// use planwright_solver::heuristic::selector::NearbyDistanceMatrix;
///
/// let mut matrix = NearbyDistanceMatrix::new(vec![0i64, 10, 3, 7], None);
/// let distance = |a: &i64, b: &i64| (a - b).abs() as f64;
/// assert_eq!(matrix.get_destination(&6, 0, distance), Some(&7));
/// assert_eq!(matrix.get_destination(&6, 1, distance), Some(&3));
/// ```
pub struct NearbyDistanceMatrix<T> {
    destinations: Vec<T>,
    rows: HashMap<T, Vec<T>>,
    limit: Option<usize>,
}

impl<T> NearbyDistanceMatrix<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new(destinations: Vec<T>, limit: Option<usize>) -> Self {
        Self {
            destinations,
            rows: HashMap::new(),
            limit,
        }
    }

    /// Number of destinations a row holds once computed.
    pub fn row_len(&self) -> usize {
        match self.limit {
            Some(limit) => limit.min(self.destinations.len()),
            None => self.destinations.len(),
        }
    }

    pub fn destinations(&self) -> &[T] {
        &self.destinations
    }

    pub fn has_row(&self, origin: &T) -> bool {
        self.rows.contains_key(origin)
    }

    /// Computes and stores the ranking for `origin`, replacing any earlier one.
    pub fn add_all_destinations<F>(&mut self, origin: &T, distance: F)
    where
        F: Fn(&T, &T) -> f64,
    {
        let mut ranked: Vec<(f64, &T)> = self
            .destinations
            .iter()
            .map(|destination| (distance(origin, destination), destination))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        let row: Vec<T> = ranked
            .into_iter()
            .take(self.row_len())
            .map(|(_, destination)| destination.clone())
            .collect();
        self.rows.insert(origin.clone(), row);
    }

    /// The `index`-th nearest destination of `origin`, computing the row
    /// first if needed. `None` when the row is shorter than `index + 1`.
    pub fn get_destination<F>(&mut self, origin: &T, index: usize, distance: F) -> Option<&T>
    where
        F: Fn(&T, &T) -> f64,
    {
        if !self.rows.contains_key(origin) {
            self.add_all_destinations(origin, distance);
        }
        self.rows.get(origin).and_then(|row| row.get(index))
    }
}

impl<T> fmt::Debug for NearbyDistanceMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyDistanceMatrix")
            .field("destinations", &self.destinations.len())
            .field("rows", &self.rows.len())
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<(i64, i64)> {
        vec![(0, 0), (5, 0), (1, 1), (0, 5), (2, 0)]
    }

    fn manhattan(a: &(i64, i64), b: &(i64, i64)) -> f64 {
        ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f64
    }

    #[test]
    fn origin_ranks_first_and_distances_never_decrease() {
        let mut matrix = NearbyDistanceMatrix::new(points(), None);
        let origin = (0, 0);
        matrix.add_all_destinations(&origin, manhattan);

        assert_eq!(matrix.get_destination(&origin, 0, manhattan), Some(&(0, 0)));
        let ranked: Vec<f64> = (0..matrix.row_len())
            .filter_map(|i| matrix.get_destination(&origin, i, manhattan).copied())
            .map(|d| manhattan(&origin, &d))
            .collect();
        assert_eq!(ranked, vec![0.0, 2.0, 2.0, 5.0, 5.0]);
    }

    #[test]
    fn ties_keep_destination_order() {
        let mut matrix = NearbyDistanceMatrix::new(points(), None);
        let origin = (0, 0);
        let row: Vec<(i64, i64)> = (0..5)
            .filter_map(|i| matrix.get_destination(&origin, i, manhattan).copied())
            .collect();
        assert_eq!(row, vec![(0, 0), (1, 1), (2, 0), (5, 0), (0, 5)]);
    }

    #[test]
    fn lazy_row_matches_eager_row() {
        let mut eager = NearbyDistanceMatrix::new(points(), None);
        let mut lazy = NearbyDistanceMatrix::new(points(), None);
        let origin = (4, 1);
        eager.add_all_destinations(&origin, manhattan);
        assert!(!lazy.has_row(&origin));
        for i in 0..5 {
            let expected = eager.get_destination(&origin, i, manhattan).copied();
            assert_eq!(lazy.get_destination(&origin, i, manhattan).copied(), expected);
        }
        assert!(lazy.has_row(&origin));
    }

    #[test]
    fn limit_truncates_rows() {
        let mut matrix = NearbyDistanceMatrix::new(points(), Some(2));
        let origin = (0, 0);
        assert_eq!(matrix.row_len(), 2);
        assert_eq!(matrix.get_destination(&origin, 1, manhattan), Some(&(1, 1)));
        assert_eq!(matrix.get_destination(&origin, 2, manhattan), None);
    }
}
