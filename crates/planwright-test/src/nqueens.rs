//! N-Queens fixtures.
//!
//! Each queen owns a fixed column and a row planning variable. The score is
//! the negated number of attacking pairs.

use planwright_core::domain::PlanningSolution;
use planwright_core::score::SimpleScore;

#[derive(Clone, Debug, PartialEq)]
pub struct Queen {
    pub column: usize,
    pub row: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct NQueensSolution {
    pub n: usize,
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    /// `n` queens, none of them placed.
    pub fn uninitialized(n: usize) -> Self {
        Self::with_optional_rows(&vec![None; n])
    }

    /// One queen per column, placed on the given rows.
    pub fn with_rows(rows: &[usize]) -> Self {
        let rows: Vec<Option<usize>> = rows.iter().copied().map(Some).collect();
        Self::with_optional_rows(&rows)
    }

    pub fn with_optional_rows(rows: &[Option<usize>]) -> Self {
        Self {
            n: rows.len(),
            queens: rows
                .iter()
                .enumerate()
                .map(|(column, &row)| Queen { column, row })
                .collect(),
            score: None,
        }
    }

    pub fn rows(&self) -> Vec<Option<usize>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.queens.iter().all(|q| q.row.is_some())
    }
}

pub fn queen_count(s: &NQueensSolution) -> usize {
    s.queens.len()
}

pub fn row_count(s: &NQueensSolution) -> usize {
    s.n
}

pub fn get_queen_row(s: &NQueensSolution, index: usize) -> Option<usize> {
    s.queens.get(index).and_then(|q| q.row)
}

pub fn set_queen_row(s: &mut NQueensSolution, index: usize, row: Option<usize>) {
    if let Some(queen) = s.queens.get_mut(index) {
        queen.row = row;
    }
}

/// Negated count of queen pairs sharing a row or a diagonal.
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let queens = &solution.queens;
    let mut conflicts = 0i64;
    for (i, a) in queens.iter().enumerate() {
        for b in &queens[i + 1..] {
            if let (Some(row_a), Some(row_b)) = (a.row, b.row) {
                if row_a == row_b {
                    conflicts += 1;
                }
                if row_a.abs_diff(row_b) == a.column.abs_diff(b.column) {
                    conflicts += 1;
                }
            }
        }
    }
    SimpleScore::of(-conflicts)
}
