//! Vertex-compatibility matrix with soft removal, for Ullmann-style
//! backtracking search.

/// A dense `n_rows x m_cols` matrix recording which query vertices (rows)
/// could map to which target vertices (columns).
///
/// Cells hold signed integers rather than booleans so pruning can *soft*
/// remove candidates: [`CompatibilityMatrix::mark`] and
/// [`CompatibilityMatrix::mark_row`] overwrite set cells with a negative
/// sentinel, and [`CompatibilityMatrix::reset_rows`] restores every cell
/// carrying that sentinel without recomputing compatibility. Any positive
/// value reads as "set"; zero and negatives read as "unset".
///
/// Callers must use negative markings, unique per backtrack depth (e.g. a
/// strictly decreasing sequence): reusing a marking across nested depths
/// would let an inner `reset_rows` restore cells an outer, still-active
/// pruning level removed.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    data: Vec<i32>,
    pub n_rows: usize,
    pub m_cols: usize,
}

impl CompatibilityMatrix {
    /// Create an all-unset matrix of the given size.
    pub fn new(n_rows: usize, m_cols: usize) -> Self {
        CompatibilityMatrix {
            data: vec![0; n_rows * m_cols],
            n_rows,
            m_cols,
        }
    }

    /// Set the cell at row `i`, column `j`.
    pub fn set1(&mut self, i: usize, j: usize) {
        self.data[i * self.m_cols + j] = 1;
    }

    /// Whether the cell at row `i`, column `j` is set.
    pub fn get1(&self, i: usize, j: usize) -> bool {
        self.data[i * self.m_cols + j] > 0
    }

    /// Overwrite the cell at row `i`, column `j` with `marking` so it can be
    /// restored later. The marking should be negative.
    pub fn mark(&mut self, i: usize, j: usize, marking: i32) {
        self.data[i * self.m_cols + j] = marking;
    }

    /// Mark every set cell in row `i`.
    pub fn mark_row(&mut self, i: usize, marking: i32) {
        for cell in &mut self.data[i * self.m_cols..(i + 1) * self.m_cols] {
            if *cell > 0 {
                *cell = marking;
            }
        }
    }

    /// Restore to 1 every cell equal to `marking`, from row `i` onwards.
    pub fn reset_rows(&mut self, i: usize, marking: i32) {
        for cell in &mut self.data[i * self.m_cols..] {
            if *cell == marking {
                *cell = 1;
            }
        }
    }

    /// Snapshot the matrix as a 2D array (useful for debugging).
    pub fn fix(&self) -> Vec<Vec<i32>> {
        (0..self.n_rows)
            .map(|i| self.data[i * self.m_cols..(i + 1) * self.m_cols].to_vec())
            .collect()
    }
}
