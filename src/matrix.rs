//! Local-alignment score matrix with the five ALINE edit operations.
//!
//! Cells are stored in a flat Vec, `cells[i * cols + j]`, with row 0 and
//! column 0 fixed at zero.

use crate::error::AlignError;
use crate::scoring::Scorer;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl ScoreMatrix {
    /// Fill the matrix for `first` (rows) against `second` (columns).
    ///
    /// ```text
    /// S[i,j] = max(S[i-1,j]   + skip,
    ///              S[i,j-1]   + skip,
    ///              S[i-1,j-1] + sub(a[i-1], b[j-1]),
    ///              S[i-2,j-1] + exp(b[j-1], a[i-2..i])   if i > 1,
    ///              S[i-1,j-2] + exp(a[i-1], b[j-2..j])   if j > 1,
    ///              0)
    /// ```
    pub fn build(scorer: &Scorer<'_>, first: &[char], second: &[char]) -> Result<Self, AlignError> {
        let rows = first.len() + 1;
        let cols = second.len() + 1;
        let mut cells = vec![0.0f64; rows * cols];

        for i in 1..rows {
            let a = first[i - 1];
            let row = i * cols;
            let prev_row = (i - 1) * cols;

            for j in 1..cols {
                let b = second[j - 1];

                let mut best = 0.0f64;
                best = best.max(cells[prev_row + j] + scorer.indel_cost(a));
                best = best.max(cells[row + j - 1] + scorer.indel_cost(b));
                best = best.max(cells[prev_row + j - 1] + scorer.substitution_cost(a, b)?);
                if i > 1 {
                    let compression = scorer.expansion_cost(b, (first[i - 2], a))?;
                    best = best.max(cells[(i - 2) * cols + j - 1] + compression);
                }
                if j > 1 {
                    let expansion = scorer.expansion_cost(a, (second[j - 2], b))?;
                    best = best.max(cells[prev_row + j - 2] + expansion);
                }

                cells[row + j] = best;
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Number of rows, `first.len() + 1`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, `second.len() + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.cols + j]
    }

    pub fn max_score(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }

    /// Cells scoring at least `threshold - tolerance`, in row-major order.
    /// Zero cells never qualify: they start no path.
    pub fn cells_at_least(&self, threshold: f64, tolerance: f64) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for i in 1..self.rows {
            for j in 1..self.cols {
                let score = self.get(i, j);
                if score > 0.0 && score + tolerance >= threshold {
                    found.push((i, j));
                }
            }
        }
        found
    }

    /// Rows of the matrix, for display and debugging.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }
}
