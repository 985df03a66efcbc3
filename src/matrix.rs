//! Compact symmetric distance matrix with row elimination.
//!
//! # Overview
//! An off-diagonal triangular matrix over `n` indices: only the lower
//! triangle is stored, in a single linear `Vec<f64>` of `n(n-1)/2` slots,
//! and `get(i, j) == get(j, i)` holds structurally. The diagonal does not
//! exist; there is no self-distance.
//!
//! An `active` flag per index lets neighbour-joining logically remove a
//! joined row without resizing storage: the linear index formula depends
//! only on the original `n`, so the backing vector is never reallocated.

/// A symmetric `n x n` distance matrix storing only the lower triangle.
///
/// # Index mapping
/// Position `(i, j)` with `i != j` maps to the row-major lower-triangular
/// offset `max(i,j)*(max(i,j)-1)/2 + min(i,j)`.
///
/// # Memory
/// `n(n-1)/2` f64 slots plus one bool per row, regardless of how many rows
/// have been deactivated.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangularMatrix {
    n: usize,
    data: Vec<f64>,
    active: Vec<bool>,
}

impl TriangularMatrix {
    /// Creates an `n x n` triangular matrix filled with zeros, all rows active.
    pub fn new(n: usize) -> Self {
        TriangularMatrix {
            n,
            data: vec![0.0; n * n.saturating_sub(1) / 2],
            active: vec![true; n],
        }
    }

    /// Reassembles a matrix from raw lower-triangular data (row-major,
    /// `n(n-1)/2` values). All rows start active.
    pub fn from_raw(n: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            n * n.saturating_sub(1) / 2,
            "raw data length mismatch"
        );
        TriangularMatrix {
            n,
            data,
            active: vec![true; n],
        }
    }

    /// Matrix dimension (the original `n`, ignoring deactivated rows).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Linear offset of the off-diagonal position `(i, j)`.
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i != j, "the diagonal is not stored");
        debug_assert!(i < self.n && j < self.n);
        let x = i.max(j);
        let y = i.min(j);
        x * (x - 1) / 2 + y
    }

    /// Value at `(i, j)`. Symmetric: `get(i, j) == get(j, i)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    /// Sets the value at `(i, j)` (and therefore at `(j, i)`).
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        let idx = self.index(i, j);
        self.data[idx] = v;
    }

    /// Whether row `i` still participates in operations.
    pub fn is_active(&self, i: usize) -> bool {
        self.active[i]
    }

    /// Activates or deactivates row `i`.
    pub fn set_active(&mut self, i: usize, active: bool) {
        self.active[i] = active;
    }

    /// Number of rows currently active.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Iterates over `(j, get(i, j))` for every active `j != i`,
    /// in ascending `j` order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.n)
            .filter(move |&j| self.active[j] && j != i)
            .map(move |j| (j, self.get(i, j)))
    }

    /// Returns the `(row, column)` of the first instance of the smallest
    /// value among active pairs, scanning rows in ascending order.
    pub fn arg_min(&self) -> (usize, usize) {
        let mut min_i = 0;
        let mut min_j = 0;
        let mut v_min = f64::MAX;

        for i in 0..self.n {
            if !self.active[i] {
                continue;
            }
            for (j, v) in self.row(i) {
                if v < v_min {
                    v_min = v;
                    min_i = i;
                    min_j = j;
                }
            }
        }

        (min_i, min_j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix_shape() {
        for n in [2, 3, 5, 8] {
            let m = TriangularMatrix::new(n);
            assert_eq!(m.n(), n);
            assert_eq!(m.data.len(), n * (n - 1) / 2);
            assert!((0..n).all(|i| m.is_active(i)));
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        // Empty input must construct, not underflow the slot count
        let m = TriangularMatrix::new(0);
        assert_eq!(m.n(), 0);
        assert_eq!(m.active_count(), 0);

        let m = TriangularMatrix::from_raw(0, Vec::new());
        assert_eq!(m.n(), 0);

        let m = TriangularMatrix::new(1);
        assert_eq!(m.data.len(), 0);
    }

    #[test]
    fn test_get_set_symmetry() {
        let mut m = TriangularMatrix::new(4);
        let cells = [
            (1, 0, 1.1),
            (2, 0, 2.2),
            (2, 1, 3.3),
            (3, 0, 4.4),
            (3, 1, 5.5),
            (3, 2, 6.6),
        ];
        for &(i, j, v) in &cells {
            m.set(i, j, v);
            assert_eq!(m.get(i, j), v);
            assert_eq!(m.get(j, i), v);
        }
        // Setting through the transposed index hits the same slot
        m.set(0, 3, 9.9);
        assert_eq!(m.get(3, 0), 9.9);
    }

    #[test]
    fn test_clone_preserves_state() {
        let mut m = TriangularMatrix::new(3);
        m.set(2, 1, 7.7);
        m.set_active(1, false);
        let m2 = m.clone();
        assert_eq!(m2.get(2, 1), 7.7);
        assert!(!m2.is_active(1));
        assert!(m2.is_active(0));
    }

    #[test]
    fn test_row_skips_inactive() {
        let mut m = TriangularMatrix::new(4);
        m.set(1, 0, 1.0);
        m.set(2, 0, 2.0);
        m.set(3, 0, 3.0);
        m.set_active(2, false);

        let row: Vec<(usize, f64)> = m.row(0).collect();
        assert_eq!(row, vec![(1, 1.0), (3, 3.0)]);
    }

    #[test]
    fn test_arg_min() {
        let mut m = TriangularMatrix::new(3);
        m.set(1, 0, 5.5);
        m.set(2, 0, 2.2);
        m.set(2, 1, 3.3);
        let (i, j) = m.arg_min();
        assert_eq!(m.get(i, j), 2.2);
    }

    #[test]
    fn test_arg_min_ignores_inactive() {
        let mut m = TriangularMatrix::new(3);
        m.set(1, 0, 5.5);
        m.set(2, 0, 2.2);
        m.set(2, 1, 3.3);
        m.set_active(0, false);
        let (i, j) = m.arg_min();
        assert_eq!(m.get(i, j), 3.3);
    }

    #[test]
    fn test_active_count() {
        let mut m = TriangularMatrix::new(5);
        assert_eq!(m.active_count(), 5);
        m.set_active(1, false);
        m.set_active(3, false);
        assert_eq!(m.active_count(), 3);
    }
}
