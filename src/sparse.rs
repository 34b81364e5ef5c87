//! Sparse matrix utilities.
//!
//! Helpers for building and densifying the stacked affine map.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together. Out-of-range entries are dropped.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
) -> CscMatrix<f64> {
    if rows.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for ((row, col), val) in rows.into_iter().zip(cols).zip(vals) {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}

/// Convert a CSC matrix to a dense matrix.
pub fn csc_to_dense(sparse: &CscMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(sparse.nrows(), sparse.ncols());
    for (row, col, val) in sparse.triplet_iter() {
        dense[(row, col)] = *val;
    }
    dense
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csc_from_triplets() {
        let m = csc_from_triplets(3, 3, vec![0, 1, 2], vec![0, 1, 2], vec![1.0, 2.0, 3.0]);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m.nnz(), 3);
    }

    #[test]
    fn test_csc_from_triplets_empty() {
        let m = csc_from_triplets(2, 4, vec![], vec![], vec![]);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 4);
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn test_csc_to_dense() {
        let m = csc_from_triplets(2, 2, vec![0, 1], vec![1, 0], vec![5.0, -3.0]);
        let dense = csc_to_dense(&m);
        assert_eq!(dense[(0, 1)], 5.0);
        assert_eq!(dense[(1, 0)], -3.0);
        assert_eq!(dense[(0, 0)], 0.0);
    }
}
