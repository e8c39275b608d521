use ndarray::{Array2, ArrayView1};

use crate::error::Result;
use crate::rank::RankMatrix;
use crate::utils::validate_neighborhood_size;

/// Indices holding ranks `1..=k` in `rank_row`, nearest first.
///
/// `rank_row` is one row of a [`RankMatrix`]: a permutation of `0..n` with
/// the self entry at `0`. Fails unless `1 <= k < n`.
pub fn k_nearest(rank_row: ArrayView1<usize>, k: usize) -> Result<Vec<usize>> {
    validate_neighborhood_size(k, rank_row.len())?;

    let mut nearest = vec![0; k];
    for (j, &rank) in rank_row.iter().enumerate() {
        if rank >= 1 && rank <= k {
            nearest[rank - 1] = j;
        }
    }
    Ok(nearest)
}

/// The `k` nearest neighbors of every point as an `n x k` matrix.
pub fn neighbor_sets(ranks: &RankMatrix, k: usize) -> Result<Array2<usize>> {
    let n = ranks.n_points();
    validate_neighborhood_size(k, n)?;

    let mut sets = Array2::zeros((n, k));
    for (i, mut row) in sets.rows_mut().into_iter().enumerate() {
        row.assign(&ranks.neighbors(i, k));
    }
    Ok(sets)
}

/// Number of points shared by the `k`-neighborhoods of `i` in both spaces.
pub(crate) fn overlap(first: &RankMatrix, second: &RankMatrix, i: usize, k: usize) -> usize {
    first
        .neighbors(i, k)
        .iter()
        .filter(|&&j| second.is_neighbor(i, j, k))
        .count()
}
