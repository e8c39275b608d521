//! # Mean Relative Rank Error
//!
//! For every point the rank displacement `|r_X(i, j) - r_Z(i, j)|` of each
//! neighbor is divided by the neighbor's rank in the space it was picked
//! from:
//!
//! - `MRRE_XZ`: neighbors taken in the original space, divided by `r_X`
//! - `MRRE_ZX`: neighbors taken in the embedding, divided by `r_Z`
//!
//! Both sums are divided by `H = n * sum_{m=1..k} |n - 2m + 1| / m`. Lower
//! is better; identical rankings give exactly `0`.

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::error::Result;
use crate::measures::{check_rank_pair, shared_ranks};
use crate::rank::RankMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanRelativeRankError {
    /// Original to embedded direction.
    pub mrre_xz: f64,
    /// Embedded to original direction.
    pub mrre_zx: f64,
}

pub fn mean_relative_rank_error<T>(
    original: ArrayView2<T>,
    embedded: ArrayView2<T>,
    k: usize,
) -> Result<MeanRelativeRankError>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    let (rx, rz) = shared_ranks(original, embedded, k)?;
    mean_relative_rank_error_from_ranks(&rx, &rz, k)
}

pub fn mean_relative_rank_error_from_ranks(
    original: &RankMatrix,
    embedded: &RankMatrix,
    k: usize,
) -> Result<MeanRelativeRankError> {
    check_rank_pair(original, embedded, k)?;
    Ok(MeanRelativeRankError {
        mrre_xz: relative_rank_error(original, embedded, k),
        mrre_zx: relative_rank_error(embedded, original, k),
    })
}

pub fn mrre_xz_from_ranks(original: &RankMatrix, embedded: &RankMatrix, k: usize) -> Result<f64> {
    check_rank_pair(original, embedded, k)?;
    Ok(relative_rank_error(original, embedded, k))
}

pub fn mrre_zx_from_ranks(original: &RankMatrix, embedded: &RankMatrix, k: usize) -> Result<f64> {
    check_rank_pair(original, embedded, k)?;
    Ok(relative_rank_error(embedded, original, k))
}

/// Neighbors come from `source` and displacements are relative to their
/// rank there.
fn relative_rank_error(source: &RankMatrix, other: &RankMatrix, k: usize) -> f64 {
    let n = source.n_points();
    let mut error = 0.0;
    for i in 0..n {
        for &j in source.neighbors(i, k).iter() {
            let from = source.rank(i, j);
            let to = other.rank(i, j);
            error += from.abs_diff(to) as f64 / from as f64;
        }
    }
    error / normalizer(n, k)
}

fn normalizer(n: usize, k: usize) -> f64 {
    let n_f = n as f64;
    let sum: f64 = (1..=k)
        .map(|m| (n_f - 2.0 * m as f64 + 1.0).abs() / m as f64)
        .sum();
    n_f * sum
}
