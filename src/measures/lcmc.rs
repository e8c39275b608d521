//! # Local Continuity Meta-Criterion
//!
//! Average overlap of the `k`-neighborhoods in both spaces, minus the overlap
//! expected from a uniformly random neighborhood:
//!
//! `LCMC = 1 / (n k) * sum_i |N_X(i) ∩ N_Z(i)| - k / (n - 1)`
//!
//! It peaks at `1 - k / (n - 1)` when all neighborhoods agree and turns
//! negative when they agree less often than chance.

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::error::Result;
use crate::measures::{check_rank_pair, shared_ranks};
use crate::neighbors::overlap;
use crate::rank::RankMatrix;

pub fn local_continuity_meta_criterion<T>(
    original: ArrayView2<T>,
    embedded: ArrayView2<T>,
    k: usize,
) -> Result<f64>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    let (rx, rz) = shared_ranks(original, embedded, k)?;
    local_continuity_meta_criterion_from_ranks(&rx, &rz, k)
}

pub fn local_continuity_meta_criterion_from_ranks(
    original: &RankMatrix,
    embedded: &RankMatrix,
    k: usize,
) -> Result<f64> {
    check_rank_pair(original, embedded, k)?;

    let n = original.n_points();
    let shared: usize = (0..n).map(|i| overlap(original, embedded, i, k)).sum();
    let k_f = k as f64;
    Ok(shared as f64 / (n as f64 * k_f) - k_f / (n - 1) as f64)
}
