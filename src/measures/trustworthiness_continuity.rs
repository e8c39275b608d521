//! # Trustworthiness and Continuity
//!
//! Trustworthiness penalizes false neighbors: points inside the embedded
//! `k`-neighborhood of `i` that are outside its original one, each weighted
//! by how far past `k` it sits in the original ranking. Continuity is the
//! mirror image and penalizes true neighbors missing from the embedding.
//!
//! Both are normalized by the largest attainable penalty, so `1.0` means the
//! neighborhoods agree and `0.0` is the worst case:
//!
//! - `2k < n`: `G = n k (2n - 3k - 1)`
//! - otherwise: `G = n (n - k) (n - k - 1)`
//!
//! `score = 1 - 2 penalty / G`. A zero penalty scores exactly `1.0`, which
//! also covers `k = n - 1` where `G` vanishes.

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::error::Result;
use crate::measures::{check_rank_pair, shared_ranks};
use crate::rank::RankMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustworthinessContinuity {
    pub trustworthiness: f64,
    pub continuity: f64,
}

pub fn trustworthiness_continuity<T>(
    original: ArrayView2<T>,
    embedded: ArrayView2<T>,
    k: usize,
) -> Result<TrustworthinessContinuity>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    let (rx, rz) = shared_ranks(original, embedded, k)?;
    trustworthiness_continuity_from_ranks(&rx, &rz, k)
}

pub fn trustworthiness<T>(original: ArrayView2<T>, embedded: ArrayView2<T>, k: usize) -> Result<f64>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    let (rx, rz) = shared_ranks(original, embedded, k)?;
    trustworthiness_from_ranks(&rx, &rz, k)
}

pub fn continuity<T>(original: ArrayView2<T>, embedded: ArrayView2<T>, k: usize) -> Result<f64>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    let (rx, rz) = shared_ranks(original, embedded, k)?;
    continuity_from_ranks(&rx, &rz, k)
}

pub fn trustworthiness_continuity_from_ranks(
    original: &RankMatrix,
    embedded: &RankMatrix,
    k: usize,
) -> Result<TrustworthinessContinuity> {
    check_rank_pair(original, embedded, k)?;
    Ok(TrustworthinessContinuity {
        trustworthiness: score(original, embedded, k),
        continuity: score(embedded, original, k),
    })
}

pub fn trustworthiness_from_ranks(
    original: &RankMatrix,
    embedded: &RankMatrix,
    k: usize,
) -> Result<f64> {
    check_rank_pair(original, embedded, k)?;
    Ok(score(original, embedded, k))
}

pub fn continuity_from_ranks(original: &RankMatrix, embedded: &RankMatrix, k: usize) -> Result<f64> {
    check_rank_pair(original, embedded, k)?;
    Ok(score(embedded, original, k))
}

/// Scores the neighborhoods of `candidates` against the ranking of
/// `reference`. Trustworthiness is `score(original, embedded)`.
fn score(reference: &RankMatrix, candidates: &RankMatrix, k: usize) -> f64 {
    let penalty = rank_penalty(reference, candidates, k);
    if penalty == 0 {
        return 1.0;
    }

    let n = reference.n_points() as f64;
    let k_f = k as f64;
    let normalizer = if 2 * k < reference.n_points() {
        n * k_f * (2.0 * n - 3.0 * k_f - 1.0)
    } else {
        n * (n - k_f) * (n - k_f - 1.0)
    };
    1.0 - 2.0 * penalty as f64 / normalizer
}

fn rank_penalty(reference: &RankMatrix, candidates: &RankMatrix, k: usize) -> usize {
    (0..reference.n_points())
        .map(|i| {
            candidates
                .neighbors(i, k)
                .iter()
                .map(|&j| reference.rank(i, j).saturating_sub(k))
                .sum::<usize>()
        })
        .sum()
}
