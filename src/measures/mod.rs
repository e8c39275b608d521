//! # Neighborhood Quality Measures
//!
//! Rank-based scores comparing the neighborhoods of an original dataset with
//! those of its low-dimensional embedding.
//!
//! ## Available Measures
//! - **Trustworthiness & Continuity** ([`trustworthiness_continuity`](mod@trustworthiness_continuity)): false and missing neighbors
//! - **Class-Aware Trustworthiness & Continuity** ([`class_aware`](mod@class_aware)): the same, within each class
//! - **Mean Relative Rank Error** ([`mrre`](mod@mrre)): rank displacement in both directions
//! - **Local Continuity Meta-Criterion** ([`lcmc`](mod@lcmc)): neighbor overlap beyond chance
//!
//! Every measure takes the two point sets directly, recomputing ranks, or
//! precomputed [`RankMatrix`] values via its `*_from_ranks` variant.

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::distance::Euclidean;
use crate::error::Result;
use crate::rank::{compute_ranks_with, RankMatrix};
use crate::utils::{validate_neighborhood_size, validate_pair, validate_same_length};

pub mod class_aware;
pub mod lcmc;
pub mod mrre;
pub mod trustworthiness_continuity;

pub use class_aware::{
    class_aware_trustworthiness_continuity, class_aware_trustworthiness_continuity_from_distances,
};
pub use lcmc::{local_continuity_meta_criterion, local_continuity_meta_criterion_from_ranks};
pub use mrre::{
    mean_relative_rank_error, mean_relative_rank_error_from_ranks, mrre_xz_from_ranks,
    mrre_zx_from_ranks, MeanRelativeRankError,
};
pub use trustworthiness_continuity::{
    continuity, continuity_from_ranks, trustworthiness, trustworthiness_continuity,
    trustworthiness_continuity_from_ranks, trustworthiness_from_ranks, TrustworthinessContinuity,
};

/// Euclidean rank matrices of both spaces, after every input check passed.
pub(crate) fn shared_ranks<T>(
    original: ArrayView2<T>,
    embedded: ArrayView2<T>,
    k: usize,
) -> Result<(RankMatrix, RankMatrix)>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    validate_pair(original, embedded, k)?;
    Ok((
        compute_ranks_with(original, &Euclidean)?,
        compute_ranks_with(embedded, &Euclidean)?,
    ))
}

pub(crate) fn check_rank_pair(original: &RankMatrix, embedded: &RankMatrix, k: usize) -> Result<()> {
    validate_same_length(original.n_points(), embedded.n_points())?;
    validate_neighborhood_size(k, original.n_points())
}
