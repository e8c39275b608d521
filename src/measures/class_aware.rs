//! # Class-Aware Trustworthiness and Continuity
//!
//! Trustworthiness and continuity computed inside each class: for a point of
//! class `c`, only the other members of `c` are neighbor candidates, ranked
//! among themselves with the usual tie rule. Per-class scores are combined
//! weighted by class size, so a single-class labeling reproduces the plain
//! measure exactly.

use log::trace;
use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::distance::Euclidean;
use crate::error::Result;
use crate::measures::trustworthiness_continuity::{
    trustworthiness_continuity_from_ranks, TrustworthinessContinuity,
};
use crate::rank::{DistanceMatrix, RankMatrix};
use crate::utils::{validate_neighborhood_size, validate_pair, validate_same_length};
use crate::utils::{ClassAssignment, ClassLabel};

/// Fails if `labels` does not cover every point or a class has fewer than
/// `k + 1` members.
pub fn class_aware_trustworthiness_continuity<T, L>(
    original: ArrayView2<T>,
    embedded: ArrayView2<T>,
    labels: &[L],
    k: usize,
) -> Result<TrustworthinessContinuity>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
    L: ClassLabel,
{
    validate_pair(original, embedded, k)?;
    let classes = ClassAssignment::encode(labels);
    classes.validate(original.nrows(), k)?;

    let dx = DistanceMatrix::from_points(original, &Euclidean)?;
    let dz = DistanceMatrix::from_points(embedded, &Euclidean)?;
    class_aware_trustworthiness_continuity_from_distances(&dx, &dz, &classes, k)
}

pub fn class_aware_trustworthiness_continuity_from_distances(
    original: &DistanceMatrix,
    embedded: &DistanceMatrix,
    classes: &ClassAssignment,
    k: usize,
) -> Result<TrustworthinessContinuity> {
    let n = original.n_points();
    validate_same_length(n, embedded.n_points())?;
    validate_neighborhood_size(k, n)?;
    classes.validate(n, k)?;

    let mut combined = TrustworthinessContinuity {
        trustworthiness: 0.0,
        continuity: 0.0,
    };
    for (class, members) in classes.members().iter().enumerate() {
        let rx = RankMatrix::from_distances(&original.submatrix(members));
        let rz = RankMatrix::from_distances(&embedded.submatrix(members));
        let tc = trustworthiness_continuity_from_ranks(&rx, &rz, k)?;
        trace!(
            "class {} ({} points): trustworthiness {}, continuity {}",
            classes.class_name(class),
            members.len(),
            tc.trustworthiness,
            tc.continuity
        );

        let weight = members.len() as f64 / n as f64;
        combined.trustworthiness += weight * tc.trustworthiness;
        combined.continuity += weight * tc.continuity;
    }
    Ok(combined)
}
