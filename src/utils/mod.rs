use std::fmt::Debug;
use std::hash::Hash;

use ahash::AHashMap;
use ndarray::ArrayView2;
use num_traits::{Float, ToPrimitive};

use crate::error::{InvalidInputError, Result};

/// Trait for types that can be used to identify classes
pub trait ClassLabel: Clone + Eq + Hash + Debug {}

// Implement ClassLabel for common types
impl ClassLabel for String {}
impl ClassLabel for &str {}
impl ClassLabel for bool {}
impl ClassLabel for u8 {}
impl ClassLabel for i32 {}
impl ClassLabel for i64 {}
impl ClassLabel for u32 {}
impl ClassLabel for u64 {}
impl ClassLabel for usize {}

/// Labels encoded as dense class ids, numbered in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAssignment {
    ids: Vec<usize>,
    names: Vec<String>,
}

impl ClassAssignment {
    pub fn encode<L: ClassLabel>(labels: &[L]) -> Self {
        let mut lookup: AHashMap<&L, usize> = AHashMap::new();
        let mut names = Vec::new();
        let ids = labels
            .iter()
            .map(|label| {
                *lookup.entry(label).or_insert_with(|| {
                    names.push(format!("{:?}", label));
                    names.len() - 1
                })
            })
            .collect();

        Self { ids, names }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.names.len()
    }

    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn class_name(&self, class: usize) -> &str {
        &self.names[class]
    }

    /// Point indices of every class, in ascending order inside each class.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.names.len()];
        for (point, &class) in self.ids.iter().enumerate() {
            members[class].push(point);
        }
        members
    }

    /// Checks the labeling covers `n_points` and every class can hold a
    /// neighborhood of size `k`.
    pub fn validate(&self, n_points: usize, k: usize) -> Result<()> {
        if self.ids.len() != n_points {
            return Err(InvalidInputError::LabelCount {
                labels: self.ids.len(),
                points: n_points,
            }
            .into());
        }

        for (class, members) in self.members().iter().enumerate() {
            if members.len() < k + 1 {
                return Err(InvalidInputError::ClassTooSmall {
                    class: self.names[class].clone(),
                    members: members.len(),
                    required: k + 1,
                }
                .into());
            }
        }
        Ok(())
    }
}

pub(crate) fn as_f64<T: ToPrimitive>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

pub(crate) fn validate_point_count(n_points: usize) -> Result<()> {
    if n_points < 2 {
        return Err(InvalidInputError::TooFewPoints(n_points).into());
    }
    Ok(())
}

pub(crate) fn validate_same_length(original: usize, embedded: usize) -> Result<()> {
    if original != embedded {
        return Err(InvalidInputError::ShapeMismatch { original, embedded }.into());
    }
    Ok(())
}

/// `k` must leave at least one candidate per point: `1 <= k <= n - 1`.
pub(crate) fn validate_neighborhood_size(k: usize, n_points: usize) -> Result<()> {
    let max = n_points.saturating_sub(1);
    if k < 1 || k > max {
        return Err(InvalidInputError::NeighborhoodSize {
            k,
            n: n_points,
            max,
        }
        .into());
    }
    Ok(())
}

pub(crate) fn validate_finite<T: Float>(points: ArrayView2<T>) -> Result<()> {
    match points.indexed_iter().find(|(_, value)| !value.is_finite()) {
        Some(((point, feature), _)) => {
            Err(InvalidInputError::NonFinite { point, feature }.into())
        }
        None => Ok(()),
    }
}

/// Shape, size, neighborhood and finiteness checks shared by every
/// points-level entry, run before any distance is computed.
pub(crate) fn validate_pair<T: Float>(
    original: ArrayView2<T>,
    embedded: ArrayView2<T>,
    k: usize,
) -> Result<()> {
    validate_same_length(original.nrows(), embedded.nrows())?;
    validate_point_count(original.nrows())?;
    validate_neighborhood_size(k, original.nrows())?;
    validate_finite(original)?;
    validate_finite(embedded)
}
