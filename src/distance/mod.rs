//! # Distance Measures
//!
//! Pairwise dissimilarities between two points. Every rank structure in this
//! crate is derived from one of these; Euclidean distance is the default.

use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::utils::as_f64;

pub trait DistanceMeasure: Sync {
    fn distance<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMeasure for Euclidean {
    fn distance<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        let mut squared_dist = 0.0;
        for (&x, &y) in a.iter().zip(b.iter()) {
            let diff = as_f64(x) - as_f64(y);
            squared_dist += diff * diff;
        }
        squared_dist.sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl DistanceMeasure for Manhattan {
    fn distance<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        let mut dist = 0.0;
        for (&x, &y) in a.iter().zip(b.iter()) {
            dist += (as_f64(x) - as_f64(y)).abs();
        }
        dist
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

impl DistanceMeasure for Chebyshev {
    fn distance<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (as_f64(x) - as_f64(y)).abs())
            .fold(0.0, f64::max)
    }
}

/// One minus cosine similarity. A zero vector has similarity 0 with
/// everything, so its distance to any point is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cosine;

impl DistanceMeasure for Cosine {
    fn distance<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        let mut dot_product = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;

        for (&x, &y) in a.iter().zip(b.iter()) {
            let (x, y) = (as_f64(x), as_f64(y));
            dot_product += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }

        let norm_product = (norm_a * norm_b).sqrt();
        let similarity = if norm_product > f64::EPSILON {
            dot_product / norm_product
        } else {
            0.0
        };
        // rounding can push the similarity of parallel vectors past 1
        (1.0 - similarity).max(0.0)
    }
}

/// Runtime choice of distance measure, used where a concrete measure type
/// cannot be threaded through generically (e.g. provider configuration).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Distance {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
    Cosine,
}

impl DistanceMeasure for Distance {
    fn distance<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        match self {
            Distance::Euclidean => Euclidean.distance(a, b),
            Distance::Manhattan => Manhattan.distance(a, b),
            Distance::Chebyshev => Chebyshev.distance(a, b),
            Distance::Cosine => Cosine.distance(a, b),
        }
    }
}
