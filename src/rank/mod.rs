//! # Distance and Rank Matrices
//!
//! Pairwise distances for one space and the neighbor ranks derived from them.
//!
//! Ranks are 1-indexed: entry `(i, j)` of a [`RankMatrix`] is the position of
//! point `j` when every other point is ordered by ascending distance from `i`.
//! The self entry `(i, i)` is always `0`. Equal distances are ranked by
//! increasing point index, so a rank matrix is a pure function of its
//! distance matrix.

use std::cmp::Ordering;

use log::debug;
use ndarray::{s, Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};
use num_traits::{Float, FromPrimitive, ToPrimitive};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::distance::{DistanceMeasure, Euclidean};
use crate::error::{InvalidInputError, Result};
use crate::utils::{validate_finite, validate_point_count};

/// Symmetric `n x n` matrix of pairwise distances with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Array2<f64>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances between the rows of `points`.
    ///
    /// Only the upper triangle is evaluated; the lower one is mirrored.
    pub fn from_points<T, D>(points: ArrayView2<T>, measure: &D) -> Result<Self>
    where
        T: Float + FromPrimitive + ToPrimitive + Send + Sync,
        D: DistanceMeasure,
    {
        let n = points.nrows();
        validate_point_count(n)?;
        validate_finite(points)?;

        let mut data = Array2::<f64>::zeros((n, n));
        let fill_row = |(i, mut row): (usize, ArrayViewMut1<f64>)| {
            let a = points.row(i);
            for j in (i + 1)..n {
                row[j] = measure.distance(a, points.row(j));
            }
        };

        #[cfg(feature = "parallel")]
        data.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(fill_row);

        #[cfg(not(feature = "parallel"))]
        data.axis_iter_mut(Axis(0)).enumerate().for_each(fill_row);

        for i in 1..n {
            for j in 0..i {
                data[[i, j]] = data[[j, i]];
            }
        }

        let matrix = Self { data };
        matrix.check_finite()?;
        debug!("computed {}x{} distance matrix", n, n);
        Ok(matrix)
    }

    /// Wraps an externally computed distance matrix.
    ///
    /// The matrix must be square with at least two points and hold finite,
    /// non-negative entries. The diagonal is ignored and reset to zero.
    pub fn from_precomputed(mut data: Array2<f64>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(InvalidInputError::NotSquare { rows, cols }.into());
        }
        validate_point_count(rows)?;

        data.diag_mut().fill(0.0);
        let matrix = Self { data };
        matrix.check_finite()?;
        if let Some(((from, to), &value)) = matrix.data.indexed_iter().find(|(_, &v)| v < 0.0) {
            return Err(InvalidInputError::NegativeDistance { from, to, value }.into());
        }
        Ok(matrix)
    }

    fn check_finite(&self) -> Result<()> {
        match self.data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            Some(((from, to), _)) => Err(InvalidInputError::NonFiniteDistance { from, to }.into()),
            None => Ok(()),
        }
    }

    pub fn n_points(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j]]
    }

    pub fn view(&self) -> ArrayView2<f64> {
        self.data.view()
    }

    /// Distances among `members` only, re-indexed `0..members.len()` in the
    /// order given.
    pub fn submatrix(&self, members: &[usize]) -> Self {
        let data = self
            .data
            .select(Axis(0), members)
            .select(Axis(1), members);
        Self { data }
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

/// Neighbor ranks of every point, together with the rank order itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankMatrix {
    ranks: Array2<usize>,
    // row i lists the other points by ascending rank
    order: Array2<usize>,
}

impl RankMatrix {
    pub fn from_distances(distances: &DistanceMatrix) -> Self {
        let n = distances.n_points();
        let mut ranks = Array2::<usize>::zeros((n, n));
        let mut order = Array2::<usize>::zeros((n, n - 1));

        let rank_point = |i: usize, mut rank_row: ArrayViewMut1<usize>, mut order_row: ArrayViewMut1<usize>| {
            let dist_row = distances.data.row(i);
            let mut others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            // stable: ties stay in index order
            others.sort_by(|&a, &b| {
                dist_row[a]
                    .partial_cmp(&dist_row[b])
                    .unwrap_or(Ordering::Equal)
            });

            rank_row[i] = 0;
            for (position, &j) in others.iter().enumerate() {
                order_row[position] = j;
                rank_row[j] = position + 1;
            }
        };

        let zip = Zip::indexed(ranks.rows_mut()).and(order.rows_mut());

        #[cfg(feature = "parallel")]
        zip.par_for_each(rank_point);

        #[cfg(not(feature = "parallel"))]
        zip.for_each(rank_point);

        debug!("ranked neighbors of {} points", n);
        Self { ranks, order }
    }

    pub fn n_points(&self) -> usize {
        self.ranks.nrows()
    }

    /// Rank of `j` as seen from `i`; `0` when `i == j`.
    pub fn rank(&self, i: usize, j: usize) -> usize {
        self.ranks[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<usize> {
        self.ranks.row(i)
    }

    pub fn ranks(&self) -> ArrayView2<usize> {
        self.ranks.view()
    }

    /// The `k` nearest neighbors of `i`, nearest first. `k` must not exceed
    /// `n - 1`.
    pub fn neighbors(&self, i: usize, k: usize) -> ArrayView1<usize> {
        debug_assert!(k < self.n_points());
        self.order.slice(s![i, ..k])
    }

    pub fn is_neighbor(&self, i: usize, j: usize, k: usize) -> bool {
        let rank = self.ranks[[i, j]];
        rank >= 1 && rank <= k
    }
}

/// Euclidean rank matrix of `points`.
pub fn compute_ranks<T>(points: ArrayView2<T>) -> Result<RankMatrix>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    compute_ranks_with(points, &Euclidean)
}

pub fn compute_ranks_with<T, D>(points: ArrayView2<T>, measure: &D) -> Result<RankMatrix>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
    D: DistanceMeasure,
{
    let distances = DistanceMatrix::from_points(points, measure)?;
    Ok(RankMatrix::from_distances(&distances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Manhattan;
    use crate::error::MetricError;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_distance_matrix_is_symmetric() {
        let points = array![[0.0, 0.0], [3.0, 4.0], [6.0, 8.0], [1.0, 1.0]];
        let distances = DistanceMatrix::from_points(points.view(), &Euclidean).unwrap();

        assert_eq!(distances.n_points(), 4);
        assert_relative_eq!(distances.get(0, 1), 5.0);
        assert_relative_eq!(distances.get(0, 2), 10.0);
        for i in 0..4 {
            assert_eq!(distances.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(distances.get(i, j), distances.get(j, i));
            }
        }
    }

    #[test]
    fn test_ranks_follow_distance() {
        let points = array![[0.0], [1.0], [3.0], [7.0]];
        let ranks = compute_ranks(points.view()).unwrap();

        assert_eq!(ranks.row(0), array![0usize, 1, 2, 3]);
        assert_eq!(ranks.row(2), array![2usize, 1, 0, 3]);
        assert_eq!(ranks.row(3), array![3usize, 2, 1, 0]);
        assert_eq!(ranks.neighbors(2, 2), array![1usize, 0]);
    }

    #[test]
    fn test_ties_are_ranked_by_index() {
        // from point 0 the points 1, 2 and 3 are all at distance 1
        let points = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [-1.0, 0.0], [0.0, 5.0]];
        let ranks = compute_ranks(points.view()).unwrap();

        assert_eq!(ranks.rank(0, 1), 1);
        assert_eq!(ranks.rank(0, 2), 2);
        assert_eq!(ranks.rank(0, 3), 3);
        assert_eq!(ranks.rank(0, 4), 4);
        assert_eq!(ranks.neighbors(0, 3), array![1usize, 2, 3]);
    }

    #[test]
    fn test_duplicate_points_keep_self_rank_zero() {
        let points = array![[2.0, 2.0], [2.0, 2.0], [2.0, 2.0]];
        let ranks = compute_ranks(points.view()).unwrap();

        assert_eq!(ranks.row(0), array![0usize, 1, 2]);
        assert_eq!(ranks.row(1), array![1usize, 0, 2]);
        assert_eq!(ranks.row(2), array![1usize, 2, 0]);
    }

    #[test]
    fn test_every_row_is_a_permutation() {
        let points = array![
            [0.3, 1.2, -0.4],
            [1.1, 0.0, 0.9],
            [-2.0, 0.5, 0.5],
            [0.0, 0.0, 0.0],
            [4.0, -1.0, 2.5],
            [0.3, 1.2, -0.4]
        ];
        let ranks = compute_ranks_with(points.view(), &Manhattan).unwrap();

        for i in 0..ranks.n_points() {
            let mut row: Vec<usize> = ranks.row(i).to_vec();
            row.sort_unstable();
            assert_eq!(row, (0..6).collect::<Vec<_>>());
            assert_eq!(ranks.rank(i, i), 0);
            assert!(!ranks.is_neighbor(i, i, 5));
        }
        // identical rows sit at rank 1 of each other
        assert_eq!(ranks.rank(0, 5), 1);
        assert_eq!(ranks.rank(5, 0), 1);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let single = array![[1.0, 2.0]];
        assert_eq!(
            compute_ranks(single.view()),
            Err(MetricError::from(InvalidInputError::TooFewPoints(1)))
        );

        let empty = Array2::<f64>::zeros((0, 3));
        assert!(compute_ranks(empty.view()).is_err());

        let with_nan = array![[1.0], [f64::NAN]];
        assert_eq!(
            compute_ranks(with_nan.view()),
            Err(MetricError::from(InvalidInputError::NonFinite { point: 1, feature: 0 }))
        );
    }

    #[test]
    fn test_overflowing_distance_is_rejected() {
        let points = array![[f64::MAX], [-f64::MAX]];
        assert!(matches!(
            compute_ranks(points.view()),
            Err(MetricError::InvalidInput(InvalidInputError::NonFiniteDistance { .. }))
        ));
    }

    #[test]
    fn test_precomputed_matrix() {
        let data = array![[9.0, 1.0, 2.0], [1.0, 0.0, 1.0], [2.0, 1.0, 0.0]];
        let distances = DistanceMatrix::from_precomputed(data).unwrap();
        assert_eq!(distances.get(0, 0), 0.0);

        let ranks = RankMatrix::from_distances(&distances);
        assert_eq!(ranks.row(1), array![1usize, 0, 2]);

        assert_eq!(
            DistanceMatrix::from_precomputed(Array2::zeros((2, 3))),
            Err(MetricError::from(InvalidInputError::NotSquare { rows: 2, cols: 3 }))
        );
        assert!(DistanceMatrix::from_precomputed(array![[0.0, -1.0], [-1.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_precomputed(array![[0.0, f64::NAN], [1.0, 0.0]]).is_err());
    }

    #[test]
    fn test_submatrix_reindexes() {
        let points = array![[0.0], [10.0], [1.0], [11.0], [3.0]];
        let distances = DistanceMatrix::from_points(points.view(), &Euclidean).unwrap();
        let sub = distances.submatrix(&[0, 2, 4]);

        assert_eq!(sub.n_points(), 3);
        assert_relative_eq!(sub.get(0, 1), 1.0);
        assert_relative_eq!(sub.get(0, 2), 3.0);
        assert_relative_eq!(sub.get(1, 2), 2.0);
        assert_eq!(sub.view().diag().to_owned(), Array1::<f64>::zeros(3));
    }
}
