pub mod distance;
pub mod error;
pub mod measures;
pub mod neighbors;
pub mod provider;
pub mod rank;
mod utils;

pub use distance::{Distance, DistanceMeasure};
pub use error::{InvalidInputError, MetricError, Result, UnknownMetricError};
pub use measures::{MeanRelativeRankError, TrustworthinessContinuity};
pub use neighbors::{k_nearest, neighbor_sets};
pub use provider::{Metric, MetricContext, MetricProvider, MetricProviderBuilder, MetricReport, MetricValue};
pub use rank::{compute_ranks, compute_ranks_with, DistanceMatrix, RankMatrix};
pub use utils::{ClassAssignment, ClassLabel};
