use thiserror::Error;

/// Reasons an input pair, neighborhood size or labeling is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("at least two points are required, got {0}")]
    TooFewPoints(usize),

    #[error("original data has {original} points but the embedding has {embedded}")]
    ShapeMismatch { original: usize, embedded: usize },

    #[error("non-finite value at point {point}, feature {feature}")]
    NonFinite { point: usize, feature: usize },

    #[error("non-finite distance between points {from} and {to}")]
    NonFiniteDistance { from: usize, to: usize },

    #[error("negative distance {value} between points {from} and {to}")]
    NegativeDistance { from: usize, to: usize, value: f64 },

    #[error("distance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("neighborhood size k = {k} is out of range for {n} points (expected 1 <= k <= {max})")]
    NeighborhoodSize { k: usize, n: usize, max: usize },

    #[error("class-aware measures require class labels")]
    MissingLabels,

    #[error("{labels} labels given for {points} points")]
    LabelCount { labels: usize, points: usize },

    #[error("class {class} has {members} members, at least {required} are required")]
    ClassTooSmall {
        class: String,
        members: usize,
        required: usize,
    },
}

/// One or more metric identifiers that are not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric(s): {}", .names.join(", "))]
pub struct UnknownMetricError {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    UnknownMetric(#[from] UnknownMetricError),
}

impl MetricError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_unknown_metric(&self) -> bool {
        matches!(self, Self::UnknownMetric(_))
    }
}

pub type Result<T> = std::result::Result<T, MetricError>;
