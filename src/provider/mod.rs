//! # Metric Provider
//!
//! Computes several measures over one (original, embedded) pair while ranking
//! each space only once.
//!
//! ```ignore
//! let report = MetricProvider::new(x.view(), z.view(), &["Trustworthiness", "MRRE_XZ"], 20)?
//!     .run()?;
//! let trust = report.get("Trustworthiness").and_then(MetricValue::as_scalar);
//! ```
//!
//! Metric names are resolved against [`Metric`] when the provider is built,
//! so an unknown name fails before any distance is computed.

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::distance::{Distance, DistanceMeasure};
use crate::error::{InvalidInputError, Result, UnknownMetricError};
use crate::measures::{
    class_aware_trustworthiness_continuity_from_distances, continuity_from_ranks,
    local_continuity_meta_criterion_from_ranks, mean_relative_rank_error_from_ranks,
    mrre_xz_from_ranks, mrre_zx_from_ranks, trustworthiness_continuity_from_ranks,
    trustworthiness_from_ranks, MeanRelativeRankError, TrustworthinessContinuity,
};
use crate::rank::{DistanceMatrix, RankMatrix};
use crate::utils::{validate_pair, validate_same_length, ClassAssignment, ClassLabel};

/// Every measure the provider can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Trustworthiness,
    Continuity,
    /// Both scores as one pair.
    TrustworthinessContinuity,
    ClassAwareTrustworthiness,
    ClassAwareContinuity,
    ClassAwareTrustworthinessContinuity,
    MrreXz,
    MrreZx,
    /// Both directions as one pair.
    Mrre,
    Lcmc,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Trustworthiness,
        Metric::Continuity,
        Metric::TrustworthinessContinuity,
        Metric::ClassAwareTrustworthiness,
        Metric::ClassAwareContinuity,
        Metric::ClassAwareTrustworthinessContinuity,
        Metric::MrreXz,
        Metric::MrreZx,
        Metric::Mrre,
        Metric::Lcmc,
    ];

    /// Registry identifier, as accepted by [`Metric::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Metric::Trustworthiness => "Trustworthiness",
            Metric::Continuity => "Continuity",
            Metric::TrustworthinessContinuity => "TnC",
            Metric::ClassAwareTrustworthiness => "CA_Trustworthiness",
            Metric::ClassAwareContinuity => "CA_Continuity",
            Metric::ClassAwareTrustworthinessContinuity => "CA_TnC",
            Metric::MrreXz => "MRRE_XZ",
            Metric::MrreZx => "MRRE_ZX",
            Metric::Mrre => "MRRE",
            Metric::Lcmc => "LCMC",
        }
    }

    pub fn is_class_aware(self) -> bool {
        matches!(
            self,
            Metric::ClassAwareTrustworthiness
                | Metric::ClassAwareContinuity
                | Metric::ClassAwareTrustworthinessContinuity
        )
    }

    /// Resolves every name, reporting all unknown ones at once.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> std::result::Result<Vec<Metric>, UnknownMetricError> {
        let mut metrics = Vec::with_capacity(names.len());
        let mut unknown = Vec::new();
        for name in names {
            match name.as_ref().parse::<Metric>() {
                Ok(metric) => metrics.push(metric),
                Err(err) => unknown.extend(err.names),
            }
        }

        if unknown.is_empty() {
            Ok(metrics)
        } else {
            Err(UnknownMetricError { names: unknown })
        }
    }
}

impl FromStr for Metric {
    type Err = UnknownMetricError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name() == name)
            .ok_or_else(|| UnknownMetricError {
                names: vec![name.to_string()],
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one measure, in the measure's own shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Scalar(f64),
    TrustworthinessContinuity(TrustworthinessContinuity),
    MeanRelativeRankError(MeanRelativeRankError),
}

impl MetricValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            MetricValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_trustworthiness_continuity(&self) -> Option<TrustworthinessContinuity> {
        match self {
            MetricValue::TrustworthinessContinuity(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_mean_relative_rank_error(&self) -> Option<MeanRelativeRankError> {
        match self {
            MetricValue::MeanRelativeRankError(value) => Some(*value),
            _ => None,
        }
    }
}

/// Results of one provider run, in the order the metrics were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricReport {
    entries: Vec<(Metric, MetricValue)>,
}

impl MetricReport {
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.entries
            .iter()
            .find(|(metric, _)| metric.name() == name)
            .map(|(_, value)| value)
    }

    pub fn get_metric(&self, metric: Metric) -> Option<&MetricValue> {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.get_metric(metric).is_some()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(metric, _)| metric.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MetricValue)> {
        self.entries.iter().map(|(metric, value)| (metric.name(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, metric: Metric, value: MetricValue) {
        self.entries.push((metric, value));
    }
}

impl IntoIterator for MetricReport {
    type Item = (Metric, MetricValue);
    type IntoIter = std::vec::IntoIter<(Metric, MetricValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Distance and rank matrices of both spaces, shared by every measure of
/// one run.
#[derive(Debug, Clone)]
pub struct MetricContext {
    original: DistanceMatrix,
    embedded: DistanceMatrix,
    original_ranks: RankMatrix,
    embedded_ranks: RankMatrix,
}

impl MetricContext {
    pub fn new<T, D>(original: ArrayView2<T>, embedded: ArrayView2<T>, measure: &D) -> Result<Self>
    where
        T: Float + FromPrimitive + ToPrimitive + Send + Sync,
        D: DistanceMeasure,
    {
        validate_same_length(original.nrows(), embedded.nrows())?;
        Self::from_distance_matrices(
            DistanceMatrix::from_points(original, measure)?,
            DistanceMatrix::from_points(embedded, measure)?,
        )
    }

    pub fn from_distance_matrices(original: DistanceMatrix, embedded: DistanceMatrix) -> Result<Self> {
        validate_same_length(original.n_points(), embedded.n_points())?;
        let original_ranks = RankMatrix::from_distances(&original);
        let embedded_ranks = RankMatrix::from_distances(&embedded);
        Ok(Self {
            original,
            embedded,
            original_ranks,
            embedded_ranks,
        })
    }

    pub fn n_points(&self) -> usize {
        self.original.n_points()
    }

    pub fn original_distances(&self) -> &DistanceMatrix {
        &self.original
    }

    pub fn embedded_distances(&self) -> &DistanceMatrix {
        &self.embedded
    }

    pub fn original_ranks(&self) -> &RankMatrix {
        &self.original_ranks
    }

    pub fn embedded_ranks(&self) -> &RankMatrix {
        &self.embedded_ranks
    }
}

/// Configuration for a [`MetricProvider`].
///
/// Defaults: no metrics, `k = 20`, Euclidean distance, no labels.
pub struct MetricProviderBuilder<'a, T> {
    original: ArrayView2<'a, T>,
    embedded: ArrayView2<'a, T>,
    metrics: Vec<Metric>,
    k: usize,
    classes: Option<ClassAssignment>,
    distance: Distance,
}

impl<'a, T> MetricProviderBuilder<'a, T>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    pub fn new(original: ArrayView2<'a, T>, embedded: ArrayView2<'a, T>) -> Self {
        Self {
            original,
            embedded,
            metrics: Vec::new(),
            k: 20,
            classes: None,
            distance: Distance::default(),
        }
    }

    /// Appends metrics by registry name. Fails if any name is unknown.
    pub fn metrics<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        self.metrics.extend(Metric::parse_all(names)?);
        Ok(self)
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Class labels, required by the class-aware measures only.
    pub fn labels<L: ClassLabel>(mut self, labels: &[L]) -> Self {
        self.classes = Some(ClassAssignment::encode(labels));
        self
    }

    pub fn distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }

    pub fn build(self) -> MetricProvider<'a, T> {
        MetricProvider {
            original: self.original,
            embedded: self.embedded,
            metrics: self.metrics,
            k: self.k,
            classes: self.classes,
            distance: self.distance,
        }
    }
}

pub struct MetricProvider<'a, T> {
    original: ArrayView2<'a, T>,
    embedded: ArrayView2<'a, T>,
    metrics: Vec<Metric>,
    k: usize,
    classes: Option<ClassAssignment>,
    distance: Distance,
}

impl<'a, T> MetricProvider<'a, T>
where
    T: Float + FromPrimitive + ToPrimitive + Send + Sync,
{
    /// Fails with an unknown-metric error listing every unrecognized name.
    pub fn new<S: AsRef<str>>(
        original: ArrayView2<'a, T>,
        embedded: ArrayView2<'a, T>,
        metric_names: &[S],
        k: usize,
    ) -> Result<Self> {
        Ok(Self::builder(original, embedded)
            .metrics(metric_names)?
            .k(k)
            .build())
    }

    pub fn builder(original: ArrayView2<'a, T>, embedded: ArrayView2<'a, T>) -> MetricProviderBuilder<'a, T> {
        MetricProviderBuilder::new(original, embedded)
    }

    pub fn with_labels<L: ClassLabel>(mut self, labels: &[L]) -> Self {
        self.classes = Some(ClassAssignment::encode(labels));
        self
    }

    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Validates every input, ranks both spaces once and evaluates the
    /// requested metrics in order. A repeated metric is reported once.
    pub fn run(&self) -> Result<MetricReport> {
        validate_pair(self.original, self.embedded, self.k)?;
        if self.metrics.iter().any(|metric| metric.is_class_aware()) {
            self.classes
                .as_ref()
                .ok_or(InvalidInputError::MissingLabels)?
                .validate(self.original.nrows(), self.k)?;
        }

        let mut report = MetricReport::default();
        if self.metrics.is_empty() {
            return Ok(report);
        }

        debug!(
            "evaluating {} metric(s) on {} points with k = {} ({:?} distance)",
            self.metrics.len(),
            self.original.nrows(),
            self.k,
            self.distance
        );
        let context = MetricContext::new(self.original, self.embedded, &self.distance)?;

        let mut class_aware = None;
        for &metric in &self.metrics {
            if report.contains(metric) {
                debug!("{} requested more than once, keeping the first result", metric);
                continue;
            }
            let value = self.evaluate(&context, metric, &mut class_aware)?;
            debug!("{} = {:?}", metric, value);
            report.push(metric, value);
        }
        Ok(report)
    }

    fn evaluate(
        &self,
        context: &MetricContext,
        metric: Metric,
        class_aware: &mut Option<TrustworthinessContinuity>,
    ) -> Result<MetricValue> {
        let (rx, rz, k) = (context.original_ranks(), context.embedded_ranks(), self.k);

        let value = match metric {
            Metric::Trustworthiness => MetricValue::Scalar(trustworthiness_from_ranks(rx, rz, k)?),
            Metric::Continuity => MetricValue::Scalar(continuity_from_ranks(rx, rz, k)?),
            Metric::TrustworthinessContinuity => {
                MetricValue::TrustworthinessContinuity(trustworthiness_continuity_from_ranks(rx, rz, k)?)
            }
            Metric::ClassAwareTrustworthiness
            | Metric::ClassAwareContinuity
            | Metric::ClassAwareTrustworthinessContinuity => {
                let tc = match *class_aware {
                    Some(tc) => tc,
                    None => {
                        let classes = self
                            .classes
                            .as_ref()
                            .ok_or(InvalidInputError::MissingLabels)?;
                        let tc = class_aware_trustworthiness_continuity_from_distances(
                            context.original_distances(),
                            context.embedded_distances(),
                            classes,
                            k,
                        )?;
                        *class_aware = Some(tc);
                        tc
                    }
                };
                match metric {
                    Metric::ClassAwareTrustworthiness => MetricValue::Scalar(tc.trustworthiness),
                    Metric::ClassAwareContinuity => MetricValue::Scalar(tc.continuity),
                    _ => MetricValue::TrustworthinessContinuity(tc),
                }
            }
            Metric::MrreXz => MetricValue::Scalar(mrre_xz_from_ranks(rx, rz, k)?),
            Metric::MrreZx => MetricValue::Scalar(mrre_zx_from_ranks(rx, rz, k)?),
            Metric::Mrre => {
                MetricValue::MeanRelativeRankError(mean_relative_rank_error_from_ranks(rx, rz, k)?)
            }
            Metric::Lcmc => MetricValue::Scalar(local_continuity_meta_criterion_from_ranks(rx, rz, k)?),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Manhattan;
    use crate::error::MetricError;
    use crate::measures::{
        class_aware_trustworthiness_continuity, continuity, local_continuity_meta_criterion,
        mean_relative_rank_error, trustworthiness, trustworthiness_continuity,
    };
    use crate::rank::compute_ranks_with;
    use ndarray::{array, Array2};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn random_points(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Array2::from_shape_fn((rows, cols), |_| rng.random_range(-3.0..3.0))
    }

    #[test]
    fn test_matches_standalone_functions() -> anyhow::Result<()> {
        init();
        let x = random_points(50, 8, 1);
        let z = random_points(50, 2, 2);

        let report = MetricProvider::new(x.view(), z.view(), &["Trustworthiness", "Continuity"], 7)?.run()?;

        assert_eq!(report.len(), 2);
        assert_eq!(
            report.get("Trustworthiness"),
            Some(&MetricValue::Scalar(trustworthiness(x.view(), z.view(), 7)?))
        );
        assert_eq!(
            report.get("Continuity"),
            Some(&MetricValue::Scalar(continuity(x.view(), z.view(), 7)?))
        );
        Ok(())
    }

    #[test]
    fn test_pairs_and_directions() -> anyhow::Result<()> {
        init();
        let x = random_points(40, 5, 3);
        let z = random_points(40, 2, 4);
        let names = ["MRRE", "MRRE_ZX", "TnC", "LCMC", "MRRE_XZ"];

        let report = MetricProvider::new(x.view(), z.view(), &names, 6)?.run()?;
        assert_eq!(report.names(), names.to_vec());

        let mrre = mean_relative_rank_error(x.view(), z.view(), 6)?;
        assert_eq!(report.get("MRRE").and_then(|v| v.as_mean_relative_rank_error()), Some(mrre));
        assert_eq!(report.get("MRRE_XZ").and_then(|v| v.as_scalar()), Some(mrre.mrre_xz));
        assert_eq!(report.get("MRRE_ZX").and_then(|v| v.as_scalar()), Some(mrre.mrre_zx));
        assert_eq!(
            report.get("TnC").and_then(|v| v.as_trustworthiness_continuity()),
            Some(trustworthiness_continuity(x.view(), z.view(), 6)?)
        );
        assert_eq!(
            report.get_metric(Metric::Lcmc).and_then(|v| v.as_scalar()),
            Some(local_continuity_meta_criterion(x.view(), z.view(), 6)?)
        );
        Ok(())
    }

    #[test]
    fn test_unknown_names_fail_before_running() {
        let x = random_points(10, 3, 5);
        let z = random_points(10, 2, 6);

        let result = MetricProvider::new(x.view(), z.view(), &["Trustworthiness", "Bogus", "Stress"], 3);
        match result {
            Err(MetricError::UnknownMetric(err)) => {
                assert_eq!(err.names, vec!["Bogus".to_string(), "Stress".to_string()]);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("unknown metric accepted"),
        }
    }

    #[test]
    fn test_class_aware_metrics() -> anyhow::Result<()> {
        init();
        let x = random_points(30, 4, 7);
        let z = random_points(30, 2, 8);
        let labels: Vec<&str> = (0..30).map(|i| if i < 12 { "a" } else { "b" }).collect();

        let provider = MetricProvider::new(x.view(), z.view(), &["CA_Continuity", "CA_TnC", "CA_Trustworthiness"], 5)?;
        assert_eq!(
            provider.run(),
            Err(MetricError::from(InvalidInputError::MissingLabels))
        );

        let report = provider.with_labels(&labels).run()?;
        let expected = class_aware_trustworthiness_continuity(x.view(), z.view(), &labels, 5)?;
        assert_eq!(report.get("CA_Trustworthiness"), Some(&MetricValue::Scalar(expected.trustworthiness)));
        assert_eq!(report.get("CA_Continuity"), Some(&MetricValue::Scalar(expected.continuity)));
        assert_eq!(
            report.get("CA_TnC"),
            Some(&MetricValue::TrustworthinessContinuity(expected))
        );
        Ok(())
    }

    #[test]
    fn test_labels_are_only_needed_by_class_aware_metrics() -> anyhow::Result<()> {
        let x = random_points(12, 3, 9);
        let z = random_points(12, 2, 10);
        // a singleton class would fail the class-aware checks
        let labels = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];

        let report = MetricProvider::new(x.view(), z.view(), &["LCMC"], 3)?
            .with_labels(&labels)
            .run()?;
        assert_eq!(report.len(), 1);

        let err = MetricProvider::new(x.view(), z.view(), &["LCMC", "CA_TnC"], 3)?
            .with_labels(&labels)
            .run()
            .unwrap_err();
        assert!(err.is_invalid_input());
        Ok(())
    }

    #[test]
    fn test_neighborhood_bounds() -> anyhow::Result<()> {
        let x = random_points(9, 3, 11);
        let z = random_points(9, 2, 12);
        let labels = [1; 9];
        let all: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();

        let report = MetricProvider::new(x.view(), z.view(), all.as_slice(), 8)?
            .with_labels(&labels)
            .run()?;
        assert_eq!(report.len(), Metric::ALL.len());
        assert_eq!(report.get("Trustworthiness"), Some(&MetricValue::Scalar(1.0)));
        assert_eq!(report.get("Continuity"), Some(&MetricValue::Scalar(1.0)));
        assert_eq!(report.get("LCMC"), Some(&MetricValue::Scalar(0.0)));
        for (_, value) in report.iter() {
            if let Some(v) = value.as_scalar() {
                assert!(v.is_finite());
            }
        }

        for k in [0, 9, 10] {
            let err = MetricProvider::new(x.view(), z.view(), &["Trustworthiness"], k)?
                .run()
                .unwrap_err();
            assert!(err.is_invalid_input(), "k = {}", k);
        }
        Ok(())
    }

    #[test]
    fn test_shape_mismatch() -> anyhow::Result<()> {
        let x = random_points(10, 3, 13);
        let z = random_points(11, 2, 14);

        assert_eq!(
            MetricProvider::new(x.view(), z.view(), &["LCMC"], 3)?.run(),
            Err(MetricError::from(InvalidInputError::ShapeMismatch {
                original: 10,
                embedded: 11
            }))
        );
        Ok(())
    }

    #[test]
    fn test_duplicates_and_determinism() -> anyhow::Result<()> {
        let x = random_points(35, 6, 15);
        let z = random_points(35, 3, 16);

        let provider = MetricProvider::new(x.view(), z.view(), &["LCMC", "MRRE", "LCMC"], 4)?;
        let first = provider.run()?;
        let second = provider.run()?;

        assert_eq!(first.names(), vec!["LCMC", "MRRE"]);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_builder_configuration() -> anyhow::Result<()> {
        let x = random_points(30, 4, 17);
        let z = random_points(30, 2, 18);

        let provider = MetricProvider::builder(x.view(), z.view())
            .metric(Metric::Trustworthiness)
            .metrics(&["LCMC"])?
            .k(6)
            .distance(Distance::Manhattan)
            .build();
        assert_eq!(provider.metrics(), &[Metric::Trustworthiness, Metric::Lcmc]);
        assert_eq!(provider.k(), 6);

        let rx = compute_ranks_with(x.view(), &Manhattan)?;
        let rz = compute_ranks_with(z.view(), &Manhattan)?;
        let report = provider.run()?;
        assert_eq!(
            report.get("Trustworthiness"),
            Some(&MetricValue::Scalar(trustworthiness_from_ranks(&rx, &rz, 6)?))
        );

        let empty = MetricProvider::builder(x.view(), z.view()).k(3).build().run()?;
        assert!(empty.is_empty());
        Ok(())
    }

    #[test]
    fn test_context_from_precomputed_distances() -> anyhow::Result<()> {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let z = array![[0.0], [2.0], [1.0], [3.0]];
        let dx = DistanceMatrix::from_points(x.view(), &crate::distance::Euclidean)?;
        let dz = DistanceMatrix::from_points(z.view(), &crate::distance::Euclidean)?;

        let context = MetricContext::from_distance_matrices(dx.clone(), dz)?;
        assert_eq!(context.n_points(), 4);
        assert_eq!(context.original_distances(), &dx);
        assert_eq!(
            trustworthiness_from_ranks(context.original_ranks(), context.embedded_ranks(), 1)?,
            0.375
        );

        let short = DistanceMatrix::from_points(array![[0.0], [1.0]].view(), &crate::distance::Euclidean)?;
        assert!(MetricContext::from_distance_matrices(dx, short).is_err());
        Ok(())
    }

    #[test]
    fn test_registry_names() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>(), Ok(metric));
            assert_eq!(metric.to_string(), metric.name());
        }
        assert!("trustworthiness".parse::<Metric>().is_err());
        assert_eq!(Metric::ALL.iter().filter(|m| m.is_class_aware()).count(), 3);
    }
}
