//! Scores two projections of a synthetic labeled dataset.
//!
//! Three Gaussian-ish blobs live in 10 dimensions. One projection keeps the
//! two most spread-out coordinates, the other keeps two noise coordinates.
//!
//! Run with `RUST_LOG=debug cargo run --example evaluate` to see the provider
//! at work.

use ndarray::{Array2, Axis};
use projection_metrics::measures::{
    class_aware_trustworthiness_continuity, local_continuity_meta_criterion,
    mean_relative_rank_error, trustworthiness_continuity,
};
use projection_metrics::{MetricProvider, MetricValue};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const N_PER_CLASS: usize = 60;
const N_FEATURES: usize = 10;

fn blobs(seed: u64) -> (Array2<f64>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centers = [[0.0, 0.0], [8.0, 1.0], [3.0, 9.0]];

    let n = N_PER_CLASS * centers.len();
    let mut data = Array2::zeros((n, N_FEATURES));
    let mut labels = Vec::with_capacity(n);
    for (class, center) in centers.iter().enumerate() {
        for i in 0..N_PER_CLASS {
            let row = class * N_PER_CLASS + i;
            data[[row, 0]] = center[0] + rng.random_range(-1.5..1.5);
            data[[row, 1]] = center[1] + rng.random_range(-1.5..1.5);
            for j in 2..N_FEATURES {
                data[[row, j]] = rng.random_range(-0.5..0.5);
            }
            labels.push(class);
        }
    }
    (data, labels)
}

fn print_report(title: &str, report: &projection_metrics::MetricReport) {
    println!("{}", title);
    for (name, value) in report.iter() {
        match value {
            MetricValue::Scalar(v) => println!("  {:<20} {:.4}", name, v),
            other => println!("  {:<20} {:?}", name, other),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (data, labels) = blobs(42);
    let informative = data.select(Axis(1), &[0, 1]);
    let noise = data.select(Axis(1), &[2, 3]);
    let k = 20;

    println!(
        "{:?}",
        trustworthiness_continuity(data.view(), informative.view(), k)?
    );
    println!(
        "{:?}",
        class_aware_trustworthiness_continuity(data.view(), informative.view(), &labels, k)?
    );
    println!("{:?}", mean_relative_rank_error(data.view(), informative.view(), k)?);
    for k in [20, 50] {
        println!(
            "LCMC k = {}: informative {:.4}, noise {:.4}",
            k,
            local_continuity_meta_criterion(data.view(), informative.view(), k)?,
            local_continuity_meta_criterion(data.view(), noise.view(), k)?
        );
    }

    let names = ["Trustworthiness", "Continuity", "MRRE_XZ", "MRRE_ZX", "LCMC", "CA_TnC"];
    for (title, projection) in [("informative", &informative), ("noise", &noise)] {
        let report = MetricProvider::new(data.view(), projection.view(), &names, k)?
            .with_labels(&labels)
            .run()?;
        print_report(title, &report);
    }
    Ok(())
}
