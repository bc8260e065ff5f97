//! The central aggregation invariant: splitting a point set into tiles and
//! recombining the per-tile and per-pair counts must reproduce the
//! histogram of the unsplit point set, for any tiling.

use corrsky::correlation::Correlation;
use corrsky::dispatch::{count_cross, count_same_tile};
use corrsky::{
    aggregate, align_auto, CorrelationKind, CorrelationParams, Histogram, MemoryCatalog,
    NaiveCounter, PairCounter, PointBatch, SkyCatalog,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_sky(seed: u64, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let ra: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..360.0)).collect();
    let dec: Vec<f64> = (0..n).map(|_| rng.random_range(-60.0..60.0)).collect();
    (ra, dec)
}

fn test_params() -> CorrelationParams {
    CorrelationParams {
        sep_edges: Some(vec![0.0, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0, 180.0]),
        ..CorrelationParams::default()
    }
}

/// Auto counts assembled from the public alignment + dispatch operations.
fn tiled_auto_counts(catalog: &MemoryCatalog, correlation: &dyn Correlation) -> Histogram {
    let pairs = align_auto(catalog.tiles(), correlation.prune_angle_deg()).unwrap();
    let mut partials = Vec::new();
    for pair in pairs {
        partials.push(
            count_cross(catalog, catalog, pair, correlation, &NaiveCounter, "DD").unwrap(),
        );
    }
    for info in catalog.tiles() {
        partials.push(
            count_same_tile(catalog, info.tile, correlation, &NaiveCounter, "DD").unwrap(),
        );
    }
    aggregate(partials).unwrap()
}

fn unsplit_counts(ra: &[f64], dec: &[f64], correlation: &dyn Correlation) -> Histogram {
    let batch = PointBatch::new(ra.to_vec(), dec.to_vec());
    let points = correlation.kernel_points(&batch, "unsplit").unwrap();
    NaiveCounter.count(&points, None, correlation.grid()).unwrap()
}

#[test]
fn tiled_counts_match_the_unsplit_histogram_at_every_order() {
    let (ra, dec) = random_sky(42, 120);
    let params = test_params();
    let correlation = CorrelationKind::Angular.build(&params).unwrap();
    let reference = unsplit_counts(&ra, &dec, correlation.as_ref());
    assert_eq!(reference.total(), (120.0 * 119.0) / 2.0);

    for order in [0u8, 1, 2, 3] {
        let catalog = MemoryCatalog::from_points(format!("order{order}"), order, &ra, &dec);
        let combined = tiled_auto_counts(&catalog, correlation.as_ref());
        // Unweighted counts are integer-valued, so equality is exact.
        assert_eq!(combined, reference, "order {order} tiling broke the sum");
    }
}

#[test]
fn weighted_tiled_counts_match_the_unsplit_histogram() {
    let (ra, dec) = random_sky(7, 80);
    let mut rng = StdRng::seed_from_u64(8);
    let weights: Vec<f64> = (0..80).map(|_| rng.random_range(1..5) as f64).collect();

    let params = CorrelationParams {
        use_weights: true,
        ..test_params()
    };
    let correlation = CorrelationKind::Angular.build(&params).unwrap();

    let batch =
        PointBatch::new(ra.clone(), dec.clone()).with_column("wei", weights.clone());
    let points = correlation.kernel_points(&batch, "unsplit").unwrap();
    let reference = NaiveCounter.count(&points, None, correlation.grid()).unwrap();

    let catalog =
        MemoryCatalog::from_columns("weighted", 2, &ra, &dec, &[("wei", &weights)]);
    let combined = tiled_auto_counts(&catalog, correlation.as_ref());
    // Integer weights keep the sums exact.
    assert_eq!(combined, reference);
}

#[test]
fn pruning_never_removes_a_contributing_pair() {
    // A band of nearby points so short-range bins actually fill, counted
    // with and without tile pruning.
    let mut rng = StdRng::seed_from_u64(3);
    let n = 150;
    let ra: Vec<f64> = (0..n).map(|_| rng.random_range(40.0..70.0)).collect();
    let dec: Vec<f64> = (0..n).map(|_| rng.random_range(-15.0..15.0)).collect();

    let base = CorrelationParams {
        sep_edges: Some(vec![0.0, 0.5, 1.0, 2.0]),
        ..CorrelationParams::default()
    };
    let unpruned = CorrelationKind::Angular.build(&base).unwrap();
    let pruned_params = CorrelationParams {
        prune_tiles: true,
        ..base
    };
    let pruned = CorrelationKind::Angular.build(&pruned_params).unwrap();
    assert!(pruned.prune_angle_deg().is_some());

    let catalog = MemoryCatalog::from_points("band", 3, &ra, &dec);
    let without = tiled_auto_counts(&catalog, unpruned.as_ref());
    let with = tiled_auto_counts(&catalog, pruned.as_ref());
    assert_eq!(with, without);
}
