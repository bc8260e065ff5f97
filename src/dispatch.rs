//! Partition-pair dispatch: one independent counting task per aligned tile
//! pair, plus one per tile for the same-tile pairs of auto counts.
//!
//! Every task is a pure function of its inputs: load the tile(s), pack the
//! points for the kernel, count. Tasks share nothing mutable, so a batch is
//! handed to the executor as-is and the partial histograms are reduced once
//! the whole batch has finished.

use crate::alignment::{align_auto, align_cross, TilePair};
use crate::catalog::SkyCatalog;
use crate::correlation::Correlation;
use crate::executor::Executor;
use crate::histogram::{aggregate, Histogram};
use crate::kernel::PairCounter;
use crate::params::CountPlan;
use crate::tile::Tile;
use crate::trace::{trace_event, trace_span};
use crate::util::{CorrSkyError, CorrSkyResult};

/// Counts pairs across one aligned tile pair.
pub fn count_cross(
    left_catalog: &dyn SkyCatalog,
    right_catalog: &dyn SkyCatalog,
    pair: TilePair,
    correlation: &dyn Correlation,
    counter: &dyn PairCounter,
    label: &'static str,
) -> CorrSkyResult<Histogram> {
    let left_batch = left_catalog.load_tile(pair.left)?;
    let right_batch = right_catalog.load_tile(pair.right)?;
    let left = correlation.kernel_points(&left_batch, left_catalog.name())?;
    let right = correlation.kernel_points(&right_batch, right_catalog.name())?;
    counter
        .count(&left, Some(&right), correlation.grid())
        .map_err(|err| CorrSkyError::Counting {
            label,
            left: pair.left,
            right: Some(pair.right),
            reason: err.to_string(),
        })
}

/// Counts the unique unordered pairs within one tile.
pub fn count_same_tile(
    catalog: &dyn SkyCatalog,
    tile: Tile,
    correlation: &dyn Correlation,
    counter: &dyn PairCounter,
    label: &'static str,
) -> CorrSkyResult<Histogram> {
    let batch = catalog.load_tile(tile)?;
    let points = correlation.kernel_points(&batch, catalog.name())?;
    counter
        .count(&points, None, correlation.grid())
        .map_err(|err| CorrSkyError::Counting {
            label,
            left: tile,
            right: None,
            reason: err.to_string(),
        })
}

#[derive(Clone, Copy)]
enum Work {
    Cross(TilePair),
    SameTile(Tile),
}

/// Auto counts for one catalog: aligned cross-tile pairs plus the same-tile
/// pairs of every tile, all dispatched as one batch and reduced into one
/// histogram.
pub(crate) fn perform_auto_counts(
    catalog: &dyn SkyCatalog,
    correlation: &dyn Correlation,
    counter: &dyn PairCounter,
    executor: Executor,
    plan: &CountPlan,
) -> CorrSkyResult<Histogram> {
    let label = plan.label.as_str();
    let _span = trace_span!("auto_counts", label = label, tiles = catalog.tiles().len()).entered();

    let pairs = align_auto(catalog.tiles(), correlation.prune_angle_deg())?;
    let work: Vec<Work> = pairs
        .into_iter()
        .map(Work::Cross)
        .chain(catalog.tiles().iter().map(|info| Work::SameTile(info.tile)))
        .collect();
    trace_event!(
        "dispatching",
        label = label,
        tasks = work.len(),
        weighted = plan.weighted
    );

    let partials = executor.run(work.len(), |i| match work[i] {
        Work::Cross(pair) => count_cross(catalog, catalog, pair, correlation, counter, label),
        Work::SameTile(tile) => count_same_tile(catalog, tile, correlation, counter, label),
    })?;
    aggregate(partials)
}

/// Cross counts between two catalogs: the aligned tile-pair product
/// dispatched as one batch and reduced into one histogram.
pub(crate) fn perform_cross_counts(
    left_catalog: &dyn SkyCatalog,
    right_catalog: &dyn SkyCatalog,
    correlation: &dyn Correlation,
    counter: &dyn PairCounter,
    executor: Executor,
    plan: &CountPlan,
) -> CorrSkyResult<Histogram> {
    let label = plan.label.as_str();
    let _span = trace_span!(
        "cross_counts",
        label = label,
        left = left_catalog.tiles().len(),
        right = right_catalog.tiles().len()
    )
    .entered();

    let pairs = align_cross(
        left_catalog.tiles(),
        right_catalog.tiles(),
        correlation.prune_angle_deg(),
    );
    trace_event!(
        "dispatching",
        label = label,
        tasks = pairs.len(),
        weighted = plan.weighted
    );

    let partials = executor.run(pairs.len(), |i| {
        count_cross(
            left_catalog,
            right_catalog,
            pairs[i],
            correlation,
            counter,
            label,
        )
    })?;
    aggregate(partials)
}
