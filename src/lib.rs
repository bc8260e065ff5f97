//! CorrSky computes two-point correlation function estimates over
//! hierarchically tiled sky catalogs.
//!
//! The crate aligns the tile pairs of one or two catalogs that could hold
//! correlated points, dispatches an independent counting task per pair (and
//! per tile, for same-tile pairs), reduces the partial histograms into one
//! order-independent total per count type, and feeds the totals into the
//! natural or Davis-Peebles estimator. Catalog storage and the production
//! counting kernel are consumed through traits; a reference scalar kernel
//! and an in-memory catalog are included. Parallel dispatch is available
//! via the `rayon` feature and diagnostics via the `tracing` feature.

pub mod alignment;
pub mod bins;
pub mod catalog;
pub mod correlate;
pub mod correlation;
pub mod cosmology;
pub mod dispatch;
pub mod estimator;
pub mod executor;
pub mod histogram;
pub mod kernel;
pub mod params;
pub mod sphere;
pub mod tile;
mod trace;
pub mod util;

pub use alignment::{align_auto, align_cross, TilePair};
pub use bins::Bins;
pub use catalog::{MemoryCatalog, PointBatch, SkyCatalog, TileInfo};
pub use correlate::{compute_autocorrelation, compute_crosscorrelation, Correlator};
pub use correlation::{Correlation, CorrelationKind};
pub use cosmology::Cosmology;
pub use estimator::{davis_peebles_estimate, natural_estimate, EstimatorKind};
pub use executor::Executor;
pub use histogram::{aggregate, Histogram};
pub use kernel::naive::NaiveCounter;
pub use kernel::{KernelPoints, PairCounter, SeparationGrid};
pub use params::{CorrelationParams, CountLabel, CountPlan};
pub use tile::Tile;
pub use util::{CorrSkyError, CorrSkyResult};
