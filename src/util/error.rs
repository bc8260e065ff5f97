//! Error types for corrsky.

use crate::tile::Tile;
use thiserror::Error;

/// Result alias for corrsky operations.
pub type CorrSkyResult<T> = std::result::Result<T, CorrSkyError>;

/// Errors that can occur while computing a correlation function.
///
/// Configuration problems (`MissingColumn`, `InvalidBinEdges`,
/// `UnknownEstimator`, `UnsupportedEstimator`) surface during validation,
/// before any counting task is scheduled. The remaining variants abort the
/// enclosing batch and propagate to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CorrSkyError {
    /// A required column is absent from an input catalog.
    #[error("column '{column}' does not exist in catalog '{catalog}'")]
    MissingColumn { column: String, catalog: String },
    /// The separation (or radial) bin edges are unusable.
    #[error("invalid bin edges: {reason}")]
    InvalidBinEdges { reason: &'static str },
    /// An estimator name did not resolve to a known estimator.
    #[error("unknown estimator '{name}' (expected 'NAT' or 'DP')")]
    UnknownEstimator { name: String },
    /// The selected estimator cannot drive the requested computation.
    #[error("the {estimator} estimator does not support {operation}")]
    UnsupportedEstimator {
        estimator: &'static str,
        operation: &'static str,
    },
    /// Geometric pruning eliminated every candidate tile pair.
    #[error(
        "no tile pair can hold a point pair within {max_separation_deg} deg; \
         check bin edges and their units"
    )]
    NoOverlap { max_separation_deg: f64 },
    /// Partial histograms of inconsistent shape reached the aggregator.
    #[error(
        "histogram shape mismatch: expected {expected_sep}x{expected_los} bins, \
         got {got_sep}x{got_los}"
    )]
    ShapeMismatch {
        expected_sep: usize,
        expected_los: usize,
        got_sep: usize,
        got_los: usize,
    },
    /// A counting task failed for the identified tile(s).
    #[error("counting {label} failed for {}: {reason}", PairDesc(.left, .right))]
    Counting {
        label: &'static str,
        left: Tile,
        right: Option<Tile>,
        reason: String,
    },
    /// The aggregator was invoked with zero histograms.
    #[error("no partial histograms to aggregate")]
    EmptyBatch,
}

struct PairDesc<'a>(&'a Tile, &'a Option<Tile>);

impl std::fmt::Display for PairDesc<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.1 {
            Some(right) => write!(f, "({}, {})", self.0, right),
            None => write!(f, "{}", self.0),
        }
    }
}
