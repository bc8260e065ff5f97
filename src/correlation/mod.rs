//! Correlation kinds: angular, projected, redshift-space.
//!
//! Each kind is a strategy that knows which catalog columns it needs, which
//! separation grid it bins into, and how to pack a tile's points for the
//! counting kernel. The kind is chosen once, by enum, when the orchestrator
//! is built; nothing downstream inspects types at runtime.

use crate::catalog::{PointBatch, DEC_COLUMN, RA_COLUMN};
use crate::kernel::{KernelPoints, SeparationGrid};
use crate::params::CorrelationParams;
use crate::sphere::project_points;
use crate::util::{CorrSkyError, CorrSkyResult};

mod angular;
mod projected;
mod redshift;

pub use angular::AngularCorrelation;
pub use projected::ProjectedCorrelation;
pub use redshift::RedshiftCorrelation;

/// The family of correlation function being computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrelationKind {
    /// Angular separation on the sky, 1D binning in degrees.
    Angular,
    /// Projected separation x line-of-sight distance, 2D binning in Mpc/h.
    Projected,
    /// Redshift-space comoving separation, 1D binning in Mpc/h.
    Redshift,
}

impl CorrelationKind {
    /// Builds the strategy for this kind, validating the binning setup.
    pub fn build(self, params: &CorrelationParams) -> CorrSkyResult<Box<dyn Correlation>> {
        Ok(match self {
            CorrelationKind::Angular => Box::new(AngularCorrelation::new(params)?),
            CorrelationKind::Projected => Box::new(ProjectedCorrelation::new(params)?),
            CorrelationKind::Redshift => Box::new(RedshiftCorrelation::new(params)?),
        })
    }
}

/// Strategy contract shared by the three correlation kinds.
pub trait Correlation: Send + Sync {
    fn kind(&self) -> CorrelationKind;

    /// The separation grid every counting task bins into.
    fn grid(&self) -> &SeparationGrid;

    /// Columns every input catalog must carry for this computation.
    fn required_columns(&self) -> Vec<&str>;

    /// Packs one tile's points for the counting kernel.
    fn kernel_points(&self, batch: &PointBatch, catalog: &str) -> CorrSkyResult<KernelPoints>;

    /// Largest angular separation (degrees) worth counting, when one can be
    /// derived; alignment uses it to prune tile pairs.
    fn prune_angle_deg(&self) -> Option<f64>;
}

/// Shared packing of coordinates and optional weights.
fn base_points(
    batch: &PointBatch,
    weight_column: Option<&str>,
    catalog: &str,
) -> CorrSkyResult<KernelPoints> {
    let weights = match weight_column {
        Some(column) => Some(require_column(batch, column, catalog)?.to_vec()),
        None => None,
    };
    Ok(KernelPoints {
        ra: batch.ra().to_vec(),
        dec: batch.dec().to_vec(),
        xyz: project_points(batch.ra(), batch.dec()),
        weights,
        radial: None,
    })
}

fn require_column<'a>(
    batch: &'a PointBatch,
    column: &str,
    catalog: &str,
) -> CorrSkyResult<&'a [f64]> {
    batch.column(column).ok_or_else(|| CorrSkyError::MissingColumn {
        column: column.to_owned(),
        catalog: catalog.to_owned(),
    })
}

fn coordinate_columns() -> Vec<&'static str> {
    vec![RA_COLUMN, DEC_COLUMN]
}
