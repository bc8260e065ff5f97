//! Redshift-space correlation strategy.

use crate::catalog::PointBatch;
use crate::correlation::{
    base_points, coordinate_columns, require_column, Correlation, CorrelationKind,
};
use crate::cosmology::Cosmology;
use crate::kernel::{KernelPoints, SeparationGrid};
use crate::params::CorrelationParams;
use crate::util::CorrSkyResult;

/// Redshift-space two-point correlation: 1D bins of the comoving-space
/// separation in Mpc/h.
pub struct RedshiftCorrelation {
    grid: SeparationGrid,
    weight_column: Option<String>,
    redshift_column: String,
    cosmology: Cosmology,
}

impl RedshiftCorrelation {
    pub fn new(params: &CorrelationParams) -> CorrSkyResult<Self> {
        Ok(Self {
            grid: SeparationGrid::Comoving {
                sep: params.separation_bins()?,
            },
            weight_column: params.use_weights.then(|| params.weight_column.clone()),
            redshift_column: params.redshift_column.clone(),
            cosmology: params.cosmology,
        })
    }
}

impl Correlation for RedshiftCorrelation {
    fn kind(&self) -> CorrelationKind {
        CorrelationKind::Redshift
    }

    fn grid(&self) -> &SeparationGrid {
        &self.grid
    }

    fn required_columns(&self) -> Vec<&str> {
        let mut columns = coordinate_columns();
        columns.push(&self.redshift_column);
        if let Some(column) = &self.weight_column {
            columns.push(column);
        }
        columns
    }

    fn kernel_points(&self, batch: &PointBatch, catalog: &str) -> CorrSkyResult<KernelPoints> {
        let redshifts = require_column(batch, &self.redshift_column, catalog)?;
        let mut points = base_points(batch, self.weight_column.as_deref(), catalog)?;
        points.radial = Some(self.cosmology.comoving_distances(redshifts));
        Ok(points)
    }

    fn prune_angle_deg(&self) -> Option<f64> {
        None
    }
}
