//! Angular correlation strategy.

use crate::catalog::PointBatch;
use crate::correlation::{base_points, coordinate_columns, Correlation, CorrelationKind};
use crate::kernel::{KernelPoints, SeparationGrid};
use crate::params::CorrelationParams;
use crate::util::CorrSkyResult;

/// Angular two-point correlation: 1D separation bins in degrees.
pub struct AngularCorrelation {
    grid: SeparationGrid,
    weight_column: Option<String>,
    prune_angle_deg: Option<f64>,
}

impl AngularCorrelation {
    pub fn new(params: &CorrelationParams) -> CorrSkyResult<Self> {
        let sep = params.separation_bins()?;
        let prune_angle_deg = params.prune_tiles.then(|| sep.max_edge());
        Ok(Self {
            grid: SeparationGrid::Angular { sep },
            weight_column: params.use_weights.then(|| params.weight_column.clone()),
            prune_angle_deg,
        })
    }
}

impl Correlation for AngularCorrelation {
    fn kind(&self) -> CorrelationKind {
        CorrelationKind::Angular
    }

    fn grid(&self) -> &SeparationGrid {
        &self.grid
    }

    fn required_columns(&self) -> Vec<&str> {
        let mut columns = coordinate_columns();
        if let Some(column) = &self.weight_column {
            columns.push(column);
        }
        columns
    }

    fn kernel_points(&self, batch: &PointBatch, catalog: &str) -> CorrSkyResult<KernelPoints> {
        base_points(batch, self.weight_column.as_deref(), catalog)
    }

    fn prune_angle_deg(&self) -> Option<f64> {
        self.prune_angle_deg
    }
}
