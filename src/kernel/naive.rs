//! Reference all-pairs counting kernel.
//!
//! `NaiveCounter` walks every pair without any spatial acceleration. It
//! exists as the correctness baseline: grid-accelerated kernels must agree
//! with it bin for bin. Per-tile point counts are small enough in practice
//! that the quadratic loop also serves the test and bench workloads.

use crate::histogram::Histogram;
use crate::kernel::{KernelPoints, PairCounter, SeparationGrid};
use crate::sphere::chord_to_separation_deg;
use crate::util::math::chord_distance;
use crate::util::CorrSkyResult;

/// Scalar all-pairs reference kernel.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveCounter;

impl PairCounter for NaiveCounter {
    fn count(
        &self,
        a: &KernelPoints,
        b: Option<&KernelPoints>,
        grid: &SeparationGrid,
    ) -> CorrSkyResult<Histogram> {
        let (n_sep, n_los) = grid.shape();
        let mut histogram = Histogram::zeros(n_sep, n_los);

        match b {
            Some(b) => {
                for i in 0..a.len() {
                    for j in 0..b.len() {
                        record_pair(&mut histogram, grid, a, i, b, j);
                    }
                }
            }
            None => {
                // Unique unordered in-set pairs only.
                for i in 0..a.len() {
                    for j in (i + 1)..a.len() {
                        record_pair(&mut histogram, grid, a, i, a, j);
                    }
                }
            }
        }

        Ok(histogram)
    }
}

fn record_pair(
    histogram: &mut Histogram,
    grid: &SeparationGrid,
    a: &KernelPoints,
    i: usize,
    b: &KernelPoints,
    j: usize,
) {
    let theta_deg = chord_to_separation_deg(chord_distance(a.xyz[i], b.xyz[j]));

    match grid {
        SeparationGrid::Angular { sep } => {
            if let Some(i_sep) = sep.bin_index(theta_deg) {
                histogram.record(i_sep, 0, a.weight(i) * b.weight(j));
            }
        }
        SeparationGrid::Projected { rp, pi } => {
            let da = radial(a, i);
            let db = radial(b, j);
            let half_chord = (0.5 * theta_deg.to_radians()).sin();
            let r_projected = (da + db) * half_chord;
            let r_los = (da - db).abs();
            if let (Some(i_rp), Some(i_pi)) = (rp.bin_index(r_projected), pi.bin_index(r_los)) {
                histogram.record(i_rp, i_pi, a.weight(i) * b.weight(j));
            }
        }
        SeparationGrid::Comoving { sep } => {
            let da = radial(a, i);
            let db = radial(b, j);
            let cos_theta = theta_deg.to_radians().cos();
            let s = (da * da + db * db - 2.0 * da * db * cos_theta).max(0.0).sqrt();
            if let Some(i_sep) = sep.bin_index(s) {
                histogram.record(i_sep, 0, a.weight(i) * b.weight(j));
            }
        }
    }
}

fn radial(points: &KernelPoints, i: usize) -> f64 {
    points
        .radial
        .as_ref()
        .expect("radial distances provided by the correlation strategy")[i]
}
