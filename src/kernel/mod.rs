//! Pair-counting kernel interface.
//!
//! The production counting routine is an external collaborator; this module
//! pins down the contract it must satisfy and the argument pack it receives.
//! [`naive::NaiveCounter`] is the reference implementation the tests and
//! benches run against.

use crate::bins::Bins;
use crate::histogram::Histogram;
use crate::util::CorrSkyResult;

pub mod naive;

/// One point set, packed for a counting kernel.
///
/// RA/Dec (degrees) and the Cartesian embedding are both provided; kernels
/// pick whichever representation suits them. `weights` and `radial` are
/// present only when the correlation kind requires them.
#[derive(Clone, Debug)]
pub struct KernelPoints {
    /// Right ascension in degrees.
    pub ra: Vec<f64>,
    /// Declination in degrees.
    pub dec: Vec<f64>,
    /// Positions projected on the radius-0.5 embedding sphere.
    pub xyz: Vec<[f64; 3]>,
    /// Per-point weights; `None` counts every point with weight 1.
    pub weights: Option<Vec<f64>>,
    /// Per-point comoving distances (Mpc/h), for projected/redshift kinds.
    pub radial: Option<Vec<f64>>,
}

impl KernelPoints {
    pub fn len(&self) -> usize {
        self.xyz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xyz.is_empty()
    }

    pub(crate) fn weight(&self, i: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[i])
    }
}

/// The separation space a kernel bins pairs into.
///
/// The variant selects the counting routine the way the correlation kind
/// selects a dedicated subroutine in grid-accelerated counting libraries:
/// angular separation in degrees, projected separation crossed with
/// line-of-sight distance, or full comoving-space separation.
#[derive(Clone, Debug)]
pub enum SeparationGrid {
    /// 1D angular separation bins, degrees.
    Angular { sep: Bins },
    /// 2D: projected separation (Mpc/h) x line-of-sight distance (Mpc/h).
    Projected { rp: Bins, pi: Bins },
    /// 1D comoving-space separation bins, Mpc/h.
    Comoving { sep: Bins },
}

impl SeparationGrid {
    /// Histogram shape (separation bins, radial bins) this grid produces.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            SeparationGrid::Angular { sep } | SeparationGrid::Comoving { sep } => (sep.n_bins(), 1),
            SeparationGrid::Projected { rp, pi } => (rp.n_bins(), pi.n_bins()),
        }
    }

    /// Largest angular separation (degrees) this grid can record, when the
    /// separation space is angular. Used to derive tile-pruning bounds.
    pub fn max_angle_deg(&self) -> Option<f64> {
        match self {
            SeparationGrid::Angular { sep } => Some(sep.max_edge()),
            _ => None,
        }
    }
}

/// The opaque pair-counting contract.
///
/// `count(a, Some(b), grid)` bins every pair drawn across the two sets and
/// must be symmetric in `a`/`b`. `count(a, None, grid)` bins every unique
/// unordered pair within `a`: no self-pairs and no pair counted twice.
/// Implementations must be reentrant so independent tasks can share one
/// instance across threads.
pub trait PairCounter: Sync {
    fn count(
        &self,
        a: &KernelPoints,
        b: Option<&KernelPoints>,
        grid: &SeparationGrid,
    ) -> CorrSkyResult<Histogram>;
}
