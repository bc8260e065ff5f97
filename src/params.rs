//! Correlation parameters and per-count-type plans.
//!
//! [`CorrelationParams`] is built once, validated once, and never mutated
//! afterwards; the per-count-type [`CountPlan`]s are derived from it up
//! front instead of patching a shared parameter bag between count types.

use crate::bins::Bins;
use crate::cosmology::Cosmology;
use crate::util::CorrSkyResult;

/// Immutable configuration for one correlation computation.
///
/// Defaults reproduce a small angular-correlation setup: 33 logarithmic
/// separation bins from 0.01 deg in 0.1 dex steps, unweighted, with the
/// `wei`/`z` column names and an `(0.25, 0.75)` flat-lambda cosmology.
#[derive(Clone, Debug)]
pub struct CorrelationParams {
    /// Smallest separation edge (degrees for angular, Mpc/h otherwise).
    pub sep_min: f64,
    /// Bin width: linear units, or dex when `log_sep` is set.
    pub sep_step: f64,
    /// Number of separation bins.
    pub n_sep: usize,
    /// Logarithmic separation bins.
    pub log_sep: bool,
    /// Explicit separation edges; overrides min/step/count.
    pub sep_edges: Option<Vec<f64>>,
    /// Number of line-of-sight bins (projected correlations).
    pub n_radial: usize,
    /// Line-of-sight bin width in Mpc/h, starting at zero.
    pub radial_step: f64,
    /// Multiply pair counts by the product of point weights.
    pub use_weights: bool,
    /// Name of the weight column.
    pub weight_column: String,
    /// Name of the redshift column.
    pub redshift_column: String,
    /// Cosmology for redshift-to-distance conversion.
    pub cosmology: Cosmology,
    /// Skip tile pairs whose separation lower bound exceeds the largest
    /// separation edge (angular correlations only).
    pub prune_tiles: bool,
}

impl Default for CorrelationParams {
    fn default() -> Self {
        Self {
            sep_min: 0.01,
            sep_step: 0.1,
            n_sep: 33,
            log_sep: true,
            sep_edges: None,
            n_radial: 1,
            radial_step: 40.0,
            use_weights: false,
            weight_column: "wei".to_owned(),
            redshift_column: "z".to_owned(),
            cosmology: Cosmology::default(),
            prune_tiles: false,
        }
    }
}

impl CorrelationParams {
    /// Separation bin edges, explicit or generated from min/step/count.
    pub fn separation_bins(&self) -> CorrSkyResult<Bins> {
        if let Some(edges) = &self.sep_edges {
            return Bins::from_edges(edges.clone());
        }
        if self.log_sep {
            Bins::logarithmic(self.sep_min, self.sep_step, self.n_sep)
        } else {
            Bins::linear(self.sep_min, self.sep_step, self.n_sep)
        }
    }

    /// Line-of-sight bin edges, linear from zero.
    pub fn radial_bins(&self) -> CorrSkyResult<Bins> {
        Bins::linear(0.0, self.radial_step, self.n_radial)
    }

    /// Checks the binning configuration without building anything else.
    pub fn validate(&self) -> CorrSkyResult<()> {
        self.separation_bins()?;
        Ok(())
    }
}

/// Which point sets a count pairs up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountLabel {
    /// Data x data.
    Dd,
    /// Random x random.
    Rr,
    /// Cross-catalog x data.
    Cd,
    /// Cross-catalog x random.
    Cr,
}

impl CountLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountLabel::Dd => "DD",
            CountLabel::Rr => "RR",
            CountLabel::Cd => "CD",
            CountLabel::Cr => "CR",
        }
    }
}

/// Derived, immutable settings for one count type.
#[derive(Clone, Debug)]
pub struct CountPlan {
    pub label: CountLabel,
    pub weighted: bool,
}

/// Plans for the natural estimator's two auto counts.
pub fn dd_rr_plans(params: &CorrelationParams) -> (CountPlan, CountPlan) {
    (
        CountPlan {
            label: CountLabel::Dd,
            weighted: params.use_weights,
        },
        CountPlan {
            label: CountLabel::Rr,
            weighted: params.use_weights,
        },
    )
}

/// Plans for the Davis-Peebles estimator's two cross counts.
pub fn cd_cr_plans(params: &CorrelationParams) -> (CountPlan, CountPlan) {
    (
        CountPlan {
            label: CountLabel::Cd,
            weighted: params.use_weights,
        },
        CountPlan {
            label: CountLabel::Cr,
            weighted: params.use_weights,
        },
    )
}
