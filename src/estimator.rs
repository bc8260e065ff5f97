//! Correlation estimators.
//!
//! Closed-form arithmetic over aggregated count histograms and the two
//! catalogs' total point counts. The estimator is picked once, by enum,
//! when the orchestrator is built; estimator names arriving as strings
//! (configuration files, bindings) resolve through `FromStr` and unknown
//! names are rejected immediately.

use std::str::FromStr;

use crate::histogram::Histogram;
use crate::util::{CorrSkyError, CorrSkyResult};

/// Which estimator formula turns counts into a correlation estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstimatorKind {
    /// DD and RR counts only.
    Natural,
    /// CD and CR counts, one catalog as reference.
    DavisPeebles,
}

impl EstimatorKind {
    /// Short conventional name ("NAT" / "DP").
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimatorKind::Natural => "NAT",
            EstimatorKind::DavisPeebles => "DP",
        }
    }

    /// Human-readable name for error messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            EstimatorKind::Natural => "natural",
            EstimatorKind::DavisPeebles => "Davis-Peebles",
        }
    }
}

impl FromStr for EstimatorKind {
    type Err = CorrSkyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NAT" => Ok(EstimatorKind::Natural),
            "DP" => Ok(EstimatorKind::DavisPeebles),
            _ => Err(CorrSkyError::UnknownEstimator { name: s.to_owned() }),
        }
    }
}

/// Natural estimator: `xi = (DD / RR) * (nR (nR - 1)) / (nD (nD - 1)) - 1`
/// per separation bin. Bins with zero RR counts yield NaN rather than a
/// silent zero.
pub fn natural_estimate(
    dd: &Histogram,
    rr: &Histogram,
    n_data: u64,
    n_random: u64,
) -> CorrSkyResult<Vec<f64>> {
    check_shapes(dd, rr)?;
    // Ratio of the total unordered pair counts in the two samples.
    let norm = (n_random as f64 * (n_random as f64 - 1.0))
        / (n_data as f64 * (n_data as f64 - 1.0));
    Ok(dd
        .separation_counts()
        .iter()
        .zip(rr.separation_counts().iter())
        .map(|(&dd, &rr)| if rr > 0.0 { dd / rr * norm - 1.0 } else { f64::NAN })
        .collect())
}

/// Davis-Peebles estimator: `xi = (CD / CR) * (nR / nD) - 1` per separation
/// bin. Bins with zero CR counts yield NaN.
pub fn davis_peebles_estimate(
    cd: &Histogram,
    cr: &Histogram,
    n_data: u64,
    n_random: u64,
) -> CorrSkyResult<Vec<f64>> {
    check_shapes(cd, cr)?;
    let norm = n_random as f64 / n_data as f64;
    Ok(cd
        .separation_counts()
        .iter()
        .zip(cr.separation_counts().iter())
        .map(|(&cd, &cr)| if cr > 0.0 { cd / cr * norm - 1.0 } else { f64::NAN })
        .collect())
}

fn check_shapes(a: &Histogram, b: &Histogram) -> CorrSkyResult<()> {
    if a.shape() != b.shape() {
        let (expected_sep, expected_los) = a.shape();
        let (got_sep, got_los) = b.shape();
        return Err(CorrSkyError::ShapeMismatch {
            expected_sep,
            expected_los,
            got_sep,
            got_los,
        });
    }
    Ok(())
}
