//! Separation bin edges.
//!
//! Edges are validated once at construction; kernels and estimators then
//! trust them. Intervals are lower-inclusive and upper-exclusive: a value
//! equal to an interior edge belongs to the higher bin, and a value equal
//! to the last edge is out of range.

use crate::util::{CorrSkyError, CorrSkyResult};

/// A validated, strictly increasing sequence of bin edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    /// Builds bins from an explicit edge sequence.
    ///
    /// Requires at least two edges, all finite, strictly increasing.
    pub fn from_edges(edges: Vec<f64>) -> CorrSkyResult<Self> {
        if edges.len() < 2 {
            return Err(CorrSkyError::InvalidBinEdges {
                reason: "at least two edges are required",
            });
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(CorrSkyError::InvalidBinEdges {
                reason: "edges must be finite",
            });
        }
        if edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CorrSkyError::InvalidBinEdges {
                reason: "edges must be strictly increasing",
            });
        }
        Ok(Self { edges })
    }

    /// `count` bins of width `step` starting at `min`.
    pub fn linear(min: f64, step: f64, count: usize) -> CorrSkyResult<Self> {
        if step <= 0.0 || !step.is_finite() {
            return Err(CorrSkyError::InvalidBinEdges {
                reason: "step must be positive and finite",
            });
        }
        let edges = (0..=count).map(|i| min + step * i as f64).collect();
        Self::from_edges(edges)
    }

    /// `count` bins of width `dex` in log10 space starting at `min`.
    pub fn logarithmic(min: f64, dex: f64, count: usize) -> CorrSkyResult<Self> {
        if min <= 0.0 {
            return Err(CorrSkyError::InvalidBinEdges {
                reason: "logarithmic bins require a positive minimum",
            });
        }
        if dex <= 0.0 || !dex.is_finite() {
            return Err(CorrSkyError::InvalidBinEdges {
                reason: "step must be positive and finite",
            });
        }
        let log_min = min.log10();
        let edges = (0..=count)
            .map(|i| 10f64.powf(log_min + dex * i as f64))
            .collect();
        Self::from_edges(edges)
    }

    /// The edge sequence, length `n_bins() + 1`.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Largest edge; the maximum separation any pair can contribute to.
    pub fn max_edge(&self) -> f64 {
        *self.edges.last().expect("validated to hold >= 2 edges")
    }

    /// Bin index for `value`, or `None` when it falls outside the range.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if value < self.edges[0] || value >= self.max_edge() {
            return None;
        }
        let index = self
            .edges
            .binary_search_by(|probe| probe.total_cmp(&value))
            // Ok marks an exact edge hit, Err the insertion point above it.
            .unwrap_or_else(|i| i - 1);
        Some(index.min(self.n_bins() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::CorrSkyError;

    #[test]
    fn rejects_bad_edge_sequences() {
        assert!(matches!(
            Bins::from_edges(vec![1.0]),
            Err(CorrSkyError::InvalidBinEdges { .. })
        ));
        assert!(matches!(
            Bins::from_edges(vec![2.0, 1.0]),
            Err(CorrSkyError::InvalidBinEdges { .. })
        ));
        assert!(matches!(
            Bins::from_edges(vec![0.0, 1.0, 1.0]),
            Err(CorrSkyError::InvalidBinEdges { .. })
        ));
        assert!(matches!(
            Bins::from_edges(vec![0.0, f64::NAN]),
            Err(CorrSkyError::InvalidBinEdges { .. })
        ));
    }

    #[test]
    fn linear_edges_match_makebins_convention() {
        let bins = Bins::linear(0.01, 0.1, 3).unwrap();
        let expected = [0.01, 0.11, 0.21, 0.31];
        for (edge, want) in bins.edges().iter().zip(expected.iter()) {
            assert!((edge - want).abs() < 1e-12);
        }
        assert_eq!(bins.n_bins(), 3);
    }

    #[test]
    fn logarithmic_edges_are_uniform_in_dex() {
        let bins = Bins::logarithmic(0.01, 0.5, 4).unwrap();
        let ratios: Vec<f64> = bins.edges().windows(2).map(|w| w[1] / w[0]).collect();
        for r in ratios {
            assert!((r - 10f64.powf(0.5)).abs() < 1e-9);
        }
    }

    #[test]
    fn lower_inclusive_upper_exclusive() {
        let bins = Bins::from_edges(vec![0.0, 2.0, 5.0]).unwrap();
        assert_eq!(bins.bin_index(0.0), Some(0));
        assert_eq!(bins.bin_index(1.9), Some(0));
        assert_eq!(bins.bin_index(2.0), Some(1));
        assert_eq!(bins.bin_index(4.999), Some(1));
        assert_eq!(bins.bin_index(5.0), None);
        assert_eq!(bins.bin_index(-0.1), None);
    }
}
