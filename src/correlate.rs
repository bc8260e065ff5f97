//! The correlation orchestrator.
//!
//! A [`Correlator`] sequences one computation: validate the catalogs, align
//! tile pairs, dispatch the counting batches, aggregate the partials, and
//! apply the estimator. Nothing persists between calls and any stage
//! failure aborts the whole computation; a correlation estimate is either
//! complete or absent.

use crate::catalog::SkyCatalog;
use crate::correlation::{Correlation, CorrelationKind};
use crate::dispatch::{perform_auto_counts, perform_cross_counts};
use crate::estimator::{davis_peebles_estimate, natural_estimate, EstimatorKind};
use crate::executor::Executor;
use crate::kernel::naive::NaiveCounter;
use crate::kernel::PairCounter;
use crate::params::{cd_cr_plans, dd_rr_plans, CorrelationParams};
use crate::trace::{trace_event, trace_span};
use crate::util::{CorrSkyError, CorrSkyResult};

/// Orchestrates auto- and cross-correlation computations.
///
/// Built once per configuration; the correlation kind, estimator, executor
/// and counting kernel are all fixed at construction. The default kernel is
/// the in-crate reference counter and the default executor is parallel when
/// the `rayon` feature is enabled.
pub struct Correlator<C: PairCounter = NaiveCounter> {
    correlation: Box<dyn Correlation>,
    estimator: EstimatorKind,
    executor: Executor,
    counter: C,
    params: CorrelationParams,
}

impl<C: PairCounter + std::fmt::Debug> std::fmt::Debug for Correlator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Correlator")
            .field("correlation", &self.correlation.kind())
            .field("estimator", &self.estimator)
            .field("executor", &self.executor)
            .field("counter", &self.counter)
            .field("params", &self.params)
            .finish()
    }
}

impl Correlator<NaiveCounter> {
    /// Builds an orchestrator, validating the parameter bundle up front.
    pub fn new(
        kind: CorrelationKind,
        estimator: EstimatorKind,
        params: CorrelationParams,
    ) -> CorrSkyResult<Self> {
        params.validate()?;
        Ok(Self {
            correlation: kind.build(&params)?,
            estimator,
            executor: Executor::default(),
            counter: NaiveCounter,
            params,
        })
    }
}

impl<C: PairCounter> Correlator<C> {
    /// Replaces the executor driving the counting batches.
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// Replaces the counting kernel.
    pub fn with_counter<C2: PairCounter>(self, counter: C2) -> Correlator<C2> {
        Correlator {
            correlation: self.correlation,
            estimator: self.estimator,
            executor: self.executor,
            counter,
            params: self.params,
        }
    }

    /// Checks that every catalog carries the columns this computation
    /// needs, naming the first missing column and its catalog. Runs before
    /// any counting work is scheduled.
    pub fn validate(&self, catalogs: &[&dyn SkyCatalog]) -> CorrSkyResult<()> {
        for catalog in catalogs {
            for column in self.correlation.required_columns() {
                if !catalog.has_column(column) {
                    return Err(CorrSkyError::MissingColumn {
                        column: column.to_owned(),
                        catalog: catalog.name().to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Computes the auto-correlation of `catalog` against the `random`
    /// sample, one estimate per separation bin.
    pub fn autocorrelation(
        &self,
        catalog: &dyn SkyCatalog,
        random: &dyn SkyCatalog,
    ) -> CorrSkyResult<Vec<f64>> {
        if self.estimator != EstimatorKind::Natural {
            return Err(CorrSkyError::UnsupportedEstimator {
                estimator: self.estimator.describe(),
                operation: "autocorrelation",
            });
        }
        self.validate(&[catalog, random])?;

        let _span = trace_span!(
            "autocorrelation",
            data = catalog.name(),
            random = random.name()
        )
        .entered();

        let (dd_plan, rr_plan) = dd_rr_plans(&self.params);
        // DD and RR share no data; run the two batches concurrently.
        let (dd, rr) = self.executor.join(
            || {
                perform_auto_counts(
                    catalog,
                    self.correlation.as_ref(),
                    &self.counter,
                    self.executor,
                    &dd_plan,
                )
            },
            || {
                perform_auto_counts(
                    random,
                    self.correlation.as_ref(),
                    &self.counter,
                    self.executor,
                    &rr_plan,
                )
            },
        );
        let (dd, rr) = (dd?, rr?);
        trace_event!("aggregated", dd_total = dd.total(), rr_total = rr.total());

        natural_estimate(&dd, &rr, catalog.total_rows(), random.total_rows())
    }

    /// Computes the cross-correlation of `left` with `right`, using the
    /// `random` sample as the Davis-Peebles reference.
    pub fn crosscorrelation(
        &self,
        left: &dyn SkyCatalog,
        right: &dyn SkyCatalog,
        random: &dyn SkyCatalog,
    ) -> CorrSkyResult<Vec<f64>> {
        if self.estimator != EstimatorKind::DavisPeebles {
            return Err(CorrSkyError::UnsupportedEstimator {
                estimator: self.estimator.describe(),
                operation: "crosscorrelation",
            });
        }
        self.validate(&[left, right, random])?;

        let _span = trace_span!(
            "crosscorrelation",
            left = left.name(),
            right = right.name(),
            random = random.name()
        )
        .entered();

        let (cd_plan, cr_plan) = cd_cr_plans(&self.params);
        // CD pairs the reference catalog with the data, CR with the
        // randoms; the two batches share no data and run concurrently.
        let (cd, cr) = self.executor.join(
            || {
                perform_cross_counts(
                    right,
                    left,
                    self.correlation.as_ref(),
                    &self.counter,
                    self.executor,
                    &cd_plan,
                )
            },
            || {
                perform_cross_counts(
                    right,
                    random,
                    self.correlation.as_ref(),
                    &self.counter,
                    self.executor,
                    &cr_plan,
                )
            },
        );
        let (cd, cr) = (cd?, cr?);
        trace_event!("aggregated", cd_total = cd.total(), cr_total = cr.total());

        davis_peebles_estimate(&cd, &cr, left.total_rows(), random.total_rows())
    }
}

/// Computes an auto-correlation with the natural estimator, the reference
/// kernel, and the default executor.
pub fn compute_autocorrelation(
    catalog: &dyn SkyCatalog,
    random: &dyn SkyCatalog,
    kind: CorrelationKind,
    params: CorrelationParams,
) -> CorrSkyResult<Vec<f64>> {
    Correlator::new(kind, EstimatorKind::Natural, params)?.autocorrelation(catalog, random)
}

/// Computes a cross-correlation with the Davis-Peebles estimator, the
/// reference kernel, and the default executor.
pub fn compute_crosscorrelation(
    left: &dyn SkyCatalog,
    right: &dyn SkyCatalog,
    random: &dyn SkyCatalog,
    kind: CorrelationKind,
    params: CorrelationParams,
) -> CorrSkyResult<Vec<f64>> {
    Correlator::new(kind, EstimatorKind::DavisPeebles, params)?
        .crosscorrelation(left, right, random)
}
