//! Correlation setups arriving as JSON configuration, the way driver
//! scripts hand them in.

use corrsky::{
    CorrSkyError, CorrSkyResult, Correlator, CorrelationKind, CorrelationParams, EstimatorKind,
    MemoryCatalog,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "snake_case")]
enum KindConfig {
    #[default]
    Angular,
    Projected,
    Redshift,
}

impl From<KindConfig> for CorrelationKind {
    fn from(value: KindConfig) -> Self {
        match value {
            KindConfig::Angular => CorrelationKind::Angular,
            KindConfig::Projected => CorrelationKind::Projected,
            KindConfig::Redshift => CorrelationKind::Redshift,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ParamsJson {
    kind: KindConfig,
    estimator: String,
    sep_min: f64,
    sep_step: f64,
    n_sep: usize,
    log_sep: bool,
    use_weights: bool,
    weight_column: String,
    redshift_column: String,
    prune_tiles: bool,
}

impl Default for ParamsJson {
    fn default() -> Self {
        let params = CorrelationParams::default();
        Self {
            kind: KindConfig::Angular,
            estimator: "NAT".to_owned(),
            sep_min: params.sep_min,
            sep_step: params.sep_step,
            n_sep: params.n_sep,
            log_sep: params.log_sep,
            use_weights: params.use_weights,
            weight_column: params.weight_column,
            redshift_column: params.redshift_column,
            prune_tiles: params.prune_tiles,
        }
    }
}

impl ParamsJson {
    fn build(self) -> CorrSkyResult<(CorrelationKind, EstimatorKind, CorrelationParams)> {
        let estimator: EstimatorKind = self.estimator.parse()?;
        let params = CorrelationParams {
            sep_min: self.sep_min,
            sep_step: self.sep_step,
            n_sep: self.n_sep,
            log_sep: self.log_sep,
            use_weights: self.use_weights,
            weight_column: self.weight_column,
            redshift_column: self.redshift_column,
            prune_tiles: self.prune_tiles,
            ..CorrelationParams::default()
        };
        Ok((self.kind.into(), estimator, params))
    }
}

#[test]
fn json_setup_drives_a_computation() {
    let json = r#"{
        "kind": "angular",
        "estimator": "NAT",
        "sep_min": 0.5,
        "sep_step": 30.0,
        "n_sep": 4,
        "log_sep": false
    }"#;
    let config: ParamsJson = serde_json::from_str(json).unwrap();
    let (kind, estimator, params) = config.build().unwrap();

    let ra = [10.0, 11.0, 12.0, 190.0, 200.0];
    let dec = [0.0, 1.0, -1.0, 30.0, -30.0];
    let data = MemoryCatalog::from_points("data", 1, &ra, &dec);
    let random = MemoryCatalog::from_points("random", 1, &ra, &dec);

    let correlator = Correlator::new(kind, estimator, params).unwrap();
    let xi = correlator.autocorrelation(&data, &random).unwrap();
    assert_eq!(xi.len(), 4);
}

#[test]
fn defaults_fill_missing_fields() {
    let config: ParamsJson = serde_json::from_str("{}").unwrap();
    let (kind, estimator, params) = config.build().unwrap();
    assert_eq!(kind, CorrelationKind::Angular);
    assert_eq!(estimator, EstimatorKind::Natural);
    assert_eq!(params.weight_column, "wei");
    assert!(params.log_sep);
}

#[test]
fn unknown_estimator_names_are_rejected() {
    let config: ParamsJson =
        serde_json::from_str(r#"{"estimator": "LANDY"}"#).unwrap();
    let err = config.build().unwrap_err();
    assert_eq!(
        err,
        CorrSkyError::UnknownEstimator {
            name: "LANDY".to_owned()
        }
    );
}
