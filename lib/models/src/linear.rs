use crate::error::ModelError;
use genoma_core::{RiskModel, ScaledFeatureVector, ValueModel, FEATURE_DIM};
use serde::{Deserialize, Serialize};

fn dot(coefficients: &[f64; FEATURE_DIM], scaled: &ScaledFeatureVector) -> f64 {
    coefficients
        .iter()
        .zip(scaled.as_array().iter())
        .map(|(c, x)| c * x)
        .sum()
}

fn validate_coefficients(
    kind: &str,
    intercept: f64,
    coefficients: &[f64; FEATURE_DIM],
) -> Result<(), ModelError> {
    if !intercept.is_finite() {
        return Err(ModelError::InvalidArtifact(format!(
            "{kind} intercept is not finite: {intercept}"
        )));
    }
    if !coefficients.iter().all(|c| c.is_finite()) {
        return Err(ModelError::InvalidArtifact(format!(
            "{kind} coefficients contain a non-finite component"
        )));
    }
    Ok(())
}

/// Linear regression over scaled features, used for monetary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    intercept: f64,
    coefficients: [f64; FEATURE_DIM],
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: [f64; FEATURE_DIM]) -> Result<Self, ModelError> {
        let model = Self {
            intercept,
            coefficients,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        validate_coefficients("value model", self.intercept, &self.coefficients)
    }
}

impl ValueModel for LinearRegressor {
    fn predict(&self, scaled: &ScaledFeatureVector) -> f64 {
        self.intercept + dot(&self.coefficients, scaled)
    }
}

/// Logistic regression over scaled features, used for churn risk.
///
/// The output is the plain sigmoid of the linear term, with no clamping:
/// a defective artifact that pushes outputs out of `[0, 1]` must surface
/// downstream instead of being papered over here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    intercept: f64,
    coefficients: [f64; FEATURE_DIM],
}

impl LogisticClassifier {
    pub fn new(intercept: f64, coefficients: [f64; FEATURE_DIM]) -> Result<Self, ModelError> {
        let model = Self {
            intercept,
            coefficients,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        validate_coefficients("risk model", self.intercept, &self.coefficients)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl RiskModel for LogisticClassifier {
    fn predict_probability(&self, scaled: &ScaledFeatureVector) -> f64 {
        sigmoid(self.intercept + dot(&self.coefficients, scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new(100.0, [1.0, 0.0, 2.0, 0.0, -3.0, 0.0]).unwrap();
        let scaled = ScaledFeatureVector::new([10.0, 99.0, 5.0, 99.0, 2.0, 99.0]);
        assert_eq!(model.predict(&scaled), 100.0 + 10.0 + 10.0 - 6.0);
    }

    #[test]
    fn test_sigmoid_midpoint_and_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(20.0) > 0.999);
        assert!(sigmoid(-20.0) < 0.001);
    }

    #[test]
    fn test_logistic_probability_stays_in_unit_interval() {
        let model = LogisticClassifier::new(-1.0, [0.5, -0.25, 1.0, 0.0, 2.0, -0.75]).unwrap();
        for x in [-100.0, -1.0, 0.0, 1.0, 100.0] {
            let p = model.predict_probability(&ScaledFeatureVector::new([x; 6]));
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_non_finite_artifacts_are_rejected() {
        assert!(LinearRegressor::new(f64::NAN, [0.0; 6]).is_err());
        let mut coefficients = [0.0; 6];
        coefficients[5] = f64::NEG_INFINITY;
        assert!(LogisticClassifier::new(0.0, coefficients).is_err());
    }
}
