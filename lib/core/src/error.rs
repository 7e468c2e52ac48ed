use crate::vector::Feature;
use serde::Serialize;
use thiserror::Error;

/// Failure to turn a canonical record into a feature vector.
///
/// These are record-fatal: the affected customer cannot be scored at all.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FeatureError {
    #[error("Missing feature '{0}' in canonical record")]
    MissingFeature(Feature),

    #[error("Feature '{feature}' is not a finite number: {value}")]
    NonFinite { feature: Feature, value: f64 },
}

/// A model produced a value outside its declared contract.
///
/// Out-of-contract outputs are never clamped or silently corrected; they are
/// surfaced so the affected prediction can be withheld.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ModelOutputError {
    #[error("Risk probability {value} falls outside [0, 1]")]
    ProbabilityOutOfRange { value: f64 },

    #[error("Model returned a non-finite prediction: {value}")]
    NonFinitePrediction { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_error_names_the_canonical_key() {
        let err = FeatureError::MissingFeature(Feature::TotalSpend);
        assert!(err.to_string().contains("total_spend"));
    }

    #[test]
    fn test_model_output_error_reports_the_value() {
        let err = ModelOutputError::ProbabilityOutOfRange { value: 1.3 };
        assert!(err.to_string().contains("1.3"));
    }
}
