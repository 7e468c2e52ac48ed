use crate::error::ModelError;
use genoma_core::{FeatureScaler, FeatureVector, ScaledFeatureVector, FEATURE_DIM};
use serde::{Deserialize, Serialize};

/// Componentwise standardization fitted offline: `(x - mean) / scale`.
///
/// The statistics come from the training corpus and are loaded as an
/// artifact; nothing is ever re-fitted at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: [f64; FEATURE_DIM],
    scale: [f64; FEATURE_DIM],
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURE_DIM], scale: [f64; FEATURE_DIM]) -> Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// A scaler that leaves features untouched. Useful for tests and for
    /// deployments whose models were fitted on unscaled data.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURE_DIM],
            scale: [1.0; FEATURE_DIM],
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if !self.mean.iter().all(|v| v.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "scaler mean contains a non-finite component".to_string(),
            ));
        }
        for (index, scale) in self.scale.iter().enumerate() {
            if !scale.is_finite() || *scale <= 0.0 {
                return Err(ModelError::InvalidArtifact(format!(
                    "scaler scale[{index}] must be a positive finite number, got {scale}"
                )));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn apply(&self, features: &FeatureVector) -> ScaledFeatureVector {
        let raw = features.as_array();
        let mut scaled = [0.0_f64; FEATURE_DIM];
        for i in 0..FEATURE_DIM {
            scaled[i] = (raw[i] - self.mean[i]) / self.scale[i];
        }
        ScaledFeatureVector::new(scaled)
    }
}
