//! Capability traits implemented by the pre-fitted model artifacts.
//!
//! Every trait here is read-only and deterministic: the same input must
//! produce the same output for the lifetime of the loaded artifact. No
//! training or fitting happens behind these interfaces.

use crate::vector::{FeatureVector, ScaledFeatureVector};

/// Standardizes raw feature vectors into the space the models were fitted in.
pub trait FeatureScaler: Send + Sync {
    /// Apply the fitted transformation componentwise.
    fn apply(&self, features: &FeatureVector) -> ScaledFeatureVector;
}

/// Assigns a scaled vector to one of the fitted behavioral clusters.
pub trait PartitionModel: Send + Sync {
    /// Return the cluster id for this vector. Ids are small and dense but
    /// callers must tolerate ids outside the labeled range.
    fn assign(&self, scaled: &ScaledFeatureVector) -> u32;
}

/// Predicts expected monetary value from a scaled vector.
pub trait ValueModel: Send + Sync {
    /// Predicted value in currency units. Finiteness is validated by the
    /// caller, not assumed here.
    fn predict(&self, scaled: &ScaledFeatureVector) -> f64;
}

/// Predicts churn-risk probability from a scaled vector.
pub trait RiskModel: Send + Sync {
    /// Probability in `[0, 1]`. Implementations must not clamp out-of-range
    /// outputs to hide a defective artifact; the caller validates the
    /// contract and withholds the prediction on violation.
    fn predict_probability(&self, scaled: &ScaledFeatureVector) -> f64;
}
