use crate::customer::CustomerId;
use crate::error::ModelOutputError;
use crate::record::CanonicalRecord;
use crate::segment::{RiskBand, Segment};
use crate::vector::{FeatureVector, ScaledFeatureVector};
use serde::Serialize;

/// Which prediction a fault was raised against. The value and risk models
/// run independently, so one can fail while the other succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStage {
    Value,
    Risk,
}

/// A contract violation recorded against a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreFault {
    pub stage: PredictionStage,
    pub error: ModelOutputError,
}

/// The complete scored view of one customer. Built once by the scoring
/// engine and never mutated afterwards.
///
/// Predictions are `Option` because a defective model output withholds that
/// prediction rather than fabricating a value; the corresponding fault in
/// `faults` explains the gap. `confidence_score` is defined as
/// `1 - risk_probability` and is present exactly when the risk prediction is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    pub record: CanonicalRecord,
    pub features: FeatureVector,
    pub scaled: ScaledFeatureVector,
    pub cluster: u32,
    pub segment: Segment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_band: Option<RiskBand>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<ScoreFault>,
}

impl CustomerProfile {
    /// True when at least one prediction was withheld.
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.faults.is_empty()
    }

    /// Fault recorded for a given stage, if any.
    #[must_use]
    pub fn fault_for(&self, stage: PredictionStage) -> Option<&ScoreFault> {
        self.faults.iter().find(|f| f.stage == stage)
    }
}
