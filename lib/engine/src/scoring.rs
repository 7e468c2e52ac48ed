//! The scoring pipeline: canonical records in, intelligence report out.
//!
//! Stages run in a fixed order per record: scale, assign cluster, predict
//! value, predict risk. Records that cannot produce a feature vector fail
//! individually without aborting the batch; model outputs that violate
//! their contract withhold just that prediction and leave a fault on the
//! profile.

use crate::error::EngineError;
use crate::report::{IntelligenceReport, RecordOutcome};
use genoma_core::{
    CanonicalRecord, CustomerProfile, FeatureError, FeatureMatrix, ModelOutputError,
    PredictionStage, RiskBand, ScoreFault, Segment,
};
use genoma_models::ModelSet;
use genoma_schema::{build_scaled_vector, ensure_unique_ids, normalize_batch, RawRecord};
use std::sync::Arc;
use uuid::Uuid;

/// Read-only scoring pipeline over one loaded [`ModelSet`].
///
/// The engine holds models behind an `Arc` so several engines (or threads)
/// can share one loaded artifact set; scoring itself never mutates them.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    models: Arc<ModelSet>,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(models: ModelSet) -> Self {
        Self {
            models: Arc::new(models),
        }
    }

    #[must_use]
    pub fn with_shared(models: Arc<ModelSet>) -> Self {
        Self { models }
    }

    #[inline]
    #[must_use]
    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    /// Score a batch of canonical records into an [`IntelligenceReport`].
    ///
    /// Outcomes preserve input order, one per record. Duplicate customer ids
    /// fail the whole batch because every downstream lookup keys by id.
    pub fn score_batch(
        &self,
        records: &[CanonicalRecord],
    ) -> Result<IntelligenceReport, EngineError> {
        ensure_unique_ids(records)?;

        let report_id = Uuid::new_v4();
        let mut outcomes = Vec::with_capacity(records.len());
        let mut matrix = FeatureMatrix::with_capacity(records.len());

        for record in records {
            match self.score_record(record) {
                Ok(profile) => {
                    matrix.push(profile.customer_id.clone(), profile.scaled);
                    outcomes.push(RecordOutcome::Scored(profile));
                }
                Err(error) => {
                    tracing::warn!(
                        customer = %record.customer_id,
                        %error,
                        "record failed feature construction"
                    );
                    outcomes.push(RecordOutcome::Failed {
                        customer_id: record.customer_id.clone(),
                        error,
                    });
                }
            }
        }

        let report = IntelligenceReport::assemble(report_id, outcomes, matrix);
        tracing::info!(
            report = %report.report_id,
            customers = report.overview.customers,
            scored = report.overview.scored,
            failed = report.overview.failed,
            degraded = report.overview.degraded,
            "scored customer batch"
        );
        Ok(report)
    }

    /// Normalize raw rows and score them in one step.
    pub fn score_raw(&self, batch: &[RawRecord]) -> Result<IntelligenceReport, EngineError> {
        let records = normalize_batch(batch)?;
        self.score_batch(&records)
    }

    fn score_record(&self, record: &CanonicalRecord) -> Result<CustomerProfile, FeatureError> {
        let (features, scaled) = build_scaled_vector(record, self.models.scaler.as_ref())?;

        let cluster = self.models.partition.assign(&scaled);
        if let Some(supplied) = record.cluster {
            if supplied != cluster {
                tracing::debug!(
                    customer = %record.customer_id,
                    supplied,
                    computed = cluster,
                    "supplied cluster differs from partition model, using computed assignment"
                );
            }
        }
        let segment = Segment::from_cluster(cluster);

        let mut faults = Vec::new();

        let raw_value = self.models.value.predict(&scaled);
        let predicted_value = if raw_value.is_finite() {
            Some(raw_value)
        } else {
            let error = ModelOutputError::NonFinitePrediction { value: raw_value };
            tracing::warn!(customer = %record.customer_id, %error, "value prediction withheld");
            faults.push(ScoreFault {
                stage: PredictionStage::Value,
                error,
            });
            None
        };

        let raw_risk = self.models.risk.predict_probability(&scaled);
        let (risk_probability, confidence_score, risk_band) =
            if raw_risk.is_finite() && (0.0..=1.0).contains(&raw_risk) {
                (
                    Some(raw_risk),
                    Some(1.0 - raw_risk),
                    Some(RiskBand::from_probability(raw_risk)),
                )
            } else {
                let error = if raw_risk.is_finite() {
                    ModelOutputError::ProbabilityOutOfRange { value: raw_risk }
                } else {
                    ModelOutputError::NonFinitePrediction { value: raw_risk }
                };
                tracing::warn!(customer = %record.customer_id, %error, "risk prediction withheld");
                faults.push(ScoreFault {
                    stage: PredictionStage::Risk,
                    error,
                });
                (None, None, None)
            };

        Ok(CustomerProfile {
            customer_id: record.customer_id.clone(),
            record: record.clone(),
            features,
            scaled,
            cluster,
            segment,
            predicted_value,
            risk_probability,
            confidence_score,
            risk_band,
            faults,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genoma_core::{
        CustomerId, FeatureVector, RiskModel, ScaledFeatureVector, SimilarityError, ValueModel,
    };
    use genoma_models::{NearestCentroid, StandardScaler};
    use genoma_schema::SchemaError;

    struct FixedValue(f64);

    impl ValueModel for FixedValue {
        fn predict(&self, _scaled: &ScaledFeatureVector) -> f64 {
            self.0
        }
    }

    struct FixedRisk(f64);

    impl RiskModel for FixedRisk {
        fn predict_probability(&self, _scaled: &ScaledFeatureVector) -> f64 {
            self.0
        }
    }

    fn engine(value: f64, risk: f64) -> ScoringEngine {
        let models = ModelSet::new(
            StandardScaler::identity(),
            NearestCentroid::new(vec![[0.0; 6], [100.0; 6]]).unwrap(),
            FixedValue(value),
            FixedRisk(risk),
        );
        ScoringEngine::new(models)
    }

    fn record(id: u64, features: [f64; 6]) -> CanonicalRecord {
        CanonicalRecord::from_vector(CustomerId::from(id), &FeatureVector::new(features))
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let engine = engine(100.0, 0.2);
        let records = vec![
            record(5, [1.0; 6]),
            record(2, [2.0; 6]),
            record(9, [3.0; 6]),
        ];
        let report = engine.score_batch(&records).unwrap();
        let ids: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| o.customer_id().clone())
            .collect();
        assert_eq!(
            ids,
            vec![
                CustomerId::from(5),
                CustomerId::from(2),
                CustomerId::from(9)
            ]
        );
    }

    #[test]
    fn test_confidence_complements_risk_exactly() {
        let engine = engine(100.0, 0.35);
        let report = engine.score_batch(&[record(1, [1.0; 6])]).unwrap();
        let profile = report.profile(&CustomerId::from(1)).unwrap();
        assert_eq!(profile.risk_probability, Some(0.35));
        assert_eq!(
            profile.risk_probability.unwrap() + profile.confidence_score.unwrap(),
            1.0
        );
        assert_eq!(profile.risk_band, Some(RiskBand::Moderate));
    }

    #[test]
    fn test_out_of_range_risk_withholds_prediction_only() {
        let engine = engine(100.0, 1.3);
        let report = engine.score_batch(&[record(1, [1.0; 6])]).unwrap();
        let profile = report.profile(&CustomerId::from(1)).unwrap();

        assert!(profile.is_degraded());
        assert_eq!(profile.risk_probability, None);
        assert_eq!(profile.confidence_score, None);
        assert_eq!(profile.risk_band, None);
        // The value prediction is independent and survives.
        assert_eq!(profile.predicted_value, Some(100.0));
        let fault = profile.fault_for(PredictionStage::Risk).unwrap();
        assert_eq!(
            fault.error,
            ModelOutputError::ProbabilityOutOfRange { value: 1.3 }
        );
    }

    #[test]
    fn test_non_finite_value_withholds_value_only() {
        let engine = engine(f64::NAN, 0.2);
        let report = engine.score_batch(&[record(1, [1.0; 6])]).unwrap();
        let profile = report.profile(&CustomerId::from(1)).unwrap();

        assert_eq!(profile.predicted_value, None);
        assert!(profile.fault_for(PredictionStage::Value).is_some());
        assert_eq!(profile.risk_probability, Some(0.2));
        assert_eq!(profile.confidence_score, Some(0.8));
    }

    #[test]
    fn test_duplicate_ids_fail_the_batch() {
        let engine = engine(100.0, 0.2);
        let records = vec![record(1, [1.0; 6]), record(1, [2.0; 6])];
        let err = engine.score_batch(&records).unwrap_err();
        assert_eq!(
            err,
            EngineError::Schema(SchemaError::DuplicateCustomer(CustomerId::from(1)))
        );
    }

    #[test]
    fn test_supplied_cluster_is_recomputed() {
        let engine = engine(100.0, 0.2);
        // Claims cluster 1 but sits on top of centroid 0.
        let records = vec![record(1, [0.0; 6]).with_cluster(1)];
        let report = engine.score_batch(&records).unwrap();
        let profile = report.profile(&CustomerId::from(1)).unwrap();
        assert_eq!(profile.cluster, 0);
        assert_eq!(profile.segment, Segment::LoyalHighValue);
    }

    #[test]
    fn test_failed_record_is_absent_from_matrix() {
        let engine = engine(100.0, 0.2);
        let mut bad = record(2, [1.0; 6]);
        bad.features.remove(&genoma_core::Feature::TotalSpend);
        let records = vec![record(1, [1.0; 6]), bad];

        let report = engine.score_batch(&records).unwrap();
        assert_eq!(report.overview.scored, 1);
        assert_eq!(report.overview.failed, 1);
        assert_eq!(report.feature_matrix().len(), 1);
        assert_eq!(
            report.customer_intelligence(&CustomerId::from(2), 5),
            Err(SimilarityError::CustomerNotFound(CustomerId::from(2)))
        );
    }

    #[test]
    fn test_empty_batch_yields_empty_report() {
        let engine = engine(100.0, 0.2);
        let report = engine.score_batch(&[]).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.overview.customers, 0);
    }
}
