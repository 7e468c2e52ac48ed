//! Batch report assembly: per-record outcomes, cluster rollups and the
//! executive overview, plus the per-customer intelligence view that combines
//! a profile with its most similar peers.

use ahash::AHashMap;
use genoma_core::{
    find_similar, CustomerId, CustomerProfile, Feature, FeatureError, FeatureMatrix, RiskBand,
    Segment, SimilarityError,
};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of scoring one input record. A batch completes even when some
/// records fail, so consumers always see one outcome per input row, in
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Scored(CustomerProfile),
    Failed {
        customer_id: CustomerId,
        error: FeatureError,
    },
}

impl RecordOutcome {
    #[inline]
    #[must_use]
    pub fn customer_id(&self) -> &CustomerId {
        match self {
            RecordOutcome::Scored(profile) => &profile.customer_id,
            RecordOutcome::Failed { customer_id, .. } => customer_id,
        }
    }

    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&CustomerProfile> {
        match self {
            RecordOutcome::Scored(profile) => Some(profile),
            RecordOutcome::Failed { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_scored(&self) -> bool {
        matches!(self, RecordOutcome::Scored(_))
    }
}

/// Aggregate view of one behavioral cluster within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: u32,
    pub segment: Segment,
    pub customers: usize,
    pub avg_spend: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_predicted_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_risk: Option<f64>,
}

/// Customer counts per risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RiskBandCounts {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

impl RiskBandCounts {
    fn record(&mut self, band: RiskBand) {
        match band {
            RiskBand::Low => self.low += 1,
            RiskBand::Moderate => self.moderate += 1,
            RiskBand::High => self.high += 1,
        }
    }
}

/// Executive overview of a scored batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOverview {
    pub customers: usize,
    pub scored: usize,
    pub failed: usize,
    pub degraded: usize,
    pub distinct_clusters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_orders: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_spend: Option<f64>,
    pub risk_bands: RiskBandCounts,
}

/// One peer row in a customer's similarity ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarCustomer {
    pub customer_id: CustomerId,
    pub similarity: f64,
    pub total_spend: f64,
}

/// Everything known about a single customer after scoring: the full profile,
/// its nearest peers, and the segment playbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerIntelligence {
    pub profile: CustomerProfile,
    pub similar: Vec<SimilarCustomer>,
    pub recommended_action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<&'static str>,
}

/// The result of scoring one batch. Outcomes preserve input order; the
/// feature matrix is retained internally so similarity lookups can run
/// against the same batch without rescoring.
#[derive(Debug, Clone, Serialize)]
pub struct IntelligenceReport {
    pub report_id: Uuid,
    pub outcomes: Vec<RecordOutcome>,
    pub clusters: Vec<ClusterSummary>,
    pub overview: BatchOverview,
    #[serde(skip)]
    matrix: FeatureMatrix,
}

impl IntelligenceReport {
    pub(crate) fn assemble(
        report_id: Uuid,
        outcomes: Vec<RecordOutcome>,
        matrix: FeatureMatrix,
    ) -> Self {
        let clusters = cluster_summaries(&outcomes);
        let overview = batch_overview(&outcomes, clusters.len());
        Self {
            report_id,
            outcomes,
            clusters,
            overview,
            matrix,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Successfully scored profiles, in input order.
    pub fn profiles(&self) -> impl Iterator<Item = &CustomerProfile> {
        self.outcomes.iter().filter_map(RecordOutcome::profile)
    }

    #[must_use]
    pub fn profile(&self, customer_id: &CustomerId) -> Option<&CustomerProfile> {
        self.profiles().find(|p| &p.customer_id == customer_id)
    }

    /// Scaled feature rows of every scored customer in this batch.
    #[inline]
    #[must_use]
    pub fn feature_matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    /// Rank the `k` customers most similar to `customer_id` and bundle them
    /// with the profile and segment playbook. Customers that failed scoring
    /// have no feature row and report as not found.
    pub fn customer_intelligence(
        &self,
        customer_id: &CustomerId,
        k: usize,
    ) -> Result<CustomerIntelligence, SimilarityError> {
        let profile = self
            .profile(customer_id)
            .ok_or_else(|| SimilarityError::CustomerNotFound(customer_id.clone()))?;
        let ranking = find_similar(customer_id, &self.matrix, k)?;

        let similar = ranking
            .neighbors
            .into_iter()
            .map(|neighbor| {
                let total_spend = self
                    .profile(&neighbor.customer_id)
                    .map(|p| p.features.get(Feature::TotalSpend))
                    .unwrap_or(0.0);
                SimilarCustomer {
                    customer_id: neighbor.customer_id,
                    similarity: neighbor.score,
                    total_spend,
                }
            })
            .collect();

        Ok(CustomerIntelligence {
            profile: profile.clone(),
            similar,
            recommended_action: profile.segment.recommended_action(),
            advisory: profile.risk_band.map(|band| band.advisory()),
        })
    }
}

#[derive(Default)]
struct ClusterAccumulator {
    customers: usize,
    spend: f64,
    value_sum: f64,
    value_count: usize,
    risk_sum: f64,
    risk_count: usize,
}

fn cluster_summaries(outcomes: &[RecordOutcome]) -> Vec<ClusterSummary> {
    let mut by_cluster: AHashMap<u32, ClusterAccumulator> = AHashMap::new();
    for profile in outcomes.iter().filter_map(RecordOutcome::profile) {
        let acc = by_cluster.entry(profile.cluster).or_default();
        acc.customers += 1;
        acc.spend += profile.features.get(Feature::TotalSpend);
        if let Some(value) = profile.predicted_value {
            acc.value_sum += value;
            acc.value_count += 1;
        }
        if let Some(risk) = profile.risk_probability {
            acc.risk_sum += risk;
            acc.risk_count += 1;
        }
    }

    let mut summaries: Vec<ClusterSummary> = by_cluster
        .into_iter()
        .map(|(cluster, acc)| ClusterSummary {
            cluster,
            segment: Segment::from_cluster(cluster),
            customers: acc.customers,
            avg_spend: acc.spend / acc.customers as f64,
            avg_predicted_value: (acc.value_count > 0)
                .then(|| acc.value_sum / acc.value_count as f64),
            avg_risk: (acc.risk_count > 0).then(|| acc.risk_sum / acc.risk_count as f64),
        })
        .collect();
    summaries.sort_by_key(|summary| summary.cluster);
    summaries
}

fn batch_overview(outcomes: &[RecordOutcome], distinct_clusters: usize) -> BatchOverview {
    let customers = outcomes.len();
    let mut scored = 0_usize;
    let mut degraded = 0_usize;
    let mut orders_sum = 0.0;
    let mut spend_sum = 0.0;
    let mut risk_bands = RiskBandCounts::default();

    for profile in outcomes.iter().filter_map(RecordOutcome::profile) {
        scored += 1;
        if profile.is_degraded() {
            degraded += 1;
        }
        orders_sum += profile.features.get(Feature::TotalOrders);
        spend_sum += profile.features.get(Feature::TotalSpend);
        if let Some(band) = profile.risk_band {
            risk_bands.record(band);
        }
    }

    BatchOverview {
        customers,
        scored,
        failed: customers - scored,
        degraded,
        distinct_clusters,
        avg_orders: (scored > 0).then(|| orders_sum / scored as f64),
        avg_spend: (scored > 0).then(|| spend_sum / scored as f64),
        risk_bands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genoma_core::{
        CanonicalRecord, FeatureVector, ModelOutputError, PredictionStage, ScaledFeatureVector,
        ScoreFault,
    };

    fn profile(
        id: u64,
        cluster: u32,
        spend: f64,
        value: Option<f64>,
        risk: Option<f64>,
    ) -> CustomerProfile {
        let features = FeatureVector::new([10.0, 50.0, spend, 50.0, 5.0, 8.0]);
        let mut faults = Vec::new();
        if value.is_none() {
            faults.push(ScoreFault {
                stage: PredictionStage::Value,
                error: ModelOutputError::NonFinitePrediction { value: f64::NAN },
            });
        }
        if risk.is_none() {
            faults.push(ScoreFault {
                stage: PredictionStage::Risk,
                error: ModelOutputError::ProbabilityOutOfRange { value: 1.3 },
            });
        }
        CustomerProfile {
            customer_id: CustomerId::from(id),
            record: CanonicalRecord::from_vector(CustomerId::from(id), &features),
            features,
            scaled: ScaledFeatureVector::new(*features.as_array()),
            cluster,
            segment: Segment::from_cluster(cluster),
            predicted_value: value,
            risk_probability: risk,
            confidence_score: risk.map(|r| 1.0 - r),
            risk_band: risk.map(RiskBand::from_probability),
            faults,
        }
    }

    fn report_of(outcomes: Vec<RecordOutcome>) -> IntelligenceReport {
        let mut matrix = FeatureMatrix::new();
        for outcome in &outcomes {
            if let Some(p) = outcome.profile() {
                matrix.push(p.customer_id.clone(), p.scaled);
            }
        }
        IntelligenceReport::assemble(Uuid::new_v4(), outcomes, matrix)
    }

    #[test]
    fn test_cluster_summaries_sorted_and_averaged() {
        let report = report_of(vec![
            RecordOutcome::Scored(profile(1, 2, 100.0, Some(10.0), Some(0.2))),
            RecordOutcome::Scored(profile(2, 0, 300.0, Some(30.0), Some(0.4))),
            RecordOutcome::Scored(profile(3, 2, 200.0, None, Some(0.6))),
        ]);

        assert_eq!(report.clusters.len(), 2);
        assert_eq!(report.clusters[0].cluster, 0);
        assert_eq!(report.clusters[1].cluster, 2);

        let cluster_two = &report.clusters[1];
        assert_eq!(cluster_two.customers, 2);
        assert_eq!(cluster_two.avg_spend, 150.0);
        // One of the two profiles has no value prediction.
        assert_eq!(cluster_two.avg_predicted_value, Some(10.0));
        assert_eq!(cluster_two.avg_risk, Some((0.2 + 0.6) / 2.0));
    }

    #[test]
    fn test_overview_counts() {
        let report = report_of(vec![
            RecordOutcome::Scored(profile(1, 0, 100.0, Some(10.0), Some(0.1))),
            RecordOutcome::Scored(profile(2, 1, 200.0, None, Some(0.45))),
            RecordOutcome::Failed {
                customer_id: CustomerId::from(3),
                error: FeatureError::MissingFeature(Feature::TotalSpend),
            },
            RecordOutcome::Scored(profile(4, 1, 300.0, Some(20.0), Some(0.9))),
        ]);

        let overview = &report.overview;
        assert_eq!(overview.customers, 4);
        assert_eq!(overview.scored, 3);
        assert_eq!(overview.failed, 1);
        assert_eq!(overview.degraded, 1);
        assert_eq!(overview.distinct_clusters, 2);
        assert_eq!(overview.avg_spend, Some(200.0));
        assert_eq!(
            overview.risk_bands,
            RiskBandCounts {
                low: 1,
                moderate: 1,
                high: 1
            }
        );
    }

    #[test]
    fn test_empty_batch_overview() {
        let report = report_of(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.overview.avg_spend, None);
        assert_eq!(report.overview.avg_orders, None);
        assert!(report.clusters.is_empty());
    }

    #[test]
    fn test_customer_intelligence_attaches_peer_spend() {
        let report = report_of(vec![
            RecordOutcome::Scored(profile(1, 0, 100.0, Some(10.0), Some(0.1))),
            RecordOutcome::Scored(profile(2, 0, 250.0, Some(20.0), Some(0.2))),
        ]);

        let intel = report
            .customer_intelligence(&CustomerId::from(1), 5)
            .unwrap();
        assert_eq!(intel.similar.len(), 1);
        assert_eq!(intel.similar[0].customer_id, CustomerId::from(2));
        assert_eq!(intel.similar[0].total_spend, 250.0);
        assert_eq!(
            intel.recommended_action,
            Segment::LoyalHighValue.recommended_action()
        );
        assert_eq!(intel.advisory, Some(RiskBand::Low.advisory()));
    }

    #[test]
    fn test_customer_intelligence_unknown_id() {
        let report = report_of(vec![RecordOutcome::Scored(profile(
            1,
            0,
            100.0,
            Some(10.0),
            Some(0.1),
        ))]);
        let err = report
            .customer_intelligence(&CustomerId::from(99), 5)
            .unwrap_err();
        assert_eq!(err, SimilarityError::CustomerNotFound(CustomerId::from(99)));
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let outcome = RecordOutcome::Failed {
            customer_id: CustomerId::from(3),
            error: FeatureError::MissingFeature(Feature::TotalSpend),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["customer_id"], 3);
    }
}
