use crate::customer::CustomerId;
use crate::vector::{Feature, FeatureVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A customer row after schema normalization: canonical feature keys, numeric
/// values, plus an optional precomputed cluster id carried through from the
/// source system. The cluster is advisory only; the scoring engine always
/// recomputes the assignment from the partition model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub customer_id: CustomerId,
    pub features: HashMap<Feature, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<u32>,
}

impl CanonicalRecord {
    #[inline]
    #[must_use]
    pub fn new(customer_id: CustomerId, features: HashMap<Feature, f64>) -> Self {
        Self {
            customer_id,
            features,
            cluster: None,
        }
    }

    /// Build a complete record from an already-ordered feature vector.
    #[must_use]
    pub fn from_vector(customer_id: CustomerId, vector: &FeatureVector) -> Self {
        let features = Feature::ORDER
            .iter()
            .map(|&f| (f, vector.get(f)))
            .collect();
        Self::new(customer_id, features)
    }

    #[inline]
    #[must_use]
    pub fn with_cluster(mut self, cluster: u32) -> Self {
        self.cluster = Some(cluster);
        self
    }

    #[inline]
    #[must_use]
    pub fn feature(&self, feature: Feature) -> Option<f64> {
        self.features.get(&feature).copied()
    }
}
