use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of behavioral features every customer vector carries.
pub const FEATURE_DIM: usize = 6;

/// The behavioral features tracked per customer, as a closed set.
///
/// The pre-fitted models were trained against columns in exactly the order
/// given by [`Feature::ORDER`]; every vector in the pipeline uses that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    TotalOrders,
    TotalQuantity,
    TotalSpend,
    AvgOrderValue,
    RecencyDays,
    UniqueProducts,
}

impl Feature {
    /// Positional order of features in every vector. This order is load-bearing:
    /// model coefficients, centroids and scaler statistics are all indexed by it.
    pub const ORDER: [Feature; FEATURE_DIM] = [
        Feature::TotalOrders,
        Feature::TotalQuantity,
        Feature::TotalSpend,
        Feature::AvgOrderValue,
        Feature::RecencyDays,
        Feature::UniqueProducts,
    ];

    /// Canonical column key for this feature.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Feature::TotalOrders => "total_orders",
            Feature::TotalQuantity => "total_quantity",
            Feature::TotalSpend => "total_spend",
            Feature::AvgOrderValue => "avg_order_value",
            Feature::RecencyDays => "recency_days",
            Feature::UniqueProducts => "unique_products",
        }
    }

    /// Position of this feature in [`Feature::ORDER`].
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Feature::TotalOrders => 0,
            Feature::TotalQuantity => 1,
            Feature::TotalSpend => 2,
            Feature::AvgOrderValue => 3,
            Feature::RecencyDays => 4,
            Feature::UniqueProducts => 5,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A customer's raw behavioral features in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_DIM]);

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(values: [f64; FEATURE_DIM]) -> Self {
        Self(values)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_DIM] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// True when every component is a finite number.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }
}

/// A feature vector after standardization, the space all models operate in.
///
/// Kept as a distinct type so raw features can never be handed to a model
/// or to the similarity engine by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledFeatureVector([f64; FEATURE_DIM]);

impl ScaledFeatureVector {
    #[inline]
    #[must_use]
    pub fn new(values: [f64; FEATURE_DIM]) -> Self {
        Self(values)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_DIM] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean norm.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Compute cosine similarity with another scaled vector.
    ///
    /// Returns a value in `[-1, 1]`, or `0.0` when either vector has zero
    /// magnitude so that degenerate rows rank below every genuine match.
    #[inline]
    pub fn cosine_similarity(&self, other: &ScaledFeatureVector) -> f64 {
        let dot: f64 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm_a = self.magnitude();
        let norm_b = other.magnitude();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order_matches_indices() {
        for (i, feature) in Feature::ORDER.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_feature_keys() {
        let keys: Vec<&str> = Feature::ORDER.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec![
                "total_orders",
                "total_quantity",
                "total_spend",
                "avg_order_value",
                "recency_days",
                "unique_products",
            ]
        );
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let v = ScaledFeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!((v.cosine_similarity(&v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let v1 = ScaledFeatureVector::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let v2 = ScaledFeatureVector::new([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((v1.cosine_similarity(&v2)).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_symmetric() {
        let v1 = ScaledFeatureVector::new([0.3, -1.2, 4.5, 0.0, 2.2, -0.7]);
        let v2 = ScaledFeatureVector::new([1.1, 0.4, -2.0, 3.3, 0.9, 1.6]);
        assert_eq!(v1.cosine_similarity(&v2), v2.cosine_similarity(&v1));
    }

    #[test]
    fn test_cosine_similarity_zero_magnitude() {
        let zero = ScaledFeatureVector::new([0.0; FEATURE_DIM]);
        let v = ScaledFeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(zero.cosine_similarity(&v), 0.0);
        assert_eq!(v.cosine_similarity(&zero), 0.0);
        assert_eq!(zero.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_feature_vector_accessors() {
        let v = FeatureVector::new([10.0, 50.0, 500.0, 50.0, 5.0, 8.0]);
        assert_eq!(v.get(Feature::TotalOrders), 10.0);
        assert_eq!(v.get(Feature::TotalSpend), 500.0);
        assert_eq!(v.get(Feature::UniqueProducts), 8.0);
        assert!(v.is_finite());

        let bad = FeatureVector::new([10.0, f64::NAN, 500.0, 50.0, 5.0, 8.0]);
        assert!(!bad.is_finite());
    }

    #[test]
    fn test_feature_serde_uses_canonical_keys() {
        let json = serde_json::to_string(&Feature::AvgOrderValue).unwrap();
        assert_eq!(json, "\"avg_order_value\"");
        let back: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Feature::AvgOrderValue);
    }
}
