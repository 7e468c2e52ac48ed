use crate::error::ModelError;
use genoma_core::{PartitionModel, ScaledFeatureVector, FEATURE_DIM};
use serde::{Deserialize, Serialize};

/// Cluster assignment by nearest centroid in scaled feature space.
///
/// Centroids are the fitted cluster centers exported from training; the
/// cluster id is the centroid's position in the artifact. Assignment uses
/// squared Euclidean distance, and distance ties resolve to the lowest id so
/// repeated assignment of the same vector is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroid {
    centroids: Vec<[f64; FEATURE_DIM]>,
}

impl NearestCentroid {
    pub fn new(centroids: Vec<[f64; FEATURE_DIM]>) -> Result<Self, ModelError> {
        let model = Self { centroids };
        model.validate()?;
        Ok(model)
    }

    #[inline]
    #[must_use]
    pub fn centroid_count(&self) -> usize {
        self.centroids.len()
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.centroids.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "partition model has no centroids".to_string(),
            ));
        }
        for (index, centroid) in self.centroids.iter().enumerate() {
            if !centroid.iter().all(|v| v.is_finite()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "centroid {index} contains a non-finite component"
                )));
            }
        }
        Ok(())
    }
}

fn squared_distance(a: &[f64; FEATURE_DIM], b: &[f64; FEATURE_DIM]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

impl PartitionModel for NearestCentroid {
    fn assign(&self, scaled: &ScaledFeatureVector) -> u32 {
        let point = scaled.as_array();
        let mut best = 0_usize;
        let mut best_distance = f64::INFINITY;
        for (index, centroid) in self.centroids.iter().enumerate() {
            let distance = squared_distance(point, centroid);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_centroids() -> NearestCentroid {
        NearestCentroid::new(vec![
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [10.0, 10.0, 10.0, 10.0, 10.0, 10.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_assigns_nearest_centroid() {
        let model = two_centroids();
        assert_eq!(model.assign(&ScaledFeatureVector::new([1.0; 6])), 0);
        assert_eq!(model.assign(&ScaledFeatureVector::new([9.0; 6])), 1);
    }

    #[test]
    fn test_tie_resolves_to_lowest_id() {
        let model = two_centroids();
        // Equidistant from both centroids.
        assert_eq!(model.assign(&ScaledFeatureVector::new([5.0; 6])), 0);
    }

    #[test]
    fn test_empty_centroids_rejected() {
        assert!(NearestCentroid::new(Vec::new()).is_err());
    }

    #[test]
    fn test_non_finite_centroid_rejected() {
        let mut centroid = [0.0; FEATURE_DIM];
        centroid[2] = f64::INFINITY;
        assert!(NearestCentroid::new(vec![centroid]).is_err());
    }
}
