use crate::customer::CustomerId;
use crate::vector::ScaledFeatureVector;
use ahash::AHashMap;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Default number of neighbors returned by a similarity lookup.
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("Customer not found in feature matrix: {0}")]
    CustomerNotFound(CustomerId),
}

/// Scaled feature rows for a scored batch, addressable by position and by
/// customer id. Row order is the batch's scoring order, which makes every
/// similarity ranking reproducible for a given input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureMatrix {
    ids: Vec<CustomerId>,
    rows: Vec<ScaledFeatureVector>,
    #[serde(skip)]
    by_id: AHashMap<CustomerId, usize>,
}

impl FeatureMatrix {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            rows: Vec::with_capacity(capacity),
            by_id: AHashMap::with_capacity(capacity),
        }
    }

    /// Append a row. Returns `false` if the id is already present, in which
    /// case the matrix is unchanged.
    pub fn push(&mut self, id: CustomerId, row: ScaledFeatureVector) -> bool {
        if self.by_id.contains_key(&id) {
            return false;
        }
        self.by_id.insert(id.clone(), self.rows.len());
        self.ids.push(id);
        self.rows.push(row);
        true
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[CustomerId] {
        &self.ids
    }

    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&ScaledFeatureVector> {
        self.rows.get(index)
    }

    #[inline]
    #[must_use]
    pub fn position(&self, id: &CustomerId) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}

/// One ranked neighbor of a query customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub customer_id: CustomerId,
    pub score: f64,
}

/// Result of a similarity lookup: neighbors ranked by descending cosine
/// similarity, the query customer excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub customer_id: CustomerId,
    pub neighbors: Vec<Neighbor>,
}

/// Find the `k` customers most similar to `customer_id` within the matrix.
///
/// The query row is excluded by identity, so a duplicate feature profile
/// under a different id still ranks. Ties keep matrix row order, which means
/// repeated calls over the same batch return identical rankings. Cost is a
/// full scan: `O(n * d)` per query.
pub fn find_similar(
    customer_id: &CustomerId,
    matrix: &FeatureMatrix,
    k: usize,
) -> Result<SimilarityResult, SimilarityError> {
    let target_index = matrix
        .position(customer_id)
        .ok_or_else(|| SimilarityError::CustomerNotFound(customer_id.clone()))?;
    let target = &matrix.rows[target_index];

    let mut neighbors: Vec<Neighbor> = matrix
        .rows
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != target_index)
        .map(|(index, row)| Neighbor {
            customer_id: matrix.ids[index].clone(),
            score: target.cosine_similarity(row),
        })
        .collect();

    // Stable sort keeps row order among equal scores.
    neighbors.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    neighbors.truncate(k);

    Ok(SimilarityResult {
        customer_id: customer_id.clone(),
        neighbors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_of(rows: &[(u64, [f64; 6])]) -> FeatureMatrix {
        let mut matrix = FeatureMatrix::with_capacity(rows.len());
        for (id, row) in rows {
            assert!(matrix.push(CustomerId::from(*id), ScaledFeatureVector::new(*row)));
        }
        matrix
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let mut matrix = FeatureMatrix::new();
        assert!(matrix.push(CustomerId::from(1), ScaledFeatureVector::new([1.0; 6])));
        assert!(!matrix.push(CustomerId::from(1), ScaledFeatureVector::new([2.0; 6])));
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_self_is_excluded_by_identity() {
        // Customer 2 is an exact copy of customer 1 under a different id.
        let matrix = matrix_of(&[
            (1, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            (2, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            (3, [-1.0, -2.0, -3.0, -4.0, -5.0, -6.0]),
        ]);
        let result = find_similar(&CustomerId::from(1), &matrix, 5).unwrap();
        assert_eq!(result.neighbors.len(), 2);
        assert_eq!(result.neighbors[0].customer_id, CustomerId::from(2));
        assert!((result.neighbors[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_customer_is_an_error() {
        let matrix = matrix_of(&[(1, [1.0; 6])]);
        let err = find_similar(&CustomerId::from(42), &matrix, 5).unwrap_err();
        assert_eq!(err, SimilarityError::CustomerNotFound(CustomerId::from(42)));
    }

    #[test]
    fn test_k_truncates_and_large_k_is_harmless() {
        let matrix = matrix_of(&[
            (1, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            (2, [1.0, 0.1, 0.0, 0.0, 0.0, 0.0]),
            (3, [1.0, 0.2, 0.0, 0.0, 0.0, 0.0]),
            (4, [0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
        ]);
        let top_one = find_similar(&CustomerId::from(1), &matrix, 1).unwrap();
        assert_eq!(top_one.neighbors.len(), 1);
        assert_eq!(top_one.neighbors[0].customer_id, CustomerId::from(2));

        let all = find_similar(&CustomerId::from(1), &matrix, 100).unwrap();
        assert_eq!(all.neighbors.len(), 3);
    }

    #[test]
    fn test_ties_keep_row_order() {
        // Rows 2 and 3 are both identical to the query, so their scores tie.
        let matrix = matrix_of(&[
            (1, [1.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
            (3, [2.0, 2.0, 0.0, 0.0, 0.0, 0.0]),
            (2, [1.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
        ]);
        let result = find_similar(&CustomerId::from(1), &matrix, 5).unwrap();
        assert_eq!(result.neighbors[0].customer_id, CustomerId::from(3));
        assert_eq!(result.neighbors[1].customer_id, CustomerId::from(2));
    }

    #[test]
    fn test_zero_magnitude_query_scores_zero_everywhere() {
        let matrix = matrix_of(&[
            (1, [0.0; 6]),
            (2, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        ]);
        let result = find_similar(&CustomerId::from(1), &matrix, 5).unwrap();
        assert_eq!(result.neighbors[0].score, 0.0);
    }
}
