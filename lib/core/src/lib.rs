//! # Genoma Core
//!
//! Core library for the Genoma customer intelligence engine.
//!
//! This crate provides the shared domain model and algorithms:
//!
//! - [`Feature`] / [`FeatureVector`] - The fixed six-feature behavioral vector
//! - [`CanonicalRecord`] - A normalized customer row
//! - [`CustomerProfile`] - The fully scored view of one customer
//! - [`Segment`] / [`RiskBand`] - Static business interpretation tables
//! - [`FeatureMatrix`] / [`find_similar`] - Cosine similarity over a batch
//! - Capability traits ([`FeatureScaler`], [`PartitionModel`], [`ValueModel`],
//!   [`RiskModel`]) implemented by pre-fitted model artifacts
//!
//! ## Example
//!
//! ```rust
//! use genoma_core::{CustomerId, FeatureMatrix, ScaledFeatureVector, find_similar};
//!
//! let mut matrix = FeatureMatrix::new();
//! matrix.push(
//!     CustomerId::from(1),
//!     ScaledFeatureVector::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
//! );
//! matrix.push(
//!     CustomerId::from(2),
//!     ScaledFeatureVector::new([0.9, 0.1, 0.0, 0.0, 0.0, 0.0]),
//! );
//!
//! let result = find_similar(&CustomerId::from(1), &matrix, 5).unwrap();
//! assert_eq!(result.neighbors[0].customer_id, CustomerId::from(2));
//! ```

pub mod customer;
pub mod error;
pub mod model;
pub mod profile;
pub mod record;
pub mod segment;
pub mod similarity;
pub mod vector;

pub use customer::CustomerId;
pub use error::{FeatureError, ModelOutputError};
pub use model::{FeatureScaler, PartitionModel, RiskModel, ValueModel};
pub use profile::{CustomerProfile, PredictionStage, ScoreFault};
pub use record::CanonicalRecord;
pub use segment::{RiskBand, Segment};
pub use similarity::{
    find_similar, FeatureMatrix, Neighbor, SimilarityError, SimilarityResult, DEFAULT_TOP_K,
};
pub use vector::{Feature, FeatureVector, ScaledFeatureVector, FEATURE_DIM};
