//! # Genoma Engine
//!
//! Batch scoring orchestration for the Genoma pipeline.
//!
//! ## Overview
//!
//! The engine ties the other crates together: canonical records (or raw
//! rows) go in, an [`IntelligenceReport`] comes out. Per record it runs
//! scale, cluster assignment, value prediction and risk prediction in a
//! fixed order, with partial-failure semantics:
//!
//! - a record that cannot produce a feature vector fails alone; the batch
//!   continues and the failure is a tagged outcome
//! - a model output that violates its contract withholds just that
//!   prediction and records a fault on the profile
//! - schema problems (duplicate ids, unmappable columns) fail the batch
//!
//! The report carries per-customer profiles, cluster rollups, an executive
//! overview, a similarity lookup over the batch, and a fixed-column tabular
//! export.
//!
//! ## Example
//!
//! ```rust
//! use genoma_engine::ScoringEngine;
//! use genoma_models::{LinearRegressor, LogisticClassifier, ModelSet, NearestCentroid, StandardScaler};
//! use genoma_core::{CanonicalRecord, CustomerId, FeatureVector};
//!
//! let models = ModelSet::new(
//!     StandardScaler::identity(),
//!     NearestCentroid::new(vec![[0.0; 6], [10.0; 6]]).unwrap(),
//!     LinearRegressor::new(100.0, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap(),
//!     LogisticClassifier::new(-1.0, [0.0; 6]).unwrap(),
//! );
//! let engine = ScoringEngine::new(models);
//!
//! let record = CanonicalRecord::from_vector(
//!     CustomerId::from(17850),
//!     &FeatureVector::new([10.0, 50.0, 500.0, 50.0, 5.0, 8.0]),
//! );
//! let report = engine.score_batch(&[record]).unwrap();
//! assert_eq!(report.overview.scored, 1);
//! ```

pub mod error;
pub mod export;
pub mod report;
pub mod scoring;

// Re-export main types
pub use error::EngineError;
pub use export::{ExportTable, EXPORT_COLUMNS};
pub use report::{
    BatchOverview, ClusterSummary, CustomerIntelligence, IntelligenceReport, RecordOutcome,
    RiskBandCounts, SimilarCustomer,
};
pub use scoring::ScoringEngine;
