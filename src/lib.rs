//! # Genoma
//!
//! Customer intelligence scoring over tabular behavioral data.
//!
//! Genoma turns heterogeneous customer exports into scored intelligence:
//! every customer gets a behavioral cluster with a business segment label,
//! an expected monetary value, a churn-risk probability with confidence,
//! a ranked list of similar customers, and a recommended engagement
//! strategy. All models are pre-fitted artifacts; scoring is deterministic
//! and read-only.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install genoma
//! genoma --models ./models batch.json --customer 17850
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use genoma::prelude::*;
//! use std::path::Path;
//!
//! // Load the pre-fitted artifacts and build the engine
//! let models = ModelSet::load_dir(Path::new("./models")).unwrap();
//! let engine = ScoringEngine::new(models);
//!
//! // Normalize raw rows and score the batch
//! let batch: Vec<RawRecord> = serde_json::from_str(r#"[
//!     {"CustomerID": 17850, "Total Orders": 10, "total_quantity": 50,
//!      "TOTAL_SPEND": 500.0, "avg_order_value": 50.0,
//!      "recency_days": 5, "unique_products": 8}
//! ]"#).unwrap();
//! let report = engine.score_raw(&batch).unwrap();
//!
//! // Look one customer up, with its five most similar peers
//! let intel = report
//!     .customer_intelligence(&CustomerId::from(17850), DEFAULT_TOP_K)
//!     .unwrap();
//! println!("{}: {}", intel.profile.segment, intel.recommended_action);
//!
//! // Hand the whole batch off as CSV
//! let csv = report.to_csv_string();
//! ```
//!
//! ## Crate Structure
//!
//! Genoma is composed of several crates:
//!
//! - [`genoma-core`](https://docs.rs/genoma-core) - Domain model (feature vectors, profiles, segments, similarity, model traits)
//! - [`genoma-schema`](https://docs.rs/genoma-schema) - Schema normalization, feature construction, transaction aggregation
//! - [`genoma-models`](https://docs.rs/genoma-models) - Pre-fitted artifacts (scaler, centroids, linear and logistic models)
//! - [`genoma-engine`](https://docs.rs/genoma-engine) - Batch orchestration, reports, similarity lookups, tabular export
//!
//! ## Features
//!
//! - **Schema Normalization**: Case- and spacing-insensitive column matching
//! - **Fixed Feature Order**: One canonical six-feature vector everywhere
//! - **Partial Failure**: Bad records fail alone, batches still complete
//! - **Contract Validation**: Out-of-range model outputs are withheld, never clamped
//! - **Similarity**: Deterministic cosine top-K with self-exclusion
//! - **Export**: Fixed-column CSV for spreadsheet and BI handoff

// Re-export core types
pub use genoma_core::{
    find_similar, CanonicalRecord, CustomerId, CustomerProfile, Feature, FeatureError,
    FeatureMatrix, FeatureScaler, FeatureVector, ModelOutputError, Neighbor, PartitionModel,
    PredictionStage, RiskBand, RiskModel, ScaledFeatureVector, ScoreFault, Segment,
    SimilarityError, SimilarityResult, ValueModel, DEFAULT_TOP_K, FEATURE_DIM,
};

// Re-export schema layer
pub use genoma_schema::{
    aggregate_transactions, build_feature_vector, build_scaled_vector, ensure_unique_ids,
    normalize_batch, RawRecord, SchemaError, SchemaNormalizer, Transaction,
};

// Re-export model artifacts
pub use genoma_models::{
    LinearRegressor, LogisticClassifier, ModelError, ModelSet, NearestCentroid, StandardScaler,
    BEHAVIOR_ARTIFACT, SCALER_ARTIFACT, STABILITY_ARTIFACT, VALUE_ARTIFACT,
};

// Re-export engine
pub use genoma_engine::{
    BatchOverview, ClusterSummary, CustomerIntelligence, EngineError, ExportTable,
    IntelligenceReport, RecordOutcome, RiskBandCounts, ScoringEngine, SimilarCustomer,
    EXPORT_COLUMNS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        find_similar, normalize_batch, CanonicalRecord, CustomerId, CustomerIntelligence,
        CustomerProfile, EngineError, ExportTable, Feature, FeatureMatrix, FeatureVector,
        IntelligenceReport, ModelSet, RawRecord, RecordOutcome, RiskBand, ScaledFeatureVector,
        SchemaError, SchemaNormalizer, ScoringEngine, Segment, SimilarityResult, DEFAULT_TOP_K,
    };
}
