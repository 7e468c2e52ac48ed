//! # Genoma Schema
//!
//! Schema normalization and feature construction for the Genoma pipeline.
//!
//! ## Overview
//!
//! Customer data arrives from many source systems that disagree on column
//! naming and typing. This crate is the boundary where that mess stops:
//!
//! 1. [`SchemaNormalizer`] maps recognized column spellings onto the
//!    canonical schema and coerces values to numbers
//! 2. [`build_feature_vector`] assembles the canonical record into the
//!    fixed-order vector the fitted models expect
//! 3. [`aggregate_transactions`] optionally derives customer-grain records
//!    straight from a raw transaction log
//!
//! Everything downstream of this crate operates on canonical keys only.
//!
//! ## Example
//!
//! ```rust
//! use genoma_schema::{normalize_batch, RawRecord};
//! use serde_json::json;
//!
//! let row: RawRecord = serde_json::from_value(json!({
//!     "CustomerID": 17850,
//!     "Total Orders": 10,
//!     "total_quantity": 50,
//!     "TOTAL_SPEND": 500.0,
//!     "avg order value": 50.0,
//!     "recency_days": 5,
//!     "unique_products": 8,
//! }))
//! .unwrap();
//!
//! let records = normalize_batch(&[row]).unwrap();
//! assert_eq!(records.len(), 1);
//! ```

pub mod aggregate;
pub mod builder;
pub mod normalize;

// Re-export main types
pub use aggregate::{aggregate_transactions, Transaction};
pub use builder::{build_feature_vector, build_scaled_vector};
pub use normalize::{
    ensure_unique_ids, normalize_batch, RawRecord, SchemaError, SchemaNormalizer, CLUSTER_KEY,
    CUSTOMER_ID_KEY,
};
