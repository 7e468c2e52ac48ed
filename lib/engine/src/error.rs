use genoma_core::SimilarityError;
use genoma_schema::SchemaError;
use thiserror::Error;

/// Batch-fatal failures surfaced by the scoring engine. Per-record model
/// faults are not errors at this level; they live inside the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}
