//! # Genoma Models
//!
//! Concrete pre-fitted model artifacts for the Genoma scoring engine.
//!
//! Training happens offline; this crate only loads the exported coefficients
//! and serves deterministic predictions through the capability traits in
//! `genoma-core`:
//!
//! - [`StandardScaler`] - componentwise standardization
//! - [`NearestCentroid`] - behavioral cluster assignment
//! - [`LinearRegressor`] - expected monetary value
//! - [`LogisticClassifier`] - churn-risk probability
//! - [`ModelSet`] - the four models loaded together from an artifact
//!   directory via [`ModelSet::load_dir`]
//!
//! Every artifact is validated on load: non-finite coefficients, empty
//! centroid lists and non-positive scales are rejected before any scoring
//! can happen against them.

pub mod bundle;
pub mod error;
pub mod linear;
pub mod partition;
pub mod scaler;

pub use bundle::{
    ModelSet, BEHAVIOR_ARTIFACT, SCALER_ARTIFACT, STABILITY_ARTIFACT, VALUE_ARTIFACT,
};
pub use error::ModelError;
pub use linear::{LinearRegressor, LogisticClassifier};
pub use partition::NearestCentroid;
pub use scaler::StandardScaler;
