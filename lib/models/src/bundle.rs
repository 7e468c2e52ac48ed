use crate::error::ModelError;
use crate::linear::{LinearRegressor, LogisticClassifier};
use crate::partition::NearestCentroid;
use crate::scaler::StandardScaler;
use genoma_core::{FeatureScaler, PartitionModel, RiskModel, ValueModel};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::path::Path;

/// Artifact file names within a model directory. Fixed by the training
/// export job; a deployment swaps models by swapping the directory.
pub const SCALER_ARTIFACT: &str = "scaler.json";
pub const BEHAVIOR_ARTIFACT: &str = "behavior_model.json";
pub const VALUE_ARTIFACT: &str = "value_model.json";
pub const STABILITY_ARTIFACT: &str = "stability_model.json";

/// The four pre-fitted models scoring needs, held behind their capability
/// traits so deployments can substitute implementations without touching
/// the engine.
pub struct ModelSet {
    pub scaler: Box<dyn FeatureScaler>,
    pub partition: Box<dyn PartitionModel>,
    pub value: Box<dyn ValueModel>,
    pub risk: Box<dyn RiskModel>,
}

impl fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSet").finish_non_exhaustive()
    }
}

impl ModelSet {
    pub fn new(
        scaler: impl FeatureScaler + 'static,
        partition: impl PartitionModel + 'static,
        value: impl ValueModel + 'static,
        risk: impl RiskModel + 'static,
    ) -> Self {
        Self {
            scaler: Box::new(scaler),
            partition: Box::new(partition),
            value: Box::new(value),
            risk: Box::new(risk),
        }
    }

    /// Load and validate all four artifacts from a directory.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ModelError> {
        let dir = dir.as_ref();
        let scaler: StandardScaler = load_artifact(dir, SCALER_ARTIFACT)?;
        scaler.validate()?;
        let partition: NearestCentroid = load_artifact(dir, BEHAVIOR_ARTIFACT)?;
        partition.validate()?;
        let value: LinearRegressor = load_artifact(dir, VALUE_ARTIFACT)?;
        value.validate()?;
        let risk: LogisticClassifier = load_artifact(dir, STABILITY_ARTIFACT)?;
        risk.validate()?;

        tracing::info!(
            dir = %dir.display(),
            clusters = partition.centroid_count(),
            "loaded model artifacts"
        );

        Ok(Self::new(scaler, partition, value, risk))
    }
}

fn load_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ModelError> {
    let path = dir.join(name);
    let contents = fs::read_to_string(&path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
        path: path.display().to_string(),
        source,
    })
}
