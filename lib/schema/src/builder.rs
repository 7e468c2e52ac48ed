//! Feature vector construction from canonical records.
//!
//! The vector layout is the single fixed order in [`Feature::ORDER`]; no
//! caller gets to choose a different one. Missing or non-finite features are
//! hard errors because a partially filled vector would silently misalign
//! every downstream model coefficient.

use genoma_core::{
    CanonicalRecord, Feature, FeatureError, FeatureScaler, FeatureVector, ScaledFeatureVector,
    FEATURE_DIM,
};

/// Assemble the ordered feature vector for one canonical record.
pub fn build_feature_vector(record: &CanonicalRecord) -> Result<FeatureVector, FeatureError> {
    let mut values = [0.0_f64; FEATURE_DIM];
    for (slot, feature) in values.iter_mut().zip(Feature::ORDER) {
        let value = record
            .feature(feature)
            .ok_or(FeatureError::MissingFeature(feature))?;
        if !value.is_finite() {
            return Err(FeatureError::NonFinite { feature, value });
        }
        *slot = value;
    }
    Ok(FeatureVector::new(values))
}

/// Assemble the feature vector and run it through the fitted scaler.
///
/// Returns both the raw and the scaled vector; profiles keep the raw values
/// for reporting while models only ever see the scaled ones.
pub fn build_scaled_vector(
    record: &CanonicalRecord,
    scaler: &dyn FeatureScaler,
) -> Result<(FeatureVector, ScaledFeatureVector), FeatureError> {
    let features = build_feature_vector(record)?;
    let scaled = scaler.apply(&features);
    Ok((features, scaled))
}
