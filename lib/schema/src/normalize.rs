//! Schema normalization: heterogeneous source columns to canonical records.
//!
//! Source systems disagree on column naming ("CustomerID", "customer id",
//! "CUSTOMER_ID"). Normalization maps every recognized spelling onto the
//! canonical schema before any scoring happens, so the rest of the pipeline
//! only ever sees canonical keys. Validation is strict: a required column
//! that cannot be matched, or a value that cannot be coerced to a number,
//! fails the batch instead of producing a silently defective record.

use ahash::{AHashMap, AHashSet};
use genoma_core::{CanonicalRecord, CustomerId, Feature};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// A raw input row: arbitrary column names to JSON values.
pub type RawRecord = HashMap<String, Value>;

/// Canonical key for the customer identifier column.
pub const CUSTOMER_ID_KEY: &str = "customer_id";

/// Canonical key for the optional precomputed cluster column.
pub const CLUSTER_KEY: &str = "cluster";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Row {row}: missing required column(s): {}", .columns.join(", "))]
    MissingColumns { row: usize, columns: Vec<String> },

    #[error("Row {row}: column '{column}' has a non-coercible value: {value}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: multiple input columns map to canonical key '{canonical}'")]
    ConflictingColumns { row: usize, canonical: String },

    #[error("Duplicate customer id in batch: {0}")]
    DuplicateCustomer(CustomerId),
}

/// What a recognized source column maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    CustomerId,
    Feature(Feature),
    Cluster,
}

impl Target {
    fn canonical_key(&self) -> &'static str {
        match self {
            Target::CustomerId => CUSTOMER_ID_KEY,
            Target::Feature(f) => f.key(),
            Target::Cluster => CLUSTER_KEY,
        }
    }
}

/// Recognized column spellings, stored pre-normalized (lowercase, no
/// whitespace or underscores). Lookup normalizes the raw name the same way,
/// which is what makes matching case- and spacing-insensitive.
const ALIASES: &[(&str, Target)] = &[
    ("customerid", Target::CustomerId),
    ("custid", Target::CustomerId),
    ("customer", Target::CustomerId),
    ("customerno", Target::CustomerId),
    ("customernumber", Target::CustomerId),
    ("clientid", Target::CustomerId),
    ("totalorders", Target::Feature(Feature::TotalOrders)),
    ("orders", Target::Feature(Feature::TotalOrders)),
    ("ordercount", Target::Feature(Feature::TotalOrders)),
    ("numorders", Target::Feature(Feature::TotalOrders)),
    ("frequency", Target::Feature(Feature::TotalOrders)),
    ("totalquantity", Target::Feature(Feature::TotalQuantity)),
    ("quantity", Target::Feature(Feature::TotalQuantity)),
    ("totalqty", Target::Feature(Feature::TotalQuantity)),
    ("qty", Target::Feature(Feature::TotalQuantity)),
    ("totalunits", Target::Feature(Feature::TotalQuantity)),
    ("totalspend", Target::Feature(Feature::TotalSpend)),
    ("spend", Target::Feature(Feature::TotalSpend)),
    ("totalspent", Target::Feature(Feature::TotalSpend)),
    ("monetary", Target::Feature(Feature::TotalSpend)),
    ("totalamount", Target::Feature(Feature::TotalSpend)),
    ("totalrevenue", Target::Feature(Feature::TotalSpend)),
    ("revenue", Target::Feature(Feature::TotalSpend)),
    ("avgordervalue", Target::Feature(Feature::AvgOrderValue)),
    ("aov", Target::Feature(Feature::AvgOrderValue)),
    ("averageordervalue", Target::Feature(Feature::AvgOrderValue)),
    ("avgorder", Target::Feature(Feature::AvgOrderValue)),
    ("meanordervalue", Target::Feature(Feature::AvgOrderValue)),
    ("recencydays", Target::Feature(Feature::RecencyDays)),
    ("recency", Target::Feature(Feature::RecencyDays)),
    ("dayssincelastorder", Target::Feature(Feature::RecencyDays)),
    ("dayssincelastpurchase", Target::Feature(Feature::RecencyDays)),
    ("lastpurchasedays", Target::Feature(Feature::RecencyDays)),
    ("uniqueproducts", Target::Feature(Feature::UniqueProducts)),
    ("distinctproducts", Target::Feature(Feature::UniqueProducts)),
    ("products", Target::Feature(Feature::UniqueProducts)),
    ("productcount", Target::Feature(Feature::UniqueProducts)),
    ("uniqueitems", Target::Feature(Feature::UniqueProducts)),
    ("cluster", Target::Cluster),
    ("clusterid", Target::Cluster),
    ("behaviorcluster", Target::Cluster),
];

/// Normalize a raw column name: trim, lowercase, drop internal whitespace
/// and underscores. "Total Spend", "total_spend" and "TOTALSPEND" all
/// collapse to "totalspend".
fn canonical_key(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps raw input rows onto [`CanonicalRecord`]s using the alias table.
#[derive(Debug, Clone)]
pub struct SchemaNormalizer {
    aliases: AHashMap<&'static str, Target>,
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            aliases: ALIASES.iter().copied().collect(),
        }
    }

    /// Normalize a single raw row. `row` is the zero-based position in the
    /// batch, used only for error reporting.
    pub fn normalize_record(
        &self,
        row: usize,
        raw: &RawRecord,
    ) -> Result<CanonicalRecord, SchemaError> {
        let mut customer_id: Option<CustomerId> = None;
        let mut features: HashMap<Feature, f64> = HashMap::with_capacity(Feature::ORDER.len());
        let mut cluster: Option<u32> = None;

        for (name, value) in raw {
            let Some(target) = self.aliases.get(canonical_key(name).as_str()) else {
                tracing::debug!(column = %name, "ignoring unrecognized column");
                continue;
            };
            match target {
                Target::CustomerId => {
                    if customer_id.is_some() {
                        return Err(conflict(row, *target));
                    }
                    customer_id = Some(coerce_customer_id(row, value)?);
                }
                Target::Feature(feature) => {
                    let coerced = coerce_number(value).ok_or_else(|| SchemaError::InvalidValue {
                        row,
                        column: feature.key().to_string(),
                        value: value.to_string(),
                    })?;
                    if features.insert(*feature, coerced).is_some() {
                        return Err(conflict(row, *target));
                    }
                }
                Target::Cluster => {
                    if cluster.is_some() {
                        return Err(conflict(row, *target));
                    }
                    cluster = Some(coerce_cluster(row, value)?);
                }
            }
        }

        let mut missing: Vec<String> = Vec::new();
        if customer_id.is_none() {
            missing.push(CUSTOMER_ID_KEY.to_string());
        }
        for feature in Feature::ORDER {
            if !features.contains_key(&feature) {
                missing.push(feature.key().to_string());
            }
        }
        let customer_id = match customer_id {
            Some(id) if missing.is_empty() => id,
            _ => {
                return Err(SchemaError::MissingColumns {
                    row,
                    columns: missing,
                })
            }
        };
        let mut record = CanonicalRecord::new(customer_id, features);
        record.cluster = cluster;
        Ok(record)
    }

    /// Normalize a whole batch, preserving input order. Fails fast on the
    /// first defective row or on a duplicate customer id.
    pub fn normalize_batch(&self, batch: &[RawRecord]) -> Result<Vec<CanonicalRecord>, SchemaError> {
        let mut records = Vec::with_capacity(batch.len());
        for (row, raw) in batch.iter().enumerate() {
            records.push(self.normalize_record(row, raw)?);
        }
        ensure_unique_ids(&records)?;
        Ok(records)
    }
}

/// Normalize a batch with the default alias table.
pub fn normalize_batch(batch: &[RawRecord]) -> Result<Vec<CanonicalRecord>, SchemaError> {
    SchemaNormalizer::new().normalize_batch(batch)
}

/// Reject batches containing the same customer id twice. Scoring and
/// similarity both key results by id, so duplicates would be ambiguous.
pub fn ensure_unique_ids(records: &[CanonicalRecord]) -> Result<(), SchemaError> {
    let mut seen: AHashSet<&CustomerId> = AHashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.customer_id) {
            return Err(SchemaError::DuplicateCustomer(record.customer_id.clone()));
        }
    }
    Ok(())
}

fn conflict(row: usize, target: Target) -> SchemaError {
    SchemaError::ConflictingColumns {
        row,
        canonical: target.canonical_key().to_string(),
    }
}

/// Coerce a JSON value to a finite f64. Numeric strings are accepted because
/// CSV-sourced data frequently arrives fully stringified.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn coerce_customer_id(row: usize, value: &Value) -> Result<CustomerId, SchemaError> {
    let invalid = || SchemaError::InvalidValue {
        row,
        column: CUSTOMER_ID_KEY.to_string(),
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => n.as_u64().map(CustomerId::Integer).ok_or_else(invalid),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(invalid());
            }
            // Numeric strings collapse onto integer identity so that "17850"
            // and 17850 name the same customer across differently typed feeds.
            match trimmed.parse::<u64>() {
                Ok(n) => Ok(CustomerId::Integer(n)),
                Err(_) => Ok(CustomerId::String(trimmed.to_string())),
            }
        }
        _ => Err(invalid()),
    }
}

fn coerce_cluster(row: usize, value: &Value) -> Result<u32, SchemaError> {
    let invalid = || SchemaError::InvalidValue {
        row,
        column: CLUSTER_KEY.to_string(),
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<u32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
