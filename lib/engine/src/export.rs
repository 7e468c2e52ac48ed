//! Tabular export of a scored batch for spreadsheet and BI handoff.
//!
//! The column set and order are part of the external contract: downstream
//! dashboards index columns positionally, so the layout never varies with
//! batch content. Withheld predictions render as empty cells; records that
//! failed scoring entirely are not rows (they remain visible in the
//! report's outcomes).

use crate::report::{IntelligenceReport, RecordOutcome};
use genoma_core::Feature;
use serde::Serialize;

/// Fixed export layout: identifier, the six features in canonical order,
/// then cluster, segment, predictions and the recommended action.
pub const EXPORT_COLUMNS: [&str; 13] = [
    "customer_id",
    "total_orders",
    "total_quantity",
    "total_spend",
    "avg_order_value",
    "recency_days",
    "unique_products",
    "cluster",
    "segment",
    "predicted_value",
    "risk_probability",
    "confidence_score",
    "recommended_action",
];

/// A scored batch flattened to rows of strings, one per scored customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    rows: Vec<Vec<String>>,
}

impl ExportTable {
    #[must_use]
    pub fn from_report(report: &IntelligenceReport) -> Self {
        let rows = report
            .outcomes
            .iter()
            .filter_map(RecordOutcome::profile)
            .map(|profile| {
                let mut row = Vec::with_capacity(EXPORT_COLUMNS.len());
                row.push(profile.customer_id.to_string());
                for feature in Feature::ORDER {
                    row.push(profile.features.get(feature).to_string());
                }
                row.push(profile.cluster.to_string());
                row.push(profile.segment.label().to_string());
                row.push(optional_number(profile.predicted_value));
                row.push(optional_number(profile.risk_probability));
                row.push(optional_number(profile.confidence_score));
                row.push(profile.segment.recommended_action().to_string());
                row
            })
            .collect();
        Self { rows }
    }

    #[inline]
    #[must_use]
    pub fn header() -> &'static [&'static str; 13] {
        &EXPORT_COLUMNS
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as RFC 4180 style CSV with a header line.
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&EXPORT_COLUMNS.join(","));
        out.push('\n');
        for row in &self.rows {
            let mut first = true;
            for field in row {
                if !first {
                    out.push(',');
                }
                first = false;
                out.push_str(&csv_escape(field));
            }
            out.push('\n');
        }
        out
    }
}

impl IntelligenceReport {
    /// Flatten this report into the fixed-column export table.
    #[must_use]
    pub fn to_table(&self) -> ExportTable {
        ExportTable::from_report(self)
    }

    /// CSV rendering of [`IntelligenceReport::to_table`].
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        self.to_table().to_csv_string()
    }
}

fn optional_number(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
