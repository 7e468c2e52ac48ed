//! Aggregation of raw transaction lines into customer-grain records.
//!
//! Most deployments hand the pipeline pre-aggregated rows, but when only the
//! transaction log is available this module derives the canonical features
//! from it: distinct invoices become order counts, line values roll up into
//! spend, and recency is measured against a reference date.

use ahash::{AHashMap, AHashSet};
use chrono::NaiveDate;
use genoma_core::{CanonicalRecord, CustomerId, FeatureVector};
use serde::{Deserialize, Serialize};

/// One line of a transaction log. A single invoice usually spans several
/// lines, one per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub customer_id: CustomerId,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub product_code: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl Transaction {
    /// Monetary value of this line.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Returns and zero-priced lines carry negative or zero amounts and are
    /// excluded from aggregation.
    #[inline]
    #[must_use]
    pub fn is_sale(&self) -> bool {
        self.quantity > 0.0 && self.unit_price > 0.0
    }
}

struct CustomerAccumulator {
    customer_id: CustomerId,
    invoices: AHashSet<String>,
    products: AHashSet<String>,
    quantity: f64,
    spend: f64,
    lines: usize,
    last_purchase: NaiveDate,
}

impl CustomerAccumulator {
    fn new(customer_id: CustomerId, first_date: NaiveDate) -> Self {
        Self {
            customer_id,
            invoices: AHashSet::new(),
            products: AHashSet::new(),
            quantity: 0.0,
            spend: 0.0,
            lines: 0,
            last_purchase: first_date,
        }
    }
}

/// Roll a transaction log up into one canonical record per customer.
///
/// Customers appear in first-seen order. `recency_days` is measured from
/// each customer's latest purchase to `reference_date`; when no reference is
/// given the latest invoice date in the log is used, so the most recent
/// purchaser gets a recency of zero. `avg_order_value` is the mean line
/// value, matching how the models were fitted.
pub fn aggregate_transactions(
    transactions: &[Transaction],
    reference_date: Option<NaiveDate>,
) -> Vec<CanonicalRecord> {
    let sales: Vec<&Transaction> = transactions.iter().filter(|t| t.is_sale()).collect();
    let dropped = transactions.len() - sales.len();
    if dropped > 0 {
        tracing::debug!(dropped, "excluded returns and zero-priced lines");
    }

    let Some(reference) =
        reference_date.or_else(|| sales.iter().map(|t| t.invoice_date).max())
    else {
        return Vec::new();
    };

    let mut by_customer: AHashMap<CustomerId, usize> = AHashMap::new();
    let mut accumulators: Vec<CustomerAccumulator> = Vec::new();

    for transaction in &sales {
        let index = *by_customer
            .entry(transaction.customer_id.clone())
            .or_insert_with(|| {
                accumulators.push(CustomerAccumulator::new(
                    transaction.customer_id.clone(),
                    transaction.invoice_date,
                ));
                accumulators.len() - 1
            });
        let acc = &mut accumulators[index];
        acc.invoices.insert(transaction.invoice_no.clone());
        acc.products.insert(transaction.product_code.clone());
        acc.quantity += transaction.quantity;
        acc.spend += transaction.value();
        acc.lines += 1;
        acc.last_purchase = acc.last_purchase.max(transaction.invoice_date);
    }

    accumulators
        .into_iter()
        .map(|acc| {
            let recency = (reference - acc.last_purchase).num_days() as f64;
            let avg_order_value = acc.spend / acc.lines as f64;
            let vector = FeatureVector::new([
                acc.invoices.len() as f64,
                acc.quantity,
                acc.spend,
                avg_order_value,
                recency,
                acc.products.len() as f64,
            ]);
            CanonicalRecord::from_vector(acc.customer_id, &vector)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genoma_core::Feature;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(
        customer: u64,
        invoice: &str,
        day: u32,
        product: &str,
        quantity: f64,
        unit_price: f64,
    ) -> Transaction {
        Transaction {
            customer_id: CustomerId::from(customer),
            invoice_no: invoice.to_string(),
            invoice_date: date(2011, 12, day),
            product_code: product.to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_aggregates_per_customer() {
        let log = vec![
            line(1, "INV-1", 1, "A", 2.0, 5.0),
            line(1, "INV-1", 1, "B", 1.0, 10.0),
            line(1, "INV-2", 5, "A", 3.0, 5.0),
            line(2, "INV-3", 9, "C", 1.0, 50.0),
        ];
        let records = aggregate_transactions(&log, None);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.customer_id, CustomerId::from(1));
        assert_eq!(first.feature(Feature::TotalOrders), Some(2.0));
        assert_eq!(first.feature(Feature::TotalQuantity), Some(6.0));
        assert_eq!(first.feature(Feature::TotalSpend), Some(35.0));
        assert_eq!(first.feature(Feature::AvgOrderValue), Some(35.0 / 3.0));
        assert_eq!(first.feature(Feature::UniqueProducts), Some(2.0));
        // Latest log date is Dec 9, customer 1 last bought on Dec 5.
        assert_eq!(first.feature(Feature::RecencyDays), Some(4.0));

        let second = &records[1];
        assert_eq!(second.customer_id, CustomerId::from(2));
        assert_eq!(second.feature(Feature::RecencyDays), Some(0.0));
    }

    #[test]
    fn test_returns_are_excluded() {
        let log = vec![
            line(1, "INV-1", 1, "A", 2.0, 5.0),
            line(1, "INV-9", 2, "A", -2.0, 5.0),
            line(1, "INV-8", 3, "B", 1.0, 0.0),
        ];
        let records = aggregate_transactions(&log, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].feature(Feature::TotalOrders), Some(1.0));
        assert_eq!(records[0].feature(Feature::TotalSpend), Some(10.0));
        assert_eq!(records[0].feature(Feature::UniqueProducts), Some(1.0));
    }

    #[test]
    fn test_explicit_reference_date() {
        let log = vec![line(1, "INV-1", 1, "A", 1.0, 1.0)];
        let records = aggregate_transactions(&log, Some(date(2011, 12, 31)));
        assert_eq!(records[0].feature(Feature::RecencyDays), Some(30.0));
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        let log = vec![
            line(9, "INV-1", 1, "A", 1.0, 1.0),
            line(3, "INV-2", 1, "A", 1.0, 1.0),
            line(9, "INV-3", 2, "B", 1.0, 1.0),
            line(5, "INV-4", 2, "A", 1.0, 1.0),
        ];
        let ids: Vec<_> = aggregate_transactions(&log, None)
            .into_iter()
            .map(|r| r.customer_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                CustomerId::from(9),
                CustomerId::from(3),
                CustomerId::from(5)
            ]
        );
    }

    #[test]
    fn test_empty_or_fully_filtered_log_yields_no_records() {
        assert!(aggregate_transactions(&[], None).is_empty());
        let only_returns = vec![line(1, "INV-1", 1, "A", -1.0, 5.0)];
        assert!(aggregate_transactions(&only_returns, None).is_empty());
    }
}
