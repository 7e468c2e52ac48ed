use serde::{Deserialize, Serialize};
use std::fmt;

/// Business interpretation of a behavioral cluster.
///
/// The mapping from cluster id to segment is fixed at compile time because
/// the labels were assigned by analysts against the fitted partition model.
/// Ids outside the labeled range fall back to [`Segment::Unlabeled`] rather
/// than failing, so a retrained model with extra clusters degrades gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    LoyalHighValue,
    GrowingCustomers,
    PriceSensitive,
    AtRisk,
    HighChurnRisk,
    Unlabeled,
}

impl Segment {
    /// Map a cluster id to its labeled segment.
    #[must_use]
    pub fn from_cluster(cluster: u32) -> Segment {
        match cluster {
            0 => Segment::LoyalHighValue,
            1 => Segment::GrowingCustomers,
            2 => Segment::PriceSensitive,
            3 => Segment::AtRisk,
            4 => Segment::HighChurnRisk,
            _ => Segment::Unlabeled,
        }
    }

    /// Human-readable segment label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Segment::LoyalHighValue => "Loyal & High Value",
            Segment::GrowingCustomers => "Growing Customers",
            Segment::PriceSensitive => "Price Sensitive",
            Segment::AtRisk => "At Risk",
            Segment::HighChurnRisk => "High Churn Risk",
            Segment::Unlabeled => "Unlabeled Segment",
        }
    }

    /// Recommended engagement strategy for this segment.
    #[must_use]
    pub fn recommended_action(&self) -> &'static str {
        match self {
            Segment::LoyalHighValue => {
                "Prioritize loyalty rewards, early access and premium offers."
            }
            Segment::GrowingCustomers => {
                "Nurture with personalized recommendations and upsell campaigns."
            }
            Segment::PriceSensitive => {
                "Lead with discounts, bundles and clear value messaging."
            }
            Segment::AtRisk => {
                "Re-engage with targeted promotions before the next purchase window closes."
            }
            Segment::HighChurnRisk => {
                "Trigger immediate retention outreach with a win-back incentive."
            }
            Segment::Unlabeled => {
                "Review manually; no engagement playbook exists for this segment."
            }
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Churn-risk probability discretized into advisory bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Band boundaries: below 0.3 is low, below 0.6 moderate, otherwise high.
    #[must_use]
    pub fn from_probability(probability: f64) -> RiskBand {
        if probability < 0.3 {
            RiskBand::Low
        } else if probability < 0.6 {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }

    /// Advisory text attached to customer-facing reports.
    #[must_use]
    pub fn advisory(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low risk customer. Focus on loyalty programs and premium offers.",
            RiskBand::Moderate => {
                "Moderate risk customer. Engagement and targeted promotions advised."
            }
            RiskBand::High => "High risk customer. Immediate retention actions recommended.",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskBand::Low => "low",
            RiskBand::Moderate => "moderate",
            RiskBand::High => "high",
        };
        f.write_str(name)
    }
}
