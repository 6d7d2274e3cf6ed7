//! Customer profile and segmentation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::needs::{NeedCategory, NeedsProfile};
use crate::usage::UsageStatistics;

/// Customer segment for personalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    /// Single-line consumer
    #[default]
    Individual,
    /// Household with several lines
    Family,
    /// Small business or professional use
    Business,
    /// Corporate account with bulk lines
    Enterprise,
}

impl CustomerSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSegment::Individual => "individual",
            CustomerSegment::Family => "family",
            CustomerSegment::Business => "business",
            CustomerSegment::Enterprise => "enterprise",
        }
    }

    /// Get segment display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CustomerSegment::Individual => "Individual",
            CustomerSegment::Family => "Family",
            CustomerSegment::Business => "Business",
            CustomerSegment::Enterprise => "Enterprise",
        }
    }
}

impl std::fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse usage bucket derived from raw statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UsagePattern {
    #[default]
    Light,
    Moderate,
    Heavy,
    Business,
}

impl UsagePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsagePattern::Light => "light",
            UsagePattern::Moderate => "moderate",
            UsagePattern::Heavy => "heavy",
            UsagePattern::Business => "business",
        }
    }
}

impl std::fmt::Display for UsagePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named complaint detected in conversation text
///
/// Variant order is the taxonomy declaration order; extracted pain points are
/// reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PainPoint {
    #[serde(rename = "poor coverage")]
    PoorCoverage,
    #[serde(rename = "expensive bill")]
    ExpensiveBill,
    #[serde(rename = "slow internet")]
    SlowInternet,
    #[serde(rename = "poor customer service")]
    PoorCustomerService,
    #[serde(rename = "contract issues")]
    ContractIssues,
    #[serde(rename = "billing issues")]
    BillingIssues,
    #[serde(rename = "overage charges")]
    OverageCharges,
}

impl PainPoint {
    pub const ALL: [PainPoint; 7] = [
        PainPoint::PoorCoverage,
        PainPoint::ExpensiveBill,
        PainPoint::SlowInternet,
        PainPoint::PoorCustomerService,
        PainPoint::ContractIssues,
        PainPoint::BillingIssues,
        PainPoint::OverageCharges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PainPoint::PoorCoverage => "poor coverage",
            PainPoint::ExpensiveBill => "expensive bill",
            PainPoint::SlowInternet => "slow internet",
            PainPoint::PoorCustomerService => "poor customer service",
            PainPoint::ContractIssues => "contract issues",
            PainPoint::BillingIssues => "billing issues",
            PainPoint::OverageCharges => "overage charges",
        }
    }
}

impl std::fmt::Display for PainPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment history tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentHistory {
    #[default]
    Good,
    Average,
    Poor,
}

/// Free-form preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

/// Customer profile information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Customer location or region; empty when unknown
    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub segment: CustomerSegment,

    #[serde(default)]
    pub usage_pattern: UsagePattern,

    #[serde(default)]
    pub current_monthly_spend: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub usage_data: UsageStatistics,

    #[serde(default)]
    pub needs: NeedsProfile,

    /// Detected complaints, no duplicates
    #[serde(default)]
    pub pain_points: Vec<PainPoint>,

    #[serde(default)]
    pub preferences: BTreeMap<String, PreferenceValue>,

    /// Current satisfaction score (1-10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,

    #[serde(default)]
    pub payment_history: PaymentHistory,

    /// Years as customer
    #[serde(default)]
    pub loyalty_years: u32,

    /// Support tickets in the last 12 months
    #[serde(default)]
    pub support_tickets: u32,
}

impl CustomerProfile {
    /// Create a profile with identity only; everything else defaults
    pub fn new(customer_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            name: name.into(),
            age: None,
            location: String::new(),
            segment: CustomerSegment::default(),
            usage_pattern: UsagePattern::default(),
            current_monthly_spend: 0.0,
            contract_end_date: None,
            usage_data: UsageStatistics::default(),
            needs: NeedsProfile::default(),
            pain_points: Vec::new(),
            preferences: BTreeMap::new(),
            satisfaction_score: None,
            payment_history: PaymentHistory::default(),
            loyalty_years: 0,
            support_tickets: 0,
        }
    }

    /// Set location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set segment
    pub fn segment(mut self, segment: CustomerSegment) -> Self {
        self.segment = segment;
        self
    }

    /// Set loyalty tenure
    pub fn loyalty_years(mut self, years: u32) -> Self {
        self.loyalty_years = years;
        self
    }

    /// Set payment history
    pub fn payment_history(mut self, history: PaymentHistory) -> Self {
        self.payment_history = history;
        self
    }

    /// Set contract end date
    pub fn contract_end(mut self, date: DateTime<Utc>) -> Self {
        self.contract_end_date = Some(date);
        self
    }

    /// Record a pain point, ignoring duplicates
    pub fn add_pain_point(&mut self, pain_point: PainPoint) {
        if !self.pain_points.contains(&pain_point) {
            self.pain_points.push(pain_point);
        }
    }

    pub fn has_pain_point(&self, pain_point: PainPoint) -> bool {
        self.pain_points.contains(&pain_point)
    }

    /// High or critical for the given category
    pub fn cares_about(&self, category: NeedCategory) -> bool {
        self.needs.is_elevated(category)
    }

    /// Get display name (name or "Customer")
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Customer"
        } else {
            &self.name
        }
    }
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self::new("unknown", "Customer")
    }
}
