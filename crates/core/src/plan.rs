//! Service plan value objects

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::FieldIssue;

const UNLIMITED: &str = "unlimited";

/// Plan allowance: a finite quantity or the "unlimited" sentinel
///
/// Serializes as a bare number or the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allowance<T> {
    Unlimited,
    Limited(T),
}

/// Data allowance in GB
pub type DataAllowance = Allowance<f64>;
/// Voice minutes or message count
pub type CountAllowance = Allowance<u32>;

impl<T: Copy> Allowance<T> {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Allowance::Unlimited)
    }
}

impl<T: Copy + PartialOrd> Allowance<T> {
    /// Whether `usage` fits inside this allowance
    pub fn covers(&self, usage: T) -> bool {
        match self {
            Allowance::Unlimited => true,
            Allowance::Limited(limit) => usage <= *limit,
        }
    }
}

impl<T: Default> Default for Allowance<T> {
    fn default() -> Self {
        Allowance::Limited(T::default())
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Allowance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Allowance::Unlimited => f.write_str(UNLIMITED),
            Allowance::Limited(v) => write!(f, "{}", v),
        }
    }
}

impl<T: Serialize> Serialize for Allowance<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Allowance::Unlimited => serializer.serialize_str(UNLIMITED),
            Allowance::Limited(v) => v.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AllowanceRepr<T> {
    Limited(T),
    Keyword(String),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Allowance<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match AllowanceRepr::<T>::deserialize(deserializer)? {
            AllowanceRepr::Limited(v) => Ok(Allowance::Limited(v)),
            AllowanceRepr::Keyword(s) if s.trim().eq_ignore_ascii_case(UNLIMITED) => {
                Ok(Allowance::Unlimited)
            }
            AllowanceRepr::Keyword(s) => Err(de::Error::custom(format!(
                "expected a number or \"unlimited\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Network priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPriority {
    #[default]
    Standard,
    Premium,
}

fn default_contract_length() -> u32 {
    12
}

fn unlimited_count() -> CountAllowance {
    Allowance::Unlimited
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// A service plan supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub name: String,
    /// Monthly price
    pub price: f64,
    pub data_allowance: DataAllowance,
    pub voice_minutes: CountAllowance,
    #[serde(default = "unlimited_count")]
    pub sms_allowance: CountAllowance,

    #[serde(default)]
    pub international_included: bool,
    #[serde(default)]
    pub roaming_included: bool,
    /// Hotspot data in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspot_data: Option<f64>,
    #[serde(default)]
    pub network_priority: NetworkPriority,

    /// Additional feature labels, in declared order
    #[serde(default)]
    pub features: Vec<String>,
    /// Contract length in months
    #[serde(default = "default_contract_length")]
    pub contract_length: u32,
    /// One-time setup fee
    #[serde(default)]
    pub setup_fee: f64,

    /// Promotional discount percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotional_discount: Option<f64>,
    /// Promotional period in months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotional_duration: Option<u32>,
}

impl Plan {
    pub fn new(
        plan_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        data_allowance: DataAllowance,
        voice_minutes: CountAllowance,
    ) -> Self {
        Self {
            plan_id: plan_id.into(),
            name: name.into(),
            price,
            data_allowance,
            voice_minutes,
            sms_allowance: unlimited_count(),
            international_included: false,
            roaming_included: false,
            hotspot_data: None,
            network_priority: NetworkPriority::Standard,
            features: Vec::new(),
            contract_length: default_contract_length(),
            setup_fee: 0.0,
            promotional_discount: None,
            promotional_duration: None,
        }
    }

    pub fn international(mut self, included: bool) -> Self {
        self.international_included = included;
        self
    }

    pub fn roaming(mut self, included: bool) -> Self {
        self.roaming_included = included;
        self
    }

    pub fn hotspot(mut self, gb: f64) -> Self {
        self.hotspot_data = Some(gb);
        self
    }

    pub fn network(mut self, priority: NetworkPriority) -> Self {
        self.network_priority = priority;
        self
    }

    pub fn features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn contract(mut self, months: u32, setup_fee: f64) -> Self {
        self.contract_length = months;
        self.setup_fee = setup_fee;
        self
    }

    pub fn promotion(mut self, discount_pct: f64, duration_months: u32) -> Self {
        self.promotional_discount = Some(discount_pct);
        self.promotional_duration = Some(duration_months);
        self
    }

    /// Hotspot allowance, treating absent as zero
    pub fn hotspot_gb(&self) -> f64 {
        self.hotspot_data.unwrap_or(0.0)
    }

    /// Discount percentage when one is advertised (> 0)
    pub fn promotional_discount_pct(&self) -> Option<f64> {
        self.promotional_discount.filter(|d| *d > 0.0)
    }

    /// Discount and duration when both are set; only then does it change the price
    pub fn active_promotion(&self) -> Option<(f64, u32)> {
        match (self.promotional_discount_pct(), self.promotional_duration) {
            (Some(pct), Some(months)) if months > 0 => Some((pct, months)),
            _ => None,
        }
    }

    /// Monthly price after an active promotion
    pub fn effective_price(&self) -> f64 {
        match self.active_promotion() {
            Some((pct, _)) => self.price - self.price * (pct / 100.0),
            None => self.price,
        }
    }

    /// An unset plan: no id, no name
    pub fn is_blank(&self) -> bool {
        self.plan_id.trim().is_empty() && self.name.trim().is_empty()
    }

    /// Malformed numeric fields, in field order; empty for a usable plan
    pub fn issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if !non_negative(self.price) {
            issues.push(FieldIssue::new(
                "price",
                format!("must be a finite, non-negative amount, got {}", self.price),
            ));
        }
        if let Allowance::Limited(gb) = self.data_allowance {
            if !non_negative(gb) {
                issues.push(FieldIssue::new(
                    "data_allowance",
                    format!("must be a finite, non-negative amount, got {}", gb),
                ));
            }
        }
        if let Some(gb) = self.hotspot_data {
            if !non_negative(gb) {
                issues.push(FieldIssue::new(
                    "hotspot_data",
                    format!("must be a finite, non-negative amount, got {}", gb),
                ));
            }
        }
        if !non_negative(self.setup_fee) {
            issues.push(FieldIssue::new(
                "setup_fee",
                format!("must be a finite, non-negative amount, got {}", self.setup_fee),
            ));
        }
        if let Some(discount) = self.promotional_discount {
            if !(0.0..=100.0).contains(&discount) {
                issues.push(FieldIssue::new(
                    "promotional_discount",
                    format!("must be between 0 and 100, got {}", discount),
                ));
            }
        }

        issues
    }
}
