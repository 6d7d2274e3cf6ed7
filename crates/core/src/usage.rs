//! Usage statistics captured for a pipeline run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monthly usage statistics
///
/// Immutable once captured for a run; the extractor copies it into the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UsageStatistics {
    /// Monthly data usage in GB
    #[serde(default)]
    pub data_usage_gb: f64,
    /// Monthly voice minutes used
    #[serde(default)]
    pub voice_minutes: u32,
    /// Monthly message count
    #[serde(default)]
    pub sms_count: u32,
    #[serde(default)]
    pub international_usage: bool,
    #[serde(default)]
    pub roaming_usage: bool,
    /// Hours of peak usage (0-23)
    #[serde(default)]
    pub peak_usage_hours: Vec<u8>,
}

impl UsageStatistics {
    pub fn new(data_usage_gb: f64, voice_minutes: u32, sms_count: u32) -> Self {
        Self {
            data_usage_gb,
            voice_minutes,
            sms_count,
            ..Self::default()
        }
    }

    pub fn international(mut self, used: bool) -> Self {
        self.international_usage = used;
        self
    }

    pub fn roaming(mut self, used: bool) -> Self {
        self.roaming_usage = used;
        self
    }

    /// Set peak hours; duplicates are dropped and the list is sorted
    pub fn peak_hours(mut self, hours: impl IntoIterator<Item = u8>) -> Self {
        let mut hours: Vec<u8> = hours.into_iter().collect();
        hours.sort_unstable();
        hours.dedup();
        self.peak_usage_hours = hours;
        self
    }

    /// Peak hour indices outside 0-23
    pub fn invalid_peak_hours(&self) -> Vec<u8> {
        self.peak_usage_hours
            .iter()
            .copied()
            .filter(|h| *h > 23)
            .collect()
    }
}

/// The usage map handed over by a caller
///
/// Carries the statistics plus the loose identity fields front-ends attach to
/// it. Identity fields only seed a fresh profile; an existing profile keeps
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UsageReport {
    #[serde(flatten)]
    pub statistics: UsageStatistics,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Current monthly spend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_spend: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_end_date: Option<DateTime<Utc>>,

    /// Explicit business-account flag; forces the business usage pattern
    #[serde(default)]
    pub business_user: bool,
}

impl UsageReport {
    pub fn new(statistics: UsageStatistics) -> Self {
        Self {
            statistics,
            ..Self::default()
        }
    }

    pub fn customer(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.customer_id = Some(id.into());
        self.name = Some(name.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn current_spend(mut self, spend: f64) -> Self {
        self.current_spend = Some(spend);
        self
    }

    pub fn contract_end(mut self, date: DateTime<Utc>) -> Self {
        self.contract_end_date = Some(date);
        self
    }

    pub fn business_user(mut self, flag: bool) -> Self {
        self.business_user = flag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_hours_are_normalized() {
        let stats = UsageStatistics::new(12.0, 300, 50).peak_hours([20, 8, 20, 30]);
        assert_eq!(stats.peak_usage_hours, vec![8, 20, 30]);
        assert_eq!(stats.invalid_peak_hours(), vec![30]);
    }

    #[test]
    fn test_report_flattens_statistics() {
        let json = r#"{
            "customer_id": "cust_1",
            "name": "Sarah",
            "data_usage_gb": 22.5,
            "voice_minutes": 450,
            "sms_count": 120,
            "business_user": true
        }"#;
        let report: UsageReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.statistics.data_usage_gb, 22.5);
        assert_eq!(report.statistics.voice_minutes, 450);
        assert!(!report.statistics.roaming_usage);
        assert!(report.business_user);
        assert_eq!(report.name.as_deref(), Some("Sarah"));
        assert!(report.location.is_none());
    }
}
