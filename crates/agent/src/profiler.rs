//! Needs extraction
//!
//! Builds a [`CustomerProfile`] from conversation text and usage statistics
//! using surface phrase matching against a [`KeywordTaxonomy`].
//!
//! Evaluation order:
//! 1. Tiered needs: first matching tier, strongest first
//! 2. Binary needs: raised to high on any phrase, never lowered
//! 3. Usage pattern from thresholds
//! 4. Segment by rule precedence
//! 5. Pain points in declaration order

use std::sync::Arc;

use telecom_pitch_config::KeywordTaxonomy;
use telecom_pitch_core::{
    CustomerProfile, CustomerSegment, NeedCategory, NeedsExtractor, NeedsProfile, PainPoint,
    Priority, StageError, UsagePattern, UsageReport, UsageStatistics,
};

/// Usage thresholds; all comparisons are strict
mod thresholds {
    pub const BUSINESS_DATA_GB: f64 = 50.0;
    pub const BUSINESS_VOICE_MIN: u32 = 1000;
    pub const HEAVY_DATA_GB: f64 = 30.0;
    pub const HEAVY_VOICE_MIN: u32 = 800;
    pub const MODERATE_DATA_GB: f64 = 10.0;
    pub const MODERATE_VOICE_MIN: u32 = 300;
}

const TIERED: [NeedCategory; 5] = [
    NeedCategory::CostSensitivity,
    NeedCategory::DataPriority,
    NeedCategory::VoicePriority,
    NeedCategory::NetworkQuality,
    NeedCategory::CustomerService,
];

const BINARY: [NeedCategory; 4] = [
    NeedCategory::InternationalNeeds,
    NeedCategory::FamilySharing,
    NeedCategory::BusinessFeatures,
    NeedCategory::Flexibility,
];

/// Rule-based needs extractor
#[derive(Debug, Clone)]
pub struct CustomerProfiler {
    taxonomy: Arc<KeywordTaxonomy>,
}

impl Default for CustomerProfiler {
    fn default() -> Self {
        Self::new(Arc::new(KeywordTaxonomy::default()))
    }
}

impl CustomerProfiler {
    pub fn new(taxonomy: Arc<KeywordTaxonomy>) -> Self {
        Self { taxonomy }
    }

    /// Derive needs from lower-cased text
    pub fn infer_needs(&self, text: &str) -> NeedsProfile {
        let mut needs = NeedsProfile::default();

        for category in TIERED {
            if let Some(level) = self.taxonomy.match_tier(category, text) {
                needs.set(category, level);
            }
        }

        // After the tiered scan so a tier can never lower them
        for category in BINARY {
            if self.taxonomy.matches_binary(category, text) {
                needs.raise(category, Priority::High);
            }
        }

        needs
    }

    pub fn classify_usage(usage: &UsageStatistics, business_user: bool) -> UsagePattern {
        use thresholds::*;

        let data = usage.data_usage_gb;
        let voice = usage.voice_minutes;

        if (data > BUSINESS_DATA_GB && voice > BUSINESS_VOICE_MIN) || business_user {
            UsagePattern::Business
        } else if data > HEAVY_DATA_GB || voice > HEAVY_VOICE_MIN {
            UsagePattern::Heavy
        } else if data > MODERATE_DATA_GB || voice > MODERATE_VOICE_MIN {
            UsagePattern::Moderate
        } else {
            UsagePattern::Light
        }
    }

    pub fn detect_segment(&self, text: &str) -> CustomerSegment {
        self.taxonomy.detect_segment(text)
    }

    pub fn detect_pain_points(&self, text: &str) -> Vec<PainPoint> {
        self.taxonomy.detect_pain_points(text)
    }

    fn fresh_profile(usage: &UsageReport) -> CustomerProfile {
        let mut profile = CustomerProfile::new(
            usage.customer_id.clone().unwrap_or_else(|| "unknown".to_string()),
            usage.name.clone().unwrap_or_else(|| "Customer".to_string()),
        );
        profile.location = usage.location.clone().unwrap_or_default();
        profile.age = usage.age;
        profile.current_monthly_spend = usage.current_spend.unwrap_or(0.0);
        profile.contract_end_date = usage.contract_end_date;
        profile
    }
}

impl NeedsExtractor for CustomerProfiler {
    fn extract(
        &self,
        conversation: &str,
        usage: &UsageReport,
        existing: Option<&CustomerProfile>,
    ) -> Result<CustomerProfile, StageError> {
        let text = conversation.to_lowercase();

        let needs = self.infer_needs(&text);
        let usage_pattern = Self::classify_usage(&usage.statistics, usage.business_user);
        let pain_points = self.detect_pain_points(&text);

        let profile = match existing {
            Some(existing) => CustomerProfile {
                needs,
                usage_pattern,
                pain_points,
                usage_data: usage.statistics.clone(),
                ..existing.clone()
            },
            None => CustomerProfile {
                segment: self.detect_segment(&text),
                needs,
                usage_pattern,
                pain_points,
                usage_data: usage.statistics.clone(),
                ..Self::fresh_profile(usage)
            },
        };

        tracing::debug!(
            segment = %profile.segment,
            usage_pattern = %profile.usage_pattern,
            pain_points = profile.pain_points.len(),
            elevated = profile.needs.changed_categories().len(),
            merged = existing.is_some(),
            "Customer profile extracted"
        );

        Ok(profile)
    }
}
