//! Customer needs profile
//!
//! Nine independently leveled needs categories. The six core categories start
//! at `Medium`, the three optional ones (international, family sharing,
//! business features) start at `Low`.

use serde::{Deserialize, Serialize};

/// Ordinal priority level for a single needs category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Fixed order in which tiered keyword tables are scanned.
    ///
    /// The first tier with a matching phrase wins, so a stronger tier always
    /// shadows a weaker one for the same category.
    pub const SCAN_ORDER: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// High or critical
    pub fn is_elevated(&self) -> bool {
        *self >= Priority::High
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the independently leveled needs dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedCategory {
    CostSensitivity,
    DataPriority,
    VoicePriority,
    NetworkQuality,
    CustomerService,
    Flexibility,
    InternationalNeeds,
    FamilySharing,
    BusinessFeatures,
}

impl NeedCategory {
    pub const ALL: [NeedCategory; 9] = [
        NeedCategory::CostSensitivity,
        NeedCategory::DataPriority,
        NeedCategory::VoicePriority,
        NeedCategory::NetworkQuality,
        NeedCategory::CustomerService,
        NeedCategory::Flexibility,
        NeedCategory::InternationalNeeds,
        NeedCategory::FamilySharing,
        NeedCategory::BusinessFeatures,
    ];

    /// Field name used in serialized profiles
    pub fn as_str(&self) -> &'static str {
        match self {
            NeedCategory::CostSensitivity => "cost_sensitivity",
            NeedCategory::DataPriority => "data_priority",
            NeedCategory::VoicePriority => "voice_priority",
            NeedCategory::NetworkQuality => "network_quality",
            NeedCategory::CustomerService => "customer_service",
            NeedCategory::Flexibility => "flexibility",
            NeedCategory::InternationalNeeds => "international_needs",
            NeedCategory::FamilySharing => "family_sharing",
            NeedCategory::BusinessFeatures => "business_features",
        }
    }

    /// Level a category holds before any extraction runs
    pub fn default_priority(&self) -> Priority {
        match self {
            NeedCategory::InternationalNeeds
            | NeedCategory::FamilySharing
            | NeedCategory::BusinessFeatures => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl std::fmt::Display for NeedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn low() -> Priority {
    Priority::Low
}

/// Needs and priorities derived for one customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedsProfile {
    /// How price-sensitive the customer is
    #[serde(default)]
    pub cost_sensitivity: Priority,
    /// Importance of data allowance
    #[serde(default)]
    pub data_priority: Priority,
    /// Importance of voice minutes
    #[serde(default)]
    pub voice_priority: Priority,
    /// Importance of network coverage and speed
    #[serde(default)]
    pub network_quality: Priority,
    /// Importance of customer support
    #[serde(default)]
    pub customer_service: Priority,
    /// Need for plan flexibility
    #[serde(default)]
    pub flexibility: Priority,
    #[serde(default = "low")]
    pub international_needs: Priority,
    #[serde(default = "low")]
    pub family_sharing: Priority,
    #[serde(default = "low")]
    pub business_features: Priority,
}

impl Default for NeedsProfile {
    fn default() -> Self {
        Self {
            cost_sensitivity: Priority::Medium,
            data_priority: Priority::Medium,
            voice_priority: Priority::Medium,
            network_quality: Priority::Medium,
            customer_service: Priority::Medium,
            flexibility: Priority::Medium,
            international_needs: Priority::Low,
            family_sharing: Priority::Low,
            business_features: Priority::Low,
        }
    }
}

impl NeedsProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the level held by a category
    pub fn get(&self, category: NeedCategory) -> Priority {
        match category {
            NeedCategory::CostSensitivity => self.cost_sensitivity,
            NeedCategory::DataPriority => self.data_priority,
            NeedCategory::VoicePriority => self.voice_priority,
            NeedCategory::NetworkQuality => self.network_quality,
            NeedCategory::CustomerService => self.customer_service,
            NeedCategory::Flexibility => self.flexibility,
            NeedCategory::InternationalNeeds => self.international_needs,
            NeedCategory::FamilySharing => self.family_sharing,
            NeedCategory::BusinessFeatures => self.business_features,
        }
    }

    fn slot_mut(&mut self, category: NeedCategory) -> &mut Priority {
        match category {
            NeedCategory::CostSensitivity => &mut self.cost_sensitivity,
            NeedCategory::DataPriority => &mut self.data_priority,
            NeedCategory::VoicePriority => &mut self.voice_priority,
            NeedCategory::NetworkQuality => &mut self.network_quality,
            NeedCategory::CustomerService => &mut self.customer_service,
            NeedCategory::Flexibility => &mut self.flexibility,
            NeedCategory::InternationalNeeds => &mut self.international_needs,
            NeedCategory::FamilySharing => &mut self.family_sharing,
            NeedCategory::BusinessFeatures => &mut self.business_features,
        }
    }

    /// Overwrite a category's level
    pub fn set(&mut self, category: NeedCategory, priority: Priority) {
        *self.slot_mut(category) = priority;
    }

    /// Raise a category to at least `priority`; never lowers it
    pub fn raise(&mut self, category: NeedCategory, priority: Priority) {
        let slot = self.slot_mut(category);
        if priority > *slot {
            *slot = priority;
        }
    }

    /// High or critical for the given category
    pub fn is_elevated(&self, category: NeedCategory) -> bool {
        self.get(category).is_elevated()
    }

    /// Categories whose level differs from their pre-extraction default
    pub fn changed_categories(&self) -> Vec<NeedCategory> {
        NeedCategory::ALL
            .into_iter()
            .filter(|c| self.get(*c) != c.default_priority())
            .collect()
    }
}
