//! Keyword taxonomy
//!
//! Phrase tables that drive needs, segment and pain-point detection. The
//! built-in tables can be replaced by a YAML file with the same shape.
//! Tier scan order (critical, high, medium, low) and segment precedence
//! (enterprise, business, family) are fixed regardless of file order.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use telecom_pitch_core::{CustomerSegment, NeedCategory, PainPoint, Priority};

use crate::ConfigError;

/// Phrases that set a category to one priority level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub priority: Priority,
    pub phrases: Vec<String>,
}

/// Tiered tables for the leveled needs categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TieredNeeds {
    pub cost_sensitivity: Vec<Tier>,
    pub data_priority: Vec<Tier>,
    pub voice_priority: Vec<Tier>,
    pub network_quality: Vec<Tier>,
    pub customer_service: Vec<Tier>,
}

/// Phrase sets that raise a need to high when any phrase appears
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BinaryNeeds {
    pub international_needs: Vec<String>,
    pub family_sharing: Vec<String>,
    pub business_features: Vec<String>,
    pub flexibility: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRule {
    pub segment: CustomerSegment,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainPointRule {
    pub pain_point: PainPoint,
    pub phrases: Vec<String>,
}

/// Complete phrase taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTaxonomy {
    pub tiers: TieredNeeds,
    pub binary: BinaryNeeds,
    /// Checked by segment precedence, not list order
    pub segments: Vec<SegmentRule>,
    /// Declaration order is the output order of detected pain points
    pub pain_points: Vec<PainPointRule>,
}

/// Segments with phrase rules, strongest first; individual is the fallback
const SEGMENT_PRECEDENCE: [CustomerSegment; 3] = [
    CustomerSegment::Enterprise,
    CustomerSegment::Business,
    CustomerSegment::Family,
];

static BUILTIN: Lazy<KeywordTaxonomy> = Lazy::new(KeywordTaxonomy::builtin);

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn tier(priority: Priority, list: &[&str]) -> Tier {
    Tier {
        priority,
        phrases: phrases(list),
    }
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_str()))
}

impl Default for KeywordTaxonomy {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl KeywordTaxonomy {
    fn builtin() -> Self {
        use Priority::{Critical, High, Low};

        let tiers = TieredNeeds {
            cost_sensitivity: vec![
                tier(
                    Critical,
                    &[
                        "expensive",
                        "too much",
                        "cant afford",
                        "budget tight",
                        "cheaper",
                        "save money",
                        "cost cutting",
                    ],
                ),
                tier(High, &["pricey", "cost", "budget", "affordable", "reasonable price"]),
                tier(
                    Low,
                    &[
                        "dont care about price",
                        "money no object",
                        "premium service",
                        "best available",
                    ],
                ),
            ],
            data_priority: vec![
                tier(
                    Critical,
                    &[
                        "unlimited data",
                        "lots of data",
                        "stream videos",
                        "heavy user",
                        "work from home",
                        "online gaming",
                    ],
                ),
                tier(High, &["data", "internet", "streaming", "social media", "apps"]),
                tier(Low, &["dont use data", "wifi mostly", "basic phone", "calls only"]),
            ],
            voice_priority: vec![
                tier(
                    Critical,
                    &["unlimited calls", "talk a lot", "business calls", "long conversations"],
                ),
                tier(High, &["calls", "talking", "voice", "minutes"]),
                tier(Low, &["dont call much", "text mostly", "rarely call"]),
            ],
            network_quality: vec![
                tier(
                    Critical,
                    &[
                        "poor coverage",
                        "dropped calls",
                        "slow internet",
                        "need reliability",
                        "coverage issues",
                    ],
                ),
                tier(High, &["good coverage", "fast internet", "reliable", "network quality"]),
                tier(Low, &["coverage ok", "dont mind slow"]),
            ],
            customer_service: vec![
                tier(
                    Critical,
                    &["terrible service", "poor support", "unhelpful staff", "long wait times"],
                ),
                tier(High, &["customer service", "support"]),
                tier(Low, &["never call support", "dont need support"]),
            ],
        };

        let binary = BinaryNeeds {
            international_needs: phrases(&[
                "international",
                "overseas",
                "abroad",
                "foreign",
                "global",
                "travel",
            ]),
            family_sharing: phrases(&[
                "family plan",
                "multiple lines",
                "kids",
                "spouse",
                "shared",
                "family",
            ]),
            business_features: phrases(&["business", "work", "company", "enterprise", "professional"]),
            flexibility: phrases(&[
                "flexible",
                "change plans",
                "no contract",
                "month to month",
                "cancel anytime",
            ]),
        };

        let segments = vec![
            SegmentRule {
                segment: CustomerSegment::Enterprise,
                phrases: phrases(&[
                    "enterprise",
                    "corporation",
                    "company plan",
                    "bulk lines",
                    "business account",
                ]),
            },
            SegmentRule {
                segment: CustomerSegment::Business,
                phrases: phrases(&["business", "work", "professional", "office"]),
            },
            SegmentRule {
                segment: CustomerSegment::Family,
                phrases: phrases(&[
                    "family",
                    "kids",
                    "children",
                    "spouse",
                    "multiple lines",
                    "family plan",
                ]),
            },
        ];

        let pain_points = vec![
            PainPointRule {
                pain_point: PainPoint::PoorCoverage,
                phrases: phrases(&["poor coverage", "no signal", "dropped calls", "coverage issues"]),
            },
            PainPointRule {
                pain_point: PainPoint::ExpensiveBill,
                phrases: phrases(&["expensive", "high bill", "too much money", "overpriced"]),
            },
            PainPointRule {
                pain_point: PainPoint::SlowInternet,
                phrases: phrases(&["slow internet", "slow data", "poor speed", "buffering"]),
            },
            PainPointRule {
                pain_point: PainPoint::PoorCustomerService,
                phrases: phrases(&[
                    "bad service",
                    "poor support",
                    "unhelpful staff",
                    "long wait times",
                ]),
            },
            PainPointRule {
                pain_point: PainPoint::ContractIssues,
                phrases: phrases(&["locked in", "cant change", "stuck with plan", "contract problems"]),
            },
            PainPointRule {
                pain_point: PainPoint::BillingIssues,
                phrases: phrases(&[
                    "billing error",
                    "wrong charge",
                    "unexpected fees",
                    "billing confusion",
                ]),
            },
            PainPointRule {
                pain_point: PainPoint::OverageCharges,
                phrases: phrases(&["overage", "extra charges", "exceeded limit", "surprise charges"]),
            },
        ];

        Self {
            tiers,
            binary,
            segments,
            pain_points,
        }
    }

    /// Load from a YAML file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let taxonomy: KeywordTaxonomy =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        taxonomy.validate()?;

        tracing::debug!(
            path = %path.display(),
            segments = taxonomy.segments.len(),
            pain_points = taxonomy.pain_points.len(),
            "Loaded keyword taxonomy"
        );
        Ok(taxonomy)
    }

    /// Tier table for a leveled category; `None` for the binary needs
    pub fn tiers(&self, category: NeedCategory) -> Option<&[Tier]> {
        let table = match category {
            NeedCategory::CostSensitivity => &self.tiers.cost_sensitivity,
            NeedCategory::DataPriority => &self.tiers.data_priority,
            NeedCategory::VoicePriority => &self.tiers.voice_priority,
            NeedCategory::NetworkQuality => &self.tiers.network_quality,
            NeedCategory::CustomerService => &self.tiers.customer_service,
            _ => return None,
        };
        Some(table.as_slice())
    }

    /// Phrase set for a binary need; `None` for tiered categories
    pub fn binary_phrases(&self, category: NeedCategory) -> Option<&[String]> {
        let set = match category {
            NeedCategory::InternationalNeeds => &self.binary.international_needs,
            NeedCategory::FamilySharing => &self.binary.family_sharing,
            NeedCategory::BusinessFeatures => &self.binary.business_features,
            NeedCategory::Flexibility => &self.binary.flexibility,
            _ => return None,
        };
        Some(set.as_slice())
    }

    /// First tier, scanning strongest to weakest, with a phrase in `text`.
    ///
    /// `text` must already be lower-cased.
    pub fn match_tier(&self, category: NeedCategory, text: &str) -> Option<Priority> {
        let tiers = self.tiers(category)?;
        Priority::SCAN_ORDER.into_iter().find(|level| {
            tiers
                .iter()
                .filter(|t| t.priority == *level)
                .any(|t| contains_any(text, &t.phrases))
        })
    }

    /// Whether any phrase of a binary need appears in lower-cased `text`
    pub fn matches_binary(&self, category: NeedCategory, text: &str) -> bool {
        self.binary_phrases(category)
            .map(|set| contains_any(text, set))
            .unwrap_or(false)
    }

    /// Strongest segment with a phrase in lower-cased `text`, else individual
    pub fn detect_segment(&self, text: &str) -> CustomerSegment {
        SEGMENT_PRECEDENCE
            .into_iter()
            .find(|segment| {
                self.segments
                    .iter()
                    .filter(|rule| rule.segment == *segment)
                    .any(|rule| contains_any(text, &rule.phrases))
            })
            .unwrap_or_default()
    }

    /// Pain points with a phrase in lower-cased `text`, in declaration order
    pub fn detect_pain_points(&self, text: &str) -> Vec<PainPoint> {
        let mut found = Vec::new();
        for rule in &self.pain_points {
            if !found.contains(&rule.pain_point) && contains_any(text, &rule.phrases) {
                found.push(rule.pain_point);
            }
        }
        found
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in NeedCategory::ALL {
            if let Some(tiers) = self.tiers(category) {
                let mut seen: Vec<Priority> = Vec::with_capacity(tiers.len());
                for t in tiers {
                    if seen.contains(&t.priority) {
                        return Err(ConfigError::InvalidValue {
                            field: format!("tiers.{}", category),
                            message: format!("Duplicate '{}' tier", t.priority),
                        });
                    }
                    seen.push(t.priority);
                    check_phrases(&format!("tiers.{}.{}", category, t.priority), &t.phrases)?;
                }
            }
            if let Some(set) = self.binary_phrases(category) {
                check_phrases(&format!("binary.{}", category), set)?;
            }
        }

        for rule in &self.segments {
            if !SEGMENT_PRECEDENCE.contains(&rule.segment) {
                return Err(ConfigError::InvalidValue {
                    field: format!("segments.{}", rule.segment),
                    message: "Fallback segment takes no phrases".to_string(),
                });
            }
            check_phrases(&format!("segments.{}", rule.segment), &rule.phrases)?;
        }
        for rule in &self.pain_points {
            check_phrases(&format!("pain_points.{}", rule.pain_point), &rule.phrases)?;
        }

        Ok(())
    }
}

/// Phrases are matched against lower-cased text, so they must be non-empty and lower-case
fn check_phrases(field: &str, phrases: &[String]) -> Result<(), ConfigError> {
    for phrase in phrases {
        if phrase.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "Empty phrase".to_string(),
            });
        }
        if phrase.to_lowercase() != *phrase {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!("Phrase '{}' must be lower-case", phrase),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_is_valid() {
        let taxonomy = KeywordTaxonomy::default();
        assert!(taxonomy.validate().is_ok());
        assert_eq!(taxonomy.pain_points.len(), PainPoint::ALL.len());
    }

    #[test]
    fn test_strongest_tier_wins() {
        let taxonomy = KeywordTaxonomy::default();
        // "expensive" is critical, "premium service" is low
        let text = "it is expensive but i want premium service";
        assert_eq!(
            taxonomy.match_tier(NeedCategory::CostSensitivity, text),
            Some(Priority::Critical)
        );
        assert_eq!(
            taxonomy.match_tier(NeedCategory::CostSensitivity, "money no object"),
            Some(Priority::Low)
        );
        assert_eq!(taxonomy.match_tier(NeedCategory::CostSensitivity, "hello"), None);
    }

    #[test]
    fn test_scan_order_ignores_file_order() {
        let mut taxonomy = KeywordTaxonomy::default();
        taxonomy.tiers.data_priority.reverse();
        assert_eq!(
            taxonomy.match_tier(NeedCategory::DataPriority, "unlimited data for my apps"),
            Some(Priority::Critical)
        );
    }

    #[test]
    fn test_binary_needs_have_no_tiers() {
        let taxonomy = KeywordTaxonomy::default();
        assert!(taxonomy.tiers(NeedCategory::InternationalNeeds).is_none());
        assert!(taxonomy.matches_binary(NeedCategory::InternationalNeeds, "i travel abroad"));
        assert!(!taxonomy.matches_binary(NeedCategory::CostSensitivity, "expensive"));
    }

    #[test]
    fn test_segment_precedence() {
        let taxonomy = KeywordTaxonomy::default();
        assert_eq!(
            taxonomy.detect_segment("our enterprise has a family of brands and business units"),
            CustomerSegment::Enterprise
        );
        assert_eq!(
            taxonomy.detect_segment("i work from home and have kids"),
            CustomerSegment::Business
        );
        assert_eq!(taxonomy.detect_segment("my kids"), CustomerSegment::Family);
        assert_eq!(taxonomy.detect_segment("just me"), CustomerSegment::Individual);
    }

    #[test]
    fn test_segment_precedence_ignores_file_order() {
        let mut taxonomy = KeywordTaxonomy::default();
        taxonomy.segments.reverse();
        assert_eq!(taxonomy.segments[0].segment, CustomerSegment::Family);
        assert_eq!(
            taxonomy.detect_segment("family plan for the enterprise"),
            CustomerSegment::Enterprise
        );
        assert_eq!(
            taxonomy.detect_segment("my kids and my office"),
            CustomerSegment::Business
        );
    }

    #[test]
    fn test_validate_rejects_individual_rule() {
        let mut taxonomy = KeywordTaxonomy::default();
        taxonomy.segments.push(SegmentRule {
            segment: CustomerSegment::Individual,
            phrases: vec!["just me".to_string()],
        });
        assert!(taxonomy.validate().is_err());
    }

    #[test]
    fn test_pain_points_in_declaration_order() {
        let taxonomy = KeywordTaxonomy::default();
        let found = taxonomy.detect_pain_points("constant buffering and no signal, so expensive");
        assert_eq!(
            found,
            vec![
                PainPoint::PoorCoverage,
                PainPoint::ExpensiveBill,
                PainPoint::SlowInternet
            ]
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_tier() {
        let mut taxonomy = KeywordTaxonomy::default();
        let extra = taxonomy.tiers.voice_priority[0].clone();
        taxonomy.tiers.voice_priority.push(extra);
        assert!(taxonomy.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_phrase() {
        let mut taxonomy = KeywordTaxonomy::default();
        taxonomy.binary.flexibility.push("  ".to_string());
        assert!(taxonomy.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
tiers:
  cost_sensitivity:
    - priority: low
      phrases: ["whatever it costs"]
    - priority: critical
      phrases: ["broke"]
binary:
  international_needs: ["roam"]
segments:
  - segment: family
    phrases: ["household"]
pain_points:
  - pain_point: "billing issues"
    phrases: ["double charged"]
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let taxonomy = KeywordTaxonomy::load(file.path()).unwrap();
        assert_eq!(
            taxonomy.match_tier(NeedCategory::CostSensitivity, "i am broke, whatever it costs"),
            Some(Priority::Critical)
        );
        assert!(taxonomy.tiers.data_priority.is_empty());
        assert_eq!(taxonomy.detect_segment("big household"), CustomerSegment::Family);
        assert_eq!(
            taxonomy.detect_pain_points("i was double charged"),
            vec![PainPoint::BillingIssues]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = KeywordTaxonomy::load("/nonexistent/taxonomy.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
