//! Keyword tables shared by the follow-up selector and the severity classifier.
//!
//! Every test is plain substring containment against lowercased text, except the
//! standalone 1-10 rating which needs word boundaries. There is no stemming and no
//! negation handling: "no pain" contains "pain".

use std::sync::LazyLock;

use regex::Regex;

// ═══════════════════════════════════════════
// Information categories
// ═══════════════════════════════════════════

pub const SYMPTOM: &[&str] = &[
    "pain", "ache", "fever", "cough", "nausea", "tired", "dizzy", "hurt", "sick", "symptom",
];

pub const DURATION: &[&str] = &[
    "day", "week", "hour", "month", "since", "ago", "started", "begin",
];

pub const SEVERITY_SCALE: &[&str] = &["severe", "mild", "moderate", "scale", "rate"];

pub const VITAL_SIGNS: &[&str] = &["fever", "temperature", "chills", "hot", "cold", "sweating"];

pub const MEDICATION: &[&str] = &[
    "medication",
    "medicine",
    "drug",
    "pill",
    "allergy",
    "allergic",
];

/// A standalone number from 1 to 10 ("7", "rate it 10"), but not "18" or "100".
///
/// Boundaries are ASCII-only: "é7" still counts, since "é" is not a word byte.
static RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)([1-9]|10)(?-u:\b)").expect("Invalid rating regex pattern")
});

pub fn contains_rating(text: &str) -> bool {
    RATING.is_match(text)
}

// ═══════════════════════════════════════════
// Severity markers
// ═══════════════════════════════════════════

pub const EMERGENCY: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "can't breathe",
    "severe pain",
    "unconscious",
    "bleeding",
    "choking",
    "heart attack",
    "stroke",
    "seizure",
];

// Bare digits are substring tests: "18 years" carries an "8".
pub const HIGH_SEVERITY: &[&str] = &[
    "severe",
    "8",
    "9",
    "10",
    "unbearable",
    "excruciating",
    "worst",
    "can't walk",
    "can't move",
    "very high fever",
];

pub const MEDIUM_SEVERITY: &[&str] = &[
    "moderate",
    "5",
    "6",
    "7",
    "fever",
    "vomiting",
    "persistent",
    "getting worse",
    "several days",
];

pub const RESPIRATORY: &[&str] = &["cough", "breathing"];

pub const FEVER: &[&str] = &["fever", "temperature"];

pub const PAIN: &[&str] = &["pain", "hurt"];

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_matches_standalone_numbers_only() {
        assert!(contains_rating("about a 7"));
        assert!(contains_rating("it's 10 today"));
        assert!(contains_rating("1"));
        assert!(!contains_rating("0"));
        assert!(!contains_rating("18 years old"));
        assert!(!contains_rating("100 degrees"));
    }

    #[test]
    fn rating_boundary_ignores_non_ascii_letters() {
        assert!(contains_rating("douleur é7"));
        assert!(contains_rating("7ñ"));
        assert!(!contains_rating("a7"));
    }

    #[test]
    fn contains_any_is_plain_substring() {
        assert!(contains_any("no pain at all", PAIN));
        assert!(contains_any("painkillers", PAIN));
        assert!(!contains_any("fine", PAIN));
    }

    #[test]
    fn digit_markers_match_inside_longer_numbers() {
        assert!(contains_any("i am 18", HIGH_SEVERITY));
        assert!(contains_any("room 56", MEDIUM_SEVERITY));
    }
}
