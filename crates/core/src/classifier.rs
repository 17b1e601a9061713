//! Severity classifier.
//!
//! Runs once, over the full transcript, when the follow-up selector reports the
//! conversation complete. Three rules are tried in order and the first match wins:
//!
//! 1. an emergency phrase or a high-severity marker → [`SeverityTier::High`]
//! 2. a medium-severity marker, or fever with pain, or a respiratory complaint with
//!    fever → [`SeverityTier::Medium`]
//! 3. anything else → [`SeverityTier::Low`]
//!
//! Each tier maps to one fixed record. Confidence is a per-tier constant, not a score.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keywords::{self, contains_any};
use crate::transcript::Transcript;

pub const HIGH_CONFIDENCE: u8 = 92;
pub const MEDIUM_CONFIDENCE: u8 = 87;
pub const LOW_CONFIDENCE: u8 = 81;

/// Output bucket of the classifier, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn confidence(self) -> u8 {
        match self {
            Self::Low => LOW_CONFIDENCE,
            Self::Medium => MEDIUM_CONFIDENCE,
            Self::High => HIGH_CONFIDENCE,
        }
    }

    pub fn is_emergency(self) -> bool {
        self == Self::High
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification record shown to the user and saved with the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    pub severity: SeverityTier,
    pub condition: String,
    pub recommendation: String,
    pub urgency: String,
    pub next_steps: Vec<String>,
    pub confidence: u8,
}

impl TriageResult {
    /// The fixed record for `tier`.
    pub fn for_tier(tier: SeverityTier) -> Self {
        let (condition, recommendation, urgency, next_steps): (&str, &str, &str, [&str; 4]) =
            match tier {
                SeverityTier::High => (
                    "Urgent Medical Attention Required",
                    "Immediate teleconsultation with doctor",
                    "HIGH PRIORITY - Within 15 minutes",
                    [
                        "Initiate emergency teleconsultation protocol",
                        "Monitor patient continuously",
                        "Prepare for possible emergency referral",
                        "Document all symptoms for emergency team",
                    ],
                ),
                SeverityTier::Medium => (
                    "Medical Consultation Recommended",
                    "Schedule teleconsultation within 2-4 hours",
                    "MEDIUM PRIORITY - Within 4 hours",
                    [
                        "Schedule teleconsultation appointment",
                        "Continue monitoring symptoms",
                        "Prepare detailed symptom timeline",
                        "Consider symptomatic relief measures",
                    ],
                ),
                SeverityTier::Low => (
                    "Routine Healthcare Guidance",
                    "General health advice and routine consultation",
                    "LOW PRIORITY - Within 24 hours",
                    [
                        "Provide basic health guidance",
                        "Schedule routine consultation if symptoms persist",
                        "Monitor for any changes in condition",
                        "Consider self-care measures",
                    ],
                ),
            };

        Self {
            severity: tier,
            condition: condition.to_string(),
            recommendation: recommendation.to_string(),
            urgency: urgency.to_string(),
            next_steps: next_steps.iter().map(|s| s.to_string()).collect(),
            confidence: tier.confidence(),
        }
    }
}

/// Tier for a lowercased context string.
pub fn severity_tier(context: &str) -> SeverityTier {
    let has_emergency = contains_any(context, keywords::EMERGENCY);
    let has_high = contains_any(context, keywords::HIGH_SEVERITY);
    if has_emergency || has_high {
        return SeverityTier::High;
    }

    let has_medium = contains_any(context, keywords::MEDIUM_SEVERITY);
    let has_respiratory = contains_any(context, keywords::RESPIRATORY);
    let has_fever = contains_any(context, keywords::FEVER);
    let has_pain = contains_any(context, keywords::PAIN);
    if has_medium || (has_fever && has_pain) || (has_respiratory && has_fever) {
        return SeverityTier::Medium;
    }

    SeverityTier::Low
}

/// Classify a whole conversation.
pub fn classify(transcript: &Transcript) -> TriageResult {
    let tier = severity_tier(&transcript.context());
    tracing::debug!(%tier, turns = transcript.len(), "classified transcript");
    TriageResult::for_tier(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_entries(entries: &[&str]) -> TriageResult {
        let transcript: Transcript = entries.iter().copied().collect();
        classify(&transcript)
    }

    #[test]
    fn chest_pain_is_always_high() {
        for entries in [
            vec!["chest pain"],
            vec!["mild", "Chest Pain since this morning", "no medication"],
            vec!["I'm fine really", "well, some chest pain", "it's a 2"],
        ] {
            let result = classify_entries(&entries);
            assert_eq!(result.severity, SeverityTier::High);
            assert_eq!(result.confidence, 92);
        }
    }

    #[test]
    fn emergency_phrase_can_span_turns() {
        let result = classify_entries(&["my chest", "pain is sharp"]);
        assert_eq!(result.severity, SeverityTier::High);
    }

    #[test]
    fn high_severity_markers_win() {
        assert_eq!(classify_entries(&["the worst headache"]).severity, SeverityTier::High);
        assert_eq!(classify_entries(&["I'd say 9"]).severity, SeverityTier::High);
        assert_eq!(classify_entries(&["i can't walk"]).severity, SeverityTier::High);
    }

    #[test]
    fn numeric_markers_are_substring_matches() {
        // "18" carries an "8", which is a high marker
        assert_eq!(classify_entries(&["I am 18 and have a rash"]).severity, SeverityTier::High);
    }

    #[test]
    fn fever_and_pain_without_high_markers_is_medium() {
        let result = classify_entries(&["fever", "and some pain in my legs"]);
        assert_eq!(result.severity, SeverityTier::Medium);
        assert_eq!(result.confidence, 87);
    }

    #[test]
    fn temperature_with_cough_is_medium() {
        let result = classify_entries(&["a cough", "and a temperature"]);
        assert_eq!(result.severity, SeverityTier::Medium);
    }

    #[test]
    fn medium_markers_alone_are_medium() {
        assert_eq!(classify_entries(&["moderate"]).severity, SeverityTier::Medium);
        assert_eq!(classify_entries(&["persistent itch"]).severity, SeverityTier::Medium);
        assert_eq!(classify_entries(&["about a 6"]).severity, SeverityTier::Medium);
    }

    #[test]
    fn no_markers_is_low() {
        let result = classify_entries(&["a small rash on my arm", "mild", "no allergies"]);
        assert_eq!(result.severity, SeverityTier::Low);
        assert_eq!(result.confidence, 81);
        assert_eq!(result.condition, "Routine Healthcare Guidance");
        assert_eq!(result.next_steps.len(), 4);
    }

    #[test]
    fn empty_transcript_is_low() {
        assert_eq!(classify(&Transcript::new()).severity, SeverityTier::Low);
    }

    #[test]
    fn classify_is_idempotent() {
        let transcript: Transcript = ["cough", "three days", "4", "chills", "no pills"]
            .into_iter()
            .collect();
        assert_eq!(classify(&transcript), classify(&transcript));
    }

    #[test]
    fn confidence_is_constant_per_tier() {
        for tier in [SeverityTier::Low, SeverityTier::Medium, SeverityTier::High] {
            assert_eq!(TriageResult::for_tier(tier).confidence, tier.confidence());
        }
    }

    #[test]
    fn result_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(TriageResult::for_tier(SeverityTier::High)).unwrap();
        assert_eq!(json["severity"], "high");
        assert_eq!(json["confidence"], 92);
        assert_eq!(json["nextSteps"][0], "Initiate emergency teleconsultation protocol");
    }
}
