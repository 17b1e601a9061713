//! Follow-up selector.
//!
//! Decides, from the whole transcript, whether the chatbot has heard enough to assess
//! the user or which canned question to ask next. Five information categories are
//! checked in a fixed priority order and the first one with no matching keyword picks
//! the question. Flags are recomputed from scratch on every turn, so a category that
//! has matched once stays matched for the rest of the session.

use serde::{Deserialize, Serialize};

use crate::keywords::{self, contains_any};
use crate::transcript::Transcript;

pub const SYMPTOM_QUESTION: &str = "I understand you're not feeling well. Can you tell me more specifically what symptoms you're experiencing? For example, are you having pain, fever, nausea, or something else?";

pub const SEVERITY_QUESTION: &str = "On a scale of 1-10, with 10 being the worst pain or discomfort you can imagine, how would you rate what you're feeling right now?";

pub const VITAL_SIGNS_QUESTION: &str = "Have you noticed any fever, chills, or unusual changes in your body temperature along with these symptoms?";

pub const MEDICATION_QUESTION: &str = "Are you currently taking any medications, or do you have any known allergies I should be aware of?";

pub const COMPLETION_MESSAGE: &str =
    "Thank you for all that information. Let me analyze your symptoms and provide a health assessment.";

/// Fallback used in the duration question when the latest input names no known symptom.
pub const GENERIC_SYMPTOMS: &str = "these symptoms";

/// One piece of information the chatbot wants before it classifies.
///
/// Variants are declared in asking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InformationCategory {
    Symptom,
    Duration,
    SeverityScale,
    VitalSigns,
    Medication,
}

impl InformationCategory {
    pub const ALL: [InformationCategory; 5] = [
        Self::Symptom,
        Self::Duration,
        Self::SeverityScale,
        Self::VitalSigns,
        Self::Medication,
    ];

    /// Whether lowercased `context` mentions this category.
    pub fn is_present(self, context: &str) -> bool {
        match self {
            Self::Symptom => contains_any(context, keywords::SYMPTOM),
            Self::Duration => contains_any(context, keywords::DURATION),
            Self::SeverityScale => {
                contains_any(context, keywords::SEVERITY_SCALE) || keywords::contains_rating(context)
            }
            Self::VitalSigns => contains_any(context, keywords::VITAL_SIGNS),
            Self::Medication => contains_any(context, keywords::MEDICATION),
        }
    }
}

/// Which categories the transcript has covered so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    pub symptom: bool,
    pub duration: bool,
    pub severity_scale: bool,
    pub vital_signs: bool,
    pub medication: bool,
}

impl CategoryFlags {
    /// Scan a lowercased context string.
    pub fn scan(context: &str) -> Self {
        Self {
            symptom: InformationCategory::Symptom.is_present(context),
            duration: InformationCategory::Duration.is_present(context),
            severity_scale: InformationCategory::SeverityScale.is_present(context),
            vital_signs: InformationCategory::VitalSigns.is_present(context),
            medication: InformationCategory::Medication.is_present(context),
        }
    }

    pub fn from_transcript(transcript: &Transcript) -> Self {
        Self::scan(&transcript.context())
    }

    pub fn is_set(&self, category: InformationCategory) -> bool {
        match category {
            InformationCategory::Symptom => self.symptom,
            InformationCategory::Duration => self.duration,
            InformationCategory::SeverityScale => self.severity_scale,
            InformationCategory::VitalSigns => self.vital_signs,
            InformationCategory::Medication => self.medication,
        }
    }

    /// First category still missing, in asking order.
    pub fn first_missing(&self) -> Option<InformationCategory> {
        InformationCategory::ALL
            .into_iter()
            .find(|category| !self.is_set(*category))
    }
}

/// Outcome of one selector call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FollowUp {
    /// Ask this question next.
    Ask(String),
    /// Every category is covered; classify now.
    Complete(String),
}

impl FollowUp {
    pub fn is_complete(&self) -> bool {
        matches!(self, FollowUp::Complete(_))
    }

    pub fn message(&self) -> &str {
        match self {
            FollowUp::Ask(message) | FollowUp::Complete(message) => message,
        }
    }
}

/// Pick the next question, or signal completion.
///
/// `transcript` must already contain `latest_input`. Only the duration question looks at
/// `latest_input` on its own, to name the symptoms the user just mentioned.
pub fn select_follow_up(latest_input: &str, transcript: &Transcript) -> FollowUp {
    let flags = CategoryFlags::from_transcript(transcript);

    let follow_up = match flags.first_missing() {
        Some(category) => FollowUp::Ask(question_for(category, latest_input)),
        None => FollowUp::Complete(COMPLETION_MESSAGE.to_string()),
    };

    tracing::debug!(
        ?flags,
        complete = follow_up.is_complete(),
        turns = transcript.len(),
        "selected follow-up"
    );

    follow_up
}

/// Question asked when `category` is the first missing one.
pub fn question_for(category: InformationCategory, latest_input: &str) -> String {
    match category {
        InformationCategory::Symptom => SYMPTOM_QUESTION.to_string(),
        InformationCategory::Duration => format!(
            "I see you're experiencing {}. When did these symptoms start? Was it today, yesterday, or longer ago?",
            describe_symptoms(latest_input)
        ),
        InformationCategory::SeverityScale => SEVERITY_QUESTION.to_string(),
        InformationCategory::VitalSigns => VITAL_SIGNS_QUESTION.to_string(),
        InformationCategory::Medication => MEDICATION_QUESTION.to_string(),
    }
}

/// Short, comma-separated summary of the symptoms named in one input.
///
/// Returns [`GENERIC_SYMPTOMS`] when nothing recognisable is mentioned.
pub fn describe_symptoms(input: &str) -> String {
    const GROUPS: &[(&str, &[&str])] = &[
        ("pain", &["pain", "hurt", "ache"]),
        ("fever", &["fever", "hot"]),
        ("cough", &["cough"]),
        ("nausea", &["nausea", "sick"]),
        ("fatigue", &["tired", "fatigue"]),
        ("dizziness", &["dizzy"]),
    ];

    let input = input.to_lowercase();
    let found: Vec<&str> = GROUPS
        .iter()
        .filter(|(_, words)| contains_any(&input, words))
        .map(|(name, _)| *name)
        .collect();

    if found.is_empty() {
        GENERIC_SYMPTOMS.to_string()
    } else {
        found.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(entries: &[&str]) -> Transcript {
        entries.iter().copied().collect()
    }

    fn ask(entries: &[&str]) -> FollowUp {
        let t = transcript(entries);
        select_follow_up(t.last().unwrap_or(""), &t)
    }

    #[test]
    fn no_keywords_asks_for_symptoms() {
        for entries in [
            vec!["hello"],
            vec!["I just wanted to check in", "nothing much"],
            vec!["?"],
        ] {
            assert_eq!(ask(&entries), FollowUp::Ask(SYMPTOM_QUESTION.to_string()));
        }
    }

    #[test]
    fn duration_question_names_latest_symptoms() {
        let follow_up = ask(&["I have a headache and I feel sick"]);
        assert_eq!(
            follow_up,
            FollowUp::Ask(
                "I see you're experiencing pain, nausea. When did these symptoms start? Was it today, yesterday, or longer ago?"
                    .to_string()
            )
        );
    }

    #[test]
    fn duration_question_uses_generic_text_when_latest_input_has_no_symptom() {
        // symptom came from an earlier turn
        let follow_up = ask(&["cough", "it is really annoying"]);
        assert!(follow_up.message().contains("experiencing these symptoms."));
    }

    #[test]
    fn categories_are_asked_in_priority_order() {
        assert_eq!(
            ask(&["my back hurts", "since yesterday"]),
            FollowUp::Ask(SEVERITY_QUESTION.to_string())
        );
        assert_eq!(
            ask(&["my back hurts", "since yesterday", "mild"]),
            FollowUp::Ask(VITAL_SIGNS_QUESTION.to_string())
        );
        assert_eq!(
            ask(&["my back hurts", "since yesterday", "mild", "some chills"]),
            FollowUp::Ask(MEDICATION_QUESTION.to_string())
        );
    }

    #[test]
    fn one_keyword_per_category_in_any_order_completes() {
        let follow_up = ask(&["allergic to penicillin", "chills", "a 4", "two weeks", "dizzy"]);
        assert_eq!(follow_up, FollowUp::Complete(COMPLETION_MESSAGE.to_string()));
    }

    #[test]
    fn single_message_can_cover_everything() {
        let follow_up = ask(&[
            "Fever for three days, mild, no medication",
        ]);
        assert!(follow_up.is_complete());
    }

    #[test]
    fn negated_mentions_still_count() {
        let flags = CategoryFlags::scan("no pain, no fever, no allergies");
        assert!(flags.symptom);
        assert!(flags.vital_signs);
        // "allergies" does not contain "allergy"
        assert!(!flags.medication);
    }

    #[test]
    fn flags_never_clear_as_history_grows() {
        let mut t = transcript(&["my stomach hurts"]);
        assert!(CategoryFlags::from_transcript(&t).symptom);

        t.push("actually I feel fine now, forget that");
        assert!(CategoryFlags::from_transcript(&t).symptom);
    }

    #[test]
    fn rating_satisfies_severity_scale() {
        let flags = CategoryFlags::scan("it's about 6");
        assert!(flags.severity_scale);
        assert_eq!(
            CategoryFlags::scan("i am 18").first_missing(),
            Some(InformationCategory::Symptom)
        );
        assert!(!CategoryFlags::scan("i am 18").severity_scale);
    }

    #[test]
    fn describe_symptoms_lists_in_fixed_order_without_duplicates() {
        assert_eq!(
            describe_symptoms("Dizzy, tired, coughing, it hurts and aches"),
            "pain, cough, fatigue, dizziness"
        );
        assert_eq!(describe_symptoms("feeling off"), GENERIC_SYMPTOMS);
    }
}
