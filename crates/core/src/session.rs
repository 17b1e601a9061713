//! One triage chat session.
//!
//! The session owns the visible message log, the transcript the rules scan, and the
//! result once there is one. Each user turn is handled synchronously: record the input,
//! ask the follow-up selector what to do, and either post the next question or run the
//! classifier and close the conversation. After that no more input is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_ids::MessageId;
use triage_types::is_blank;

use crate::assessment::{AssessmentStore, SavedAssessment};
use crate::classifier::{classify, TriageResult};
use crate::error::{CoreResult, SessionError};
use crate::followup::{select_follow_up, FollowUp};
use crate::notice::Notice;
use crate::profile::PatientProfile;
use crate::teleconsult::TeleconsultPlan;
use crate::transcript::Transcript;

pub const GREETING: &str = "Hello! I'm your AI health assistant here to help assess your health concerns. What brings you here today? Please tell me about any symptoms or health issues you're experiencing.";

pub const ASSESSMENT_COMPLETE_MESSAGE: &str = "Thank you for providing all that information. Based on our conversation, I've completed your health assessment. Please review the results below and follow the recommended next steps.";

pub const COMPLETE_TITLE: &str = "Health Assessment Complete";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// The assistant's answer to one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Another question; the conversation continues.
    Question(ChatMessage),
    /// The conversation is over and the classifier has run.
    Assessment {
        message: ChatMessage,
        result: TriageResult,
        notice: Notice,
    },
}

impl Reply {
    pub fn message(&self) -> &ChatMessage {
        match self {
            Reply::Question(message) | Reply::Assessment { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriageSession {
    patient: Option<PatientProfile>,
    messages: Vec<ChatMessage>,
    transcript: Transcript,
    result: Option<TriageResult>,
}

impl Default for TriageSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageSession {
    /// A fresh session, opened with the assistant greeting.
    pub fn new() -> Self {
        Self {
            patient: None,
            messages: vec![ChatMessage::new(Sender::Assistant, GREETING)],
            transcript: Transcript::new(),
            result: None,
        }
    }

    /// A fresh session for a patient who has just completed intake.
    pub fn for_patient(patient: PatientProfile) -> Self {
        Self {
            patient: Some(patient),
            ..Self::new()
        }
    }

    pub fn patient(&self) -> Option<&PatientProfile> {
        self.patient.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn result(&self) -> Option<&TriageResult> {
        self.result.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Whether a send with `input` would do anything.
    pub fn can_send(&self, input: &str) -> bool {
        !self.is_complete() && !is_blank(input)
    }

    /// Handle one user turn.
    ///
    /// Blank input is ignored and returns `Ok(None)` without touching the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyComplete`] once the assessment has been produced.
    pub fn send(&mut self, input: &str) -> Result<Option<Reply>, SessionError> {
        if self.is_complete() {
            return Err(SessionError::AlreadyComplete);
        }
        if !self.transcript.push(input) {
            return Ok(None);
        }
        self.messages.push(ChatMessage::new(Sender::User, input));

        let reply = match select_follow_up(input, &self.transcript) {
            FollowUp::Ask(question) => {
                let message = ChatMessage::new(Sender::Assistant, question);
                self.messages.push(message.clone());
                Reply::Question(message)
            }
            FollowUp::Complete(_) => {
                let result = classify(&self.transcript);
                let message = ChatMessage::new(Sender::Assistant, ASSESSMENT_COMPLETE_MESSAGE);
                self.messages.push(message.clone());
                self.result = Some(result.clone());

                tracing::info!(
                    severity = %result.severity,
                    confidence = result.confidence,
                    turns = self.transcript.len(),
                    "assessment complete"
                );

                let notice = Notice::info(
                    COMPLETE_TITLE,
                    format!(
                        "Assessment completed with {}% confidence",
                        result.confidence
                    ),
                );
                Reply::Assessment {
                    message,
                    result,
                    notice,
                }
            }
        };

        Ok(Some(reply))
    }

    fn completed_result(&self) -> Result<&TriageResult, SessionError> {
        self.result.as_ref().ok_or(SessionError::NotComplete)
    }

    /// Snapshot of the finished conversation, stamped with a new id.
    pub fn snapshot(&self) -> Result<SavedAssessment, SessionError> {
        let result = self.completed_result()?;
        Ok(SavedAssessment::new(self.transcript.clone(), result.clone()))
    }

    /// Write the finished conversation to the local store, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Session(NotComplete)` before the assessment exists, or a
    /// storage error from [`AssessmentStore::save`].
    pub fn save(&self, store: &AssessmentStore) -> CoreResult<Notice> {
        let assessment = self.snapshot()?;
        store.save(&assessment)
    }

    /// Notices for proceeding to a consultation.
    pub fn teleconsultation(&self) -> Result<TeleconsultPlan, SessionError> {
        self.completed_result().map(TeleconsultPlan::for_result)
    }
}
