//! # Triage Core
//!
//! Core logic for the patient intake and keyword triage assistant.
//!
//! - [`profile`]: intake form validation and hand-off
//! - [`followup`]: picks the next canned question from the transcript
//! - [`classifier`]: maps the finished transcript to a fixed severity record
//! - [`session`]: one chat session tying the two together
//! - [`assessment`]: the single local slot holding the latest saved assessment
//!
//! **No front-end concerns**: prompting, printing and the artificial pauses belong to the
//! `triage-run` and `triage` binaries.

pub mod assessment;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod followup;
pub mod keywords;
pub mod notice;
pub mod profile;
pub mod session;
pub mod teleconsult;
pub mod transcript;

pub use assessment::{AssessmentStore, SavedAssessment};
pub use classifier::{classify, SeverityTier, TriageResult};
pub use config::CoreConfig;
pub use error::{CoreResult, ProfileError, SessionError, TriageError};
pub use followup::{select_follow_up, CategoryFlags, FollowUp, InformationCategory};
pub use notice::{Notice, NoticeKind};
pub use profile::{Gender, PatientProfile, ProfileForm, RequiredField};
pub use session::{ChatMessage, Reply, Sender, TriageSession};
pub use teleconsult::TeleconsultPlan;
pub use transcript::Transcript;

pub use triage_ids::{AssessmentId, MessageId};
pub use triage_types::{NonEmptyText, TextError};
