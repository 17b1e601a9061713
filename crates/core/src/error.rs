use crate::profile::RequiredField;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write assessment file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read assessment file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove assessment file: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize assessment: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize assessment: {0}")]
    Deserialization(serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type CoreResult<T> = std::result::Result<T, TriageError>;

/// Intake form rejected before reaching the triage screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("missing required fields: {}", join_fields(.0))]
    MissingRequired(Vec<RequiredField>),
    #[error("unrecognised gender '{0}' (expected male, female or other)")]
    InvalidGender(String),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("assessment is already complete; no further input is accepted")]
    AlreadyComplete,
    #[error("assessment is not complete yet")]
    NotComplete,
}
