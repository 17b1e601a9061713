//! Local storage of the most recent assessment.
//!
//! This is a single key-value slot, not a record store: every save replaces the
//! previous value wholesale. The slot is a JSON file named after the storage key inside
//! the configured data directory:
//!
//! ```text
//! <data_dir>/
//!   latestAssessment.json
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use triage_ids::AssessmentId;

use crate::classifier::TriageResult;
use crate::config::CoreConfig;
use crate::constants::{LATEST_ASSESSMENT_KEY, STORE_FILE_EXTENSION};
use crate::error::{CoreResult, TriageError};
use crate::notice::Notice;
use crate::transcript::Transcript;

pub const SAVED_TITLE: &str = "Assessment Saved";
pub const SAVED_DESCRIPTION: &str = "Patient assessment has been saved successfully";

/// Snapshot written when the user saves a completed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAssessment {
    pub patient_responses: Transcript,
    pub triage_result: TriageResult,
    pub timestamp: DateTime<Utc>,
    pub assessment_id: AssessmentId,
}

impl SavedAssessment {
    /// Stamp a finished conversation with a fresh id and the current time.
    pub fn new(patient_responses: Transcript, triage_result: TriageResult) -> Self {
        let assessment_id = AssessmentId::generate();
        Self {
            patient_responses,
            triage_result,
            timestamp: assessment_id.issued_at(),
            assessment_id,
        }
    }
}

/// The single-slot store.
#[derive(Clone, Debug)]
pub struct AssessmentStore {
    cfg: Arc<CoreConfig>,
}

impl AssessmentStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Path of the file backing the slot.
    pub fn path(&self) -> PathBuf {
        self.cfg
            .data_dir()
            .join(format!("{LATEST_ASSESSMENT_KEY}.{STORE_FILE_EXTENSION}"))
    }

    /// Overwrite the slot with `assessment`.
    ///
    /// The data directory is created if needed. The value is written to a sibling
    /// temporary file and renamed into place, so a reader never sees half a document.
    ///
    /// # Errors
    ///
    /// Returns `TriageError` if the directory cannot be created, serialisation fails, or
    /// the file cannot be written.
    pub fn save(&self, assessment: &SavedAssessment) -> CoreResult<Notice> {
        fs::create_dir_all(self.cfg.data_dir()).map_err(TriageError::StorageDirCreation)?;

        let json =
            serde_json::to_string_pretty(assessment).map_err(TriageError::Serialization)?;

        let path = self.path();
        let tmp_path = path.with_extension(format!("{STORE_FILE_EXTENSION}.tmp"));
        fs::write(&tmp_path, json).map_err(TriageError::FileWrite)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(TriageError::FileWrite(e));
        }

        tracing::info!(
            assessment_id = %assessment.assessment_id,
            severity = %assessment.triage_result.severity,
            path = %path.display(),
            "saved assessment"
        );

        Ok(Notice::info(SAVED_TITLE, SAVED_DESCRIPTION))
    }

    /// Read the slot. `Ok(None)` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::FileRead` or `TriageError::Deserialization` if the file
    /// exists but cannot be read or parsed.
    pub fn load_latest(&self) -> CoreResult<Option<SavedAssessment>> {
        let path = self.path();
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(TriageError::FileRead)?;
        let assessment = serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!("failed to parse stored assessment: {}", path.display());
            TriageError::Deserialization(e)
        })?;

        Ok(Some(assessment))
    }

    /// Empty the slot. Returns `true` if something was removed.
    pub fn clear(&self) -> CoreResult<bool> {
        let path = self.path();
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(TriageError::FileRemove)?;
        tracing::info!(path = %path.display(), "cleared stored assessment");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, SeverityTier};
    use std::path::Path;
    use tempfile::TempDir;

    fn test_store(data_dir: &Path) -> AssessmentStore {
        let cfg = CoreConfig::with_data_dir(data_dir.to_path_buf())
            .expect("CoreConfig::with_data_dir should succeed")
            .without_delays();
        AssessmentStore::new(Arc::new(cfg))
    }

    fn assessment(entries: &[&str]) -> SavedAssessment {
        let transcript: Transcript = entries.iter().copied().collect();
        let result = classify(&transcript);
        SavedAssessment::new(transcript, result)
    }

    #[test]
    fn load_from_empty_store_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        assert!(store.load_latest().expect("load should succeed").is_none());
    }

    #[test]
    fn save_creates_data_dir_and_roundtrips() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(&temp_dir.path().join("nested").join("store"));

        let saved = assessment(&["chest pain", "an hour ago"]);
        let notice = store.save(&saved).expect("save should succeed");
        assert_eq!(notice.title, SAVED_TITLE);

        assert!(store.path().ends_with("latestAssessment.json"));
        let loaded = store
            .load_latest()
            .expect("load should succeed")
            .expect("assessment should exist");
        assert_eq!(loaded, saved);
        assert_eq!(loaded.triage_result.severity, SeverityTier::High);
    }

    #[test]
    fn save_overwrites_previous_assessment() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        store.save(&assessment(&["chest pain"])).unwrap();
        let second = assessment(&["small rash"]);
        store.save(&second).unwrap();

        let loaded = store.load_latest().unwrap().unwrap();
        assert_eq!(loaded.patient_responses.entries(), ["small rash"]);
        assert_eq!(loaded.triage_result.severity, SeverityTier::Low);

        let files: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().flatten().collect();
        assert_eq!(files.len(), 1, "only the slot file should remain");
    }

    #[test]
    fn failed_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        // a non-empty directory in the slot's place makes the final rename fail
        fs::create_dir_all(store.path().join("occupied")).unwrap();

        let err = store
            .save(&assessment(&["chest pain"]))
            .expect_err("save onto a directory should fail");
        assert!(matches!(err, TriageError::FileWrite(_)));

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["latestAssessment.json"]);
    }

    #[test]
    fn stored_document_uses_camel_case_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        store.save(&assessment(&["fever and pain"])).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["patientResponses"][0], "fever and pain");
        assert_eq!(json["triageResult"]["severity"], "medium");
        assert_eq!(json["triageResult"]["confidence"], 87);
        assert!(json["assessmentId"].as_str().unwrap().starts_with("TRIAGE_"));
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn corrupt_slot_is_a_deserialization_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        fs::write(store.path(), "{not json").unwrap();

        let err = store.load_latest().expect_err("corrupt file should fail");
        assert!(matches!(err, TriageError::Deserialization(_)));
    }

    #[test]
    fn clear_removes_slot() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        assert!(!store.clear().unwrap());
        store.save(&assessment(&["cough"])).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load_latest().unwrap().is_none());
    }
}
