//! Constants used throughout the triage core crate.
//!
//! Storage names and the default pauses the interactive front end inserts between
//! events. Conversation text lives next to the logic that emits it.

/// Key the latest assessment is stored under.
pub const LATEST_ASSESSMENT_KEY: &str = "latestAssessment";

/// Filename extension for stored values.
pub const STORE_FILE_EXTENSION: &str = "json";

/// Default directory for the local store when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "triage_data";

/// Pause before each assistant reply, in milliseconds.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1_200;

/// Pause after a valid profile is submitted, in milliseconds.
pub const DEFAULT_PROFILE_DELAY_MS: u64 = 1_000;

/// Pause between the "initiating" and "ready" teleconsultation notices, in milliseconds.
pub const DEFAULT_CONSULT_DELAY_MS: u64 = 2_000;

pub const ENV_DATA_DIR: &str = "TRIAGE_DATA_DIR";
pub const ENV_REPLY_DELAY_MS: &str = "TRIAGE_REPLY_DELAY_MS";
pub const ENV_PROFILE_DELAY_MS: &str = "TRIAGE_PROFILE_DELAY_MS";
pub const ENV_CONSULT_DELAY_MS: &str = "TRIAGE_CONSULT_DELAY_MS";
