//! Teleconsultation hand-off.
//!
//! There is no consultation backend. Proceeding only produces two notices: one
//! immediately and one after the configured pause. The wording depends on whether the
//! assessment came out as an emergency.

use serde::{Deserialize, Serialize};

use crate::classifier::TriageResult;
use crate::notice::Notice;

pub const INITIATING_TITLE: &str = "Initiating Teleconsultation";
pub const READY_TITLE: &str = "Teleconsultation Ready";
pub const READY_DESCRIPTION: &str =
    "A doctor will be with you shortly. Please ensure your camera and microphone are working.";

/// What the front end shows when the user proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleconsultPlan {
    /// Label of the proceed action.
    pub action_label: String,
    /// Shown immediately.
    pub initiating: Notice,
    /// Shown after the consultation delay.
    pub ready: Notice,
}

impl TeleconsultPlan {
    pub fn for_result(result: &TriageResult) -> Self {
        let emergency = result.severity.is_emergency();
        let consultation = if emergency { "emergency" } else { "scheduled" };

        Self {
            action_label: proceed_label(result).to_string(),
            initiating: Notice::info(
                INITIATING_TITLE,
                format!("Starting {consultation} consultation..."),
            ),
            ready: Notice::info(READY_TITLE, READY_DESCRIPTION),
        }
    }
}

pub fn proceed_label(result: &TriageResult) -> &'static str {
    if result.severity.is_emergency() {
        "Proceed to Emergency Care"
    } else {
        "Proceed to Teleconsultation"
    }
}
