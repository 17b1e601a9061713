//! Append-only record of what the user has typed in one chat session.

use serde::{Deserialize, Serialize};
use triage_types::is_blank;

/// Ordered raw user inputs. Entries are stored exactly as typed; blank input is never
/// recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<String>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `input` unless it is empty or whitespace-only.
    ///
    /// Returns `true` if the entry was recorded.
    pub fn push(&mut self, input: impl Into<String>) -> bool {
        let input = input.into();
        if is_blank(&input) {
            return false;
        }
        self.0.push(input);
        true
    }

    /// Text the keyword rules scan: all entries joined by a single space, lowercased.
    pub fn context(&self) -> String {
        self.0.join(" ").to_lowercase()
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Transcript {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut transcript = Transcript::new();
        for entry in iter {
            transcript.push(entry);
        }
        transcript
    }
}
