//! Internal implementation of the identifier types.

use crate::{IdError, IdResult};
use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

const ASSESSMENT_PREFIX: &str = "TRIAGE_";

/// Canonical chat-message identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is guaranteed to be in canonical form.
///
/// # Construction
/// - [`MessageId::new`] generates a fresh identifier.
/// - [`MessageId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageId {
    /// Generates a new RFC 4122 version 4 identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> IdResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdError::InvalidInput(format!(
                "message id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidInput(e.to_string()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is exactly 32 lowercase hex characters.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for MessageId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageId::parse(s)
    }
}

/// Identifier of a saved assessment: `TRIAGE_<unix-millis>`.
///
/// The millisecond component is the issue time, so ids sort by age.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssessmentId {
    issued_at: DateTime<Utc>,
}

impl AssessmentId {
    /// Issue a new id for "now", truncated to whole milliseconds.
    pub fn generate() -> Self {
        Self {
            issued_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Builds an id from a unix timestamp in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `millis` is outside chrono's representable range.
    pub fn from_millis(millis: i64) -> IdResult<Self> {
        let issued_at = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            IdError::InvalidInput(format!("timestamp out of range: {}", millis))
        })?;
        Ok(Self { issued_at })
    }

    /// Parses `TRIAGE_<unix-millis>`.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if the prefix is missing or the suffix is not a
    /// non-negative integer.
    pub fn parse(input: &str) -> IdResult<Self> {
        let digits = input.strip_prefix(ASSESSMENT_PREFIX).ok_or_else(|| {
            IdError::InvalidInput(format!(
                "assessment id must start with '{}': '{}'",
                ASSESSMENT_PREFIX, input
            ))
        })?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidInput(format!(
                "assessment id must end in unix milliseconds: '{}'",
                input
            )));
        }

        let millis: i64 = digits
            .parse()
            .map_err(|e| IdError::InvalidInput(format!("invalid timestamp '{}': {}", digits, e)))?;
        Self::from_millis(millis)
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn millis(&self) -> i64 {
        self.issued_at.timestamp_millis()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ASSESSMENT_PREFIX, self.millis())
    }
}

impl FromStr for AssessmentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssessmentId::parse(s)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{AssessmentId, MessageId};

    macro_rules! string_serde {
        ($ty:ty) => {
            impl serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        };
    }

    string_serde!(MessageId);
    string_serde!(AssessmentId);
}
