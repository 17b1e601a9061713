//! Patient profile intake.
//!
//! [`ProfileForm`] is the editable draft behind the registration screen: every field is
//! free text and may be blank while the user types. Submitting the draft checks the four
//! required fields and only then produces a [`PatientProfile`], which is handed on by
//! value to whatever starts the triage chat. Nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use triage_types::{is_blank, NonEmptyText};

use crate::error::ProfileError;
use crate::notice::Notice;

pub const INCOMPLETE_TITLE: &str = "Incomplete Information";
pub const INCOMPLETE_DESCRIPTION: &str = "Please fill in all required fields marked with *";
pub const CREATED_TITLE: &str = "Profile Created";
pub const CREATED_DESCRIPTION: &str = "Patient profile has been successfully created";

/// Fields that must be filled before the profile can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    Name,
    Age,
    Gender,
    Phone,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [Self::Name, Self::Age, Self::Gender, Self::Phone];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Phone => "Phone Number",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ProfileError::InvalidGender(s.trim().to_string())),
        }
    }
}

/// Editable intake draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub emergency_contact: String,
    pub medical_history: String,
    pub current_medications: String,
    pub allergies: String,
    pub previous_visits: u32,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn required_value(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::Name => &self.name,
            RequiredField::Age => &self.age,
            RequiredField::Gender => &self.gender,
            RequiredField::Phone => &self.phone,
        }
    }

    /// Required fields that are still empty or whitespace-only, in form order.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| is_blank(self.required_value(*field)))
            .collect()
    }

    /// Whether the submit action should be enabled.
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Convert the draft into a profile.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::MissingRequired`] listing every blank required field.
    /// - [`ProfileError::InvalidGender`] if gender is not male, female or other.
    pub fn validate(&self) -> Result<PatientProfile, ProfileError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(ProfileError::MissingRequired(missing));
        }

        let required = |field: RequiredField| {
            NonEmptyText::new(self.required_value(field))
                .map_err(|_| ProfileError::MissingRequired(vec![field]))
        };

        Ok(PatientProfile {
            name: required(RequiredField::Name)?,
            age: required(RequiredField::Age)?,
            gender: self.gender.parse()?,
            phone: required(RequiredField::Phone)?,
            address: self.address.trim().to_string(),
            emergency_contact: self.emergency_contact.trim().to_string(),
            medical_history: self.medical_history.trim().to_string(),
            current_medications: self.current_medications.trim().to_string(),
            allergies: self.allergies.trim().to_string(),
            previous_visits: self.previous_visits,
        })
    }

    /// Validate and, on success only, hand the profile to `on_complete`.
    ///
    /// Returns the notice to show the user on success; on failure `on_complete` is
    /// never called and [`ProfileError::notice`] gives the message to show instead.
    pub fn submit<F>(&self, on_complete: F) -> Result<Notice, ProfileError>
    where
        F: FnOnce(PatientProfile),
    {
        let profile = self.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "profile submission blocked");
        })?;

        tracing::info!("patient profile created");
        on_complete(profile);
        Ok(Notice::info(CREATED_TITLE, CREATED_DESCRIPTION))
    }
}

impl ProfileError {
    /// User-visible message for a blocked submission.
    pub fn notice(&self) -> Notice {
        match self {
            ProfileError::MissingRequired(_) => {
                Notice::error(INCOMPLETE_TITLE, INCOMPLETE_DESCRIPTION)
            }
            ProfileError::InvalidGender(_) => Notice::error(INCOMPLETE_TITLE, self.to_string()),
        }
    }
}

/// A submitted profile. Required fields are guaranteed non-blank; optional fields may be
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub name: NonEmptyText,
    pub age: NonEmptyText,
    pub gender: Gender,
    pub phone: NonEmptyText,
    pub address: String,
    pub emergency_contact: String,
    pub medical_history: String,
    pub current_medications: String,
    pub allergies: String,
    pub previous_visits: u32,
}

impl PatientProfile {
    /// One-line header shown above the chat, e.g. `Patient: Asha Verma • Age: 34 • Gender: female`.
    pub fn summary(&self) -> String {
        format!(
            "Patient: {} • Age: {} • Gender: {}",
            self.name, self.age, self.gender
        )
    }
}
