//! Application records and the inputs that create or change them

use crate::{date::normalize_date, status::ApplicationStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Identity of the user owning a record.
///
/// Handed out by the authenticator. Every record operation is scoped by it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap a caller identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single job application, as stored and as served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    /// Assigned by the store on creation
    #[schema(example = "01HV6T8R4Y3C9W2M5K7N1P0QZS")]
    pub id: String,
    /// The user this record belongs to
    #[schema(value_type = String)]
    pub owner_id: OwnerId,
    /// Empty, `DD.MM.YYYY`, or whatever free text couldn't be normalized
    #[schema(example = "08.04.2025")]
    pub date: String,
    /// Company applied to
    pub company: String,
    /// Position applied for
    pub position: String,
    /// Current status
    pub status: ApplicationStatus,
    /// Free-form notes
    pub remarks: String,
    /// Set by the store on creation
    pub created_at: NaiveDateTime,
    /// Set by the store on every change
    pub updated_at: NaiveDateTime,
}

/// Editable fields of an application, as submitted by a client.
///
/// Used both to create a record (absent fields take defaults) and to change
/// one (absent fields stay as they are).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApplicationInput {
    /// Date, shorthand allowed (`08`, `0804`, `080425`, `08042025`)
    #[validate(length(max = 32))]
    #[schema(example = "0804")]
    pub date: Option<String>,
    /// Company applied to
    #[validate(length(max = 256))]
    pub company: Option<String>,
    /// Position applied for
    #[validate(length(max = 256))]
    pub position: Option<String>,
    /// One of `answered`, `no-answer`, `rejected`. Empty counts as absent.
    #[validate(custom = "known_status")]
    #[schema(example = "no-answer")]
    pub status: Option<String>,
    /// Free-form notes
    #[validate(length(max = 4096))]
    pub remarks: Option<String>,
}

/// A validated, normalized record that hasn't been stored yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewApplication {
    /// Normalized date
    pub date: String,
    /// Company applied to
    pub company: String,
    /// Position applied for
    pub position: String,
    /// Current status
    pub status: ApplicationStatus,
    /// Free-form notes
    pub remarks: String,
}

/// A validated, normalized change to an existing record.
///
/// `None` leaves the field as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationChanges {
    /// Normalized date
    pub date: Option<String>,
    /// Company applied to
    pub company: Option<String>,
    /// Position applied for
    pub position: Option<String>,
    /// Current status
    pub status: Option<ApplicationStatus>,
    /// Free-form notes
    pub remarks: Option<String>,
}

impl ApplicationInput {
    /// Validate and turn into a record to create, filling in defaults and
    /// normalizing the date.
    pub fn into_new_application(self) -> Result<NewApplication, validator::ValidationErrors> {
        self.validate()?;

        Ok(NewApplication {
            date: self.date.as_deref().map(normalize_date).unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            status: parse_status(self.status.as_deref()).unwrap_or_default(),
            remarks: self.remarks.unwrap_or_default(),
        })
    }

    /// Validate and turn into a change set, normalizing the date if given.
    pub fn into_changes(self) -> Result<ApplicationChanges, validator::ValidationErrors> {
        self.validate()?;

        Ok(ApplicationChanges {
            date: self.date.as_deref().map(normalize_date),
            company: self.company,
            position: self.position,
            status: parse_status(self.status.as_deref()),
            remarks: self.remarks,
        })
    }
}

impl ApplicationChanges {
    /// Whether applying these changes would leave a record as it is.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply to a record in place. Doesn't touch `updated_at`.
    pub fn apply_to(self, record: &mut ApplicationRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(company) = self.company {
            record.company = company;
        }
        if let Some(position) = self.position {
            record.position = position;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(remarks) = self.remarks {
            record.remarks = remarks;
        }
    }
}

// Only called after validation passed. An empty status counts as absent.
fn parse_status(status: Option<&str>) -> Option<ApplicationStatus> {
    status
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn known_status(status: &str) -> Result<(), ValidationError> {
    if status.is_empty() {
        return Ok(());
    }

    status.parse::<ApplicationStatus>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("unknown_status");
        err.message = Some("must be one of answered, no-answer, rejected".into());
        err.add_param("value".into(), &status);
        err
    })
}
