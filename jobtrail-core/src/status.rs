//! Application status

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Where an application currently stands.
///
/// Serialized as its literal value (`answered`, `no-answer`, `rejected`),
/// which is also what status search terms are matched against.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    /// The company got back to the applicant.
    Answered,
    /// Nothing heard yet.
    #[default]
    NoAnswer,
    /// The company turned the application down.
    Rejected,
}

/// Returned when a string isn't one of the literal status values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status: {0:?}")]
pub struct UnknownStatus(pub String);

impl ApplicationStatus {
    /// All statuses, in rank order.
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Answered,
        ApplicationStatus::NoAnswer,
        ApplicationStatus::Rejected,
    ];

    /// The literal value of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Answered => "answered",
            ApplicationStatus::NoAnswer => "no-answer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Primary sort key: answered first, rejected last.
    pub fn rank(&self) -> u8 {
        match self {
            ApplicationStatus::Answered => 0,
            ApplicationStatus::NoAnswer => 1,
            ApplicationStatus::Rejected => 2,
        }
    }

    /// Read a status that came out of storage.
    ///
    /// Anything unrecognized is treated as [`ApplicationStatus::NoAnswer`].
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|err: UnknownStatus| {
            tracing::warn!(%err, "Loading unrecognized stored status as no-answer");
            ApplicationStatus::NoAnswer
        })
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
