//! Request and response data types shared between clients of and the jobtrail server

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response type indicating success
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct SuccessResponse {
    /// Whether the response was successful
    pub success: bool,
}

/// Response to removing all of a caller's applications
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct DeletedResponse {
    /// How many applications were removed
    pub deleted: u64,
}
