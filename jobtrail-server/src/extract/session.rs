//! Session extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, TypedHeader},
    headers::{authorization::Bearer, Authorization},
    http::request::Parts,
    RequestPartsExt,
};

use crate::{
    app_state::AppState,
    error::AppError,
    setups::{Authenticator, ServerSetup},
};
use jobtrail_core::OwnerId;

/// The authenticated caller of a request.
///
/// Extracting it runs before any handler body, so a request without a valid
/// session never reaches the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The user every record operation of this request is scoped to
    pub owner: OwnerId,
}

#[async_trait]
impl<S: ServerSetup> FromRequestParts<AppState<S>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::unauthenticated("Missing credentials"))?;

        let owner = state
            .authenticator
            .authenticate(bearer.token())
            .await?
            .ok_or_else(|| {
                tracing::debug!("Rejecting unknown or expired session");
                AppError::unauthenticated("Invalid or expired session")
            })?;

        Ok(Session { owner })
    }
}
