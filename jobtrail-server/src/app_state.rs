//! The Axum Application State

use crate::setups::ServerSetup;
use anyhow::{anyhow, Result};

#[derive(Clone)]
/// Global application route state.
pub struct AppState<S: ServerSetup> {
    /// Where application records are kept
    pub record_store: S::RecordStore,
    /// Resolves bearer tokens to owners
    pub authenticator: S::Authenticator,
}

/// Builder for [`AppState`]
#[derive(Debug)]
pub struct AppStateBuilder<S: ServerSetup> {
    record_store: Option<S::RecordStore>,
    authenticator: Option<S::Authenticator>,
}

impl<S: ServerSetup> Default for AppStateBuilder<S> {
    fn default() -> Self {
        Self {
            record_store: None,
            authenticator: None,
        }
    }
}

impl<S: ServerSetup> AppStateBuilder<S> {
    /// Finalize the builder and return the [`AppState`]
    pub fn finalize(self) -> Result<AppState<S>> {
        let record_store = self
            .record_store
            .ok_or_else(|| anyhow!("record_store is required"))?;

        let authenticator = self
            .authenticator
            .ok_or_else(|| anyhow!("authenticator is required"))?;

        Ok(AppState {
            record_store,
            authenticator,
        })
    }

    /// Set the record store
    pub fn with_record_store(mut self, record_store: S::RecordStore) -> Self {
        self.record_store = Some(record_store);
        self
    }

    /// Set the session authenticator
    pub fn with_authenticator(mut self, authenticator: S::Authenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }
}

impl<S> std::fmt::Debug for AppState<S>
where
    S: ServerSetup,
    S::RecordStore: std::fmt::Debug,
    S::Authenticator: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("record_store", &self.record_store)
            .field("authenticator", &self.authenticator)
            .finish()
    }
}
