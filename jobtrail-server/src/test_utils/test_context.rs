//! Helpers for running isolated webserver instances
use crate::{
    app_state::{AppState, AppStateBuilder},
    router::setup_app_router,
    setups::{
        local::MemorySessions,
        test::{TestRecordStore, TestSetup},
    },
};
use axum::Router;
use jobtrail_core::OwnerId;
use ulid::Ulid;

/// A router wired to fresh in-memory state
#[derive(Debug)]
pub(crate) struct TestContext {
    app: Router,
    app_state: AppState<TestSetup>,
}

impl TestContext {
    /// Create a new test context
    pub(crate) fn new() -> Self {
        Self::new_with_state(|builder| builder)
    }

    pub(crate) fn new_with_state<F>(f: F) -> Self
    where
        F: FnOnce(AppStateBuilder<TestSetup>) -> AppStateBuilder<TestSetup>,
    {
        let builder = AppStateBuilder::default()
            .with_record_store(TestRecordStore::default())
            .with_authenticator(MemorySessions::default());

        let app_state = f(builder).finalize().unwrap();

        let app = setup_app_router(app_state.clone());

        Self { app, app_state }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn app_state(&self) -> &AppState<TestSetup> {
        &self.app_state
    }

    /// Open a session for `owner` and return its bearer token
    pub(crate) fn login(&self, owner: &str) -> String {
        let token = Ulid::new().to_string();
        self.app_state
            .authenticator
            .insert(token.clone(), OwnerId::new(owner));
        token
    }

    /// How many calls reached the record store so far
    pub(crate) fn store_accesses(&self) -> usize {
        self.app_state.record_store.accesses()
    }
}
