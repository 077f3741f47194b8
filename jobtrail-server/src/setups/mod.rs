//! This abstracts jobtrail server side-effects into "setups".
//!
//! This module defines the traits, submodules define local, test & production
//! collections of implementations.
use anyhow::Result;
use async_trait::async_trait;
use jobtrail_core::{ApplicationChanges, ApplicationRecord, NewApplication, OwnerId};

pub mod local;
pub mod prod;

/// This trait groups type parameters to the server's `AppState` struct.
///
/// It captures the setup of the server, distinguishing between e.g.
/// unit testing & production setups.
pub trait ServerSetup: Clone + Send + Sync + 'static {
    /// Where application records live
    type RecordStore: RecordStore;
    /// How bearer tokens resolve to owners
    type Authenticator: Authenticator;
}

/// Persistent storage of application records.
///
/// Every operation is scoped by owner. A record owned by someone else is
/// indistinguishable from a record that doesn't exist.
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Store a new record, assigning its id and timestamps.
    async fn create(&self, owner: &OwnerId, application: NewApplication)
        -> Result<ApplicationRecord>;

    /// All records of `owner`, newest-created first.
    async fn find_all_by_owner(&self, owner: &OwnerId) -> Result<Vec<ApplicationRecord>>;

    /// One record by id.
    async fn find_one(&self, owner: &OwnerId, id: &str) -> Result<Option<ApplicationRecord>>;

    /// Apply changes to one record and return it as it is afterwards.
    async fn update(
        &self,
        owner: &OwnerId,
        id: &str,
        changes: ApplicationChanges,
    ) -> Result<Option<ApplicationRecord>>;

    /// Remove one record. Returns whether it existed.
    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<bool>;

    /// Remove every record of `owner`. Returns how many went away.
    async fn delete_all(&self, owner: &OwnerId) -> Result<u64>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Resolves bearer session tokens to the user they belong to.
#[async_trait]
pub trait Authenticator: Clone + Send + Sync + 'static {
    /// `None` for unknown or expired tokens.
    async fn authenticate(&self, token: &str) -> Result<Option<OwnerId>>;
}
