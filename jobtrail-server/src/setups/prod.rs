//! Production server setup code

use crate::{
    db::{self, Pool},
    models::{
        application::{Application, NewApplicationRecord},
        session,
    },
    setups::{Authenticator, RecordStore, ServerSetup},
};
use anyhow::Result;
use async_trait::async_trait;
use jobtrail_core::{ApplicationChanges, ApplicationRecord, NewApplication, OwnerId};

/// Production implementation of `ServerSetup`.
/// Backed by Postgres.
#[derive(Clone, Debug, Default)]
pub struct ProdSetup;

impl ServerSetup for ProdSetup {
    type RecordStore = PgRecordStore;
    type Authenticator = PgSessions;
}

/// Records in the `applications` table
#[derive(Clone, Debug)]
pub struct PgRecordStore {
    pool: Pool,
}

impl PgRecordStore {
    /// Create a store on top of a connection pool
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(
        &self,
        owner: &OwnerId,
        application: NewApplication,
    ) -> Result<ApplicationRecord> {
        let conn = &mut db::connect(&self.pool).await?;
        let row = Application::insert(conn, NewApplicationRecord::new(owner, application)).await?;
        Ok(row.into())
    }

    async fn find_all_by_owner(&self, owner: &OwnerId) -> Result<Vec<ApplicationRecord>> {
        let conn = &mut db::connect(&self.pool).await?;
        let rows = Application::find_all_by_owner(conn, owner).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_one(&self, owner: &OwnerId, id: &str) -> Result<Option<ApplicationRecord>> {
        let conn = &mut db::connect(&self.pool).await?;
        let row = Application::find_one(conn, owner, id).await?;
        Ok(row.map(Into::into))
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &str,
        changes: ApplicationChanges,
    ) -> Result<Option<ApplicationRecord>> {
        let conn = &mut db::connect(&self.pool).await?;
        let row = Application::update(conn, owner, id, changes).await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<bool> {
        let conn = &mut db::connect(&self.pool).await?;
        Ok(Application::delete(conn, owner, id).await?)
    }

    async fn delete_all(&self, owner: &OwnerId) -> Result<u64> {
        let conn = &mut db::connect(&self.pool).await?;
        let deleted = Application::delete_all(conn, owner).await?;
        Ok(deleted as u64)
    }

    async fn ping(&self) -> Result<()> {
        let conn = &mut db::connect(&self.pool).await?;
        db::ping(conn).await
    }
}

/// Sessions in the `sessions` table
#[derive(Clone, Debug)]
pub struct PgSessions {
    pool: Pool,
}

impl PgSessions {
    /// Look up sessions through a connection pool
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Authenticator for PgSessions {
    async fn authenticate(&self, token: &str) -> Result<Option<OwnerId>> {
        let conn = &mut db::connect(&self.pool).await?;
        Ok(session::find_owner(conn, token).await?)
    }
}
