//! Server setup for local development & easier integration testing.
//!
//! Everything lives in memory and is gone on restart.

use crate::setups::{Authenticator, RecordStore, ServerSetup};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use jobtrail_core::{ApplicationChanges, ApplicationRecord, NewApplication, OwnerId};
use std::{
    cmp::Reverse,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use ulid::Ulid;

/// Implementation of `ServerSetup` for local environments.
#[derive(Clone, Debug, Default)]
pub struct LocalSetup;

impl ServerSetup for LocalSetup {
    type RecordStore = MemoryRecordStore;
    type Authenticator = MemorySessions;
}

/// A [`RecordStore`] keeping records in a concurrent map.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    inner: Arc<State>,
}

#[derive(Debug, Default)]
struct State {
    records: DashMap<String, Stored>,
    // Insertion order, for newest-first listing independent of clock resolution
    sequence: AtomicU64,
}

#[derive(Debug, Clone)]
struct Stored {
    sequence: u64,
    record: ApplicationRecord,
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(
        &self,
        owner: &OwnerId,
        application: NewApplication,
    ) -> Result<ApplicationRecord> {
        let now = Utc::now().naive_utc();
        let record = ApplicationRecord {
            id: Ulid::new().to_string(),
            owner_id: owner.clone(),
            date: application.date,
            company: application.company,
            position: application.position,
            status: application.status,
            remarks: application.remarks,
            created_at: now,
            updated_at: now,
        };

        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed);
        self.inner.records.insert(
            record.id.clone(),
            Stored {
                sequence,
                record: record.clone(),
            },
        );

        Ok(record)
    }

    async fn find_all_by_owner(&self, owner: &OwnerId) -> Result<Vec<ApplicationRecord>> {
        let mut owned: Vec<Stored> = self
            .inner
            .records
            .iter()
            .filter(|entry| &entry.record.owner_id == owner)
            .map(|entry| entry.value().clone())
            .collect();

        owned.sort_by_key(|stored| Reverse(stored.sequence));

        Ok(owned.into_iter().map(|stored| stored.record).collect())
    }

    async fn find_one(&self, owner: &OwnerId, id: &str) -> Result<Option<ApplicationRecord>> {
        Ok(self
            .inner
            .records
            .get(id)
            .filter(|entry| &entry.record.owner_id == owner)
            .map(|entry| entry.record.clone()))
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &str,
        changes: ApplicationChanges,
    ) -> Result<Option<ApplicationRecord>> {
        let Some(mut entry) = self.inner.records.get_mut(id) else {
            return Ok(None);
        };

        if &entry.record.owner_id != owner {
            return Ok(None);
        }

        changes.apply_to(&mut entry.record);
        entry.record.updated_at = Utc::now().naive_utc();

        Ok(Some(entry.record.clone()))
    }

    async fn delete(&self, owner: &OwnerId, id: &str) -> Result<bool> {
        Ok(self
            .inner
            .records
            .remove_if(id, |_, stored| &stored.record.owner_id == owner)
            .is_some())
    }

    async fn delete_all(&self, owner: &OwnerId) -> Result<u64> {
        let mut deleted = 0;
        self.inner.records.retain(|_, stored| {
            let keep = &stored.record.owner_id != owner;
            if !keep {
                deleted += 1;
            }
            keep
        });

        Ok(deleted)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// An [`Authenticator`] over a fixed set of tokens, registered at startup
/// or by tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySessions {
    sessions: Arc<DashMap<String, OwnerId>>,
}

impl MemorySessions {
    /// Parse `token=owner` pairs, as found in the local settings.
    pub fn from_pairs<I, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sessions = Self::default();

        for pair in pairs {
            let pair = pair.as_ref();
            let Some((token, owner)) = pair.split_once('=') else {
                bail!("Session entry {pair:?} is not of the form token=owner");
            };

            let (token, owner) = (token.trim(), owner.trim());
            if token.is_empty() || owner.is_empty() {
                bail!("Session entry {pair:?} has an empty token or owner");
            }

            sessions.insert(token, OwnerId::new(owner));
        }

        Ok(sessions)
    }

    /// Accept `token` as a session of `owner`.
    pub fn insert(&self, token: impl Into<String>, owner: OwnerId) {
        self.sessions.insert(token.into(), owner);
    }

    /// How many tokens are accepted.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no token is accepted.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl Authenticator for MemorySessions {
    async fn authenticate(&self, token: &str) -> Result<Option<OwnerId>> {
        Ok(self.sessions.get(token).map(|owner| owner.clone()))
    }
}
