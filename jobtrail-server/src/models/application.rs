//! Application model

use crate::db::{schema::applications, Conn};
use chrono::{NaiveDateTime, Utc};
use diesel::{
    pg::Pg, AsChangeset, ExpressionMethods, Identifiable, Insertable, OptionalExtension, QueryDsl,
    Queryable, Selectable, SelectableHelper,
};
use diesel_async::RunQueryDsl;
use jobtrail_core::{
    ApplicationChanges, ApplicationRecord, ApplicationStatus, NewApplication, OwnerId,
};
use ulid::Ulid;

/// A row of the `applications` table
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(Pg))]
pub struct Application {
    /// ULID assigned on insert
    pub id: String,
    /// Owning user
    pub owner_id: String,
    /// Normalized date
    pub date: String,
    /// Company applied to
    pub company: String,
    /// Position applied for
    pub position: String,
    /// Stored status value. Not constrained by the database.
    pub status: String,
    /// Free-form notes
    pub remarks: String,

    /// Inserted at timestamp
    pub inserted_at: NaiveDateTime,
    /// Updated at timestamp
    pub updated_at: NaiveDateTime,
}

/// New Application row (for creating new records)
#[derive(Insertable, Debug)]
#[diesel(table_name = applications)]
pub struct NewApplicationRecord {
    id: String,
    owner_id: String,
    date: String,
    company: String,
    position: String,
    status: String,
    remarks: String,
    inserted_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewApplicationRecord {
    /// Prepare a validated application for insertion, assigning it a fresh id.
    ///
    /// Both timestamps are written in UTC, the same clock updates use.
    pub fn new(owner: &OwnerId, application: NewApplication) -> Self {
        let now = Utc::now().naive_utc();

        Self {
            id: Ulid::new().to_string(),
            owner_id: owner.to_string(),
            date: application.date,
            company: application.company,
            position: application.position,
            status: application.status.as_str().to_string(),
            remarks: application.remarks,
            inserted_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = applications)]
struct ApplicationChangeset {
    date: Option<String>,
    company: Option<String>,
    position: Option<String>,
    status: Option<String>,
    remarks: Option<String>,
    updated_at: NaiveDateTime,
}

impl From<ApplicationChanges> for ApplicationChangeset {
    fn from(changes: ApplicationChanges) -> Self {
        Self {
            date: changes.date,
            company: changes.company,
            position: changes.position,
            status: changes.status.map(|status| status.as_str().to_string()),
            remarks: changes.remarks,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl From<Application> for ApplicationRecord {
    fn from(row: Application) -> Self {
        Self {
            status: ApplicationStatus::from_stored(&row.status),
            id: row.id,
            owner_id: OwnerId::new(row.owner_id),
            date: row.date,
            company: row.company,
            position: row.position,
            remarks: row.remarks,
            created_at: row.inserted_at,
            updated_at: row.updated_at,
        }
    }
}

impl Application {
    /// Insert a new application
    pub async fn insert(
        conn: &mut Conn<'_>,
        record: NewApplicationRecord,
    ) -> Result<Self, diesel::result::Error> {
        tracing::debug!(id = %record.id, owner = %record.owner_id, "Inserting application");

        diesel::insert_into(applications::table)
            .values(&record)
            .returning(Application::as_select())
            .get_result(conn)
            .await
    }

    /// All applications of an owner, newest-created first
    pub async fn find_all_by_owner(
        conn: &mut Conn<'_>,
        owner: &OwnerId,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        applications::table
            .filter(applications::owner_id.eq(owner.as_str()))
            .order((applications::inserted_at.desc(), applications::id.desc()))
            .select(Application::as_select())
            .load(conn)
            .await
    }

    /// Find one application by id, if the owner matches
    pub async fn find_one(
        conn: &mut Conn<'_>,
        owner: &OwnerId,
        id: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        applications::table
            .filter(applications::owner_id.eq(owner.as_str()))
            .filter(applications::id.eq(id))
            .select(Application::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// Apply changes to one application, if the owner matches
    pub async fn update(
        conn: &mut Conn<'_>,
        owner: &OwnerId,
        id: &str,
        changes: ApplicationChanges,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::update(applications::table)
            .filter(applications::owner_id.eq(owner.as_str()))
            .filter(applications::id.eq(id))
            .set(ApplicationChangeset::from(changes))
            .returning(Application::as_select())
            .get_result(conn)
            .await
            .optional()
    }

    /// Delete one application, if the owner matches. Returns whether a row went away.
    pub async fn delete(
        conn: &mut Conn<'_>,
        owner: &OwnerId,
        id: &str,
    ) -> Result<bool, diesel::result::Error> {
        let deleted = diesel::delete(applications::table)
            .filter(applications::owner_id.eq(owner.as_str()))
            .filter(applications::id.eq(id))
            .execute(conn)
            .await?;

        Ok(deleted > 0)
    }

    /// Delete every application of an owner
    pub async fn delete_all(
        conn: &mut Conn<'_>,
        owner: &OwnerId,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(applications::table)
            .filter(applications::owner_id.eq(owner.as_str()))
            .execute(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobtrail_core::ApplicationInput;

    #[test]
    fn test_new_record_timestamps_match() {
        let record = NewApplicationRecord::new(&OwnerId::new("alice"), NewApplication::default());

        assert_eq!(record.inserted_at, record.updated_at);
    }

    #[test]
    fn test_update_never_predates_insert() {
        let record = NewApplicationRecord::new(&OwnerId::new("alice"), NewApplication::default());

        let changes = ApplicationInput {
            remarks: Some("onsite next week".to_string()),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        let changeset = ApplicationChangeset::from(changes);

        assert!(changeset.updated_at >= record.inserted_at);
        assert!(changeset.updated_at - record.inserted_at < chrono::Duration::minutes(1));
    }
}
