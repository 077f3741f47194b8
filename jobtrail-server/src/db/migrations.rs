//! Migration code

use anyhow::{anyhow, Context, Result};
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness};

/// Embed migrations into binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Run pending migrations once, before the pool starts serving requests.
///
/// The migration harness is synchronous, so this runs on the blocking pool
/// with its own connection.
pub async fn run(url: &str) -> Result<()> {
    let url = url.to_string();

    let applied = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let mut conn =
            PgConnection::establish(&url).context("Cannot connect to postgres database.")?;

        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!(e))
            .context("Could not run migrations")?;

        Ok(versions.iter().map(ToString::to_string).collect())
    })
    .await??;

    tracing::info!(?applied, "Database migrations up to date");

    Ok(())
}
