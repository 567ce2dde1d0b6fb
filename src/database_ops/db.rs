use anyhow::Result;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

use super::schema::SCHEMA;
use crate::util::env::{db_url, env_parse};

/// Handle to the entity store. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    /// Open (creating if missing) the SQLite store and ensure the schema.
    ///
    /// WAL + a generous busy timeout let multiple fetch workers funnel their
    /// writes through one process without application-level locks: SQLite's
    /// own write lock serializes the transactions, and a timed-out waiter
    /// surfaces as a storage error rather than a half-applied commit.
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let busy_timeout_secs: u64 = env_parse("SQLITE_BUSY_TIMEOUT_SECS", 60);
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // No declared foreign keys: a participant's championId may point
            // at a champion row that has not been loaded yet. The join stays
            // loose and is resolved at read time.
            .foreign_keys(false)
            .busy_timeout(Duration::from_secs(busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;
        info!("connected to db");

        let db = Self { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Connect using `LEAGUE_DB_URL` / `DATABASE_URL` (default `league.db`).
    pub async fn connect_from_env() -> Result<Self> {
        let url = db_url();
        let max_conns: u32 = env_parse("DB_MAX_CONNS", 5);
        Self::connect(&url, max_conns).await
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        info!("schema ensured");
        Ok(())
    }
}
