//! Dedup ledger: the two membership sets consulted before any expensive
//! decomposition work runs.
//!
//! "Match already recorded" is keyed by matchId (the Matches primary key is
//! the dedup token); "player already visited" is keyed by summonerName. A
//! SeenPlayers row's mere existence means "do not re-enqueue"; it is never
//! mutated and never deleted.

use sqlx::SqliteConnection;

use super::db::Db;

pub async fn has_match(db: &Db, match_id: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM Matches WHERE matchId = ?)")
        .bind(match_id)
        .fetch_one(&db.pool)
        .await
}

pub async fn has_seen_player(db: &Db, summoner_name: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM SeenPlayers WHERE summonerName = ?)")
        .bind(summoner_name)
        .fetch_one(&db.pool)
        .await
}

/// Existence check scoped to the enclosing transaction, so check-then-insert
/// is one atomic unit.
pub(crate) async fn has_match_tx(
    conn: &mut SqliteConnection,
    match_id: &str,
) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM Matches WHERE matchId = ?)")
        .bind(match_id)
        .fetch_one(conn)
        .await
}

/// Idempotent insert. A duplicate is swallowed, not surfaced: the ledger's
/// only contract is "has been seen at least once".
pub(crate) async fn mark_seen(
    conn: &mut SqliteConnection,
    summoner_name: &str,
) -> sqlx::Result<()> {
    sqlx::query("INSERT OR IGNORE INTO SeenPlayers (summonerName) VALUES (?)")
        .bind(summoner_name)
        .execute(conn)
        .await?;
    Ok(())
}
