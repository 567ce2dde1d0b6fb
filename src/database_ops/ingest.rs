//! Ingestion coordinator: the only component with side effects visible to
//! callers. Orchestrates "check ledger -> normalize -> transactional commit
//! -> update ledger" for match payloads, plus the simpler champion and
//! mastery upsert paths.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::db::Db;
use super::{ledger, store};
use crate::error::IngestError;
use crate::normalization::champions::{champion_row, RawChampion, RawMastery};
use crate::normalization::matches::{normalize, RawMatch};

#[derive(Clone)]
pub struct Ingestor {
    db: Db,
}

impl Ingestor {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Ingest one raw match payload.
    ///
    /// Returns `Ok(false)` when the match is already recorded (cheap
    /// existence short-circuit, nothing written). Otherwise normalizes the
    /// payload and, in one transaction: inserts the match row, bulk-inserts
    /// the participants, creates placeholder rows for referenced champions
    /// not yet loaded, and marks every participant's summoner as seen.
    /// Commit or full rollback; a match row without its participants is
    /// never observable.
    #[instrument(skip(self, raw), fields(match_id = %raw.metadata.match_id))]
    pub async fn ingest_match(&self, raw: &RawMatch) -> Result<bool, IngestError> {
        // Cheap pre-check before any decomposition work.
        if ledger::has_match(&self.db, raw.metadata.match_id.trim()).await? {
            debug!("match already recorded, skipping");
            return Ok(false);
        }

        let normalized = normalize(raw)?;

        let mut tx = self.db.pool.begin().await?;

        // Re-check inside the transaction; a concurrent worker may have
        // committed this match since the pre-check.
        if ledger::has_match_tx(&mut tx, &normalized.match_row.match_id).await? {
            tx.rollback().await?;
            debug!("match committed concurrently, skipping");
            return Ok(false);
        }

        match store::insert_match(&mut tx, &normalized.match_row).await {
            Ok(()) => {}
            // Whatever window is left between the check and the insert is
            // closed by the matchId primary key: losing that race is the
            // same idempotent no-op as the short-circuit above.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!("lost insert race, match committed concurrently");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        }

        store::insert_participants(&mut tx, &normalized.participants).await?;
        let placeholders =
            store::insert_placeholder_champions(&mut tx, &normalized.champion_ids).await?;
        for participant in &normalized.participants {
            if !participant.summoner_name.is_empty() {
                ledger::mark_seen(&mut tx, &participant.summoner_name).await?;
            }
        }

        tx.commit().await?;
        info!(
            participants = normalized.participants.len(),
            placeholder_champions = placeholders,
            winner = normalized.match_row.winner,
            "committed match"
        );
        Ok(true)
    }

    /// Variant taking the undecoded JSON body; a payload that does not parse
    /// is a non-retryable input error.
    pub async fn ingest_match_value(&self, raw: Value) -> Result<bool, IngestError> {
        let raw: RawMatch = serde_json::from_value(raw)
            .map_err(|err| IngestError::Input(format!("match payload did not parse: {err}")))?;
        self.ingest_match(&raw).await
    }

    /// Upsert one champion's reference data. Without `force_refresh` an
    /// existing (non-placeholder) row is left untouched, so historical
    /// matches keep referencing a consistent champion shape even if stats
    /// patch later.
    #[instrument(skip(self, raw), fields(champion = %raw.name))]
    pub async fn ingest_champion(
        &self,
        raw: &RawChampion,
        force_refresh: bool,
    ) -> Result<(), IngestError> {
        let row = champion_row(raw)?;
        let mut tx = self.db.pool.begin().await?;
        if force_refresh {
            store::overwrite_champion(&mut tx, &row).await?;
        } else {
            let written = store::upsert_champion_if_absent(&mut tx, &row).await?;
            if !written {
                debug!(champion_id = row.champion_id, "champion already loaded, left untouched");
            }
        }
        tx.commit().await?;
        Ok(())
    }

    /// Batch form for seeding the full champion.json drop in one
    /// transaction. Returns how many rows were inserted or filled.
    pub async fn ingest_champions(
        &self,
        raws: &[RawChampion],
        force_refresh: bool,
    ) -> Result<usize, IngestError> {
        let mut tx = self.db.pool.begin().await?;
        let mut written = 0usize;
        for raw in raws {
            let row = champion_row(raw)?;
            if force_refresh {
                store::overwrite_champion(&mut tx, &row).await?;
                written += 1;
            } else if store::upsert_champion_if_absent(&mut tx, &row).await? {
                written += 1;
            }
        }
        tx.commit().await?;
        info!(total = raws.len(), written, force_refresh, "champion seed committed");
        Ok(written)
    }

    /// Replace-all-for-summoner: delete the summoner's existing mastery rows
    /// and insert the fresh list as one transaction. Repeated polling of the
    /// same summoner therefore never accumulates duplicates.
    #[instrument(skip(self, raws), fields(summoner_id = %summoner_id, masteries = raws.len()))]
    pub async fn ingest_mastery(
        &self,
        summoner_id: &str,
        raws: &[RawMastery],
    ) -> Result<(), IngestError> {
        if summoner_id.trim().is_empty() {
            return Err(IngestError::Input("mastery payload has no summonerId".into()));
        }

        let rows: Vec<store::MasteryRow> = raws.iter().map(RawMastery::to_row).collect();
        let mut tx = self.db.pool.begin().await?;
        store::replace_masteries(&mut tx, summoner_id, &rows).await?;
        tx.commit().await?;
        debug!("replaced mastery rows");
        Ok(())
    }

    /// Record that the crawl frontier has explored a player, independent of
    /// any match commit (the frontier marks a player when it fetches their
    /// match history, before any of those matches are ingested).
    pub async fn mark_player_seen(&self, summoner_name: &str) -> Result<(), IngestError> {
        if summoner_name.trim().is_empty() {
            return Err(IngestError::Input("empty summonerName".into()));
        }
        let mut conn = self.db.pool.acquire().await?;
        ledger::mark_seen(&mut conn, summoner_name).await?;
        Ok(())
    }

    /// Read accessor for the crawl frontier: has this match been recorded?
    pub async fn has_match(&self, match_id: &str) -> Result<bool, IngestError> {
        Ok(ledger::has_match(&self.db, match_id).await?)
    }

    /// Read accessor for the crawl frontier: has this player been visited?
    pub async fn has_seen_player(&self, summoner_name: &str) -> Result<bool, IngestError> {
        Ok(ledger::has_seen_player(&self.db, summoner_name).await?)
    }
}
