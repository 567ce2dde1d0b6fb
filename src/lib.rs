//! Ingestion core for a League of Legends match-history crawler.
//!
//! An external collaborator (the Riot API client plus its rate-limit/backoff
//! loop and the crawl frontier) fetches raw payloads; this crate decides
//! whether each payload is new, decomposes it into the five relations
//! (Matches, Participants, Champions, ChampionMastery, SeenPlayers), and
//! commits the decomposition as one transaction. Re-ingesting a known match
//! is always a cheap no-op, so the fetch loop may retry freely.

pub mod database_ops;
pub mod error;
pub mod normalization;
pub mod tracing;

pub mod util {
    pub mod env;
}

pub use database_ops::db::Db;
pub use database_ops::ingest::Ingestor;
pub use error::IngestError;
