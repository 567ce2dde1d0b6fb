//! Storage side of the pipeline: the SQLite entity store, the dedup ledger,
//! and the ingestion coordinator that owns every transaction.

pub mod db;
pub mod ingest;
pub mod ledger;
pub mod schema;
pub mod store;
