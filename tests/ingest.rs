//! End-to-end coordinator tests against an in-memory SQLite store.

use lol_match_ingest::database_ops::store;
use lol_match_ingest::normalization::champions::{RawChampion, RawMastery};
use lol_match_ingest::{Db, Ingestor};
use serde_json::{json, Value};

/// Each `:memory:` connection is its own database, so the test pool must be
/// capped at one connection.
async fn ingestor() -> Ingestor {
    let db = Db::connect("sqlite::memory:", 1).await.expect("connect");
    Ingestor::new(db)
}

fn participant(summoner_id: &str, name: &str, champion_id: i64, team_id: i64, win: bool) -> Value {
    json!({
        "summonerId": summoner_id,
        "summonerName": name,
        "championId": champion_id,
        "teamId": team_id,
        "win": win,
        "kills": 4,
        "deaths": 2,
        "assists": 9,
        "goldEarned": 11_500,
        "visionScore": 23,
    })
}

fn match_payload(match_id: &str, participants: Vec<Value>) -> Value {
    json!({
        "metadata": { "matchId": match_id },
        "info": {
            "gameVersion": "12.19.467.3034",
            "gameCreation": 1_665_000_000_000_i64,
            "gameDuration": 1840,
            "gameId": 4_400_000_000_i64,
            "teams": [
                { "teamId": 100, "win": false },
                { "teamId": 200, "win": true },
            ],
            "participants": participants,
        }
    })
}

fn champion(key: &str, name: &str, hp: f64) -> RawChampion {
    serde_json::from_value(json!({
        "id": name,
        "key": key,
        "info": { "attack": 5, "defense": 5, "magic": 5, "difficulty": 5 },
        "tags": ["Fighter"],
        "stats": { "hp": hp },
    }))
    .unwrap()
}

fn mastery(champion_id: i64, level: i64, points: i64) -> RawMastery {
    serde_json::from_value(json!({
        "championId": champion_id,
        "championLevel": level,
        "championPoints": points,
    }))
    .unwrap()
}

#[tokio::test]
async fn ingesting_the_same_match_twice_is_idempotent() {
    let ingestor = ingestor().await;
    let payload = match_payload(
        "NA1_100",
        vec![
            participant("s1", "Alice", 1, 100, false),
            participant("s2", "Bob", 2, 200, true),
        ],
    );

    assert!(ingestor.ingest_match_value(payload.clone()).await.unwrap());
    assert!(!ingestor.ingest_match_value(payload).await.unwrap());

    let pool = &ingestor.db().pool;
    assert_eq!(store::match_count(pool).await.unwrap(), 1);
    let participants = store::participants_for_match(pool, "NA1_100").await.unwrap();
    assert_eq!(participants.len(), 2);
}

#[tokio::test]
async fn failed_participant_batch_rolls_back_the_match_row() {
    let ingestor = ingestor().await;
    // The duplicated summonerId makes the participant batch fail after the
    // match row has already been written inside the transaction.
    let payload = match_payload(
        "NA1_101",
        vec![
            participant("s1", "Alice", 1, 100, false),
            participant("s1", "Alice", 2, 200, true),
        ],
    );

    let err = ingestor.ingest_match_value(payload).await.unwrap_err();
    assert!(!err.is_retryable());

    let pool = &ingestor.db().pool;
    assert_eq!(store::match_count(pool).await.unwrap(), 0);
    assert!(store::participants_for_match(pool, "NA1_101")
        .await
        .unwrap()
        .is_empty());
    // Nothing partial left behind: Alice was never marked seen either.
    assert!(!ingestor.has_seen_player("Alice").await.unwrap());
}

#[tokio::test]
async fn non_standard_participant_counts_are_committed_faithfully() {
    let ingestor = ingestor().await;
    let participants: Vec<Value> = (0..6)
        .map(|i| participant(&format!("s{i}"), &format!("P{i}"), i + 1, if i < 3 { 100 } else { 200 }, i >= 3))
        .collect();

    assert!(ingestor
        .ingest_match_value(match_payload("NA1_102", participants))
        .await
        .unwrap());

    let rows = store::participants_for_match(&ingestor.db().pool, "NA1_102")
        .await
        .unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r.match_id == "NA1_102"));
}

#[tokio::test]
async fn match_ingestion_marks_every_participant_seen() {
    let ingestor = ingestor().await;
    let payload = match_payload(
        "NA1_103",
        vec![
            participant("s1", "Alice", 1, 100, false),
            participant("s2", "Bob", 2, 200, true),
        ],
    );
    ingestor.ingest_match_value(payload).await.unwrap();

    assert!(ingestor.has_seen_player("Alice").await.unwrap());
    assert!(ingestor.has_seen_player("Bob").await.unwrap());
    assert!(!ingestor.has_seen_player("Carol").await.unwrap());
    assert!(ingestor.has_match("NA1_103").await.unwrap());
    assert!(!ingestor.has_match("NA1_999").await.unwrap());
}

#[tokio::test]
async fn mark_player_seen_is_idempotent() {
    let ingestor = ingestor().await;
    ingestor.mark_player_seen("Murik").await.unwrap();
    ingestor.mark_player_seen("Murik").await.unwrap();
    assert!(ingestor.has_seen_player("Murik").await.unwrap());
}

#[tokio::test]
async fn champion_upsert_keeps_existing_row_unless_refresh_is_forced() {
    let ingestor = ingestor().await;
    ingestor
        .ingest_champion(&champion("1", "Annie", 500.0), false)
        .await
        .unwrap();

    // A second load without forceRefresh leaves the stored shape untouched.
    ingestor
        .ingest_champion(&champion("1", "Annie", 999.0), false)
        .await
        .unwrap();
    let row = store::champion_by_id(&ingestor.db().pool, 1)
        .await
        .unwrap()
        .expect("champion row");
    assert_eq!(row.hp, 500.0);

    // forceRefresh overwrites.
    ingestor
        .ingest_champion(&champion("1", "Annie", 999.0), true)
        .await
        .unwrap();
    let row = store::champion_by_id(&ingestor.db().pool, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.hp, 999.0);
}

#[tokio::test]
async fn placeholder_champions_are_created_and_later_filled() {
    let ingestor = ingestor().await;
    ingestor
        .ingest_match_value(match_payload(
            "NA1_104",
            vec![participant("s1", "Alice", 42, 100, false)],
        ))
        .await
        .unwrap();

    let row = store::champion_by_id(&ingestor.db().pool, 42)
        .await
        .unwrap()
        .expect("placeholder row");
    assert!(row.is_placeholder());

    // Reference data arriving later resolves the placeholder even without
    // forceRefresh; the if-absent policy only protects real rows.
    ingestor
        .ingest_champion(&champion("42", "Corki", 588.0), false)
        .await
        .unwrap();
    let row = store::champion_by_id(&ingestor.db().pool, 42)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.champion_name, "Corki");
    assert_eq!(row.hp, 588.0);
}

#[tokio::test]
async fn champion_seed_batch_reports_written_rows() {
    let ingestor = ingestor().await;
    let seed = vec![champion("1", "Annie", 594.0), champion("2", "Olaf", 645.0)];
    assert_eq!(ingestor.ingest_champions(&seed, false).await.unwrap(), 2);
    // Re-seeding the same drop writes nothing.
    assert_eq!(ingestor.ingest_champions(&seed, false).await.unwrap(), 0);
}

#[tokio::test]
async fn mastery_refresh_replaces_instead_of_appending() {
    let ingestor = ingestor().await;
    ingestor
        .ingest_mastery("S1", &[mastery(1, 5, 120_000)])
        .await
        .unwrap();
    ingestor
        .ingest_mastery("S1", &[mastery(2, 3, 14_000)])
        .await
        .unwrap();

    let rows = store::masteries_for_summoner(&ingestor.db().pool, "S1")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].champion_id, 2);
    assert_eq!(rows[0].champion_level, 3);

    // Another summoner's rows are untouched by S1's refresh.
    ingestor
        .ingest_mastery("S2", &[mastery(1, 7, 300_000)])
        .await
        .unwrap();
    ingestor.ingest_mastery("S1", &[]).await.unwrap();
    assert!(store::masteries_for_summoner(&ingestor.db().pool, "S1")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        store::masteries_for_summoner(&ingestor.db().pool, "S2")
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn malformed_payloads_are_input_errors() {
    let ingestor = ingestor().await;

    let err = ingestor
        .ingest_match_value(json!({ "info": {} }))
        .await
        .unwrap_err();
    assert!(!err.is_retryable());

    let err = ingestor.ingest_mastery("  ", &[]).await.unwrap_err();
    assert!(!err.is_retryable());

    assert_eq!(store::match_count(&ingestor.db().pool).await.unwrap(), 0);
}

#[tokio::test]
async fn winner_is_recorded_from_the_winning_team_flag() {
    let ingestor = ingestor().await;
    ingestor
        .ingest_match_value(match_payload(
            "NA1_105",
            vec![participant("s1", "Alice", 1, 100, false)],
        ))
        .await
        .unwrap();

    let row = store::match_by_id(&ingestor.db().pool, "NA1_105")
        .await
        .unwrap()
        .expect("match row");
    assert_eq!(row.winner, 200);
    assert_eq!(row.game_duration, 1840);
}
