//! Entity-store row types and write primitives.
//!
//! Every write primitive takes `&mut SqliteConnection` so the ingestion
//! coordinator owns the transaction boundary; nothing here begins or commits
//! on its own. "Upsert-if-absent" (Champions) and "replace-all-for-key"
//! (ChampionMastery) are two distinct named operations on purpose, so the
//! append-never-overwrite and always-overwrite policies cannot be swapped by
//! accident.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::IngestError;

/// One row of the Matches relation. Written once, never updated.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct MatchRow {
    pub match_id: String,
    pub game_version: String,
    pub game_creation: i64,
    pub game_duration: i64,
    pub game_id: i64,
    /// Winning team id (100 or 200), 0 when indeterminate.
    pub winner: i64,
}

impl MatchRow {
    /// gameCreation arrives as epoch millis; expose it as a UTC timestamp
    /// for reporting paths. None when the stored value is out of range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.game_creation).single()
    }
}

/// One player-in-match row. Counters absent from the payload are 0.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct ParticipantRow {
    pub match_id: String,
    pub summoner_id: String,
    pub summoner_name: String,
    pub champion_id: i64,
    pub team_id: i64,
    pub team_position: String,
    pub win: bool,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub champ_level: i64,
    pub gold_earned: i64,
    pub gold_spent: i64,
    pub total_damage_dealt: i64,
    pub total_damage_dealt_to_champions: i64,
    pub total_damage_taken: i64,
    pub physical_damage_dealt: i64,
    pub physical_damage_dealt_to_champions: i64,
    pub physical_damage_taken: i64,
    pub magic_damage_dealt: i64,
    pub magic_damage_dealt_to_champions: i64,
    pub magic_damage_taken: i64,
    pub true_damage_dealt: i64,
    pub true_damage_dealt_to_champions: i64,
    pub true_damage_taken: i64,
    pub damage_dealt_to_buildings: i64,
    pub damage_dealt_to_objectives: i64,
    pub damage_dealt_to_turrets: i64,
    pub damage_self_mitigated: i64,
    pub total_heal: i64,
    pub vision_score: i64,
    pub wards_placed: i64,
    pub wards_killed: i64,
    #[sqlx(rename = "timeCCingOthers")]
    pub time_ccing_others: i64,
    pub longest_time_spent_living: i64,
    pub largest_killing_spree: i64,
    pub largest_multi_kill: i64,
    pub total_minions_killed: i64,
    pub neutral_minions_killed: i64,
    pub baron_kills: i64,
    pub dragon_kills: i64,
    pub inhibitor_kills: i64,
    pub turret_kills: i64,
}

/// Champion reference data: the ddragon info block, tag list (comma-joined)
/// and the base-stat block. Field names match the ddragon stat keys, which
/// are single lowercase words.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct ChampionRow {
    pub champion_id: i64,
    pub champion_name: String,
    pub attack: i64,
    pub defense: i64,
    pub magic: i64,
    pub difficulty: i64,
    pub tags: String,
    pub hp: f64,
    pub hpperlevel: f64,
    pub mp: f64,
    pub mpperlevel: f64,
    pub movespeed: f64,
    pub armor: f64,
    pub armorperlevel: f64,
    pub spellblock: f64,
    pub spellblockperlevel: f64,
    pub attackrange: f64,
    pub hpregen: f64,
    pub hpregenperlevel: f64,
    pub mpregen: f64,
    pub mpregenperlevel: f64,
    pub crit: f64,
    pub critperlevel: f64,
    pub attackdamage: f64,
    pub attackdamageperlevel: f64,
    pub attackspeed: f64,
    pub attackspeedperlevel: f64,
}

impl ChampionRow {
    /// A placeholder row carries nothing but its id; analytics consumers are
    /// expected to tolerate these until reference data arrives.
    pub fn is_placeholder(&self) -> bool {
        self.champion_name.is_empty()
    }
}

/// One per-summoner, per-champion mastery record.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct MasteryRow {
    pub champion_id: i64,
    pub champion_level: i64,
    pub champion_points: i64,
}

const PARTICIPANT_COLUMNS: &str = "matchId, summonerId, summonerName, championId, teamId, \
     teamPosition, win, kills, deaths, assists, champLevel, goldEarned, goldSpent, \
     totalDamageDealt, totalDamageDealtToChampions, totalDamageTaken, \
     physicalDamageDealt, physicalDamageDealtToChampions, physicalDamageTaken, \
     magicDamageDealt, magicDamageDealtToChampions, magicDamageTaken, \
     trueDamageDealt, trueDamageDealtToChampions, trueDamageTaken, \
     damageDealtToBuildings, damageDealtToObjectives, damageDealtToTurrets, \
     damageSelfMitigated, totalHeal, visionScore, wardsPlaced, wardsKilled, \
     timeCCingOthers, longestTimeSpentLiving, largestKillingSpree, largestMultiKill, \
     totalMinionsKilled, neutralMinionsKilled, baronKills, dragonKills, \
     inhibitorKills, turretKills";

const CHAMPION_COLUMNS: &str = "championId, championName, attack, defense, magic, difficulty, tags, \
     hp, hpperlevel, mp, mpperlevel, movespeed, armor, armorperlevel, \
     spellblock, spellblockperlevel, attackrange, hpregen, hpregenperlevel, \
     mpregen, mpregenperlevel, crit, critperlevel, \
     attackdamage, attackdamageperlevel, attackspeed, attackspeedperlevel";

pub async fn insert_match(conn: &mut SqliteConnection, row: &MatchRow) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO Matches (matchId, gameVersion, gameCreation, gameDuration, gameId, winner)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&row.match_id)
    .bind(&row.game_version)
    .bind(row.game_creation)
    .bind(row.game_duration)
    .bind(row.game_id)
    .bind(row.winner)
    .execute(conn)
    .await?;
    Ok(())
}

/// Bulk-insert the participant batch for one match.
///
/// A duplicate `(matchId, summonerId)` pair inside the batch is rejected as
/// an input error before anything is written, so the caller never burns a
/// storage-level retry on a payload that can never succeed.
pub async fn insert_participants(
    conn: &mut SqliteConnection,
    rows: &[ParticipantRow],
) -> Result<(), IngestError> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert((row.match_id.as_str(), row.summoner_id.as_str())) {
            return Err(IngestError::Input(format!(
                "duplicate participant {} in match {}",
                row.summoner_id, row.match_id
            )));
        }
    }

    let mut qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("INSERT INTO Participants ({PARTICIPANT_COLUMNS}) "));
    qb.push_values(rows, |mut b, r| {
        b.push_bind(&r.match_id)
            .push_bind(&r.summoner_id)
            .push_bind(&r.summoner_name)
            .push_bind(r.champion_id)
            .push_bind(r.team_id)
            .push_bind(&r.team_position)
            .push_bind(r.win)
            .push_bind(r.kills)
            .push_bind(r.deaths)
            .push_bind(r.assists)
            .push_bind(r.champ_level)
            .push_bind(r.gold_earned)
            .push_bind(r.gold_spent)
            .push_bind(r.total_damage_dealt)
            .push_bind(r.total_damage_dealt_to_champions)
            .push_bind(r.total_damage_taken)
            .push_bind(r.physical_damage_dealt)
            .push_bind(r.physical_damage_dealt_to_champions)
            .push_bind(r.physical_damage_taken)
            .push_bind(r.magic_damage_dealt)
            .push_bind(r.magic_damage_dealt_to_champions)
            .push_bind(r.magic_damage_taken)
            .push_bind(r.true_damage_dealt)
            .push_bind(r.true_damage_dealt_to_champions)
            .push_bind(r.true_damage_taken)
            .push_bind(r.damage_dealt_to_buildings)
            .push_bind(r.damage_dealt_to_objectives)
            .push_bind(r.damage_dealt_to_turrets)
            .push_bind(r.damage_self_mitigated)
            .push_bind(r.total_heal)
            .push_bind(r.vision_score)
            .push_bind(r.wards_placed)
            .push_bind(r.wards_killed)
            .push_bind(r.time_ccing_others)
            .push_bind(r.longest_time_spent_living)
            .push_bind(r.largest_killing_spree)
            .push_bind(r.largest_multi_kill)
            .push_bind(r.total_minions_killed)
            .push_bind(r.neutral_minions_killed)
            .push_bind(r.baron_kills)
            .push_bind(r.dragon_kills)
            .push_bind(r.inhibitor_kills)
            .push_bind(r.turret_kills);
    });
    qb.build().execute(conn).await?;
    Ok(())
}

fn push_champion_values<'a>(qb: &mut QueryBuilder<'a, Sqlite>, row: &'a ChampionRow) {
    qb.push_values([row], |mut b, r| {
        b.push_bind(r.champion_id)
            .push_bind(&r.champion_name)
            .push_bind(r.attack)
            .push_bind(r.defense)
            .push_bind(r.magic)
            .push_bind(r.difficulty)
            .push_bind(&r.tags)
            .push_bind(r.hp)
            .push_bind(r.hpperlevel)
            .push_bind(r.mp)
            .push_bind(r.mpperlevel)
            .push_bind(r.movespeed)
            .push_bind(r.armor)
            .push_bind(r.armorperlevel)
            .push_bind(r.spellblock)
            .push_bind(r.spellblockperlevel)
            .push_bind(r.attackrange)
            .push_bind(r.hpregen)
            .push_bind(r.hpregenperlevel)
            .push_bind(r.mpregen)
            .push_bind(r.mpregenperlevel)
            .push_bind(r.crit)
            .push_bind(r.critperlevel)
            .push_bind(r.attackdamage)
            .push_bind(r.attackdamageperlevel)
            .push_bind(r.attackspeed)
            .push_bind(r.attackspeedperlevel);
    });
}

/// Upsert-if-absent: an existing champion row is left untouched, with one
/// exception: a placeholder row (created during match ingestion before the
/// reference data arrived) counts as absent and is filled in.
///
/// Returns true when a row was inserted or a placeholder was filled.
pub async fn upsert_champion_if_absent(
    conn: &mut SqliteConnection,
    row: &ChampionRow,
) -> sqlx::Result<bool> {
    let mut qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("INSERT INTO Champions ({CHAMPION_COLUMNS}) "));
    push_champion_values(&mut qb, row);
    qb.push(champion_conflict_update());
    qb.push(" WHERE Champions.championName = ''");
    let result = qb.build().execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Overwrite-on-refresh: unconditionally replace the stored row. Only used
/// when the caller explicitly asked for a refresh of reference data.
pub async fn overwrite_champion(conn: &mut SqliteConnection, row: &ChampionRow) -> sqlx::Result<()> {
    let mut qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("INSERT INTO Champions ({CHAMPION_COLUMNS}) "));
    push_champion_values(&mut qb, row);
    qb.push(champion_conflict_update());
    qb.build().execute(conn).await?;
    Ok(())
}

fn champion_conflict_update() -> &'static str {
    " ON CONFLICT(championId) DO UPDATE SET
        championName = excluded.championName,
        attack = excluded.attack,
        defense = excluded.defense,
        magic = excluded.magic,
        difficulty = excluded.difficulty,
        tags = excluded.tags,
        hp = excluded.hp,
        hpperlevel = excluded.hpperlevel,
        mp = excluded.mp,
        mpperlevel = excluded.mpperlevel,
        movespeed = excluded.movespeed,
        armor = excluded.armor,
        armorperlevel = excluded.armorperlevel,
        spellblock = excluded.spellblock,
        spellblockperlevel = excluded.spellblockperlevel,
        attackrange = excluded.attackrange,
        hpregen = excluded.hpregen,
        hpregenperlevel = excluded.hpregenperlevel,
        mpregen = excluded.mpregen,
        mpregenperlevel = excluded.mpregenperlevel,
        crit = excluded.crit,
        critperlevel = excluded.critperlevel,
        attackdamage = excluded.attackdamage,
        attackdamageperlevel = excluded.attackdamageperlevel,
        attackspeed = excluded.attackspeed,
        attackspeedperlevel = excluded.attackspeedperlevel"
}

/// Insert id-only placeholder rows for champions referenced by a match whose
/// reference data has not been loaded yet. Existing rows are never touched.
/// Returns the number of placeholders created.
pub async fn insert_placeholder_champions(
    conn: &mut SqliteConnection,
    champion_ids: &BTreeSet<i64>,
) -> sqlx::Result<u64> {
    let mut created = 0u64;
    for id in champion_ids {
        let result = sqlx::query(
            "INSERT INTO Champions (championId) VALUES (?)
             ON CONFLICT(championId) DO NOTHING",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;
        created += result.rows_affected();
    }
    Ok(created)
}

/// Replace-all-for-key: drop every mastery row for the summoner, then insert
/// the fresh list, so stale levels never linger alongside fresh ones.
pub async fn replace_masteries(
    conn: &mut SqliteConnection,
    summoner_id: &str,
    rows: &[MasteryRow],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM ChampionMastery WHERE summonerId = ?")
        .bind(summoner_id)
        .execute(&mut *conn)
        .await?;

    if rows.is_empty() {
        return Ok(());
    }

    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "INSERT INTO ChampionMastery (summonerId, championId, championLevel, championPoints) ",
    );
    qb.push_values(rows, |mut b, r| {
        b.push_bind(summoner_id)
            .push_bind(r.champion_id)
            .push_bind(r.champion_level)
            .push_bind(r.champion_points);
    });
    qb.build().execute(conn).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Read accessors (crawl frontier, analytics tooling, tests)
// ---------------------------------------------------------------------------

pub async fn match_count(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM Matches")
        .fetch_one(pool)
        .await
}

pub async fn match_by_id(pool: &SqlitePool, match_id: &str) -> sqlx::Result<Option<MatchRow>> {
    sqlx::query_as("SELECT * FROM Matches WHERE matchId = ?")
        .bind(match_id)
        .fetch_optional(pool)
        .await
}

pub async fn participants_for_match(
    pool: &SqlitePool,
    match_id: &str,
) -> sqlx::Result<Vec<ParticipantRow>> {
    sqlx::query_as("SELECT * FROM Participants WHERE matchId = ? ORDER BY summonerId")
        .bind(match_id)
        .fetch_all(pool)
        .await
}

pub async fn champion_by_id(pool: &SqlitePool, champion_id: i64) -> sqlx::Result<Option<ChampionRow>> {
    sqlx::query_as("SELECT * FROM Champions WHERE championId = ?")
        .bind(champion_id)
        .fetch_optional(pool)
        .await
}

pub async fn masteries_for_summoner(
    pool: &SqlitePool,
    summoner_id: &str,
) -> sqlx::Result<Vec<MasteryRow>> {
    sqlx::query_as(
        "SELECT championId, championLevel, championPoints
         FROM ChampionMastery WHERE summonerId = ? ORDER BY championId",
    )
    .bind(summoner_id)
    .fetch_all(pool)
    .await
}
