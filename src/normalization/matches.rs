//! Raw match payload (Riot match-v5 shape) and its pure decomposition into
//! row-sets for Matches and Participants plus the set of referenced
//! championIds.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::database_ops::store::{MatchRow, ParticipantRow};
use crate::error::IngestError;

pub const TEAM_BLUE: i64 = 100;
pub const TEAM_RED: i64 = 200;
/// Winner sentinel when neither team carries a win flag.
pub const TEAM_UNKNOWN: i64 = 0;

#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub metadata: RawMetadata,
    pub info: RawInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInfo {
    pub game_version: String,
    pub game_creation: i64,
    pub game_duration: i64,
    pub game_id: i64,
    pub teams: Vec<RawTeam>,
    pub participants: Vec<RawParticipant>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTeam {
    pub team_id: i64,
    pub win: bool,
}

/// One participant object. Absent fields deserialize to their `Default`
/// sentinel (0 / empty string) rather than being dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawParticipant {
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
    #[serde(rename = "timeCCingOthers")]
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

/// The row-sets one match payload decomposes into.
#[derive(Debug, Clone)]
pub struct NormalizedMatch {
    pub match_row: MatchRow,
    pub participants: Vec<ParticipantRow>,
    /// Distinct championIds referenced by the participants, for the
    /// coordinator to upsert placeholders before the participant insert.
    pub champion_ids: BTreeSet<i64>,
}

/// Decompose one nested match payload. Pure; no I/O.
///
/// Any participant count >= 0 is accepted: fewer (or more) than the standard
/// ten is a data-shape variation to preserve, not an error. Only a missing
/// match id is rejected.
pub fn normalize(raw: &RawMatch) -> Result<NormalizedMatch, IngestError> {
    let match_id = raw.metadata.match_id.trim();
    if match_id.is_empty() {
        return Err(IngestError::Input("match payload has no matchId".into()));
    }

    let match_row = MatchRow {
        match_id: match_id.to_string(),
        game_version: raw.info.game_version.clone(),
        game_creation: raw.info.game_creation,
        game_duration: raw.info.game_duration,
        game_id: raw.info.game_id,
        winner: derive_winner(&raw.info),
    };

    let mut participants = Vec::with_capacity(raw.info.participants.len());
    let mut champion_ids = BTreeSet::new();
    for p in &raw.info.participants {
        if p.champion_id > 0 {
            champion_ids.insert(p.champion_id);
        }
        participants.push(participant_row(match_id, p));
    }

    Ok(NormalizedMatch {
        match_row,
        participants,
        champion_ids,
    })
}

/// The winning side is whichever team object carries `win == true`; the
/// payload orders teams arbitrarily, so index 0 means nothing. Payloads
/// without a team block fall back to the participants' own win flags.
fn derive_winner(info: &RawInfo) -> i64 {
    for team in &info.teams {
        if team.win && (team.team_id == TEAM_BLUE || team.team_id == TEAM_RED) {
            return team.team_id;
        }
    }
    for p in &info.participants {
        if p.win && (p.team_id == TEAM_BLUE || p.team_id == TEAM_RED) {
            return p.team_id;
        }
    }
    TEAM_UNKNOWN
}

fn participant_row(match_id: &str, p: &RawParticipant) -> ParticipantRow {
    ParticipantRow {
        match_id: match_id.to_string(),
        summoner_id: p.summoner_id.clone(),
        summoner_name: p.summoner_name.clone(),
        champion_id: p.champion_id,
        team_id: p.team_id,
        team_position: p.team_position.clone(),
        win: p.win,
        kills: p.kills,
        deaths: p.deaths,
        assists: p.assists,
        champ_level: p.champ_level,
        gold_earned: p.gold_earned,
        gold_spent: p.gold_spent,
        total_damage_dealt: p.total_damage_dealt,
        total_damage_dealt_to_champions: p.total_damage_dealt_to_champions,
        total_damage_taken: p.total_damage_taken,
        physical_damage_dealt: p.physical_damage_dealt,
        physical_damage_dealt_to_champions: p.physical_damage_dealt_to_champions,
        physical_damage_taken: p.physical_damage_taken,
        magic_damage_dealt: p.magic_damage_dealt,
        magic_damage_dealt_to_champions: p.magic_damage_dealt_to_champions,
        magic_damage_taken: p.magic_damage_taken,
        true_damage_dealt: p.true_damage_dealt,
        true_damage_dealt_to_champions: p.true_damage_dealt_to_champions,
        true_damage_taken: p.true_damage_taken,
        damage_dealt_to_buildings: p.damage_dealt_to_buildings,
        damage_dealt_to_objectives: p.damage_dealt_to_objectives,
        damage_dealt_to_turrets: p.damage_dealt_to_turrets,
        damage_self_mitigated: p.damage_self_mitigated,
        total_heal: p.total_heal,
        vision_score: p.vision_score,
        wards_placed: p.wards_placed,
        wards_killed: p.wards_killed,
        time_ccing_others: p.time_ccing_others,
        longest_time_spent_living: p.longest_time_spent_living,
        largest_killing_spree: p.largest_killing_spree,
        largest_multi_kill: p.largest_multi_kill,
        total_minions_killed: p.total_minions_killed,
        neutral_minions_killed: p.neutral_minions_killed,
        baron_kills: p.baron_kills,
        dragon_kills: p.dragon_kills,
        inhibitor_kills: p.inhibitor_kills,
        turret_kills: p.turret_kills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(match_id: &str, teams: serde_json::Value, participants: serde_json::Value) -> RawMatch {
        serde_json::from_value(json!({
            "metadata": { "matchId": match_id },
            "info": {
                "gameVersion": "12.19.467.3034",
                "gameCreation": 1_665_000_000_000_i64,
                "gameDuration": 1840,
                "gameId": 4_400_000_000_i64,
                "teams": teams,
                "participants": participants,
            }
        }))
        .expect("payload should deserialize")
    }

    #[test]
    fn winner_is_derived_from_win_flag_not_team_order() {
        // Red team listed first and winning; a fixed-ordering assumption
        // would report 100 here.
        let raw = payload(
            "NA1_1",
            json!([{ "teamId": 200, "win": true }, { "teamId": 100, "win": false }]),
            json!([]),
        );
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.match_row.winner, TEAM_RED);
    }

    #[test]
    fn winner_falls_back_to_participant_flags() {
        let raw = payload(
            "NA1_2",
            json!([]),
            json!([
                { "summonerId": "a", "teamId": 100, "win": false },
                { "summonerId": "b", "teamId": 200, "win": true },
            ]),
        );
        assert_eq!(normalize(&raw).unwrap().match_row.winner, TEAM_RED);
    }

    #[test]
    fn winner_unknown_when_no_flag_set() {
        let raw = payload(
            "NA1_3",
            json!([{ "teamId": 100, "win": false }, { "teamId": 200, "win": false }]),
            json!([]),
        );
        assert_eq!(normalize(&raw).unwrap().match_row.winner, TEAM_UNKNOWN);
    }

    #[test]
    fn absent_counters_default_to_zero() {
        let raw = payload(
            "NA1_4",
            json!([]),
            json!([{ "summonerId": "s1", "summonerName": "Murik", "championId": 55 }]),
        );
        let normalized = normalize(&raw).unwrap();
        let p = &normalized.participants[0];
        assert_eq!(p.kills, 0);
        assert_eq!(p.vision_score, 0);
        assert_eq!(p.time_ccing_others, 0);
        assert_eq!(p.match_id, "NA1_4");
        assert_eq!(normalized.champion_ids, BTreeSet::from([55]));
    }

    #[test]
    fn non_standard_participant_counts_are_preserved() {
        let participants: Vec<serde_json::Value> = (0..6)
            .map(|i| json!({ "summonerId": format!("s{i}"), "championId": i + 1 }))
            .collect();
        let raw = payload("NA1_5", json!([]), json!(participants));
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.participants.len(), 6);
        assert!(normalized
            .participants
            .iter()
            .all(|p| p.match_id == "NA1_5"));
        assert_eq!(normalized.champion_ids.len(), 6);
    }

    #[test]
    fn missing_match_id_is_an_input_error() {
        let raw = payload("   ", json!([]), json!([]));
        let err = normalize(&raw).unwrap_err();
        assert!(!err.is_retryable());
    }
}
