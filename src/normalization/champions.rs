//! Raw champion reference data (ddragon `champion.json` entries) and
//! per-summoner mastery payloads, with their row conversions.

use serde::Deserialize;

use crate::database_ops::store::{ChampionRow, MasteryRow};
use crate::error::IngestError;

/// One entry of the ddragon champion drop. ddragon calls the display name
/// `id` and carries the numeric id as the string `key`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChampion {
    #[serde(rename = "id")]
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub info: RawChampionInfo,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stats: RawChampionStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChampionInfo {
    pub attack: i64,
    pub defense: i64,
    pub magic: i64,
    pub difficulty: i64,
}

/// The ddragon base-stat block; keys are single lowercase words.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChampionStats {
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

/// Convert a raw champion entry into its storage row. The tag list is
/// serialized comma-joined, matching what the legacy database held.
pub fn champion_row(raw: &RawChampion) -> Result<ChampionRow, IngestError> {
    let champion_id: i64 = raw.key.trim().parse().map_err(|_| {
        IngestError::Input(format!("champion key {:?} is not numeric", raw.key))
    })?;
    if champion_id <= 0 {
        return Err(IngestError::Input(format!(
            "champion key {champion_id} out of range"
        )));
    }

    Ok(ChampionRow {
        champion_id,
        champion_name: raw.name.clone(),
        attack: raw.info.attack,
        defense: raw.info.defense,
        magic: raw.info.magic,
        difficulty: raw.info.difficulty,
        tags: raw.tags.join(","),
        hp: raw.stats.hp,
        hpperlevel: raw.stats.hpperlevel,
        mp: raw.stats.mp,
        mpperlevel: raw.stats.mpperlevel,
        movespeed: raw.stats.movespeed,
        armor: raw.stats.armor,
        armorperlevel: raw.stats.armorperlevel,
        spellblock: raw.stats.spellblock,
        spellblockperlevel: raw.stats.spellblockperlevel,
        attackrange: raw.stats.attackrange,
        hpregen: raw.stats.hpregen,
        hpregenperlevel: raw.stats.hpregenperlevel,
        mpregen: raw.stats.mpregen,
        mpregenperlevel: raw.stats.mpregenperlevel,
        crit: raw.stats.crit,
        critperlevel: raw.stats.critperlevel,
        attackdamage: raw.stats.attackdamage,
        attackdamageperlevel: raw.stats.attackdamageperlevel,
        attackspeed: raw.stats.attackspeed,
        attackspeedperlevel: raw.stats.attackspeedperlevel,
    })
}

/// One mastery record from champion-mastery-v4.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMastery {
    pub champion_id: i64,
    pub champion_level: i64,
    pub champion_points: i64,
}

impl RawMastery {
    pub fn to_row(&self) -> MasteryRow {
        MasteryRow {
            champion_id: self.champion_id,
            champion_level: self.champion_level,
            champion_points: self.champion_points,
        }
    }
}
