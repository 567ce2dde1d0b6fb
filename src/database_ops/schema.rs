//! Embedded DDL for the five relations.
//!
//! Every statement is `IF NOT EXISTS`, so reopening an existing database is a
//! no-op. This layout is the durable contract analytics tooling reads; do not
//! change it silently.
//!
//! Participants and ChampionMastery deliberately declare no primary key: a
//! participant's championId may point at a champion that has not been loaded
//! yet, and summoner identities arrive untyped from the API. Uniqueness of
//! `(matchId, summonerId)` is enforced by a unique index instead, and the
//! mastery table is kept consistent by replace-on-refresh in the coordinator.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Matches (
    matchId      TEXT PRIMARY KEY,
    gameVersion  TEXT    NOT NULL DEFAULT '',
    gameCreation INTEGER NOT NULL DEFAULT 0,
    gameDuration INTEGER NOT NULL DEFAULT 0,
    gameId       INTEGER NOT NULL DEFAULT 0,
    winner       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS Participants (
    matchId                        TEXT    NOT NULL,
    summonerId                     TEXT    NOT NULL,
    summonerName                   TEXT    NOT NULL DEFAULT '',
    championId                     INTEGER NOT NULL DEFAULT 0,
    teamId                         INTEGER NOT NULL DEFAULT 0,
    teamPosition                   TEXT    NOT NULL DEFAULT '',
    win                            INTEGER NOT NULL DEFAULT 0,
    kills                          INTEGER NOT NULL DEFAULT 0,
    deaths                         INTEGER NOT NULL DEFAULT 0,
    assists                        INTEGER NOT NULL DEFAULT 0,
    champLevel                     INTEGER NOT NULL DEFAULT 0,
    goldEarned                     INTEGER NOT NULL DEFAULT 0,
    goldSpent                      INTEGER NOT NULL DEFAULT 0,
    totalDamageDealt               INTEGER NOT NULL DEFAULT 0,
    totalDamageDealtToChampions    INTEGER NOT NULL DEFAULT 0,
    totalDamageTaken               INTEGER NOT NULL DEFAULT 0,
    physicalDamageDealt            INTEGER NOT NULL DEFAULT 0,
    physicalDamageDealtToChampions INTEGER NOT NULL DEFAULT 0,
    physicalDamageTaken            INTEGER NOT NULL DEFAULT 0,
    magicDamageDealt               INTEGER NOT NULL DEFAULT 0,
    magicDamageDealtToChampions    INTEGER NOT NULL DEFAULT 0,
    magicDamageTaken               INTEGER NOT NULL DEFAULT 0,
    trueDamageDealt                INTEGER NOT NULL DEFAULT 0,
    trueDamageDealtToChampions     INTEGER NOT NULL DEFAULT 0,
    trueDamageTaken                INTEGER NOT NULL DEFAULT 0,
    damageDealtToBuildings         INTEGER NOT NULL DEFAULT 0,
    damageDealtToObjectives        INTEGER NOT NULL DEFAULT 0,
    damageDealtToTurrets           INTEGER NOT NULL DEFAULT 0,
    damageSelfMitigated            INTEGER NOT NULL DEFAULT 0,
    totalHeal                      INTEGER NOT NULL DEFAULT 0,
    visionScore                    INTEGER NOT NULL DEFAULT 0,
    wardsPlaced                    INTEGER NOT NULL DEFAULT 0,
    wardsKilled                    INTEGER NOT NULL DEFAULT 0,
    timeCCingOthers                INTEGER NOT NULL DEFAULT 0,
    longestTimeSpentLiving         INTEGER NOT NULL DEFAULT 0,
    largestKillingSpree            INTEGER NOT NULL DEFAULT 0,
    largestMultiKill               INTEGER NOT NULL DEFAULT 0,
    totalMinionsKilled             INTEGER NOT NULL DEFAULT 0,
    neutralMinionsKilled           INTEGER NOT NULL DEFAULT 0,
    baronKills                     INTEGER NOT NULL DEFAULT 0,
    dragonKills                    INTEGER NOT NULL DEFAULT 0,
    inhibitorKills                 INTEGER NOT NULL DEFAULT 0,
    turretKills                    INTEGER NOT NULL DEFAULT 0
);

CREATE UNIQUE INDEX IF NOT EXISTS uq_participants_match_summoner
    ON Participants (matchId, summonerId);

CREATE TABLE IF NOT EXISTS Champions (
    championId           INTEGER PRIMARY KEY,
    championName         TEXT    NOT NULL DEFAULT '',
    attack               INTEGER NOT NULL DEFAULT 0,
    defense              INTEGER NOT NULL DEFAULT 0,
    magic                INTEGER NOT NULL DEFAULT 0,
    difficulty           INTEGER NOT NULL DEFAULT 0,
    tags                 TEXT    NOT NULL DEFAULT '',
    hp                   REAL    NOT NULL DEFAULT 0,
    hpperlevel           REAL    NOT NULL DEFAULT 0,
    mp                   REAL    NOT NULL DEFAULT 0,
    mpperlevel           REAL    NOT NULL DEFAULT 0,
    movespeed            REAL    NOT NULL DEFAULT 0,
    armor                REAL    NOT NULL DEFAULT 0,
    armorperlevel        REAL    NOT NULL DEFAULT 0,
    spellblock           REAL    NOT NULL DEFAULT 0,
    spellblockperlevel   REAL    NOT NULL DEFAULT 0,
    attackrange          REAL    NOT NULL DEFAULT 0,
    hpregen              REAL    NOT NULL DEFAULT 0,
    hpregenperlevel      REAL    NOT NULL DEFAULT 0,
    mpregen              REAL    NOT NULL DEFAULT 0,
    mpregenperlevel      REAL    NOT NULL DEFAULT 0,
    crit                 REAL    NOT NULL DEFAULT 0,
    critperlevel         REAL    NOT NULL DEFAULT 0,
    attackdamage         REAL    NOT NULL DEFAULT 0,
    attackdamageperlevel REAL    NOT NULL DEFAULT 0,
    attackspeed          REAL    NOT NULL DEFAULT 0,
    attackspeedperlevel  REAL    NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS ChampionMastery (
    summonerId     TEXT    NOT NULL,
    championId     INTEGER NOT NULL,
    championLevel  INTEGER NOT NULL DEFAULT 0,
    championPoints INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_mastery_summoner
    ON ChampionMastery (summonerId);

CREATE TABLE IF NOT EXISTS SeenPlayers (
    summonerName TEXT PRIMARY KEY
);
"#;
