//! Backend raw wire types: serde shapes for deserializing list responses.
//! These map to our clean domain types via the mapping functions in client.rs.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RefWire {
    pub id: Option<String>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// People and organisations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClubWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub foundation_date: Option<String>,
    pub nationality: Option<RefWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<RefWire>,
    pub club: Option<RefWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefereeWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<RefWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub club: Option<RefWire>,
    pub sport: Option<RefWire>,
}

// ---------------------------------------------------------------------------
// Competitions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SportWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TournamentWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sport: Option<RefWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SeasonWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub tournament: Option<RefWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StageWire {
    pub id: Option<String>,
    pub name: Option<String>,
    pub order: Option<u32>,
    pub season: Option<RefWire>,
}

// ---------------------------------------------------------------------------
// Live matches
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchWire {
    pub id: Option<String>,
    pub home_team: Option<RefWire>,
    pub away_team: Option<RefWire>,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    /// "SCHEDULED", "LIVE", "FINISHED", "POSTPONED"
    pub status: Option<String>,
    pub starts_at: Option<String>, // ISO 8601
    pub stage: Option<RefWire>,
}
