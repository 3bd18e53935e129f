pub mod cache;
pub mod client;
pub mod config;
pub mod entity;
pub mod mutation;
pub mod schema;
pub mod wire;

pub use cache::{CacheTag, TagRegistry, TaggedCache};
pub use client::{ApiError, ApiResult, ArenaApi, Gateway, GatewayError};
pub use config::ApiConfig;
pub use entity::{EntityConfig, EntityKind};
pub use mutation::{MutationError, MutationOutcome, MutationPipeline, Operation};
pub use schema::{FieldIssue, Schema, ValidPayload, ValidationError};

use chrono::{DateTime, NaiveDate, Utc};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// Nested reference to another entity, as embedded by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Club {
    pub id: String,
    pub name: String,
    pub foundation_date: Option<NaiveDate>,
    pub nationality: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<Reference>,
    pub club: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Referee {
    pub id: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sport {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub club: Option<Reference>,
    pub sport: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sport: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Season {
    pub id: String,
    pub name: String,
    pub starts_at: Option<NaiveDate>,
    pub ends_at: Option<NaiveDate>,
    pub tournament: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub order: Option<u32>,
    pub season: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
    Postponed,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Agendada",
            MatchStatus::Live => "Ao vivo",
            MatchStatus::Finished => "Encerrada",
            MatchStatus::Postponed => "Adiada",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub id: String,
    pub home: Option<Reference>,
    pub away: Option<Reference>,
    pub score: Option<(u16, u16)>, // (home, away)
    pub status: MatchStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub stage: Option<Reference>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }
}

/// One row of a list page.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Club(Club),
    Player(Player),
    Referee(Referee),
    Sport(Sport),
    Team(Team),
    Tournament(Tournament),
    Season(Season),
    Stage(Stage),
    Match(Match),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Club(r) => &r.id,
            Record::Player(r) => &r.id,
            Record::Referee(r) => &r.id,
            Record::Sport(r) => &r.id,
            Record::Team(r) => &r.id,
            Record::Tournament(r) => &r.id,
            Record::Season(r) => &r.id,
            Record::Stage(r) => &r.id,
            Record::Match(r) => &r.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Club(_) => EntityKind::Club,
            Record::Player(_) => EntityKind::Player,
            Record::Referee(_) => EntityKind::Referee,
            Record::Sport(_) => EntityKind::Sport,
            Record::Team(_) => EntityKind::Team,
            Record::Tournament(_) => EntityKind::Tournament,
            Record::Season(_) => EntityKind::Season,
            Record::Stage(_) => EntityKind::Stage,
            Record::Match(_) => EntityKind::Match,
        }
    }

    /// Short human label, used in the delete confirmation prompt.
    pub fn title(&self) -> String {
        match self {
            Record::Club(r) => r.name.clone(),
            Record::Player(r) => r.name.clone(),
            Record::Referee(r) => r.name.clone(),
            Record::Sport(r) => r.name.clone(),
            Record::Team(r) => r.name.clone(),
            Record::Tournament(r) => r.name.clone(),
            Record::Season(r) => r.name.clone(),
            Record::Stage(r) => r.name.clone(),
            Record::Match(r) => format!("{} x {}", ref_name(&r.home), ref_name(&r.away)),
        }
    }

    /// Table cells, one per entry of [`EntityKind::columns`].
    pub fn cells(&self) -> Vec<String> {
        match self {
            Record::Club(r) => vec![r.name.clone(), fmt_date(r.foundation_date), ref_name(&r.nationality)],
            Record::Player(r) => vec![
                r.name.clone(),
                fmt_date(r.date_of_birth),
                ref_name(&r.nationality),
                ref_name(&r.club),
            ],
            Record::Referee(r) => vec![r.name.clone(), fmt_date(r.date_of_birth), ref_name(&r.nationality)],
            Record::Sport(r) => vec![r.name.clone(), r.icon.clone(), r.description.clone()],
            Record::Team(r) => vec![r.name.clone(), ref_name(&r.club), ref_name(&r.sport)],
            Record::Tournament(r) => vec![r.name.clone(), ref_name(&r.sport), r.description.clone()],
            Record::Season(r) => vec![
                r.name.clone(),
                ref_name(&r.tournament),
                fmt_date(r.starts_at),
                fmt_date(r.ends_at),
            ],
            Record::Stage(r) => vec![
                r.name.clone(),
                ref_name(&r.season),
                r.order.map(|o| o.to_string()).unwrap_or_else(|| "-".into()),
            ],
            Record::Match(r) => vec![
                ref_name(&r.home),
                r.score
                    .map(|(h, a)| format!("{h} - {a}"))
                    .unwrap_or_else(|| "- x -".into()),
                ref_name(&r.away),
                r.status.label().to_owned(),
                r.start_time
                    .map(|t| t.format("%d/%m %H:%M").to_string())
                    .unwrap_or_else(|| "-".into()),
            ],
        }
    }
}

fn ref_name(r: &Option<Reference>) -> String {
    r.as_ref().map(|r| r.name.clone()).unwrap_or_else(|| "-".into())
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_match_column_count() {
        let records = [
            Record::Club(Club::default()),
            Record::Player(Player::default()),
            Record::Referee(Referee::default()),
            Record::Sport(Sport::default()),
            Record::Team(Team::default()),
            Record::Tournament(Tournament::default()),
            Record::Season(Season::default()),
            Record::Stage(Stage::default()),
            Record::Match(Match::default()),
        ];
        for record in records {
            assert_eq!(record.cells().len(), record.kind().columns().len(), "{:?}", record.kind());
        }
    }

    #[test]
    fn match_title_and_score() {
        let m = Match {
            id: "m1".into(),
            home: Some(Reference { id: "t1".into(), name: "Flamengo".into() }),
            away: Some(Reference { id: "t2".into(), name: "Palmeiras".into() }),
            score: Some((2, 1)),
            status: MatchStatus::Live,
            ..Default::default()
        };
        let record = Record::Match(m);
        assert_eq!(record.title(), "Flamengo x Palmeiras");
        assert_eq!(record.cells()[1], "2 - 1");
        assert_eq!(record.cells()[3], "Ao vivo");
    }

    #[test]
    fn missing_dates_render_as_dash() {
        let record = Record::Referee(Referee {
            id: "r1".into(),
            name: "Anderson Daronco".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1981, 1, 5),
            nationality: None,
        });
        assert_eq!(record.cells(), vec!["Anderson Daronco", "05/01/1981", "-"]);
    }
}
