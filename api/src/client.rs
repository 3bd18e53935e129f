use crate::cache::{TagRegistry, TaggedCache};
use crate::config::ApiConfig;
use crate::entity::EntityKind;
use crate::schema::{DATE_FORMAT, ValidPayload};
use crate::wire::{
    ClubWire, MatchWire, PlayerWire, RefWire, RefereeWire, SeasonWire, SportWire, StageWire,
    TeamWire, TournamentWire,
};
use crate::{
    Club, Match, MatchStatus, Player, Record, Reference, Referee, Season, Sport, Stage, Team,
    Tournament,
};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use reqwest::{Client, Response, StatusCode};
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while talking to the backend.
#[derive(Debug)]
pub enum ApiError {
    /// The request never completed: connection refused, timeout, DNS...
    Network(reqwest::Error, String),
    /// The backend answered with a non-2xx status.
    UnexpectedResponse(StatusCode, String),
    Parsing(reqwest::Error, String),
    Config(String),
    /// Refused locally before anything was sent.
    InvalidRequest(String),
}

/// The error type of the [`Gateway`] seam.
pub type GatewayError = ApiError;

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::UnexpectedResponse(status, url) => {
                write!(f, "Unexpected response for {url}: {status}")
            }
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Outbound writes against the backend. One call, one request, no retry.
pub trait Gateway {
    fn create(&self, payload: ValidPayload) -> impl Future<Output = ApiResult<()>> + Send;

    fn delete(&self, kind: EntityKind, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

/// Backend client: list fetches tagged for invalidation, plus the [`Gateway`]
/// writes used by the mutation pipeline.
#[derive(Debug, Clone)]
pub struct ArenaApi {
    client: Client,
    config: ApiConfig,
    cache: TaggedCache<Vec<Record>>,
}

impl ArenaApi {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_registry(config, TagRegistry::global())
    }

    pub fn with_registry(config: ApiConfig, registry: TagRegistry) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("arena-admin/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            config,
            cache: TaggedCache::new(registry),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn registry(&self) -> &TagRegistry {
        self.cache.registry()
    }

    /// Fetch the full collection for `kind`, in backend order. Served from the
    /// cache until the kind's tag is invalidated.
    pub async fn fetch_list(&self, kind: EntityKind) -> ApiResult<Vec<Record>> {
        self.cache
            .get_or_fetch(kind.tag(), || self.fetch_list_uncached(kind))
            .await
    }

    async fn fetch_list_uncached(&self, kind: EntityKind) -> ApiResult<Vec<Record>> {
        let url = self.config.collection_url(kind.path());
        debug!("fetching {kind} list from {url}");
        match kind {
            EntityKind::Club => self.get_records(&url, |w| map_club(w).map(Record::Club)).await,
            EntityKind::Player => self.get_records(&url, |w| map_player(w).map(Record::Player)).await,
            EntityKind::Referee => self.get_records(&url, |w| map_referee(w).map(Record::Referee)).await,
            EntityKind::Sport => self.get_records(&url, |w| map_sport(w).map(Record::Sport)).await,
            EntityKind::Team => self.get_records(&url, |w| map_team(w).map(Record::Team)).await,
            EntityKind::Tournament => {
                self.get_records(&url, |w| map_tournament(w).map(Record::Tournament)).await
            }
            EntityKind::Season => self.get_records(&url, |w| map_season(w).map(Record::Season)).await,
            EntityKind::Stage => self.get_records(&url, |w| map_stage(w).map(Record::Stage)).await,
            EntityKind::Match => self.get_records(&url, |w| map_match(w).map(Record::Match)).await,
        }
    }

    async fn get_records<T, F>(&self, url: &str, map: F) -> ApiResult<Vec<Record>>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(T) -> Option<Record>,
    {
        let rows = self.get::<T>(url).await?;
        let total = rows.len();
        let records: Vec<Record> = rows.into_iter().filter_map(map).collect();
        if records.len() < total {
            warn!("dropped {} row(s) without an id from {url}", total - records.len());
        }
        Ok(records)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<Vec<T>> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        check_status(response, url)?
            .json::<Vec<T>>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

impl Gateway for ArenaApi {
    async fn create(&self, payload: ValidPayload) -> ApiResult<()> {
        let url = self.config.collection_url(payload.kind().path());
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .json(payload.body())
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        check_status(response, &url).map(drop)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidRequest(format!("refusing to delete {kind} with a blank id")));
        }
        let url = self.config.item_url(kind.path(), id)?;
        debug!("DELETE {url}");
        let response = self
            .client
            .delete(url.clone())
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_string()))?;
        check_status(response, url.as_str()).map(drop)
    }
}

fn check_status(response: Response, url: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::UnexpectedResponse(status, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

/// Rows without a usable id cannot be addressed, so they are dropped.
fn wire_id(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.trim().is_empty())
}

fn map_ref(r: Option<RefWire>) -> Option<Reference> {
    let r = r?;
    Some(Reference { id: r.id?, name: r.name.unwrap_or_default() })
}

/// Dates arrive either as plain `YYYY-MM-DD` or as full ISO timestamps.
fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.date_naive()))
}

fn map_club(w: ClubWire) -> Option<Club> {
    Some(Club {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        foundation_date: parse_date(w.foundation_date),
        nationality: map_ref(w.nationality),
    })
}

fn map_player(w: PlayerWire) -> Option<Player> {
    Some(Player {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        date_of_birth: parse_date(w.date_of_birth),
        nationality: map_ref(w.nationality),
        club: map_ref(w.club),
    })
}

fn map_referee(w: RefereeWire) -> Option<Referee> {
    Some(Referee {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        date_of_birth: parse_date(w.date_of_birth),
        nationality: map_ref(w.nationality),
    })
}

fn map_sport(w: SportWire) -> Option<Sport> {
    Some(Sport {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        icon: w.icon.unwrap_or_default(),
        description: w.description.unwrap_or_default(),
    })
}

fn map_team(w: TeamWire) -> Option<Team> {
    Some(Team {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        club: map_ref(w.club),
        sport: map_ref(w.sport),
    })
}

fn map_tournament(w: TournamentWire) -> Option<Tournament> {
    Some(Tournament {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        description: w.description.unwrap_or_default(),
        sport: map_ref(w.sport),
    })
}

fn map_season(w: SeasonWire) -> Option<Season> {
    Some(Season {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        starts_at: parse_date(w.starts_at),
        ends_at: parse_date(w.ends_at),
        tournament: map_ref(w.tournament),
    })
}

fn map_stage(w: StageWire) -> Option<Stage> {
    Some(Stage {
        id: wire_id(w.id)?,
        name: w.name.unwrap_or_default(),
        order: w.order,
        season: map_ref(w.season),
    })
}

fn map_match(w: MatchWire) -> Option<Match> {
    let status = w.status.as_deref().map(parse_status).unwrap_or_default();
    let start_time = w
        .starts_at
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(Match {
        id: wire_id(w.id)?,
        home: map_ref(w.home_team),
        away: map_ref(w.away_team),
        score: w.home_score.zip(w.away_score),
        status,
        start_time,
        stage: map_ref(w.stage),
    })
}

fn parse_status(s: &str) -> MatchStatus {
    match s.to_ascii_uppercase().as_str() {
        "LIVE" | "IN_PROGRESS" | "HALFTIME" => MatchStatus::Live,
        "FINISHED" | "FINAL" => MatchStatus::Finished,
        "POSTPONED" | "CANCELLED" | "SUSPENDED" => MatchStatus::Postponed,
        _ => MatchStatus::Scheduled,
    }
}
