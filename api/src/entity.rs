//! Entity kinds and the one table that binds each kind to its endpoint,
//! cache tag and create schema.
//!
//! Everything that needs a path or a tag goes through [`EntityKind::config`],
//! so the list fetch and the mutations for a kind always agree on the tag.

use crate::cache::CacheTag;
use crate::schema::{self, Schema};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Club,
    Player,
    Referee,
    #[default]
    Sport,
    Team,
    Tournament,
    Season,
    Stage,
    Match,
}

/// Static per-kind configuration.
#[derive(Debug)]
pub struct EntityConfig {
    pub kind: EntityKind,
    /// Path segment under the backend base URL, without slashes.
    pub path: &'static str,
    pub tag: CacheTag,
    /// `None` for kinds the console can only list and delete.
    pub schema: Option<&'static Schema>,
    /// Portuguese display names, used for tabs and notifications.
    pub singular: &'static str,
    pub plural: &'static str,
    pub feminine: bool,
}

static ENTITIES: [EntityConfig; 9] = [
    EntityConfig {
        kind: EntityKind::Club,
        path: "clubs",
        tag: CacheTag::new("get-clubs"),
        schema: Some(&schema::CLUB),
        singular: "clube",
        plural: "Clubes",
        feminine: false,
    },
    EntityConfig {
        kind: EntityKind::Player,
        path: "players",
        tag: CacheTag::new("get-players"),
        schema: Some(&schema::PLAYER),
        singular: "jogador",
        plural: "Jogadores",
        feminine: false,
    },
    EntityConfig {
        kind: EntityKind::Referee,
        path: "referee",
        tag: CacheTag::new("get-referees"),
        schema: Some(&schema::REFEREE),
        singular: "árbitro",
        plural: "Árbitros",
        feminine: false,
    },
    EntityConfig {
        kind: EntityKind::Sport,
        path: "sports",
        tag: CacheTag::new("get-sports"),
        schema: Some(&schema::SPORT),
        singular: "esporte",
        plural: "Esportes",
        feminine: false,
    },
    EntityConfig {
        kind: EntityKind::Team,
        path: "teams",
        tag: CacheTag::new("get-teams"),
        schema: Some(&schema::TEAM),
        singular: "time",
        plural: "Times",
        feminine: false,
    },
    EntityConfig {
        kind: EntityKind::Tournament,
        path: "tournaments",
        tag: CacheTag::new("get-tournaments"),
        schema: Some(&schema::TOURNAMENT),
        singular: "torneio",
        plural: "Torneios",
        feminine: false,
    },
    EntityConfig {
        kind: EntityKind::Season,
        path: "seasons",
        tag: CacheTag::new("get-seasons"),
        schema: Some(&schema::SEASON),
        singular: "temporada",
        plural: "Temporadas",
        feminine: true,
    },
    EntityConfig {
        kind: EntityKind::Stage,
        path: "stages",
        tag: CacheTag::new("get-stages"),
        schema: Some(&schema::STAGE),
        singular: "fase",
        plural: "Fases",
        feminine: true,
    },
    EntityConfig {
        kind: EntityKind::Match,
        path: "matches",
        tag: CacheTag::new("get-matches"),
        schema: None,
        singular: "partida",
        plural: "Partidas",
        feminine: true,
    },
];

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Club,
        EntityKind::Player,
        EntityKind::Referee,
        EntityKind::Sport,
        EntityKind::Team,
        EntityKind::Tournament,
        EntityKind::Season,
        EntityKind::Stage,
        EntityKind::Match,
    ];

    pub fn config(self) -> &'static EntityConfig {
        &ENTITIES[self as usize]
    }

    pub fn tag(self) -> CacheTag {
        self.config().tag
    }

    pub fn path(self) -> &'static str {
        self.config().path
    }

    pub fn schema(self) -> Option<&'static Schema> {
        self.config().schema
    }

    pub fn is_creatable(self) -> bool {
        self.schema().is_some()
    }

    /// Table headers for the list page, matching [`crate::Record::cells`].
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            EntityKind::Club => &["Nome", "Fundação", "Nacionalidade"],
            EntityKind::Player => &["Nome", "Nascimento", "Nacionalidade", "Clube"],
            EntityKind::Referee => &["Nome", "Nascimento", "Nacionalidade"],
            EntityKind::Sport => &["Nome", "Ícone", "Descrição"],
            EntityKind::Team => &["Nome", "Clube", "Esporte"],
            EntityKind::Tournament => &["Nome", "Esporte", "Descrição"],
            EntityKind::Season => &["Nome", "Torneio", "Início", "Término"],
            EntityKind::Stage => &["Nome", "Temporada", "Ordem"],
            EntityKind::Match => &["Mandante", "Placar", "Visitante", "Status", "Início"],
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn config_table_is_indexed_by_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.config().kind, kind);
        }
    }

    #[test]
    fn tags_and_paths_are_unique() {
        let tags: HashSet<_> = EntityKind::ALL.iter().map(|k| k.tag()).collect();
        let paths: HashSet<_> = EntityKind::ALL.iter().map(|k| k.path()).collect();
        assert_eq!(tags.len(), EntityKind::ALL.len());
        assert_eq!(paths.len(), EntityKind::ALL.len());
    }

    #[test]
    fn schemas_belong_to_their_kind() {
        for kind in EntityKind::ALL {
            if let Some(schema) = kind.schema() {
                assert_eq!(schema.kind, kind, "schema mismatch for {kind:?}");
            }
        }
    }

    #[test]
    fn matches_are_read_only() {
        assert!(!EntityKind::Match.is_creatable());
        assert!(EntityKind::ALL.iter().filter(|k| **k != EntityKind::Match).all(|k| k.is_creatable()));
    }

    #[test]
    fn known_endpoints() {
        assert_eq!(EntityKind::Referee.path(), "referee");
        assert_eq!(EntityKind::Referee.tag().as_str(), "get-referees");
        assert_eq!(EntityKind::Sport.path(), "sports");
        assert_eq!(EntityKind::Sport.tag().as_str(), "get-sports");
    }
}
