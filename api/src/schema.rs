//! Declarative create schemas, one per creatable entity kind.
//!
//! A schema validates a raw form payload (field name -> JSON value) and, on
//! success, re-keys the declared fields to the names the backend expects.
//! Anything the schema does not declare is dropped from the request body.

use crate::entity::EntityKind;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// String with at least this many characters.
    MinLen(usize),
    /// `YYYY-MM-DD` date string.
    Date,
    /// Identifier of another entity. Must not be blank.
    Reference,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Key in the form payload.
    pub name: &'static str,
    /// Key in the request body sent to the backend.
    pub wire: &'static str,
    pub label: &'static str,
    pub constraint: Constraint,
}

impl Field {
    const fn new(name: &'static str, label: &'static str, constraint: Constraint) -> Self {
        Self { name, wire: name, label, constraint }
    }

    const fn renamed(
        name: &'static str,
        wire: &'static str,
        label: &'static str,
        constraint: Constraint,
    ) -> Self {
        Self { name, wire, label, constraint }
    }

    /// Check one value against this field's constraint.
    fn check(&self, value: Option<&Value>) -> Result<String, String> {
        let Some(text) = value.and_then(Value::as_str) else {
            return Err(format!("{} é obrigatório", self.label));
        };
        match self.constraint {
            Constraint::MinLen(min) if text.chars().count() < min => Err(format!(
                "{} deve ter pelo menos {min} caracteres",
                self.label
            )),
            Constraint::Date if NaiveDate::parse_from_str(text, DATE_FORMAT).is_err() => Err(
                format!("{} deve ser uma data válida (AAAA-MM-DD)", self.label),
            ),
            Constraint::Reference if text.trim().is_empty() => {
                Err(format!("{} é obrigatório", self.label))
            }
            _ => Ok(text.to_owned()),
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub kind: EntityKind,
    pub fields: &'static [Field],
}

impl Schema {
    /// Validate a raw payload. Every field is checked so the caller gets the
    /// full list of problems, but any problem rejects the whole payload.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<ValidPayload, ValidationError> {
        let mut body = Map::new();
        let mut issues = Vec::new();

        for field in self.fields {
            match field.check(payload.get(field.name)) {
                Ok(value) => {
                    body.insert(field.wire.to_owned(), Value::String(value));
                }
                Err(message) => issues.push(FieldIssue { field: field.name, message }),
            }
        }

        if issues.is_empty() {
            Ok(ValidPayload { kind: self.kind, body })
        } else {
            Err(ValidationError { kind: self.kind, issues })
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A payload that passed its schema, keyed by backend field names.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPayload {
    kind: EntityKind,
    body: Map<String, Value>,
}

impl ValidPayload {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: EntityKind,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issue_for(&self, field: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|i| i.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dados inválidos")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}", issue.message)?;
        }
        Ok(())
    }
}

const NAME: Field = Field::new("name", "Nome", Constraint::MinLen(3));
const NATIONALITY: Field = Field::new("nationalityId", "Nacionalidade", Constraint::Reference);
const DATE_OF_BIRTH: Field = Field::new("dateOfBirth", "Data de nascimento", Constraint::Date);
const DESCRIPTION: Field = Field::new("description", "Descrição", Constraint::MinLen(10));
const SPORT_REF: Field = Field::new("sportId", "Esporte", Constraint::Reference);
const CLUB_REF: Field = Field::new("clubId", "Clube", Constraint::Reference);

pub static SPORT: Schema = Schema {
    kind: EntityKind::Sport,
    fields: &[NAME, Field::new("icon", "Ícone", Constraint::MinLen(3)), DESCRIPTION],
};

pub static CLUB: Schema = Schema {
    kind: EntityKind::Club,
    fields: &[
        NAME,
        Field::new("foundationDate", "Data de fundação", Constraint::Date),
        NATIONALITY,
    ],
};

pub static PLAYER: Schema = Schema {
    kind: EntityKind::Player,
    fields: &[NAME, DATE_OF_BIRTH, NATIONALITY, CLUB_REF],
};

pub static REFEREE: Schema = Schema {
    kind: EntityKind::Referee,
    fields: &[NAME, NATIONALITY, DATE_OF_BIRTH],
};

pub static TEAM: Schema = Schema {
    kind: EntityKind::Team,
    fields: &[NAME, CLUB_REF, SPORT_REF],
};

pub static TOURNAMENT: Schema = Schema {
    kind: EntityKind::Tournament,
    fields: &[NAME, DESCRIPTION, SPORT_REF],
};

pub static SEASON: Schema = Schema {
    kind: EntityKind::Season,
    fields: &[
        NAME,
        Field::new("tournamentId", "Torneio", Constraint::Reference),
        Field::renamed("startDate", "startsAt", "Início", Constraint::Date),
        Field::renamed("endDate", "endsAt", "Término", Constraint::Date),
    ],
};

pub static STAGE: Schema = Schema {
    kind: EntityKind::Stage,
    fields: &[NAME, Field::new("seasonId", "Temporada", Constraint::Reference)],
};
