use crate::state::messages::NetworkRequest;
use crate::state::toast::Toast;
use arena_api::schema::{Constraint, Field};
use arena_api::{EntityKind, Operation, ValidationError};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct FormField {
    pub field: &'static Field,
    pub value: String,
    pub error: Option<String>,
}

impl FormField {
    pub fn hint(&self) -> &'static str {
        match self.field.constraint {
            Constraint::Date => "AAAA-MM-DD",
            Constraint::Reference => "id",
            Constraint::MinLen(_) => "",
        }
    }
}

/// Create form generated from a kind's schema.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub kind: EntityKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub pending: bool,
}

impl CreateForm {
    /// `None` for kinds without a create schema.
    pub fn new(kind: EntityKind) -> Option<Self> {
        let schema = kind.schema()?;
        Some(Self {
            kind,
            fields: schema
                .fields
                .iter()
                .map(|field| FormField { field, value: String::new(), error: None })
                .collect(),
            focus: 0,
            pending: false,
        })
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len().max(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn push_char(&mut self, c: char) {
        if self.pending {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
            field.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        if self.pending {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
            field.error = None;
        }
    }

    /// Raw payload keyed by form field names. Validation happens in the
    /// mutation pipeline, not here.
    pub fn payload(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.field.name.to_owned(), Value::String(f.value.clone())))
            .collect()
    }

    pub fn submit(&mut self) -> Option<NetworkRequest> {
        if self.pending {
            return None;
        }
        self.pending = true;
        Some(NetworkRequest::Create { kind: self.kind, payload: self.payload() })
    }

    /// Attach field-level messages and move focus to the first bad field.
    pub fn apply_rejection(&mut self, error: &ValidationError) {
        self.pending = false;
        for field in &mut self.fields {
            field.error = error.issue_for(field.field.name).map(|i| i.message.clone());
        }
        if let Some(idx) = self.fields.iter().position(|f| f.error.is_some()) {
            self.focus = idx;
        }
    }

    /// Returns the toast to show and whether the form should close.
    pub fn settle(&mut self, result: Result<(), &str>) -> (Toast, bool) {
        self.pending = false;
        match result {
            Ok(()) => (Toast::success(self.kind, Operation::Create), true),
            Err(reason) => (Toast::failure(self.kind, Operation::Create, reason), false),
        }
    }
}
