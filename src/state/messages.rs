use crate::state::network::LoadingState;
use arena_api::{EntityKind, Record, ValidationError};
use crossterm::event::KeyEvent;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Tagged fetch; only goes to the backend when the kind's tag is stale.
    LoadList { kind: EntityKind },
    /// Invalidate the kind's tag, then fetch.
    Reload { kind: EntityKind },
    Create { kind: EntityKind, payload: Map<String, Value> },
    Delete { kind: EntityKind, id: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ListLoaded { kind: EntityKind, records: Vec<Record> },
    ListFailed { kind: EntityKind, message: String },
    Created { kind: EntityKind },
    /// The payload failed its schema; nothing was sent.
    CreateRejected { kind: EntityKind, error: ValidationError },
    CreateFailed { kind: EntityKind, message: String },
    Deleted { kind: EntityKind, id: String },
    DeleteFailed { kind: EntityKind, id: String, message: String },
}

impl NetworkResponse {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            NetworkResponse::ListFailed { .. }
                | NetworkResponse::CreateRejected { .. }
                | NetworkResponse::CreateFailed { .. }
                | NetworkResponse::DeleteFailed { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Tick,
}
