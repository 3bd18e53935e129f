use crate::state::messages::NetworkRequest;
use crate::state::toast::Toast;
use arena_api::{EntityKind, Operation, Record};

/// Delete confirmation for one record.
///
/// `pending` is true from the moment the user confirms until the delete
/// settles. While pending, confirm and cancel are both ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub kind: EntityKind,
    pub record_id: String,
    pub title: String,
    pub open: bool,
    pub pending: bool,
}

impl ConfirmDialog {
    pub fn for_record(record: &Record) -> Self {
        Self {
            kind: record.kind(),
            record_id: record.id().to_owned(),
            title: record.title(),
            open: true,
            pending: false,
        }
    }

    pub fn prompt(&self) -> String {
        format!("Excluir {} \"{}\"? Esta ação não pode ser desfeita.", self.kind, self.title)
    }

    /// Returns the request to send, or `None` while a previous confirm is
    /// still in flight.
    pub fn confirm(&mut self) -> Option<NetworkRequest> {
        if self.pending || !self.open {
            return None;
        }
        self.pending = true;
        Some(NetworkRequest::Delete { kind: self.kind, id: self.record_id.clone() })
    }

    /// Close without deleting. Returns false while pending.
    pub fn cancel(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.open = false;
        true
    }

    /// Success closes the dialog; failure leaves it open so the user can retry.
    pub fn settle(&mut self, result: Result<(), &str>) -> Toast {
        self.pending = false;
        match result {
            Ok(()) => {
                self.open = false;
                Toast::success(self.kind, Operation::Delete)
            }
            Err(reason) => Toast::failure(self.kind, Operation::Delete, reason),
        }
    }

    pub fn matches(&self, kind: EntityKind, id: &str) -> bool {
        self.kind == kind && self.record_id == id
    }
}
