use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::dialog::ConfirmDialog;
use crate::state::form::CreateForm;
use crate::state::messages::NetworkRequest;
use arena_api::{EntityKind, Record, ValidationError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    List(EntityKind),
    Help,
}

impl Default for MenuItem {
    fn default() -> Self {
        MenuItem::List(EntityKind::default())
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings, backend: String) -> Self {
        Self { state: AppState::new(backend), settings }
    }

    pub fn active_kind(&self) -> Option<EntityKind> {
        match self.state.active_tab {
            MenuItem::List(kind) => Some(kind),
            MenuItem::Help => None,
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_list_loaded(&mut self, kind: EntityKind, records: Vec<Record>) {
        self.state.page_mut(kind).load(records);
    }

    pub fn on_list_failed(&mut self, kind: EntityKind, message: String) {
        self.state.page_mut(kind).fail(message);
    }

    pub fn on_created(&mut self, kind: EntityKind) {
        self.settle_form(kind, Ok(()));
    }

    pub fn on_create_rejected(&mut self, kind: EntityKind, error: ValidationError) {
        if let Some(form) = self.state.form.as_mut().filter(|f| f.kind == kind) {
            form.apply_rejection(&error);
        }
    }

    pub fn on_create_failed(&mut self, kind: EntityKind, message: &str) {
        self.settle_form(kind, Err(message));
    }

    pub fn on_deleted(&mut self, kind: EntityKind, id: &str) {
        self.settle_dialog(kind, id, Ok(()));
    }

    pub fn on_delete_failed(&mut self, kind: EntityKind, id: &str, message: &str) {
        self.settle_dialog(kind, id, Err(message));
    }

    fn settle_form(&mut self, kind: EntityKind, result: Result<(), &str>) {
        let Some(form) = self.state.form.as_mut().filter(|f| f.kind == kind) else {
            return;
        };
        let (toast, close) = form.settle(result);
        self.state.toasts.push(toast);
        if close {
            self.state.form = None;
        }
    }

    fn settle_dialog(&mut self, kind: EntityKind, id: &str, result: Result<(), &str>) {
        let Some(dialog) = self.state.dialog.as_mut().filter(|d| d.matches(kind, id)) else {
            return;
        };
        let toast = dialog.settle(result);
        self.state.toasts.push(toast);
        if !dialog.open {
            self.state.dialog = None;
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    /// Switch tabs. Returns the kind whose list should be fetched.
    pub fn update_tab(&mut self, next: MenuItem) -> Option<EntityKind> {
        if self.state.active_tab == next || self.state.has_modal() {
            return None;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.active_kind()
    }

    pub fn next_tab(&mut self) -> Option<EntityKind> {
        self.step_tab(1)
    }

    pub fn prev_tab(&mut self) -> Option<EntityKind> {
        self.step_tab(EntityKind::ALL.len() - 1)
    }

    fn step_tab(&mut self, step: usize) -> Option<EntityKind> {
        let current = self.active_kind().unwrap_or_default().index();
        let next = EntityKind::ALL[(current + step) % EntityKind::ALL.len()];
        self.update_tab(MenuItem::List(next))
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // List navigation, delegated to the active ListPage
    // -----------------------------------------------------------------------

    pub fn select_next(&mut self) {
        if let Some(kind) = self.active_kind() {
            self.state.page_mut(kind).select_next();
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(kind) = self.active_kind() {
            self.state.page_mut(kind).select_prev();
        }
    }

    // -----------------------------------------------------------------------
    // Delete confirmation
    // -----------------------------------------------------------------------

    pub fn open_delete_dialog(&mut self) {
        let Some(kind) = self.active_kind() else {
            return;
        };
        let dialog = self.state.page(kind).selected_record().map(ConfirmDialog::for_record);
        if dialog.is_some() {
            self.state.dialog = dialog;
        }
    }

    pub fn confirm_delete(&mut self) -> Option<NetworkRequest> {
        self.state.dialog.as_mut()?.confirm()
    }

    pub fn cancel_dialog(&mut self) {
        if let Some(dialog) = self.state.dialog.as_mut()
            && dialog.cancel()
        {
            self.state.dialog = None;
        }
    }

    // -----------------------------------------------------------------------
    // Create form
    // -----------------------------------------------------------------------

    pub fn open_create_form(&mut self) {
        if let Some(kind) = self.active_kind() {
            self.state.form = CreateForm::new(kind);
        }
    }

    pub fn submit_form(&mut self) -> Option<NetworkRequest> {
        self.state.form.as_mut()?.submit()
    }

    pub fn cancel_form(&mut self) {
        if self.state.form.as_ref().is_some_and(|f| !f.pending) {
            self.state.form = None;
        }
    }

    pub fn tick(&mut self) -> bool {
        self.state.toasts.tick()
    }
}
