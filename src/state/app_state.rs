use crate::app::MenuItem;
use crate::state::dialog::ConfirmDialog;
use crate::state::form::CreateForm;
use crate::state::list_page::ListPage;
use crate::state::toast::ToastQueue;
use arena_api::EntityKind;

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// Base URL shown in the header.
    pub backend: String,
    /// One page per entity kind, indexed by [`EntityKind::index`].
    pub pages: Vec<ListPage>,
    pub dialog: Option<ConfirmDialog>,
    pub form: Option<CreateForm>,
    pub toasts: ToastQueue,
}

impl AppState {
    pub fn new(backend: String) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            backend,
            pages: EntityKind::ALL.into_iter().map(ListPage::new).collect(),
            dialog: None,
            form: None,
            toasts: ToastQueue::default(),
        }
    }

    pub fn page(&self, kind: EntityKind) -> &ListPage {
        &self.pages[kind.index()]
    }

    pub fn page_mut(&mut self, kind: EntityKind) -> &mut ListPage {
        &mut self.pages[kind.index()]
    }

    /// True while a dialog or form owns the keyboard.
    pub fn has_modal(&self) -> bool {
        self.dialog.as_ref().is_some_and(|d| d.open) || self.form.is_some()
    }
}
