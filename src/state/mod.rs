pub mod app_settings;
pub mod app_state;
pub mod dialog;
pub mod form;
pub mod list_page;
pub mod messages;
pub mod network;
pub mod refresher;
pub mod toast;
