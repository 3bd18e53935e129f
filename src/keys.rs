use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use arena_api::EntityKind;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    active_kind: &watch::Sender<Option<EntityKind>>,
) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    // The create form captures all typing.
    if guard.state.form.is_some() {
        let request = match key_event.code {
            KeyCode::Esc => {
                guard.cancel_form();
                None
            }
            KeyCode::Enter => guard.submit_form(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = guard.state.form.as_mut() {
                    form.focus_next();
                }
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = guard.state.form.as_mut() {
                    form.focus_prev();
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(form) = guard.state.form.as_mut() {
                    form.pop_char();
                }
                None
            }
            Char(c) => {
                if let Some(form) = guard.state.form.as_mut() {
                    form.push_char(c);
                }
                None
            }
            _ => None,
        };
        drop(guard);
        send(network_requests, request).await;
        return;
    }

    if guard.state.dialog.is_some() {
        let request = match key_event.code {
            KeyCode::Enter | Char('y') | Char('s') => guard.confirm_delete(),
            KeyCode::Esc | Char('n') => {
                guard.cancel_dialog();
                None
            }
            _ => None,
        };
        drop(guard);
        send(network_requests, request).await;
        return;
    }

    let mut load = None;
    let mut request = None;

    match (guard.state.active_tab, key_event.code) {
        // Quit
        (_, Char('q')) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char(c @ '1'..='9')) => {
            let idx = c as usize - '1' as usize;
            load = guard.update_tab(MenuItem::List(EntityKind::ALL[idx]));
        }
        (_, KeyCode::Tab | Char('l') | KeyCode::Right) => load = guard.next_tab(),
        (_, KeyCode::BackTab | Char('h') | KeyCode::Left) => load = guard.prev_tab(),
        (_, Char('?')) => {
            guard.update_tab(MenuItem::Help);
        }
        (MenuItem::Help, KeyCode::Esc) => guard.exit_help(),

        // List navigation
        (MenuItem::List(_), Char('j') | KeyCode::Down) => guard.select_next(),
        (MenuItem::List(_), Char('k') | KeyCode::Up) => guard.select_prev(),
        (MenuItem::List(_), Char('n')) => guard.open_create_form(),
        (MenuItem::List(_), Char('d') | KeyCode::Delete) => guard.open_delete_dialog(),
        (MenuItem::List(kind), Char('r')) => request = Some(NetworkRequest::Reload { kind }),

        // Global
        (_, Char('f')) => guard.toggle_full_screen(),
        (_, Char('"')) => guard.toggle_show_logs(),

        _ => {}
    }

    let _ = active_kind.send(guard.active_kind());
    drop(guard);

    if let Some(kind) = load {
        request = Some(NetworkRequest::LoadList { kind });
    }
    send(network_requests, request).await;
}

async fn send(network_requests: &mpsc::Sender<NetworkRequest>, request: Option<NetworkRequest>) {
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}
