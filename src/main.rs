mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use arena_api::{ApiConfig, ArenaApi, EntityKind};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info, warn};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

const TICK_INTERVAL: Duration = Duration::from_millis(80);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    // Bad configuration is reported before the terminal is taken over.
    let config = ApiConfig::from_env()?;
    let settings = AppSettings::load();

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(settings.effective_log_level())?;
    tui_logger::set_default_level(settings.effective_log_level());
    info!("using backend {} (timeout {:?})", config.base_url, config.timeout);

    let backend_url = config.base_url.clone();
    let api = ArenaApi::new(config);
    let app = Arc::new(Mutex::new(App::new(settings, backend_url)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (active_kind_tx, active_kind_rx) = watch::channel(Some(EntityKind::default()));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(api, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Live match refresh thread
    let refresher = PeriodicRefresher::new(network_req_tx.clone(), active_kind_rx);
    let refresh_task = tokio::spawn(refresher.run());

    // Spinner and toast expiry
    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx, active_kind_tx).await;

    input_handler.abort();
    network_task.abort();
    refresh_task.abort();
    tick_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("arena-admin {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "arena-admin - terminal admin for the competition backend

Usage:
  arena-admin
  arena-admin --help
  arena-admin --version

Environment:
  ARENA_API_URL            Backend base URL (default http://localhost:3333)
  ARENA_API_TIMEOUT_SECS   Per-request timeout in seconds (default 10)
  ARENA_LOG                Log level for the log pane (default info)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    active_kind: watch::Sender<Option<EntityKind>>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, &network_requests, &active_kind).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    active_kind: &watch::Sender<Option<EntityKind>>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let kind = app.lock().await.active_kind().unwrap_or_default();
            let _ = network_requests.send(NetworkRequest::LoadList { kind }).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests, active_kind).await;
            true
        }
        UiEvent::Resize => true,
        // Only redraw on ticks that expired a toast.
        UiEvent::Tick => app.lock().await.tick(),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    let mut guard = app.lock().await;
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::ListLoaded { kind, records } => guard.on_list_loaded(kind, records),
        NetworkResponse::ListFailed { kind, message } => {
            warn!("failed to load {kind} list: {message}");
            guard.on_list_failed(kind, message);
        }
        NetworkResponse::Created { kind } => {
            guard.on_created(kind);
            drop(guard);
            // The tag was invalidated, so this reload goes to the backend.
            let _ = network_requests.send(NetworkRequest::LoadList { kind }).await;
        }
        NetworkResponse::CreateRejected { kind, error } => guard.on_create_rejected(kind, error),
        NetworkResponse::CreateFailed { kind, message } => {
            error!("create {kind} failed: {message}");
            guard.on_create_failed(kind, &message);
        }
        NetworkResponse::Deleted { kind, id } => {
            guard.on_deleted(kind, &id);
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadList { kind }).await;
        }
        NetworkResponse::DeleteFailed { kind, id, message } => {
            error!("delete {kind} {id} failed: {message}");
            guard.on_delete_failed(kind, &id, &message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
