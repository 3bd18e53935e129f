use crate::state::messages::{NetworkRequest, NetworkResponse};
use arena_api::{ArenaApi, EntityKind, MutationError, MutationPipeline};
use log::{debug, error};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs every backend call, one request at a time, so a mutation always
/// settles before the list reload it triggers.
pub struct NetworkWorker {
    api: ArenaApi,
    pipeline: MutationPipeline<ArenaApi>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    /// At most one spinner task runs at a time.
    spinner: Option<JoinHandle<()>>,
}

impl NetworkWorker {
    pub fn new(
        api: ArenaApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        let pipeline = MutationPipeline::new(api.clone(), api.registry().clone());
        Self {
            api,
            pipeline,
            requests,
            responses,
            spinner: None,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::LoadList { kind } => self.handle_load_list(kind).await,
                NetworkRequest::Reload { kind } => {
                    self.api.registry().invalidate(kind.tag());
                    self.handle_load_list(kind).await
                }
                NetworkRequest::Create { kind, payload } => self.handle_create(kind, payload).await,
                NetworkRequest::Delete { kind, id } => self.handle_delete(kind, id).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(!response.is_error()).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_list(&self, kind: EntityKind) -> NetworkResponse {
        debug!("loading {kind} list");
        match self.api.fetch_list(kind).await {
            Ok(records) => NetworkResponse::ListLoaded { kind, records },
            Err(e) => NetworkResponse::ListFailed { kind, message: e.to_string() },
        }
    }

    async fn handle_create(&self, kind: EntityKind, payload: Map<String, Value>) -> NetworkResponse {
        match self.pipeline.create(kind, &payload).await {
            Ok(_) => NetworkResponse::Created { kind },
            Err(MutationError::Invalid(error)) => NetworkResponse::CreateRejected { kind, error },
            Err(e) => NetworkResponse::CreateFailed { kind, message: e.to_string() },
        }
    }

    async fn handle_delete(&self, kind: EntityKind, id: String) -> NetworkResponse {
        match self.pipeline.delete(kind, &id).await {
            Ok(_) => NetworkResponse::Deleted { kind, id },
            Err(e) => NetworkResponse::DeleteFailed { kind, id, message: e.to_string() },
        }
    }

    async fn start_loading_animation(&mut self) {
        self.abort_spinner();

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();

        self.spinner = Some(tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        }));
    }

    async fn stop_loading_animation(&mut self, is_ok: bool) {
        self.abort_spinner();
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }

    fn abort_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_api::{ApiConfig, TagRegistry};

    fn worker() -> (NetworkWorker, mpsc::Receiver<NetworkResponse>) {
        let (_requests_tx, requests_rx) = mpsc::channel(1);
        let (responses_tx, responses_rx) = mpsc::channel(256);
        let api = ArenaApi::with_registry(ApiConfig::default(), TagRegistry::new());
        (NetworkWorker::new(api, requests_rx, responses_tx), responses_rx)
    }

    #[tokio::test]
    async fn restarting_the_spinner_replaces_the_old_task() {
        let (mut worker, _responses) = worker();

        worker.start_loading_animation().await;
        let first = worker.spinner.as_ref().map(JoinHandle::abort_handle).unwrap();
        worker.start_loading_animation().await;
        let second = worker.spinner.as_ref().map(JoinHandle::abort_handle).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(first.is_finished());
        assert!(!second.is_finished());

        worker.stop_loading_animation(true).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(worker.spinner.is_none());
        assert!(second.is_finished());
    }

    #[tokio::test]
    async fn stop_reports_the_final_state() {
        let (mut worker, mut responses) = worker();
        worker.start_loading_animation().await;
        worker.stop_loading_animation(false).await;

        let mut last = None;
        while let Ok(response) = responses.try_recv() {
            last = Some(response);
        }
        match last {
            Some(NetworkResponse::LoadingStateChanged { loading_state }) => {
                assert!(!loading_state.is_loading);
                assert_eq!(loading_state.spinner_char, ERROR_CHAR);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
