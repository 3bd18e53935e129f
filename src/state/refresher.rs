use crate::state::messages::NetworkRequest;
use arena_api::EntityKind;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;

pub const LIVE_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic live-match refresh: every 30 seconds while the matches tab is
/// on screen. Other lists only reload after a mutation or on request.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    active_kind: watch::Receiver<Option<EntityKind>>,
}

impl PeriodicRefresher {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        active_kind: watch::Receiver<Option<EntityKind>>,
    ) -> Self {
        Self { network_requests, active_kind }
    }

    pub async fn run(self) {
        let mut live_interval = interval(LIVE_REFRESH_INTERVAL);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        live_interval.tick().await;

        loop {
            live_interval.tick().await;
            if *self.active_kind.borrow() != Some(EntityKind::Match) {
                continue;
            }
            if self
                .network_requests
                .send(NetworkRequest::Reload { kind: EntityKind::Match })
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
