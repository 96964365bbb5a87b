// Status Push Channel
//
// A broadcast of the cluster snapshot is emitted to all subscribers every
// 500 ms as an SSE `status_update` event.

use crate::server::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use futures::StreamExt;
use gridsim_core::application::{ClusterController, ShutdownToken};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

/// Push cadence
pub const PUSH_INTERVAL: Duration = Duration::from_millis(500);

/// Periodically snapshot the cluster and fan out to subscribers.
pub async fn push_loop(
    controller: Arc<ClusterController>,
    updates: broadcast::Sender<serde_json::Value>,
    mut shutdown: ShutdownToken,
) {
    debug!("Status push loop started");
    loop {
        tokio::select! {
            _ = tokio::time::sleep(PUSH_INTERVAL) => {
                if updates.receiver_count() == 0 {
                    continue;
                }
                if let Ok(snapshot) = serde_json::to_value(controller.snapshot()) {
                    let _ = updates.send(snapshot);
                }
            }
            _ = shutdown.wait() => break,
        }
    }
    debug!("Status push loop stopped");
}

/// GET /api/stream - SSE feed of `status_update` events
pub async fn status_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.updates.subscribe();
    let events = BroadcastStream::new(rx).filter_map(|update| async move {
        match update {
            Ok(snapshot) => Some(Ok(Event::default()
                .event("status_update")
                .data(snapshot.to_string()))),
            // Lagged subscribers skip ahead to the next snapshot
            Err(_) => None,
        }
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
