//! SSE stream of the caller's notification feed.
//!
//! The handler builds a `NotificationFeed` for the authenticated viewer,
//! subscribes it to the event bus, and pushes a frame for every broadcast
//! that is visible to the viewer. Each frame carries the new record plus
//! the refreshed unread count. A heartbeat keeps the connection alive
//! through proxies.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use civicwatch_shared::errors::AppResult;
use civicwatch_shared::types::auth::AuthUser;

use crate::events::NOTIFICATION_ADDED;
use crate::feed::{NotificationFeed, Viewer};
use crate::models::GlobalNotification;
use crate::AppState;

#[derive(Debug, Serialize)]
struct StreamFrame {
    notification: GlobalNotification,
    unread: usize,
}

/// GET /notifications/stream
pub async fn notification_stream(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    let viewer = Viewer {
        state: auth_user.state.clone(),
        lga: auth_user.lga.clone(),
        user_id: Some(auth_user.id.clone()),
    };

    let feed = Arc::new(NotificationFeed::new(state.notifications.clone(), viewer.clone()));
    feed.load();

    let mut rx = state.bus.subscribe();

    info!(user_id = %auth_user.id, state = %viewer.state, lga = %viewer.lga, "SSE client connected");

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let visible = event.notification.visible_to(
                        &viewer.state,
                        &viewer.lga,
                        viewer.user_id.as_deref(),
                    );
                    if !visible {
                        continue;
                    }

                    feed.refresh();
                    let frame = StreamFrame {
                        notification: event.notification,
                        unread: feed.unread(),
                    };
                    match serde_json::to_string(&frame) {
                        Ok(json) => {
                            yield Ok(SseEvent::default()
                                .event(NOTIFICATION_ADDED)
                                .id(event.id)
                                .data(json));
                        }
                        Err(e) => {
                            warn!(error = %e, "failed to serialize SSE frame");
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "SSE subscriber lagged behind the bus");
                    feed.refresh();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}
