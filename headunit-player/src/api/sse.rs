//! Server-Sent Events subscription endpoint
//!
//! Each SSE connection is one callback registration: the handler registers
//! a channel against the session's registry and forwards events from it to
//! the peer. When the transport notices the peer is gone, the stream drops
//! and its guard performs the matching unregistration; a broadcast that
//! beats the guard to it fails the channel push and the registry prunes
//! the slot itself.

use crate::api::AppContext;
use crate::session::PlayerSession;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Unregisters the subscriber when the connection's stream drops
struct DisconnectGuard {
    session: Arc<PlayerSession>,
    id: Uuid,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        debug!(subscriber = %self.id, "sse client disconnected");
        self.session.unregister_callback(self.id);
    }
}

/// GET /events - SSE event stream
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = ctx.session.register_callback(tx);
    debug!(subscriber = %id, "sse client connected");

    let guard = DisconnectGuard {
        session: Arc::clone(&ctx.session),
        id,
    };

    let stream = async_stream::stream! {
        // owned by the stream so disconnect unregisters the subscriber
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            match Event::default().event(event.event_type()).json_data(&event) {
                Ok(sse_event) => yield Ok(sse_event),
                Err(e) => warn!("failed to serialize event: {}", e),
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
