//! JSON-RPC-over-SSE transport (spec §4.8).
//!
//! `GET /sse?version=` opens a long-lived stream and registers a per-session
//! sender; `POST /messages?sessionId=` accepts one JSON-RPC request, runs it
//! against that session's [`crate::gateway::ToolSession`], and writes the
//! response back onto the matching stream. The companion-endpoint split
//! (rather than a single bidirectional socket) is the shape the SSE
//! transport itself requires — there is no WebSocket upgrade here.

pub mod rpc;

use crate::gateway::ToolSession;
use crate::http::error::ApiError;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::DashMap;
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Process-wide SSE session registry (spec §5 "Per-session state" — held
/// here at process scope only because many concurrent sessions share one
/// process; each entry's *content* still lives only for its stream).
pub struct SseSessions {
    inner: DashMap<String, (ToolSession, mpsc::UnboundedSender<Event>)>,
}

impl SseSessions {
    pub fn new() -> Self {
        Self { inner: DashMap::new() }
    }

    /// Writes a closing frame to every live session and drops their
    /// senders, closing each stream (spec §6 exit semantics).
    pub fn shutdown(&self) {
        for entry in self.inner.iter() {
            let (_, sender) = entry.value();
            let _ = sender.send(Event::default().event("shutdown").data("server shutting down"));
        }
        self.inner.clear();
    }
}

impl Default for SseSessions {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sse", get(open_stream))
        .route("/messages", post(post_message))
}

#[derive(Debug, Deserialize)]
pub struct OpenQuery {
    version: Option<String>,
}

async fn open_stream(
    State(app_state): State<AppState>,
    Query(q): Query<OpenQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let version = app_state.resolve_version(q.version.as_deref())?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let session = ToolSession::new(app_state.gateway.clone(), version.clone());
    app_state.sse.inner.insert(session_id.clone(), (session, tx.clone()));
    info!(session_id, version, "sse session opened");

    let _ = tx.send(
        Event::default()
            .event("endpoint")
            .data(format!("/messages?sessionId={session_id}")),
    );

    let inner_stream = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);
    let guarded = GuardedStream {
        inner: inner_stream,
        sessions: app_state.sse.clone(),
        session_id,
    };

    Ok(Sse::new(guarded).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// Wraps the event stream so a dropped connection (client disconnect) prunes
/// the session registry entry instead of leaking it (spec §4.8 cancellation).
struct GuardedStream<S> {
    inner: S,
    sessions: std::sync::Arc<SseSessions>,
    session_id: String,
}

impl<S> Drop for GuardedStream<S> {
    fn drop(&mut self) {
        self.sessions.inner.remove(&self.session_id);
        debug!(session_id = %self.session_id, "sse session closed");
    }
}

impl<S: Stream + Unpin> Stream for GuardedStream<S> {
    type Item = S::Item;
    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

async fn post_message(
    State(app_state): State<AppState>,
    Query(q): Query<MessagesQuery>,
    Json(request): Json<rpc::JsonRpcRequest>,
) -> impl IntoResponse {
    let found = app_state
        .sse
        .inner
        .get(&q.session_id)
        .map(|entry| entry.value().clone());
    let Some((session, sender)) = found else {
        warn!(session_id = %q.session_id, "message for unknown sse session");
        return axum::http::StatusCode::NOT_FOUND;
    };
    let response = rpc::handle(&session, request).await;
    let payload = serde_json::to_string(&response).unwrap_or_default();
    let _ = sender.send(Event::default().data(payload));
    axum::http::StatusCode::ACCEPTED
}
