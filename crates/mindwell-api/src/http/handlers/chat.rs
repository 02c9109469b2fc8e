//! SSE chat streaming handler.
//!
//! POST /api/v1/sessions/{id}/messages runs one turn and streams it back as
//! Server-Sent Events:
//!
//! - `render`: `{role, text, is_new}`, the full text of a message so far
//! - `notice`: informational line
//! - `error`: the turn failed; the user message stays recorded
//! - `done`: always last
//!
//! The turn runs on its own task holding the session lock, so a client that
//! disconnects mid-stream does not cancel generation.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::{OwnedMutexGuard, mpsc};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, trace};
use uuid::Uuid;

use mindwell_core::chat::session::{Reply, SessionError, SessionManager};
use mindwell_core::display::DisplaySurface;
use mindwell_types::chat::Role;
use mindwell_types::llm::Usage;
use mindwell_types::wellness::QuickPrompt;

use crate::http::error::AppError;
use crate::http::handlers::session::find_session;
use crate::state::{AppState, SharedSession};

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// 1-based quick prompt, used when `message` is absent.
    #[serde(default)]
    pub quick: Option<usize>,
}

impl MessageRequest {
    fn into_text(self) -> Result<String, AppError> {
        if let Some(message) = self.message.filter(|m| !m.trim().is_empty()) {
            return Ok(message);
        }
        match self.quick {
            Some(index) => QuickPrompt::from_index(index)
                .map(|prompt| prompt.message().to_string())
                .ok_or_else(|| AppError::Validation(format!("No quick prompt #{index}"))),
            None => Err(AppError::Validation("message must not be empty".to_string())),
        }
    }
}

/// Final event of a turn.
#[derive(Debug, Serialize)]
pub struct TurnDone {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub fragments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub elapsed_ms: u64,
    /// Turns recorded in the session after this one.
    pub turns: usize,
}

impl TurnDone {
    fn replied(reply: Reply, turns: usize) -> Self {
        Self {
            ok: true,
            fragments: reply.fragments,
            usage: reply.usage,
            elapsed_ms: reply.elapsed.as_millis() as u64,
            content: Some(reply.content),
            turns,
        }
    }

    fn failed(turns: usize) -> Self {
        Self {
            ok: false,
            content: None,
            fragments: 0,
            usage: None,
            elapsed_ms: 0,
            turns,
        }
    }
}

#[derive(Debug)]
pub enum DisplayEvent {
    Render { role: Role, text: String, is_new: bool },
    Notice(String),
    Error(String),
    Done(TurnDone),
}

impl DisplayEvent {
    fn into_sse(self) -> Event {
        let (name, data) = match self {
            DisplayEvent::Render { role, text, is_new } => {
                ("render", json!({ "role": role, "text": text, "is_new": is_new }))
            }
            DisplayEvent::Notice(message) => ("notice", json!({ "message": message })),
            DisplayEvent::Error(message) => ("error", json!({ "message": message })),
            DisplayEvent::Done(done) => ("done", json!(done)),
        };
        Event::default().event(name).data(data.to_string())
    }
}

/// Display surface that forwards everything to an SSE response.
pub struct ChannelDisplay {
    tx: mpsc::UnboundedSender<DisplayEvent>,
}

impl ChannelDisplay {
    pub fn new(tx: mpsc::UnboundedSender<DisplayEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: DisplayEvent) {
        if self.tx.send(event).is_err() {
            trace!("SSE client disconnected; dropping display event");
        }
    }
}

impl DisplaySurface for ChannelDisplay {
    fn render(&mut self, role: Role, text: &str, is_new: bool) {
        self.send(DisplayEvent::Render {
            role,
            text: text.to_string(),
            is_new,
        });
    }

    fn notice(&mut self, message: &str) {
        self.send(DisplayEvent::Notice(message.to_string()));
    }

    fn report_failure(&mut self, error: &SessionError) {
        self.send(DisplayEvent::Error(error.to_string()));
    }
}

/// POST /api/v1/sessions/{id}/messages - Run a turn, streamed as SSE.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let (id, session) = find_session(&state, &id)?;
    let message = body.into_text()?;
    let guard = lock_for_turn(&state, id, session)?;

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_turn(guard, message, ChannelDisplay::new(tx)));

    let stream =
        UnboundedReceiverStream::new(rx).map(|event| Ok::<_, Infallible>(event.into_sse()));
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// Take the session for one turn.
///
/// A DELETE may unregister the session between lookup and locking; the
/// registration is checked again once the lock is held.
fn lock_for_turn(
    state: &AppState,
    id: Uuid,
    session: SharedSession,
) -> Result<OwnedMutexGuard<SessionManager>, AppError> {
    let guard = session
        .try_lock_owned()
        .map_err(|_| AppError::SessionBusy(id))?;
    if !state.sessions.contains_key(&id) {
        return Err(AppError::SessionNotFound(id));
    }
    Ok(guard)
}

async fn run_turn(
    mut session: OwnedMutexGuard<SessionManager>,
    message: String,
    mut display: ChannelDisplay,
) {
    let done = match session.submit(&message, &mut display).await {
        Ok(reply) => TurnDone::replied(reply, session.store().len()),
        Err(SessionError::EmptyMessage) => {
            display.send(DisplayEvent::Error(SessionError::EmptyMessage.to_string()));
            TurnDone::failed(session.store().len())
        }
        // Already reported through the display.
        Err(e) => {
            debug!(session_id = %session.id(), error = %e, "Turn failed");
            TurnDone::failed(session.store().len())
        }
    };
    display.send(DisplayEvent::Done(done));
}
