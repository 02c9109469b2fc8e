//! Streaming conversation session manager.
//!
//! `SessionManager` owns one conversation. Each user message goes through the
//! same lifecycle: it is recorded as a user turn, the windowed history is sent
//! to the generation backend, every streamed fragment is folded into a
//! [`ResponseAccumulator`] and the full text so far is handed to the display,
//! and the finished text is recorded as one assistant turn.
//!
//! The store is mutated in exactly two places per turn. A backend failure
//! keeps the user turn and skips the assistant turn.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use mindwell_types::chat::{Role, Turn};
use mindwell_types::llm::{GenerationLimits, GenerationRequest, LlmError, StreamEvent, Usage};
use mindwell_types::speech::SpeechError;

use super::accumulator::ResponseAccumulator;
use super::store::ConversationStore;
use super::window::ContextWindow;
use crate::display::DisplaySurface;
use crate::llm::box_provider::BoxLlmProvider;
use crate::speech::SpeechCapture;

/// Where a session is in the turn lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingInput,
    Recording,
    Generating,
    Rendering,
}

/// Errors that end a turn without a reply.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("The assistant is unavailable right now ({0})")]
    BackendUnavailable(#[from] LlmError),
}

/// A completed assistant reply.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Accumulated text, exactly as recorded in the store.
    pub content: String,
    /// Number of fragments the backend streamed.
    pub fragments: usize,
    pub usage: Option<Usage>,
    pub elapsed: Duration,
}

/// Result of a speech-initiated turn.
#[derive(Debug)]
pub enum TurnOutcome {
    Replied(Reply),
    /// Capture failed; the error was displayed and nothing was recorded.
    CaptureFailed(SpeechError),
}

/// Running counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub replies: u32,
    pub failures: u32,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Snapshot of a session for listings and the close report.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    pub state: SessionState,
    pub turns: usize,
    #[serde(flatten)]
    pub stats: SessionStats,
}

/// Owns one conversation and drives its turns.
pub struct SessionManager {
    id: Uuid,
    started_at: DateTime<Utc>,
    provider: Arc<BoxLlmProvider>,
    store: ConversationStore,
    limits: GenerationLimits,
    window: ContextWindow,
    state: SessionState,
    stats: SessionStats,
}

impl SessionManager {
    pub fn new(provider: Arc<BoxLlmProvider>) -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            provider,
            store: ConversationStore::new(),
            limits: GenerationLimits::default(),
            window: ContextWindow::default(),
            state: SessionState::Idle,
            stats: SessionStats::default(),
        }
    }

    pub fn with_limits(mut self, limits: GenerationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_window(mut self, window: ContextWindow) -> Self {
        self.window = window;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn limits(&self) -> GenerationLimits {
        self.limits
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Run one typed turn.
    ///
    /// On success the reply has already been rendered in full and recorded.
    /// On backend failure the user turn stays recorded, the failure is
    /// reported to `display`, and the error is returned.
    pub async fn submit<D>(&mut self, message: &str, display: &mut D) -> Result<Reply, SessionError>
    where
        D: DisplaySurface + ?Sized,
    {
        if message.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.state != SessionState::Idle {
            warn!(session_id = %self.id, state = ?self.state, "Previous turn did not finish cleanly");
        }
        self.state = SessionState::AwaitingInput;
        let span = self.turn_span();
        self.run_turn(message.to_string(), display).instrument(span).await
    }

    /// Capture speech and, if it yields text, run a turn with it.
    ///
    /// The recognized text is rendered as a new user message before
    /// generation starts. A capture failure, or a blank transcript, shows the
    /// error's user message and leaves the store untouched.
    pub async fn submit_speech<S, D>(
        &mut self,
        capture: &S,
        display: &mut D,
    ) -> Result<TurnOutcome, SessionError>
    where
        S: SpeechCapture,
        D: DisplaySurface + ?Sized,
    {
        self.state = SessionState::Recording;
        let captured = capture.capture().await.and_then(|text| {
            if text.trim().is_empty() {
                Err(SpeechError::Unintelligible)
            } else {
                Ok(text)
            }
        });
        match captured {
            Ok(text) => {
                debug!(session_id = %self.id, chars = text.len(), "Speech captured");
                display.render(Role::User, &text, true);
                self.state = SessionState::AwaitingInput;
                let span = self.turn_span();
                self.run_turn(text, display)
                    .instrument(span)
                    .await
                    .map(TurnOutcome::Replied)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                info!(session_id = %self.id, error = %e, "Speech capture failed");
                display.notice(e.user_message());
                Ok(TurnOutcome::CaptureFailed(e))
            }
        }
    }

    /// Re-render the last `n` turns as history (`is_new = false`).
    pub fn replay<D>(&self, n: usize, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        for turn in self.store.tail(n) {
            display.render(turn.role, &turn.content, false);
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            started_at: self.started_at,
            provider: self.provider.name().to_string(),
            model: self.provider.model().to_string(),
            state: self.state,
            turns: self.store.len(),
            stats: self.stats,
        }
    }

    /// End the session, dropping its conversation.
    pub fn close(self) -> SessionSummary {
        let summary = self.summary();
        info!(
            session_id = %self.id,
            turns = summary.turns,
            replies = summary.stats.replies,
            failures = summary.stats.failures,
            "Session closed"
        );
        summary
    }

    fn turn_span(&self) -> tracing::Span {
        info_span!(
            "gen_ai.chat",
            session_id = %self.id,
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = self.provider.model(),
            gen_ai.request.max_tokens = self.limits.max_tokens,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        )
    }

    async fn run_turn<D>(&mut self, message: String, display: &mut D) -> Result<Reply, SessionError>
    where
        D: DisplaySurface + ?Sized,
    {
        self.store.append(Turn::user(message));
        self.state = SessionState::Generating;

        let request = GenerationRequest {
            model: String::new(),
            messages: self.window.select(self.store.turns()).to_vec(),
            limits: self.limits,
        };
        info!(
            session_id = %self.id,
            model = %self.provider.model(),
            context_turns = request.messages.len(),
            max_tokens = self.limits.max_tokens,
            "Starting turn"
        );

        let started = Instant::now();
        let mut stream = self.provider.stream(request);
        let mut accumulator = ResponseAccumulator::new();
        let mut usage = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(StreamEvent::Fragment { text }) => {
                    self.state = SessionState::Rendering;
                    let so_far = accumulator.push(&text);
                    display.render(Role::Assistant, so_far, true);
                }
                Ok(StreamEvent::Usage(u)) => usage = Some(u),
                Ok(StreamEvent::Done) => break,
                Err(e) => return Err(self.fail(e, accumulator.fragment_count(), display)),
            }
        }

        let fragments = accumulator.fragment_count();
        if fragments == 0 {
            warn!(session_id = %self.id, "Backend produced no output");
        }
        let content = accumulator.finish();
        self.store.append(Turn::assistant(content.clone()));
        self.state = SessionState::Idle;

        self.stats.replies += 1;
        if let Some(u) = &usage {
            self.stats.input_tokens += u.input_tokens;
            self.stats.output_tokens += u.output_tokens;
            let span = tracing::Span::current();
            span.record("gen_ai.usage.input_tokens", u.input_tokens);
            span.record("gen_ai.usage.output_tokens", u.output_tokens);
        }
        let elapsed = started.elapsed();
        info!(
            session_id = %self.id,
            fragments,
            elapsed_ms = elapsed.as_millis() as u64,
            "Turn complete"
        );

        Ok(Reply {
            content,
            fragments,
            usage,
            elapsed,
        })
    }

    fn fail<D>(&mut self, error: LlmError, fragments: usize, display: &mut D) -> SessionError
    where
        D: DisplaySurface + ?Sized,
    {
        self.state = SessionState::Idle;
        self.stats.failures += 1;
        warn!(session_id = %self.id, fragments, error = %error, "Generation failed");
        let error = SessionError::from(error);
        display.report_failure(&error);
        error
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::provider::{EventStream, LlmProvider};

    type Script = Vec<Result<StreamEvent, LlmError>>;

    /// Provider that plays back one script per call and records requests.
    struct ScriptedProvider {
        scripts: Mutex<VecDeque<Script>>,
        requests: Arc<Mutex<Vec<GenerationRequest>>>,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        fn stream(&self, request: GenerationRequest) -> EventStream {
            self.requests.lock().unwrap().push(request);
            let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
            Box::pin(futures_util::stream::iter(script))
        }

        async fn check(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    fn fragments(parts: &[&str]) -> Script {
        let mut script: Script = parts
            .iter()
            .map(|p| Ok(StreamEvent::Fragment { text: p.to_string() }))
            .collect();
        script.push(Ok(StreamEvent::Done));
        script
    }

    fn failure() -> Script {
        vec![Err(LlmError::BackendUnavailable("connection refused".into()))]
    }

    fn manager(scripts: Vec<Script>) -> (SessionManager, Arc<Mutex<Vec<GenerationRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            scripts: Mutex::new(scripts.into()),
            requests: requests.clone(),
        };
        (SessionManager::new(Arc::new(BoxLlmProvider::new(provider))), requests)
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Render(Role, String, bool),
        Notice(String),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Vec<Shown>,
    }

    impl RecordingDisplay {
        fn renders(&self) -> Vec<&str> {
            self.shown
                .iter()
                .filter_map(|s| match s {
                    Shown::Render(_, text, _) => Some(text.as_str()),
                    Shown::Notice(_) => None,
                })
                .collect()
        }

        fn notices(&self) -> Vec<&str> {
            self.shown
                .iter()
                .filter_map(|s| match s {
                    Shown::Notice(text) => Some(text.as_str()),
                    Shown::Render(..) => None,
                })
                .collect()
        }
    }

    impl DisplaySurface for RecordingDisplay {
        fn render(&mut self, role: Role, text: &str, is_new: bool) {
            self.shown.push(Shown::Render(role, text.to_string(), is_new));
        }

        fn notice(&mut self, message: &str) {
            self.shown.push(Shown::Notice(message.to_string()));
        }
    }

    struct FixedCapture(Result<String, SpeechError>);

    impl SpeechCapture for FixedCapture {
        async fn capture(&self) -> Result<String, SpeechError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_streamed_reply_is_rendered_and_recorded() {
        let (mut session, _) = manager(vec![fragments(&["Take", "a", "deep", "breath."])]);
        let mut display = RecordingDisplay::default();

        let reply = session.submit("I feel anxious today", &mut display).await.unwrap();

        assert_eq!(reply.content, "Take a deep breath. ");
        assert_eq!(reply.fragments, 4);
        assert_eq!(
            display.renders(),
            vec!["Take ", "Take a ", "Take a deep ", "Take a deep breath. "]
        );
        assert!(display
            .shown
            .iter()
            .all(|s| matches!(s, Shown::Render(Role::Assistant, _, true))));

        let turns = session.store().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("I feel anxious today"));
        assert_eq!(turns[1], Turn::assistant("Take a deep breath. "));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_user_turn() {
        let (mut session, _) = manager(vec![failure()]);
        let mut display = RecordingDisplay::default();

        let err = session.submit("Hello", &mut display).await.unwrap_err();

        assert!(matches!(err, SessionError::BackendUnavailable(_)));
        assert_eq!(session.store().turns(), &[Turn::user("Hello")]);
        assert_eq!(display.notices().len(), 1);
        assert_eq!(session.stats().failures, 1);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_failure_mid_stream_discards_partial_reply() {
        let mut script = vec![
            Ok(StreamEvent::Fragment { text: "Try".into() }),
            Ok(StreamEvent::Fragment { text: "to".into() }),
        ];
        script.extend(failure());
        let (mut session, _) = manager(vec![script]);
        let mut display = RecordingDisplay::default();

        assert!(session.submit("Hello", &mut display).await.is_err());
        assert_eq!(session.store().len(), 1);
        assert_eq!(display.renders(), vec!["Try ", "Try to "]);
    }

    #[tokio::test]
    async fn test_speech_timeout_records_nothing() {
        let (mut session, requests) = manager(vec![]);
        let mut display = RecordingDisplay::default();

        let outcome = session
            .submit_speech(&FixedCapture(Err(SpeechError::TimedOut)), &mut display)
            .await
            .unwrap();

        assert!(matches!(outcome, TurnOutcome::CaptureFailed(SpeechError::TimedOut)));
        assert!(session.store().is_empty());
        assert!(requests.lock().unwrap().is_empty());
        assert_eq!(display.shown, vec![Shown::Notice("Listening timed out. Please try again.".into())]);
    }

    #[tokio::test]
    async fn test_every_capture_error_records_nothing() {
        let cases = [
            (SpeechError::Unintelligible, "Sorry, I couldn't understand that."),
            (
                SpeechError::ServiceUnreachable("connection refused".into()),
                "Could not request results, please check your connection.",
            ),
            (SpeechError::TimedOut, "Listening timed out. Please try again."),
        ];
        for (error, message) in cases {
            let (mut session, requests) = manager(vec![]);
            let mut display = RecordingDisplay::default();

            let outcome = session
                .submit_speech(&FixedCapture(Err(error.clone())), &mut display)
                .await
                .unwrap();

            assert!(matches!(outcome, TurnOutcome::CaptureFailed(ref e) if *e == error));
            assert!(session.store().is_empty());
            assert!(requests.lock().unwrap().is_empty());
            assert_eq!(display.shown, vec![Shown::Notice(message.into())]);
            assert_eq!(session.state(), SessionState::Idle);
        }
    }

    #[tokio::test]
    async fn test_blank_transcript_is_unintelligible() {
        let (mut session, requests) = manager(vec![fragments(&["unused"])]);
        let mut display = RecordingDisplay::default();

        let outcome = session
            .submit_speech(&FixedCapture(Ok("   ".into())), &mut display)
            .await
            .unwrap();

        assert!(matches!(outcome, TurnOutcome::CaptureFailed(SpeechError::Unintelligible)));
        assert!(session.store().is_empty());
        assert!(requests.lock().unwrap().is_empty());
        assert_eq!(
            display.shown,
            vec![Shown::Notice("Sorry, I couldn't understand that.".into())]
        );
    }

    #[tokio::test]
    async fn test_speech_success_runs_turn() {
        let (mut session, _) = manager(vec![fragments(&["You", "are", "not", "alone."])]);
        let mut display = RecordingDisplay::default();

        let outcome = session
            .submit_speech(&FixedCapture(Ok("I feel lonely".into())), &mut display)
            .await
            .unwrap();

        let TurnOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(reply.content, "You are not alone. ");
        assert_eq!(display.shown[0], Shown::Render(Role::User, "I feel lonely".into(), true));
        assert_eq!(session.store().turns()[0], Turn::user("I feel lonely"));
        assert_eq!(session.store().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let (mut session, requests) = manager(vec![]);
        let mut display = RecordingDisplay::default();

        let err = session.submit("   ", &mut display).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyMessage));
        assert!(session.store().is_empty());
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_turn_count_tracks_successes_and_failures() {
        let outcomes = [true, false, true, true, false, false, true];
        let scripts = outcomes
            .iter()
            .map(|ok| if *ok { fragments(&["ok"]) } else { failure() })
            .collect();
        let (mut session, _) = manager(scripts);
        let mut display = RecordingDisplay::default();

        for (i, _) in outcomes.iter().enumerate() {
            let _ = session.submit(&format!("message {i}"), &mut display).await;
        }

        let successes = outcomes.iter().filter(|ok| **ok).count();
        let failures = outcomes.len() - successes;
        assert_eq!(session.store().len(), 2 * successes + failures);
        assert_eq!(session.store().count(Role::Assistant), successes);
        assert_eq!(session.stats().replies as usize, successes);
    }

    #[tokio::test]
    async fn test_request_carries_history_and_limits() {
        let (session, requests) = manager(vec![fragments(&["Hi"]), fragments(&["Sure"])]);
        let mut session = session.with_limits(GenerationLimits { max_tokens: 32 });
        let mut display = RecordingDisplay::default();

        session.submit("Hello", &mut display).await.unwrap();
        session.submit("Help me relax", &mut display).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages, vec![Turn::user("Hello")]);
        assert_eq!(
            requests[1].messages,
            vec![
                Turn::user("Hello"),
                Turn::assistant("Hi "),
                Turn::user("Help me relax")
            ]
        );
        assert_eq!(requests[1].limits.max_tokens, 32);
    }

    #[tokio::test]
    async fn test_window_bounds_request_not_store() {
        let scripts = (0..4).map(|_| fragments(&["ok"])).collect();
        let (session, requests) = manager(scripts);
        let mut session = session.with_window(ContextWindow::last(3));
        let mut display = RecordingDisplay::default();

        for i in 0..4 {
            session.submit(&format!("m{i}"), &mut display).await.unwrap();
        }

        assert_eq!(session.store().len(), 8);
        let last = requests.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.messages.len(), 3);
        assert_eq!(last.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_empty_stream_still_records_reply() {
        let (mut session, _) = manager(vec![vec![Ok(StreamEvent::Done)]]);
        let mut display = RecordingDisplay::default();

        let reply = session.submit("Hello", &mut display).await.unwrap();
        assert_eq!(reply.content, "");
        assert_eq!(session.store().len(), 2);
        assert!(display.renders().is_empty());
    }

    #[tokio::test]
    async fn test_usage_is_totalled() {
        let script = vec![
            Ok(StreamEvent::Fragment { text: "Hi".into() }),
            Ok(StreamEvent::Usage(Usage {
                input_tokens: 12,
                output_tokens: 3,
            })),
            Ok(StreamEvent::Done),
        ];
        let (mut session, _) = manager(vec![script]);
        let mut display = RecordingDisplay::default();

        let reply = session.submit("Hello", &mut display).await.unwrap();
        assert_eq!(reply.usage.map(|u| u.output_tokens), Some(3));
        assert_eq!(session.stats().input_tokens, 12);
    }

    #[tokio::test]
    async fn test_replay_marks_history() {
        let (mut session, _) = manager(vec![fragments(&["One"]), fragments(&["Two"])]);
        let mut display = RecordingDisplay::default();
        session.submit("first", &mut display).await.unwrap();
        session.submit("second", &mut display).await.unwrap();

        let mut history = RecordingDisplay::default();
        session.replay(3, &mut history);
        assert_eq!(
            history.shown,
            vec![
                Shown::Render(Role::Assistant, "One ".into(), false),
                Shown::Render(Role::User, "second".into(), false),
                Shown::Render(Role::Assistant, "Two ".into(), false),
            ]
        );
        assert_eq!(session.store().len(), 4);
    }

    /// Yields the same fragments with a per-fragment delay.
    struct PacedProvider {
        parts: Vec<&'static str>,
        delays_ms: Vec<u64>,
    }

    impl LlmProvider for PacedProvider {
        fn name(&self) -> &str {
            "paced"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        fn stream(&self, _request: GenerationRequest) -> EventStream {
            let parts = self.parts.clone();
            let delays = self.delays_ms.clone();
            Box::pin(async_stream::stream! {
                for (part, delay) in parts.into_iter().zip(delays) {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    yield Ok::<_, LlmError>(StreamEvent::Fragment { text: part.to_string() });
                }
                yield Ok::<_, LlmError>(StreamEvent::Done);
            })
        }

        async fn check(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_timing_does_not_change_reply() {
        let parts = vec!["Breathe", "in,", "breathe", "out."];
        let mut finals = Vec::new();
        for delays_ms in [vec![0, 0, 0, 0], vec![500, 5, 1200, 40], vec![3000, 0, 0, 900]] {
            let provider = PacedProvider {
                parts: parts.clone(),
                delays_ms,
            };
            let mut session = SessionManager::new(Arc::new(BoxLlmProvider::new(provider)));
            let mut display = RecordingDisplay::default();
            let reply = session.submit("Hello", &mut display).await.unwrap();
            assert_eq!(display.renders().last().copied(), Some(reply.content.as_str()));
            finals.push(reply.content);
        }
        assert!(finals.iter().all(|f| f == "Breathe in, breathe out. "));
    }

    #[tokio::test]
    async fn test_close_summarizes() {
        let (mut session, _) = manager(vec![fragments(&["Hi"]), failure()]);
        let mut display = RecordingDisplay::default();
        session.submit("a", &mut display).await.unwrap();
        let _ = session.submit("b", &mut display).await;

        let summary = session.close();
        assert_eq!(summary.turns, 3);
        assert_eq!(summary.stats.replies, 1);
        assert_eq!(summary.stats.failures, 1);
        assert_eq!(summary.model, "test-model");
    }
}
