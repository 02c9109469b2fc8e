//! Application state shared by the CLI and the HTTP host.
//!
//! `AppState` owns the loaded config, the generation backend, and the map of
//! live HTTP sessions. Every session it creates gets the configured output
//! limit and context window.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use secrecy::SecretString;
use tokio::sync::Mutex;
use uuid::Uuid;

use mindwell_core::chat::session::SessionManager;
use mindwell_core::chat::window::ContextWindow;
use mindwell_core::llm::box_provider::BoxLlmProvider;
use mindwell_core::speech::SpeechPipeline;
use mindwell_infra::config::{load_config, resolve_data_dir};
use mindwell_infra::llm::create_provider;
use mindwell_infra::speech::{HttpTranscriber, WavFileSource};
use mindwell_types::config::{BackendConfig, MindwellConfig};
use mindwell_types::llm::GenerationLimits;
use mindwell_types::speech::SpeechError;

/// A session held by the HTTP host. The mutex is held for a whole turn.
pub type SharedSession = Arc<Mutex<SessionManager>>;

/// Speech capture from a recorded clip, transcribed over HTTP.
pub type ClipCapture = SpeechPipeline<WavFileSource, HttpTranscriber>;

/// Command-line values that take precedence over `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(&self, backend: &mut BackendConfig) {
        if let Some(model) = &self.model {
            backend.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            backend.base_url = base_url.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            backend.max_tokens = max_tokens;
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MindwellConfig>,
    pub data_dir: PathBuf,
    pub provider: Arc<BoxLlmProvider>,
    pub sessions: Arc<DashMap<Uuid, SharedSession>>,
}

impl AppState {
    /// Load config from the data directory, apply overrides, and build the
    /// configured backend.
    pub async fn init(overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = load_config(&data_dir).await;
        overrides.apply(&mut config.backend);

        let provider = create_provider(&config.backend)?;
        Ok(Self::with_provider(config, data_dir, provider))
    }

    pub fn with_provider(config: MindwellConfig, data_dir: PathBuf, provider: BoxLlmProvider) -> Self {
        Self {
            config: Arc::new(config),
            data_dir,
            provider: Arc::new(provider),
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// A fresh session with the configured limits. Not registered anywhere.
    pub fn new_session(&self) -> SessionManager {
        SessionManager::new(Arc::clone(&self.provider))
            .with_limits(GenerationLimits {
                max_tokens: self.config.backend.max_tokens,
            })
            .with_window(ContextWindow::from_setting(self.config.history.context_turns))
    }

    /// Create a session and register it with the HTTP host.
    pub fn open_session(&self) -> (Uuid, SharedSession) {
        let session = self.new_session();
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&shared));
        tracing::info!(session_id = %id, open = self.sessions.len(), "Session opened");
        (id, shared)
    }

    pub fn session(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Speech capture that reads `clip` and sends it to the configured
    /// transcription endpoint.
    pub fn clip_capture(&self, clip: &Path) -> Result<ClipCapture, SpeechError> {
        let speech = &self.config.speech;
        let api_key = self.config.backend.api_key.clone().map(SecretString::from);
        let transcriber = HttpTranscriber::new(speech, api_key)?;
        Ok(SpeechPipeline::new(WavFileSource::new(clip), transcriber)
            .with_listen_timeout(Duration::from_secs(speech.listen_timeout_secs)))
    }
}
