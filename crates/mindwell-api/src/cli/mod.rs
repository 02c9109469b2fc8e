//! CLI command definitions for the `mindwell` binary.

pub mod ask;
pub mod chat;
pub mod check;
pub mod wellness;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use mindwell_types::wellness::Mood;

use crate::state::ConfigOverrides;

/// A streaming wellness chat companion backed by a local language model.
#[derive(Parser)]
#[command(name = "mindwell", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "MINDWELL_OTEL")]
    pub otel: bool,

    /// Model to generate with, overriding config.toml.
    #[arg(long, global = true, env = "MINDWELL_MODEL")]
    pub model: Option<String>,

    /// Backend base URL, overriding config.toml.
    #[arg(long, global = true, env = "MINDWELL_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum tokens per reply, overriding config.toml.
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Show the affirmation for this mood before chatting.
        #[arg(long)]
        mood: Option<Mood>,
    },

    /// Send one message and print the reply.
    Ask {
        /// The message to send.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show the daily affirmation and resources for a mood.
    Affirmation {
        /// happy, sad, angry, anxious or tired.
        mood: Mood,
    },

    /// List all moods with their affirmations.
    Moods,

    /// Score the sentiment of some text.
    Sentiment {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Verify the backend is reachable and has the model.
    Check,

    /// Start the HTTP/SSE server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Host address to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::parse_from(["mindwell", "ask", "I", "feel", "anxious", "--max-tokens", "40"]);
        assert_eq!(cli.max_tokens, Some(40));
        match cli.command {
            Commands::Ask { message } => assert_eq!(message.join(" "), "I feel anxious"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_mood_argument() {
        let cli = Cli::parse_from(["mindwell", "affirmation", "Anxious"]);
        assert!(matches!(cli.command, Commands::Affirmation { mood: Mood::Anxious }));
        assert!(Cli::try_parse_from(["mindwell", "affirmation", "bored"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from(["mindwell", "--model", "mistral", "-vv", "check"]);
        assert_eq!(cli.verbose, 2);
        let overrides = cli.overrides();
        assert_eq!(overrides.model.as_deref(), Some("mistral"));
    }
}
