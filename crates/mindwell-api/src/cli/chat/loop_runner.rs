//! Main chat loop orchestration.
//!
//! Opens a session, prints the banner, then reads lines until Ctrl+D or
//! `/exit`. Plain lines and quick prompts become turns; `/voice` goes through
//! speech capture first. The session is closed explicitly on the way out.

use console::style;
use tracing::info;

use mindwell_core::chat::session::{SessionError, SessionManager, TurnOutcome};
use mindwell_core::display::DisplaySurface;
use mindwell_core::sentiment::{LexiconScorer, SentimentLabel, SentimentScorer};
use mindwell_types::wellness::{Mood, QuickPrompt};

use crate::cli::wellness::{mood_card_text, moods_table, quick_prompts_text};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::TerminalDisplay;

/// Run the interactive chat loop until the user leaves.
pub async fn run_chat_loop(state: &AppState, mood: Option<Mood>) -> anyhow::Result<()> {
    let mut session = state.new_session();
    let session_id = session.id().to_string();
    info!(session_id = %session_id, model = session.model(), "Chat session started");

    print_welcome_banner(state.provider.name(), session.model(), &session_id);
    if let Some(mood) = mood {
        println!("{}", mood_card_text(mood));
    }

    let mut display = TerminalDisplay::new();
    let prompt = format!("  {} ", style("You >").green().bold());
    let mut chat_input =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                display.print_block(&format!(
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                ));
                continue;
            }
            InputEvent::Message(text) => text,
        };

        let Some(cmd) = commands::parse(&text) else {
            send(&mut session, &text, &mut display).await;
            continue;
        };

        match cmd {
            ChatCommand::Help => display.print_block(&commands::help_text()),
            ChatCommand::Clear => chat_input.clear(),
            ChatCommand::Exit => break,
            ChatCommand::History => {
                if session.store().is_empty() {
                    display.print_block(&format!("  {}", style("No messages yet.").dim()));
                } else {
                    display.print_block("");
                    let tail = state.config.history.display_tail;
                    session.replay(tail, &mut display);
                    display.print_block("");
                }
            }
            ChatCommand::Mood(mood) => display.print_block(&mood_card_text(mood)),
            ChatCommand::Moods => display.print_block(&moods_table().to_string()),
            ChatCommand::QuickList => display.print_block(&quick_prompts_text()),
            ChatCommand::Quick(prompt) => send_quick(&mut session, prompt, &mut display).await,
            ChatCommand::Voice(clip) => {
                let capture = match state.clip_capture(&clip) {
                    Ok(capture) => capture,
                    Err(e) => {
                        display.notice(e.user_message());
                        continue;
                    }
                };
                display.wait("listening...");
                match session.submit_speech(&capture, &mut display).await {
                    Ok(TurnOutcome::Replied(reply)) => display.finish_reply(&reply, session.model()),
                    Ok(TurnOutcome::CaptureFailed(_)) | Err(_) => display.end_turn(),
                }
            }
            ChatCommand::Sentiment(text) => {
                let score = LexiconScorer.score(&text);
                display.print_block(&format!(
                    "  {} {:+.2} ({})",
                    style("Sentiment:").bold(),
                    score,
                    SentimentLabel::from_score(score)
                ));
            }
            ChatCommand::Invalid(message) => {
                display.print_block(&format!("  {} {message}", style("?").yellow().bold()));
            }
            ChatCommand::Unknown(name) => {
                display.print_block(&format!(
                    "  {} Unknown command: {}. Type /help for available commands.",
                    style("?").yellow().bold(),
                    style(name).dim()
                ));
            }
        }
    }

    drop(chat_input);
    let summary = session.close();
    println!(
        "\n  {} {} replies, {} turns.",
        style("Session ended.").dim(),
        summary.stats.replies,
        summary.turns
    );
    Ok(())
}

async fn send(session: &mut SessionManager, text: &str, display: &mut TerminalDisplay) {
    display.wait("thinking...");
    match session.submit(text, display).await {
        Ok(reply) => display.finish_reply(&reply, session.model()),
        Err(SessionError::EmptyMessage) => display.end_turn(),
        // Reported through the display already.
        Err(SessionError::BackendUnavailable(_)) => display.end_turn(),
    }
}

async fn send_quick(session: &mut SessionManager, prompt: QuickPrompt, display: &mut TerminalDisplay) {
    display.print_block(&format!(
        "  {} {}",
        style(format!("{}:", prompt.label())).green().bold(),
        prompt.message()
    ));
    send(session, prompt.message(), display).await;
}
