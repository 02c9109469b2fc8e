//! Async line input for the chat loop.
//!
//! `rustyline_async` keeps the prompt editable while other tasks write to the
//! terminal, and reports Ctrl+D and Ctrl+C as events instead of signals.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug)]
pub enum InputEvent {
    /// A non-empty, trimmed line.
    Message(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
    // Keeps the readline output channel open for the life of the loop.
    _writer: SharedWriter,
}

impl ChatInput {
    pub fn new(prompt: String) -> Result<Self, ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok(Self { rl, _writer: writer })
    }

    /// Wait for the next line, skipping blank ones.
    pub async fn read_line(&mut self) -> InputEvent {
        loop {
            match self.rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.rl.add_history_entry(trimmed.to_string());
                    return InputEvent::Message(trimmed.to_string());
                }
                Ok(ReadlineEvent::Eof) => return InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => return InputEvent::Interrupted,
                Err(e) => {
                    tracing::debug!(error = %e, "Readline failed; ending input");
                    return InputEvent::Eof;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
