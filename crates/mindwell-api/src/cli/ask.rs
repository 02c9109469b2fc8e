//! `mindwell ask <message>`: one turn, streamed to stdout, no history.

use std::io::Write;

use mindwell_core::chat::session::SessionError;
use mindwell_core::display::DisplaySurface;
use mindwell_types::chat::Role;

use crate::state::AppState;

/// Turns full-replace renders into an append-only byte stream.
///
/// Every render carries the whole reply so far; only the part not yet
/// written goes out. Suitable for pipes, where nothing can be erased.
#[derive(Debug)]
pub struct AppendDisplay<W> {
    out: W,
    written: String,
}

impl<W: Write + Send> AppendDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            written: String::new(),
        }
    }
}

impl<W: Write + Send> DisplaySurface for AppendDisplay<W> {
    fn render(&mut self, role: Role, text: &str, is_new: bool) {
        if role != Role::Assistant || !is_new {
            return;
        }
        let fresh = match text.strip_prefix(self.written.as_str()) {
            Some(rest) => rest,
            // Not an extension of what we printed; start a new line.
            None => {
                let _ = writeln!(self.out);
                text
            }
        };
        let _ = self.out.write_all(fresh.as_bytes());
        let _ = self.out.flush();
        self.written = text.to_string();
    }

    fn notice(&mut self, message: &str) {
        eprintln!("{message}");
    }

    // The error is returned to the caller, which prints it.
    fn report_failure(&mut self, _error: &SessionError) {}
}

pub async fn ask(state: &AppState, message: &str, json: bool) -> anyhow::Result<()> {
    let mut session = state.new_session();

    if json {
        let mut display = AppendDisplay::new(std::io::sink());
        let reply = session.submit(message, &mut display).await?;
        let out = serde_json::json!({
            "session_id": session.id(),
            "model": session.model(),
            "content": reply.content,
            "fragments": reply.fragments,
            "usage": reply.usage,
            "elapsed_ms": reply.elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let mut display = AppendDisplay::new(std::io::stdout());
        session.submit(message, &mut display).await?;
        println!();
    }

    session.close();
    Ok(())
}
