//! Terminal rendering for the chat loop.
//!
//! A streamed reply is drawn as a live block that is erased and redrawn with
//! the full text on every fragment, so the screen always shows exactly the
//! latest accumulated text. When the reply completes, the block is redrawn
//! once more as formatted markdown via `termimad`.
//!
//! The line editor keeps the terminal in raw mode, so everything here ends
//! lines with `\r\n`.

use std::io::{self, Write};
use std::time::Duration;

use console::{measure_text_width, style};
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use indicatif::{ProgressBar, ProgressStyle};
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use mindwell_core::chat::session::{Reply, SessionError};
use mindwell_core::display::DisplaySurface;
use mindwell_types::chat::Role;

/// Markdown formatting for finished replies.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    pub fn render_markdown(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string().trim_end().to_string()
    }

    /// Format: "| {tokens} tokens · {time}s · {model}"
    pub fn stats_footer(reply: &Reply, model: &str) -> String {
        let tokens = reply
            .usage
            .as_ref()
            .map(|u| u.output_tokens as usize)
            .unwrap_or(reply.fragments);
        format!(
            "  {} {} tokens {} {:.1}s {} {}",
            style("|").dim(),
            style(tokens).dim(),
            style("\u{00b7}").dim(),
            style(reply.elapsed.as_secs_f64()).dim(),
            style("\u{00b7}").dim(),
            style(model).dim(),
        )
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// [`DisplaySurface`] for an interactive terminal.
pub struct TerminalDisplay {
    renderer: ChatRenderer,
    spinner: Option<ProgressBar>,
    /// Terminal rows taken by the live reply block; 0 when none is open.
    live_rows: usize,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            renderer: ChatRenderer::new(),
            spinner: None,
            live_rows: 0,
        }
    }

    /// Show a spinner until the next render or notice.
    pub fn wait(&mut self, message: &'static str) {
        self.stop_spinner();
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Redraw the finished reply as markdown and print its stats footer.
    pub fn finish_reply(&mut self, reply: &Reply, model: &str) {
        self.stop_spinner();
        if self.live_rows > 0 {
            let formatted = self.renderer.render_markdown(&reply.content);
            self.redraw_live(&formatted);
        }
        self.live_rows = 0;
        self.print_block(&format!("\n{}\n", ChatRenderer::stats_footer(reply, model)));
    }

    /// Close any open live block without a reply.
    pub fn end_turn(&mut self) {
        self.stop_spinner();
        if self.live_rows > 0 {
            self.print_block("");
            self.live_rows = 0;
        }
    }

    /// Print text outside of any live block.
    pub fn print_block(&mut self, text: &str) {
        self.stop_spinner();
        let mut out = io::stdout();
        let _ = write!(out, "{}\r\n", text.replace('\n', "\r\n"));
        let _ = out.flush();
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn redraw_live(&mut self, body: &str) {
        if let Err(e) = self.try_redraw_live(body) {
            tracing::debug!(error = %e, "Terminal redraw failed");
        }
    }

    fn try_redraw_live(&mut self, body: &str) -> io::Result<()> {
        let mut out = io::stdout();
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);

        if self.live_rows == 0 {
            queue!(out, Print("\r\n"))?;
        } else {
            if self.live_rows > 1 {
                queue!(out, MoveUp((self.live_rows - 1) as u16))?;
            }
            queue!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        }

        let block = reply_block(body);
        queue!(out, Print(block.replace('\n', "\r\n")))?;
        out.flush()?;

        self.live_rows = rows_for(&block, width);
        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for TerminalDisplay {
    fn render(&mut self, role: Role, text: &str, is_new: bool) {
        self.stop_spinner();
        match (role, is_new) {
            (Role::Assistant, true) => self.redraw_live(text),
            // A transcribed voice message; generation starts next.
            (Role::User, true) => {
                self.print_block(&format!("  {} {}", style("You said:").green().bold(), text));
                self.wait("thinking...");
            }
            (role, false) => self.print_block(&history_line(role, text)),
        }
    }

    fn notice(&mut self, message: &str) {
        self.print_block(&format!("  {} {message}", style("!").yellow().bold()));
    }

    fn report_failure(&mut self, error: &SessionError) {
        self.end_turn();
        self.print_block(&format!("\n  {} {error}", style("!").red().bold()));
        self.print_block(&format!(
            "  {}\n",
            style("Type a message to retry, /exit to quit.").dim()
        ));
    }
}

/// One replayed turn, e.g. "👤 User: I feel anxious today".
fn history_line(role: Role, text: &str) -> String {
    let label = format!("{} {}:", role.icon(), role.label());
    let label = match role {
        Role::User => style(label).green().bold(),
        Role::Assistant => style(label).cyan().bold(),
    };
    format!("  {label} {}", style(text.trim_end()).dim())
}

fn reply_block(body: &str) -> String {
    let mut block = format!(
        "  {}",
        style(format!("{} Mindwell", Role::Assistant.icon())).cyan().bold()
    );
    for line in body.lines() {
        block.push_str("\n  ");
        block.push_str(line);
    }
    block
}

/// Rows `block` occupies once the terminal wraps it at `width` columns.
fn rows_for(block: &str, width: usize) -> usize {
    let width = width.max(1);
    block
        .split('\n')
        .map(|line| measure_text_width(line).div_ceil(width).max(1))
        .sum()
}
