//! Request-side context window.
//!
//! The conversation store keeps every turn for the life of the session.
//! `ContextWindow` bounds what is sent to the backend without touching the
//! store.

use mindwell_types::chat::{Role, Turn};

/// Chooses which stored turns go into a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    max_turns: Option<usize>,
}

impl ContextWindow {
    /// Send the full history.
    pub fn unbounded() -> Self {
        Self { max_turns: None }
    }

    /// Send at most the `n` most recent turns (never fewer than one).
    pub fn last(n: usize) -> Self {
        Self {
            max_turns: Some(n.max(1)),
        }
    }

    /// Build from the `history.context_turns` setting, where `0` means
    /// unbounded.
    pub fn from_setting(context_turns: usize) -> Self {
        if context_turns == 0 {
            Self::unbounded()
        } else {
            Self::last(context_turns)
        }
    }

    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }

    /// The slice of `turns` to send.
    ///
    /// A window never opens with an assistant turn: if the cut lands on a
    /// reply, the window advances to the next user turn.
    pub fn select<'a>(&self, turns: &'a [Turn]) -> &'a [Turn] {
        let start = match self.max_turns {
            Some(n) => turns.len().saturating_sub(n),
            None => 0,
        };
        let mut window = &turns[start..];
        while window.len() > 1 && window[0].role == Role::Assistant {
            window = &window[1..];
        }
        window
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::last(40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(pairs: usize) -> Vec<Turn> {
        let mut turns = Vec::new();
        for i in 0..pairs {
            turns.push(Turn::user(format!("u{i}")));
            turns.push(Turn::assistant(format!("a{i}")));
        }
        turns
    }

    #[test]
    fn test_unbounded_sends_everything() {
        let turns = conversation(30);
        assert_eq!(ContextWindow::unbounded().select(&turns).len(), 60);
    }

    #[test]
    fn test_window_keeps_recent_turns() {
        let mut turns = conversation(5);
        turns.push(Turn::user("now"));
        let window = ContextWindow::last(3).select(&turns);
        let contents: Vec<&str> = window.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["u4", "a4", "now"]);
    }

    #[test]
    fn test_window_skips_leading_assistant() {
        let mut turns = conversation(5);
        turns.push(Turn::user("now"));
        let window = ContextWindow::last(4).select(&turns);
        assert_eq!(window[0].role, Role::User);
        assert_eq!(window.len(), 3);
        assert_eq!(window.last().unwrap().content, "now");
    }

    #[test]
    fn test_from_setting_zero_is_unbounded() {
        assert_eq!(ContextWindow::from_setting(0).max_turns(), None);
        assert_eq!(ContextWindow::from_setting(12).max_turns(), Some(12));
    }

    #[test]
    fn test_last_zero_keeps_one() {
        let turns = vec![Turn::user("only")];
        assert_eq!(ContextWindow::last(0).select(&turns).len(), 1);
    }

    #[test]
    fn test_empty_history() {
        assert!(ContextWindow::default().select(&[]).is_empty());
    }
}
