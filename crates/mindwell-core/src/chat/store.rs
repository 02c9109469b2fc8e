//! Append-only conversation log.

use mindwell_types::chat::{Role, Turn};

/// Ordered log of the turns in one session.
///
/// Insertion order is chronological order. Turns are never edited or removed;
/// only the session manager appends (hence the crate-private `append`).
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The last `n` turns in chronological order, or fewer if the log is
    /// shorter.
    pub fn tail(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns produced by `role`.
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> ConversationStore {
        let mut store = ConversationStore::new();
        for i in 0..n {
            if i % 2 == 0 {
                store.append(Turn::user(format!("u{i}")));
            } else {
                store.append(Turn::assistant(format!("a{i}")));
            }
        }
        store
    }

    #[test]
    fn test_append_preserves_order() {
        let store = store_with(4);
        let contents: Vec<&str> = store.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["u0", "a1", "u2", "a3"]);
    }

    #[test]
    fn test_tail_returns_most_recent_in_order() {
        let store = store_with(7);
        let tail = store.tail(3);
        let contents: Vec<&str> = tail.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["u4", "a5", "u6"]);
    }

    #[test]
    fn test_tail_shorter_log() {
        let store = store_with(2);
        assert_eq!(store.tail(5).len(), 2);
        assert!(ConversationStore::new().tail(5).is_empty());
    }

    #[test]
    fn test_tail_zero() {
        let store = store_with(3);
        assert!(store.tail(0).is_empty());
    }

    #[test]
    fn test_tail_does_not_mutate() {
        let store = store_with(6);
        let before = store.turns().to_vec();
        let _ = store.tail(2);
        let _ = store.tail(100);
        assert_eq!(store.turns(), before.as_slice());
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_count_by_role() {
        let store = store_with(5);
        assert_eq!(store.count(Role::User), 3);
        assert_eq!(store.count(Role::Assistant), 2);
    }
}
