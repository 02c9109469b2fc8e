//! In-progress assistant response.

/// Collects streamed fragments into the text of one assistant turn.
///
/// Every fragment is followed by a single space, so the accumulated text for
/// `["Take", "a", "deep", "breath."]` is `"Take a deep breath. "`.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    text: String,
    fragments: usize,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return the full text accumulated so far.
    pub fn push(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        self.text.push(' ');
        self.fragments += 1;
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn finish(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_cumulative_text() {
        let mut acc = ResponseAccumulator::new();
        let seen: Vec<String> = ["Take", "a", "deep", "breath."]
            .iter()
            .map(|f| acc.push(f).to_string())
            .collect();
        assert_eq!(
            seen,
            vec!["Take ", "Take a ", "Take a deep ", "Take a deep breath. "]
        );
        assert_eq!(acc.fragment_count(), 4);
        assert_eq!(acc.finish(), "Take a deep breath. ");
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = ResponseAccumulator::new();
        assert_eq!(acc.as_str(), "");
        assert_eq!(acc.fragment_count(), 0);
    }

    #[test]
    fn test_same_fragments_same_result() {
        let fragments = ["I hear", " you", ".", " It's", " okay"];
        let mut first = ResponseAccumulator::new();
        let mut second = ResponseAccumulator::new();
        for f in fragments {
            first.push(f);
        }
        for f in fragments {
            second.push(f);
        }
        assert_eq!(first.finish(), second.finish());
    }

    #[test]
    fn test_fragments_are_not_trimmed() {
        let mut acc = ResponseAccumulator::new();
        acc.push(" leading");
        acc.push("trailing ");
        assert_eq!(acc.as_str(), " leading trailing  ");
    }
}
