//! Bounded scrollback of rendered passages.

use serde::{Deserialize, Serialize};

use super::passage::Passage;

/// Ordered passages, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassageLog {
    passages: Vec<Passage>,
}

impl PassageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished passage.
    pub fn append(&mut self, passage: Passage) {
        self.passages.push(passage);
    }

    /// Drop the oldest passages until at most `max_history` remain.
    /// Returns how many were evicted.
    pub fn trim_to(&mut self, max_history: usize) -> usize {
        let excess = self.passages.len().saturating_sub(max_history);
        if excess > 0 {
            self.passages.drain(..excess);
        }
        excess
    }

    /// All passages, oldest first.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// The newest passage.
    pub fn latest(&self) -> Option<&Passage> {
        self.passages.last()
    }

    /// Number of passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PassageBuilder;
    use proptest::prelude::*;

    fn numbered(n: usize) -> Passage {
        let mut b = PassageBuilder::new();
        b.emit_raw(format!("passage {n}"), None);
        b.finish()
    }

    fn label(p: &Passage) -> String {
        match &p.elements()[0] {
            crate::output::OutputElement::RawMarkup { content, .. } => content.clone(),
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn empty_log() {
        let log = PassageLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn trim_keeps_newest() {
        let mut log = PassageLog::new();
        for i in 0..5 {
            log.append(numbered(i));
        }
        assert_eq!(log.trim_to(3), 2);
        let labels: Vec<_> = log.passages().iter().map(label).collect();
        assert_eq!(labels, vec!["passage 2", "passage 3", "passage 4"]);
    }

    #[test]
    fn trim_under_capacity_is_noop() {
        let mut log = PassageLog::new();
        log.append(numbered(0));
        assert_eq!(log.trim_to(10), 0);
        assert_eq!(log.len(), 1);
    }

    proptest! {
        #[test]
        fn trim_retains_last_n(n in 1usize..20, k in 0usize..20) {
            let mut log = PassageLog::new();
            for i in 0..n + k {
                log.append(numbered(i));
            }
            log.trim_to(n);
            prop_assert_eq!(log.len(), n);
            for (offset, p) in log.passages().iter().enumerate() {
                prop_assert_eq!(label(p), format!("passage {}", k + offset));
            }
        }
    }
}
