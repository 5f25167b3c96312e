//! Passages and the builder that records them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::element::{LocalId, OutputElement, Target};
use crate::continuation::Continuation;

/// Everything one passage function emitted, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    elements: Vec<OutputElement>,
}

impl Passage {
    /// Build a passage from already-recorded elements.
    pub fn from_elements(elements: Vec<OutputElement>) -> Self {
        Self { elements }
    }

    /// Elements in emission order.
    pub fn elements(&self) -> &[OutputElement] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the passage emitted nothing.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// When the passage ran, if it carries a timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.elements.iter().find_map(|e| match e {
            OutputElement::Timestamp { moment, .. } => Some(*moment),
            _ => None,
        })
    }

    /// Continuations set up by this passage, in emission order.
    pub fn continuations(&self) -> impl Iterator<Item = &Continuation> {
        self.elements.iter().filter_map(|e| match e {
            OutputElement::ContinuationSlot { continuation, .. } => Some(continuation),
            _ => None,
        })
    }
}

/// Records output for the passage currently being run.
///
/// Emission never touches the display surface; the finished [`Passage`] is
/// rendered afterwards.
#[derive(Debug, Default)]
pub struct PassageBuilder {
    elements: Vec<OutputElement>,
    next_local: u32,
}

impl PassageBuilder {
    /// Open an empty passage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append markup inserted verbatim.
    pub fn emit_raw(&mut self, markup: impl Into<String>, target: Target) {
        self.elements.push(OutputElement::RawMarkup {
            content: markup.into(),
            target,
        });
    }

    /// Append a timestamp for the current moment.
    pub fn emit_timestamp(&mut self, target: Target) {
        self.emit_timestamp_at(Utc::now(), target);
    }

    /// Append a timestamp for a given moment.
    pub fn emit_timestamp_at(&mut self, moment: DateTime<Utc>, target: Target) {
        self.elements.push(OutputElement::Timestamp { moment, target });
    }

    /// Append a container and return the local id later elements can target.
    pub fn emit_container(
        &mut self,
        tag: impl Into<String>,
        content: impl Into<String>,
        style: BTreeMap<String, String>,
        target: Target,
    ) -> LocalId {
        let local_id = LocalId(self.next_local);
        self.next_local += 1;
        self.elements.push(OutputElement::Container {
            tag: tag.into(),
            content: content.into(),
            style,
            target,
            local_id,
        });
        local_id
    }

    /// Append an image reference.
    pub fn emit_image(&mut self, source: impl Into<String>, target: Target) {
        self.elements.push(OutputElement::Image {
            source: source.into(),
            target,
        });
    }

    /// Append a continuation slot.
    pub fn emit_continuation_slot(&mut self, continuation: Continuation, target: Target) {
        self.elements.push(OutputElement::ContinuationSlot {
            continuation,
            target,
        });
    }

    /// Number of elements recorded so far.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Freeze the recorded output.
    pub fn finish(self) -> Passage {
        Passage {
            elements: self.elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuation::Button;
    use proptest::prelude::*;

    #[test]
    fn container_ids_start_at_zero() {
        let mut b = PassageBuilder::new();
        let first = b.emit_container("p", "a", BTreeMap::new(), None);
        let second = b.emit_container("p", "b", BTreeMap::new(), Some(first));
        assert_eq!(first, LocalId(0));
        assert_eq!(second, LocalId(1));
    }

    #[test]
    fn emission_order_is_kept() {
        let mut b = PassageBuilder::new();
        b.emit_timestamp(None);
        b.emit_raw("<hr>", None);
        let p = b.emit_container("p", "Hi", BTreeMap::new(), None);
        b.emit_image("cat.png", Some(p));
        b.emit_continuation_slot(Button::goto("Next", "next").into(), Some(p));

        let passage = b.finish();
        let kinds: Vec<_> = passage.elements().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec!["timestamp", "markup", "container", "image", "continuation"]
        );
        assert!(passage.timestamp().is_some());
        assert_eq!(passage.continuations().count(), 1);
    }

    #[test]
    fn non_container_elements_do_not_consume_ids() {
        let mut b = PassageBuilder::new();
        b.emit_raw("x", None);
        b.emit_image("y.png", None);
        let id = b.emit_container("div", "", BTreeMap::new(), None);
        assert_eq!(id, LocalId(0));
    }

    proptest! {
        #[test]
        fn container_ids_strictly_increase(ops in proptest::collection::vec(0u8..3, 0..64)) {
            let mut b = PassageBuilder::new();
            let mut ids = Vec::new();
            for op in ops {
                match op {
                    0 => ids.push(b.emit_container("p", "", BTreeMap::new(), ids.last().copied())),
                    1 => b.emit_raw("text", None),
                    _ => b.emit_timestamp(None),
                }
            }
            for (expected, id) in ids.iter().enumerate() {
                prop_assert_eq!(id.0 as usize, expected);
            }
        }
    }
}
