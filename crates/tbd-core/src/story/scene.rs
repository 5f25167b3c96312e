//! The view a passage function gets of the running game.

use std::collections::BTreeMap;

use crate::continuation::Continuation;
use crate::output::{LocalId, PassageBuilder, Target};

/// Application state plus the passage being written.
///
/// All output goes to the open passage; nothing is displayed until the
/// passage function returns.
pub struct Scene<'a, S> {
    state: &'a mut S,
    out: &'a mut PassageBuilder,
}

impl<'a, S> Scene<'a, S> {
    pub(crate) fn new(state: &'a mut S, out: &'a mut PassageBuilder) -> Self {
        Self { state, out }
    }

    /// Application state.
    pub fn state(&self) -> &S {
        &*self.state
    }

    /// Mutable application state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }

    /// Insert raw markup at the passage root.
    pub fn print(&mut self, markup: impl Into<String>) {
        self.out.emit_raw(markup, None);
    }

    /// Insert raw markup inside a container.
    pub fn print_in(&mut self, parent: LocalId, markup: impl Into<String>) {
        self.out.emit_raw(markup, Some(parent));
    }

    /// Add a paragraph at the passage root.
    pub fn paragraph(&mut self, html: impl Into<String>) -> LocalId {
        self.container("p", html, BTreeMap::new(), None)
    }

    /// Add a paragraph inside another container.
    pub fn paragraph_in(&mut self, parent: LocalId, html: impl Into<String>) -> LocalId {
        self.container("p", html, BTreeMap::new(), Some(parent))
    }

    /// Add a container with any tag and attributes.
    pub fn container(
        &mut self,
        tag: impl Into<String>,
        html: impl Into<String>,
        style: BTreeMap<String, String>,
        target: Target,
    ) -> LocalId {
        self.out.emit_container(tag, html, style, target)
    }

    /// Add an image.
    pub fn image(&mut self, source: impl Into<String>, target: Target) {
        self.out.emit_image(source, target);
    }

    /// Offer a continuation.
    pub fn continuation(&mut self, continuation: impl Into<Continuation>, target: Target) {
        self.out.emit_continuation_slot(continuation.into(), target);
    }

    /// Offer several continuations grouped in an input zone paragraph.
    pub fn continuations<I>(&mut self, items: I) -> LocalId
    where
        I: IntoIterator,
        I::Item: Into<Continuation>,
    {
        let zone = self.container("p", "", class("inputzone"), None);
        for item in items {
            self.continuation(item, Some(zone));
        }
        zone
    }

    /// Lay out `contents` side by side. Returns one handle per column.
    pub fn columns<T: AsRef<str>>(&mut self, contents: &[T], target: Target) -> Vec<LocalId> {
        let row = self.container("div", "", class("columns"), target);
        contents
            .iter()
            .map(|html| self.container("div", html.as_ref(), class("column"), Some(row)))
            .collect()
    }
}

fn class(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("class".to_string(), name.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuation::Button;
    use crate::output::OutputElement;

    #[test]
    fn nested_paragraphs_target_parent() {
        let mut state = 0u32;
        let mut out = PassageBuilder::new();
        let mut scene = Scene::new(&mut state, &mut out);

        let p = scene.paragraph("outer");
        let child = scene.paragraph_in(p, "inner");
        *scene.state_mut() += 1;

        assert_eq!(child, LocalId(1));
        let passage = out.finish();
        assert_eq!(passage.elements()[1].target(), Some(LocalId(0)));
        assert_eq!(state, 1);
    }

    #[test]
    fn continuations_share_input_zone() {
        let mut state = 0u8;
        let mut out = PassageBuilder::new();
        let mut scene = Scene::new(&mut state, &mut out);

        let zone = scene.continuations([Button::goto("A", "a"), Button::goto("B", "b")]);

        let passage = out.finish();
        assert_eq!(passage.len(), 3);
        match &passage.elements()[0] {
            OutputElement::Container { style, .. } => {
                assert_eq!(style.get("class").map(String::as_str), Some("inputzone"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(passage.elements()[1..]
            .iter()
            .all(|e| e.target() == Some(zone)));
    }

    #[test]
    fn columns_are_children_of_row() {
        let mut state = 0u8;
        let mut out = PassageBuilder::new();
        let mut scene = Scene::new(&mut state, &mut out);

        let cols = scene.columns(&["left", "right"], None);
        assert_eq!(cols, vec![LocalId(1), LocalId(2)]);
        let passage = out.finish();
        assert_eq!(passage.elements()[2].target(), Some(LocalId(0)));
    }
}
