//! Turning the in-memory surface into terminal output.

use tbd_core::surface::{Node, plain_text};
use tbd_core::{ElementAddress, Fragment, MemorySurface};

/// A live button the player can pick.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub button: ElementAddress,
    pub label: String,
    /// Text field read when the button is activated.
    pub input: Option<ElementAddress>,
}

/// Live buttons below `root`, in document order.
pub fn choices(surface: &MemorySurface, root: &ElementAddress) -> Vec<Choice> {
    let ids = surface.descendants(root);
    let mut out = Vec::new();
    for (index, id) in ids.iter().enumerate() {
        let Some(node) = surface.node(id) else {
            continue;
        };
        let Some(Fragment::Button { label, .. }) = node.fragment() else {
            continue;
        };
        if !node.is_bound() || node.is_disabled() {
            continue;
        }
        let input = index
            .checked_sub(1)
            .map(|prev| ids[prev])
            .filter(|prev| {
                matches!(
                    surface.node(prev).and_then(Node::fragment),
                    Some(Fragment::TextInput { .. })
                )
            })
            .cloned();
        out.push(Choice {
            button: (*id).clone(),
            label: plain_text(label).trim().to_string(),
            input,
        });
    }
    out
}

/// Lines of `current` not printed yet.
///
/// `shown` is what was printed last time. When the start of the view was
/// dropped (trimmed history) the longest tail of `shown` that still opens
/// `current` is skipped; when nothing matches the whole view is new.
pub fn fresh_lines<'a>(shown: &[String], current: &'a str) -> Vec<&'a str> {
    let lines: Vec<&str> = current.lines().collect();
    for start in 0..shown.len() {
        let tail = &shown[start..];
        if tail.len() <= lines.len() && tail.iter().zip(&lines).all(|(a, b)| a == b) {
            return lines[tail.len()..].to_vec();
        }
    }
    lines
}
