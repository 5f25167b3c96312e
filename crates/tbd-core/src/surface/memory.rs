//! In-memory display surface.

use std::collections::HashMap;

use super::{DisplaySurface, Fragment};
use crate::identity::ElementAddress;

/// A call the engine made on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    /// `insert_end`.
    Insert {
        /// Parent address.
        at: ElementAddress,
        /// Inserted content.
        fragment: Fragment,
    },
    /// `replace`.
    Replace {
        /// Replaced address.
        at: ElementAddress,
        /// New content.
        fragment: Fragment,
    },
    /// `remove`.
    Remove {
        /// Removed address.
        at: ElementAddress,
    },
    /// `clear`.
    Clear {
        /// Cleared address.
        at: ElementAddress,
    },
    /// `bind_activation`.
    Bind {
        /// Bound address.
        at: ElementAddress,
    },
    /// `unbind_activation`.
    Unbind {
        /// Unbound address.
        at: ElementAddress,
    },
    /// `set_disabled`.
    SetDisabled {
        /// Target address.
        at: ElementAddress,
        /// New state.
        disabled: bool,
    },
    /// `set_display`.
    SetDisplay {
        /// Target address.
        at: ElementAddress,
        /// Display value.
        display: String,
    },
    /// `scroll_into_view`.
    ScrollIntoView {
        /// Target address.
        at: ElementAddress,
    },
    /// `scroll_to_bottom`.
    ScrollToBottom {
        /// Target address.
        at: ElementAddress,
    },
    /// `scroll_on_load`.
    ScrollOnLoad {
        /// Image being loaded.
        image: ElementAddress,
        /// Container scrolled afterwards.
        container: ElementAddress,
    },
    /// `offer_download`.
    OfferDownload {
        /// Download link.
        at: ElementAddress,
        /// Suggested file name.
        filename: String,
    },
    /// `request_reload`.
    RequestReload,
}

/// One child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Raw markup.
    Markup(String),
    /// Timestamp text.
    Timestamp(String),
    /// A child element.
    Element(ElementAddress),
}

/// An element of the in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    fragment: Option<Fragment>,
    children: Vec<Content>,
    disabled: bool,
    bound: bool,
    display: Option<String>,
    value: String,
}

impl Node {
    /// Fragment that created the element; `None` for host regions.
    pub fn fragment(&self) -> Option<&Fragment> {
        self.fragment.as_ref()
    }

    /// Children in document order.
    pub fn children(&self) -> &[Content] {
        &self.children
    }

    /// Whether the element is greyed out.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether activation events are delivered for this element.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Display attribute, if one was set.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Field value (text inputs).
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An offered download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name.
    pub filename: String,
    /// File content.
    pub content: String,
}

/// Display surface backed by an in-memory element tree.
///
/// Every call is also journaled as a [`SurfaceOp`] so callers can inspect
/// what the engine did.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: HashMap<ElementAddress, Node>,
    ops: Vec<SurfaceOp>,
    downloads: HashMap<ElementAddress, Download>,
    reload_requested: bool,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an element.
    pub fn node(&self, at: &ElementAddress) -> Option<&Node> {
        self.nodes.get(at)
    }

    /// Type a value into a field, as a user would.
    pub fn set_value(&mut self, at: &ElementAddress, value: impl Into<String>) {
        self.nodes.entry(at.clone()).or_default().value = value.into();
    }

    /// Journaled calls, oldest first.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain the journal.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Download currently offered by a link.
    pub fn download(&self, at: &ElementAddress) -> Option<&Download> {
        self.downloads.get(at)
    }

    /// Whether a reload was requested since the surface was created.
    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }

    /// Element addresses below `at`, in document order.
    pub fn descendants(&self, at: &ElementAddress) -> Vec<&ElementAddress> {
        let mut out = Vec::new();
        self.collect_descendants(at, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, at: &ElementAddress, out: &mut Vec<&'a ElementAddress>) {
        if let Some(node) = self.nodes.get(at) {
            for child in &node.children {
                if let Content::Element(id) = child {
                    out.push(id);
                    self.collect_descendants(id, out);
                }
            }
        }
    }

    /// Buttons below `at` that are bound and enabled, in document order.
    pub fn live_buttons(&self, at: &ElementAddress) -> Vec<ElementAddress> {
        self.descendants(at)
            .into_iter()
            .filter(|id| {
                self.nodes.get(*id).is_some_and(|n| {
                    n.bound && !n.disabled && matches!(n.fragment, Some(Fragment::Button { .. }))
                })
            })
            .cloned()
            .collect()
    }

    /// HTML serialization of everything below `at`.
    pub fn html(&self, at: &ElementAddress) -> String {
        let mut out = String::new();
        if let Some(node) = self.nodes.get(at) {
            for child in &node.children {
                self.write_html(child, &mut out);
            }
        }
        out
    }

    fn write_html(&self, content: &Content, out: &mut String) {
        match content {
            Content::Markup(markup) => out.push_str(markup),
            Content::Timestamp(text) => {
                out.push_str(&Fragment::Timestamp(text.clone()).to_html());
            }
            Content::Element(id) => {
                let Some(node) = self.nodes.get(id) else {
                    return;
                };
                match &node.fragment {
                    Some(Fragment::Container {
                        tag, attributes, ..
                    }) => {
                        out.push('<');
                        out.push_str(tag);
                        for (k, v) in attributes {
                            out.push_str(&format!(" {k}='{v}'"));
                        }
                        out.push_str(&format!(" id='{id}'>"));
                        for child in &node.children {
                            self.write_html(child, out);
                        }
                        out.push_str(&format!("</{tag}>"));
                    }
                    Some(fragment) => out.push_str(&fragment.to_html()),
                    None => {}
                }
            }
        }
    }

    /// Plain-text rendering of everything below `at`.
    ///
    /// Markup tags are stripped, block tags become line breaks, buttons
    /// show as `[label]` and text fields as `[value]`.
    pub fn text(&self, at: &ElementAddress) -> String {
        let mut out = String::new();
        if let Some(node) = self.nodes.get(at) {
            for child in &node.children {
                self.write_text(child, &mut out);
            }
        }
        tidy_lines(&out)
    }

    fn write_text(&self, content: &Content, out: &mut String) {
        match content {
            Content::Markup(markup) => out.push_str(&plain_text(markup)),
            Content::Timestamp(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Content::Element(id) => {
                let Some(node) = self.nodes.get(id) else {
                    return;
                };
                match &node.fragment {
                    Some(Fragment::Container { tag, .. }) => {
                        let block = is_block_tag(tag);
                        if block {
                            out.push('\n');
                        }
                        for child in &node.children {
                            self.write_text(child, out);
                        }
                        if block {
                            out.push('\n');
                        }
                    }
                    Some(Fragment::Image { source, .. }) => {
                        out.push_str(&format!("[image: {source}]"));
                    }
                    Some(Fragment::Button { label, .. }) => {
                        out.push_str(&format!("[{}] ", plain_text(label).trim()));
                    }
                    Some(Fragment::TextInput { .. }) => {
                        out.push_str(&format!("[{}] ", node.value));
                    }
                    Some(Fragment::Markup(m)) => out.push_str(&plain_text(m)),
                    Some(Fragment::Timestamp(t)) => out.push_str(t),
                    None => {}
                }
            }
        }
    }

    /// Parent of `at` and the position of `at` among its children.
    fn position(&self, at: &ElementAddress) -> Option<(ElementAddress, usize)> {
        self.nodes.iter().find_map(|(parent, node)| {
            node.children
                .iter()
                .position(|c| matches!(c, Content::Element(id) if id == at))
                .map(|index| (parent.clone(), index))
        })
    }

    /// Turn a fragment into a child, registering its element if it has one.
    fn adopt(&mut self, parent: &ElementAddress, fragment: Fragment) -> Content {
        match &fragment {
            Fragment::Markup(markup) => Content::Markup(markup.clone()),
            Fragment::Timestamp(text) => Content::Timestamp(text.clone()),
            other => {
                let id = other.id().cloned().unwrap_or_else(|| parent.clone());
                let mut node = Node::default();
                if let Fragment::Container { content, .. } = other {
                    if !content.is_empty() {
                        node.children.push(Content::Markup(content.clone()));
                    }
                }
                node.fragment = Some(fragment.clone());
                self.nodes.insert(id.clone(), node);
                Content::Element(id)
            }
        }
    }

    fn drop_subtree(&mut self, at: &ElementAddress) {
        if let Some(node) = self.nodes.remove(at) {
            for child in node.children {
                if let Content::Element(id) = child {
                    self.drop_subtree(&id);
                }
            }
        }
        self.downloads.remove(at);
    }
}

impl DisplaySurface for MemorySurface {
    fn insert_end(&mut self, at: &ElementAddress, fragment: Fragment) {
        self.ops.push(SurfaceOp::Insert {
            at: at.clone(),
            fragment: fragment.clone(),
        });

        let child = self.adopt(at, fragment);
        self.nodes.entry(at.clone()).or_default().children.push(child);
    }

    fn replace(&mut self, at: &ElementAddress, fragment: Fragment) {
        self.ops.push(SurfaceOp::Replace {
            at: at.clone(),
            fragment: fragment.clone(),
        });
        let Some((parent, index)) = self.position(at) else {
            return;
        };
        self.drop_subtree(at);
        let child = self.adopt(&parent, fragment);
        self.nodes.entry(parent).or_default().children[index] = child;
    }

    fn remove(&mut self, at: &ElementAddress) {
        self.ops.push(SurfaceOp::Remove { at: at.clone() });
        if let Some((parent, index)) = self.position(at) {
            self.nodes.entry(parent).or_default().children.remove(index);
        }
        self.drop_subtree(at);
    }

    fn clear(&mut self, at: &ElementAddress) {
        self.ops.push(SurfaceOp::Clear { at: at.clone() });
        let children = self
            .nodes
            .get_mut(at)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            if let Content::Element(id) = child {
                self.drop_subtree(&id);
            }
        }
    }

    fn value(&self, at: &ElementAddress) -> Option<String> {
        self.nodes.get(at).map(|n| n.value.clone())
    }

    fn bind_activation(&mut self, at: &ElementAddress) {
        self.ops.push(SurfaceOp::Bind { at: at.clone() });
        self.nodes.entry(at.clone()).or_default().bound = true;
    }

    fn unbind_activation(&mut self, at: &ElementAddress) {
        self.ops.push(SurfaceOp::Unbind { at: at.clone() });
        if let Some(node) = self.nodes.get_mut(at) {
            node.bound = false;
        }
    }

    fn set_disabled(&mut self, at: &ElementAddress, disabled: bool) {
        self.ops.push(SurfaceOp::SetDisabled {
            at: at.clone(),
            disabled,
        });
        self.nodes.entry(at.clone()).or_default().disabled = disabled;
    }

    fn set_display(&mut self, at: &ElementAddress, display: &str) {
        self.ops.push(SurfaceOp::SetDisplay {
            at: at.clone(),
            display: display.to_string(),
        });
        self.nodes.entry(at.clone()).or_default().display = Some(display.to_string());
    }

    fn scroll_into_view(&mut self, at: &ElementAddress) {
        self.ops.push(SurfaceOp::ScrollIntoView { at: at.clone() });
    }

    fn scroll_to_bottom(&mut self, at: &ElementAddress) {
        self.ops.push(SurfaceOp::ScrollToBottom { at: at.clone() });
    }

    fn scroll_on_load(&mut self, image: &ElementAddress, container: &ElementAddress) {
        self.ops.push(SurfaceOp::ScrollOnLoad {
            image: image.clone(),
            container: container.clone(),
        });
    }

    fn offer_download(&mut self, at: &ElementAddress, content: &str, filename: &str) {
        self.ops.push(SurfaceOp::OfferDownload {
            at: at.clone(),
            filename: filename.to_string(),
        });
        self.downloads.insert(
            at.clone(),
            Download {
                filename: filename.to_string(),
                content: content.to_string(),
            },
        );
    }

    fn request_reload(&mut self) {
        self.ops.push(SurfaceOp::RequestReload);
        self.reload_requested = true;
    }
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "p" | "div" | "br" | "hr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "ul" | "ol"
    )
}

/// Strip markup tags, turning block-level tags into line breaks.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in markup.chars() {
        match ch {
            '<' if !in_tag => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name: String = tag
                    .trim_start_matches('/')
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric())
                    .collect();
                if is_block_tag(&name) {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn tidy_lines(text: &str) -> String {
    let mut out = Vec::new();
    let mut blank = false;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !blank && !out.is_empty() {
                out.push("");
            }
            blank = true;
        } else {
            out.push(line);
            blank = false;
        }
    }
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}
