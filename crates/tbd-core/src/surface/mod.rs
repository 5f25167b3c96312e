//! The display surface the engine renders onto.
//!
//! The engine never builds host widgets itself; it hands structured
//! [`Fragment`]s to a [`DisplaySurface`] implementation. Browser hosts turn
//! them into HTML, terminal hosts into text. [`MemorySurface`] keeps an
//! in-memory element tree and is what tests and the terminal host use.

pub mod memory;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::ElementAddress;

pub use memory::{Content, Download, MemorySurface, Node, SurfaceOp, plain_text};

/// A piece of content inserted at the end of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    /// Markup inserted verbatim.
    Markup(String),
    /// A formatted timestamp block.
    Timestamp(String),
    /// A tagged wrapper element.
    Container {
        /// Address of the new element.
        id: ElementAddress,
        /// Element tag.
        tag: String,
        /// Attributes of the wrapper.
        attributes: BTreeMap<String, String>,
        /// Markup inside the wrapper.
        content: String,
    },
    /// An image.
    Image {
        /// Address of the new element.
        id: ElementAddress,
        /// Image source.
        source: String,
    },
    /// A push button.
    Button {
        /// Address of the new element.
        id: ElementAddress,
        /// Button caption.
        label: String,
        /// Optional CSS class.
        class: Option<String>,
    },
    /// A single-line text field.
    TextInput {
        /// Address of the new element.
        id: ElementAddress,
    },
}

impl Fragment {
    /// Address of the element this fragment creates, if any.
    pub fn id(&self) -> Option<&ElementAddress> {
        match self {
            Self::Markup(_) | Self::Timestamp(_) => None,
            Self::Container { id, .. }
            | Self::Image { id, .. }
            | Self::Button { id, .. }
            | Self::TextInput { id } => Some(id),
        }
    }

    /// HTML form of the fragment, as a browser host would insert it.
    pub fn to_html(&self) -> String {
        match self {
            Self::Markup(markup) => markup.clone(),
            Self::Timestamp(text) => format!("<div class='timestamp'>{text}</div>"),
            Self::Container {
                id,
                tag,
                attributes,
                content,
            } => {
                let attrs: String = attributes
                    .iter()
                    .map(|(k, v)| format!(" {k}='{v}'"))
                    .collect();
                format!("<{tag}{attrs} id='{id}'>{content}</{tag}>")
            }
            Self::Image { id, source } => format!("<img id='{id}' src='{source}'>"),
            Self::Button { id, label, class } => match class {
                Some(class) => {
                    format!("<button class='{class}' type='button' id='{id}'>{label}</button>")
                }
                None => format!("<button type='button' id='{id}'>{label}</button>"),
            },
            Self::TextInput { id } => format!("<input type='text' id='{id}'></input>"),
        }
    }
}

/// Operations the engine needs from the host display.
///
/// Calls never fail from the engine's point of view; an address the host
/// does not know is the host's concern.
pub trait DisplaySurface {
    /// Insert a fragment as the last child of `at`.
    fn insert_end(&mut self, at: &ElementAddress, fragment: Fragment);

    /// Put `fragment` where the element `at` is now.
    fn replace(&mut self, at: &ElementAddress, fragment: Fragment);

    /// Delete the element `at` and everything below it.
    fn remove(&mut self, at: &ElementAddress);

    /// Remove every child of `at`.
    fn clear(&mut self, at: &ElementAddress);

    /// Current value of a field (text inputs).
    fn value(&self, at: &ElementAddress) -> Option<String>;

    /// Make `at` deliver activation events to the engine.
    fn bind_activation(&mut self, at: &ElementAddress);

    /// Stop delivering activation events for `at`.
    fn unbind_activation(&mut self, at: &ElementAddress);

    /// Grey out or re-enable an element.
    fn set_disabled(&mut self, at: &ElementAddress, disabled: bool);

    /// Set the display attribute of an element (`"none"` hides it).
    fn set_display(&mut self, at: &ElementAddress, display: &str);

    /// Scroll an element into view.
    fn scroll_into_view(&mut self, at: &ElementAddress);

    /// Scroll a container to its bottom.
    fn scroll_to_bottom(&mut self, at: &ElementAddress);

    /// Once `image` has loaded, scroll `container` to its bottom.
    fn scroll_on_load(&mut self, image: &ElementAddress, container: &ElementAddress);

    /// Point a download link at `content`, saved as `filename`.
    fn offer_download(&mut self, at: &ElementAddress, content: &str, filename: &str);

    /// Ask the host to reload from scratch.
    fn request_reload(&mut self);
}
