//! Output element types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::continuation::Continuation;

/// Passage-scoped handle of a container, assigned in emission order from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(pub u32);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an element attaches: `None` is the passage root, otherwise a
/// container emitted earlier in the same passage.
pub type Target = Option<LocalId>;

/// One unit of passage content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputElement {
    /// Markup inserted verbatim.
    RawMarkup {
        /// The markup.
        content: String,
        /// Attachment point.
        target: Target,
    },
    /// The moment a passage started.
    Timestamp {
        /// When the passage ran.
        moment: DateTime<Utc>,
        /// Attachment point.
        target: Target,
    },
    /// A tagged wrapper that later elements can attach to.
    Container {
        /// Element tag (`p`, `div`, ...).
        tag: String,
        /// Markup placed inside the wrapper.
        content: String,
        /// Attributes put on the wrapper.
        style: BTreeMap<String, String>,
        /// Attachment point.
        target: Target,
        /// Handle later elements use to target this container.
        local_id: LocalId,
    },
    /// An image reference.
    Image {
        /// Image source.
        source: String,
        /// Attachment point.
        target: Target,
    },
    /// Placeholder where an interactive continuation is set up.
    ContinuationSlot {
        /// The continuation to set up.
        continuation: Continuation,
        /// Attachment point.
        target: Target,
    },
}

impl OutputElement {
    /// Attachment point of this element.
    pub fn target(&self) -> Target {
        match self {
            Self::RawMarkup { target, .. }
            | Self::Timestamp { target, .. }
            | Self::Container { target, .. }
            | Self::Image { target, .. }
            | Self::ContinuationSlot { target, .. } => *target,
        }
    }

    /// Short name of the variant, used in logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RawMarkup { .. } => "markup",
            Self::Timestamp { .. } => "timestamp",
            Self::Container { .. } => "container",
            Self::Image { .. } => "image",
            Self::ContinuationSlot { .. } => "continuation",
        }
    }
}
