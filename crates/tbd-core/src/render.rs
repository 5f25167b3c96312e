//! Projects passages onto a display surface.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::continuation::{Bindings, Interactive};
use crate::error::{EngineError, EngineResult};
use crate::identity::{ElementAddress, IdProvider};
use crate::output::{LocalId, OutputElement, Passage, PassageLog, Target};
use crate::surface::{DisplaySurface, Fragment};

/// Timestamp format of passage headers, e.g. `2024 - Mar 05 - 17:02:11`.
pub const TIMESTAMP_FORMAT: &str = "%Y - %b %d - %H:%M:%S";

/// Format a passage timestamp.
pub fn format_timestamp(moment: &DateTime<Utc>) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

/// Everything a render pass writes to.
pub struct RenderCx<'a> {
    pub(crate) ids: &'a mut IdProvider,
    pub(crate) surface: &'a mut dyn DisplaySurface,
    pub(crate) bindings: &'a mut Bindings,
    scroll_container: Option<ElementAddress>,
}

impl<'a> RenderCx<'a> {
    /// Bundle the address provider, the surface and the binding table.
    pub fn new(
        ids: &'a mut IdProvider,
        surface: &'a mut dyn DisplaySurface,
        bindings: &'a mut Bindings,
    ) -> Self {
        Self {
            ids,
            surface,
            bindings,
            scroll_container: None,
        }
    }

    /// Element scrolled to the bottom once an image finishes loading.
    /// Defaults to the render root.
    pub fn with_scroll_container(mut self, container: ElementAddress) -> Self {
        self.scroll_container = Some(container);
        self
    }
}

/// Local id → address map of one render pass.
#[derive(Debug, Default)]
pub struct RenderContext {
    addresses: HashMap<LocalId, ElementAddress>,
}

impl RenderContext {
    /// Start an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Address an element attaches to.
    pub fn resolve<'r>(
        &'r self,
        target: Target,
        root: &'r ElementAddress,
    ) -> EngineResult<&'r ElementAddress> {
        match target {
            None => Ok(root),
            Some(local_id) => self
                .addresses
                .get(&local_id)
                .ok_or(EngineError::MissingLocalReference { local_id }),
        }
    }

    /// Record where a container was materialized.
    pub fn record(&mut self, local_id: LocalId, address: ElementAddress) {
        self.addresses.insert(local_id, address);
    }
}

/// Check that every target refers to a container emitted earlier in the
/// passage.
pub fn check_targets(passage: &Passage) -> EngineResult<()> {
    let mut emitted = std::collections::HashSet::new();
    for element in passage.elements() {
        if let Some(local_id) = element.target() {
            if !emitted.contains(&local_id) {
                return Err(EngineError::MissingLocalReference { local_id });
            }
        }
        if let OutputElement::Container { local_id, .. } = element {
            emitted.insert(*local_id);
        }
    }
    Ok(())
}

/// Render one passage under `root`.
///
/// Targets are checked before anything is inserted, so a passage with a
/// dangling target leaves the surface untouched.
pub fn render_passage(
    cx: &mut RenderCx<'_>,
    passage: &Passage,
    root: &ElementAddress,
    disabled: bool,
) -> EngineResult<()> {
    check_targets(passage)?;

    let mut context = RenderContext::new();
    for element in passage.elements() {
        let at = context.resolve(element.target(), root)?.clone();
        match element {
            OutputElement::RawMarkup { content, .. } => {
                cx.surface.insert_end(&at, Fragment::Markup(content.clone()));
            }
            OutputElement::Timestamp { moment, .. } => {
                cx.surface
                    .insert_end(&at, Fragment::Timestamp(format_timestamp(moment)));
            }
            OutputElement::Container {
                tag,
                content,
                style,
                local_id,
                ..
            } => {
                let id = cx.ids.next("container");
                context.record(*local_id, id.clone());
                cx.surface.insert_end(
                    &at,
                    Fragment::Container {
                        id,
                        tag: tag.clone(),
                        attributes: style.clone(),
                        content: content.clone(),
                    },
                );
            }
            OutputElement::Image { source, .. } => {
                let id = cx.ids.next("img");
                cx.surface.insert_end(
                    &at,
                    Fragment::Image {
                        id: id.clone(),
                        source: source.clone(),
                    },
                );
                let container = cx.scroll_container.clone().unwrap_or_else(|| root.clone());
                cx.surface.scroll_on_load(&id, &container);
            }
            OutputElement::ContinuationSlot { continuation, .. } => {
                continuation.setup(cx, &at, disabled);
            }
        }
    }

    debug!(elements = passage.len(), disabled, root = %root, "rendered passage");
    Ok(())
}

/// Clear `root` and replay the whole log, oldest first. Only the newest
/// passage stays interactive.
pub fn render_log(
    cx: &mut RenderCx<'_>,
    log: &PassageLog,
    root: &ElementAddress,
) -> EngineResult<()> {
    cx.surface.clear(root);
    let newest = log.len().saturating_sub(1);
    for (index, passage) in log.passages().iter().enumerate() {
        render_passage(cx, passage, root, index < newest)?;
    }
    Ok(())
}
