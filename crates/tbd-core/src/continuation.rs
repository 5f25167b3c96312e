//! Interactive continuations: the affordances a passage offers to move on.
//!
//! Continuations are plain data so they can be saved with the passage that
//! emitted them. Rendering one creates its widgets and, unless it belongs to
//! a past passage, registers a [`Binding`] describing what activating it does.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::identity::ElementAddress;
use crate::render::RenderCx;
use crate::story::PassageArgs;
use crate::surface::Fragment;

/// A passage to run together with its bound arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageCall {
    /// Registered passage name.
    pub passage: String,
    /// Arguments bound at emission time.
    #[serde(default)]
    pub args: PassageArgs,
}

impl PassageCall {
    /// Call a passage without arguments.
    pub fn new(passage: impl Into<String>) -> Self {
        Self {
            passage: passage.into(),
            args: PassageArgs::new(),
        }
    }

    /// Bind an argument.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name, value);
        self
    }
}

/// What activating a button does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Next {
    /// Run a passage.
    Passage(PassageCall),
    /// Erase the saved session and reload the host.
    ConfirmReset,
    /// Close the open dialog and show the session again.
    CancelDialog,
}

/// How a text field value becomes an argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueConverter {
    /// Keep the text as is.
    #[default]
    Text,
    /// Parse a signed integer.
    Integer,
    /// Parse a floating-point number.
    Float,
    /// Parse `true`/`false` (also `yes`/`no`, `1`/`0`).
    Boolean,
}

impl ValueConverter {
    /// Convert a raw field value for `argument`.
    pub fn convert(self, argument: &str, raw: &str) -> EngineResult<Value> {
        let trimmed = raw.trim();
        let fail = |expected: &str| EngineError::Conversion {
            argument: argument.to_string(),
            value: raw.to_string(),
            expected: expected.to_string(),
        };
        match self {
            Self::Text => Ok(Value::String(raw.to_string())),
            Self::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| fail("an integer")),
            Self::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| fail("a number")),
            Self::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "0" => Ok(Value::Bool(false)),
                _ => Err(fail("true or false")),
            },
        }
    }
}

/// A button leading to the next step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    /// Caption.
    pub label: String,
    /// Action on activation.
    pub next: Next,
}

impl Button {
    /// A button with an arbitrary action.
    pub fn new(label: impl Into<String>, next: Next) -> Self {
        Self {
            label: label.into(),
            next,
        }
    }

    /// A button running `passage`.
    pub fn goto(label: impl Into<String>, passage: impl Into<String>) -> Self {
        Self::new(label, Next::Passage(PassageCall::new(passage)))
    }

    /// Bind an argument for the passage this button runs.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Next::Passage(call) = &mut self.next {
            call.args.insert(name, value);
        }
        self
    }
}

/// A text field plus a button that passes the field value to a passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextButton {
    /// Button caption.
    pub label: String,
    /// Passage run on activation.
    pub call: PassageCall,
    /// Argument receiving the field value.
    pub value_arg: String,
    /// Conversion applied to the field value.
    #[serde(default)]
    pub converter: ValueConverter,
}

impl TextButton {
    /// A text button passing the field value as `value_arg`.
    pub fn new(
        label: impl Into<String>,
        passage: impl Into<String>,
        value_arg: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            call: PassageCall::new(passage),
            value_arg: value_arg.into(),
            converter: ValueConverter::Text,
        }
    }

    /// Bind an additional argument.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.call.args.insert(name, value);
        self
    }

    /// Use a different value conversion.
    pub fn with_converter(mut self, converter: ValueConverter) -> Self {
        self.converter = converter;
        self
    }
}

/// Every kind of continuation a passage can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// A single button.
    Button(Button),
    /// A text field with its button.
    TextButton(TextButton),
    /// Several continuations set up on the same target, in order.
    Sequence(Vec<Continuation>),
}

impl From<Button> for Continuation {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl From<TextButton> for Continuation {
    fn from(button: TextButton) -> Self {
        Self::TextButton(button)
    }
}

impl From<Vec<Continuation>> for Continuation {
    fn from(items: Vec<Continuation>) -> Self {
        Self::Sequence(items)
    }
}

impl Continuation {
    /// Button captions, in setup order.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Button(button) => vec![button.label.as_str()],
            Self::TextButton(button) => vec![button.label.as_str()],
            Self::Sequence(items) => items.iter().flat_map(Continuation::labels).collect(),
        }
    }
}

/// Something that can put interactive widgets on the surface.
pub trait Interactive {
    /// Create the widgets under `target`. When `disabled`, widgets are shown
    /// greyed out and nothing is bound.
    fn setup(&self, cx: &mut RenderCx<'_>, target: &ElementAddress, disabled: bool);
}

impl Interactive for Button {
    fn setup(&self, cx: &mut RenderCx<'_>, target: &ElementAddress, disabled: bool) {
        let id = cx.ids.next("button");
        cx.surface.insert_end(
            target,
            Fragment::Button {
                id: id.clone(),
                label: self.label.clone(),
                class: None,
            },
        );
        if disabled {
            cx.surface.set_disabled(&id, true);
        } else {
            cx.surface.bind_activation(&id);
            cx.bindings.insert(
                id,
                Binding::Button {
                    next: self.next.clone(),
                },
            );
        }
    }
}

impl Interactive for TextButton {
    fn setup(&self, cx: &mut RenderCx<'_>, target: &ElementAddress, disabled: bool) {
        let input = cx.ids.next("textinput");
        let id = cx.ids.next("button");
        cx.surface.insert_end(target, Fragment::TextInput { id: input.clone() });
        cx.surface.insert_end(
            target,
            Fragment::Button {
                id: id.clone(),
                label: self.label.clone(),
                class: Some("textbutton".to_string()),
            },
        );
        if disabled {
            cx.surface.set_disabled(&id, true);
            cx.surface.set_disabled(&input, true);
        } else {
            cx.surface.bind_activation(&id);
            cx.bindings.insert(
                id,
                Binding::TextButton {
                    input,
                    call: self.call.clone(),
                    value_arg: self.value_arg.clone(),
                    converter: self.converter,
                },
            );
        }
    }
}

impl Interactive for Continuation {
    fn setup(&self, cx: &mut RenderCx<'_>, target: &ElementAddress, disabled: bool) {
        match self {
            Self::Button(button) => button.setup(cx, target, disabled),
            Self::TextButton(button) => button.setup(cx, target, disabled),
            Self::Sequence(items) => {
                for item in items {
                    item.setup(cx, target, disabled);
                }
            }
        }
    }
}

/// What a live widget does when activated.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A plain button.
    Button {
        /// Action to take.
        next: Next,
    },
    /// A text button; the field is read at activation time.
    TextButton {
        /// Paired text field.
        input: ElementAddress,
        /// Passage to run.
        call: PassageCall,
        /// Argument receiving the field value.
        value_arg: String,
        /// Conversion applied to the field value.
        converter: ValueConverter,
    },
}

/// Live bindings by widget address.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    live: HashMap<ElementAddress, Binding>,
}

impl Bindings {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding.
    pub fn insert(&mut self, at: ElementAddress, binding: Binding) {
        self.live.insert(at, binding);
    }

    /// Binding of a widget, if it is live.
    pub fn get(&self, at: &ElementAddress) -> Option<&Binding> {
        self.live.get(at)
    }

    /// Remove every binding, returning the widgets and the text fields they
    /// read from.
    pub fn drain(&mut self) -> Vec<ElementAddress> {
        let mut widgets = Vec::new();
        for (at, binding) in self.live.drain() {
            widgets.push(at);
            if let Binding::TextButton { input, .. } = binding {
                widgets.push(input);
            }
        }
        widgets.sort();
        widgets
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether nothing is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdProvider;
    use crate::surface::MemorySurface;

    fn output() -> ElementAddress {
        ElementAddress::fixed("output")
    }

    #[test]
    fn converters() {
        assert_eq!(
            ValueConverter::Text.convert("name", " Ada ").unwrap(),
            Value::String(" Ada ".into())
        );
        assert_eq!(
            ValueConverter::Integer.convert("n", " 42 ").unwrap(),
            Value::from(42)
        );
        assert_eq!(
            ValueConverter::Boolean.convert("b", "Yes").unwrap(),
            Value::Bool(true)
        );
        assert!(ValueConverter::Float.convert("f", "1.5").is_ok());
        let err = ValueConverter::Integer.convert("n", "many").unwrap_err();
        assert!(matches!(err, EngineError::Conversion { .. }));
    }

    #[test]
    fn live_button_binds() {
        let mut ids = IdProvider::new("t");
        let mut surface = MemorySurface::new();
        let mut bindings = Bindings::new();
        let mut cx = RenderCx::new(&mut ids, &mut surface, &mut bindings);

        Continuation::from(Button::goto("Next", "next").with_arg("msg", "hi"))
            .setup(&mut cx, &output(), false);

        let live = surface.live_buttons(&output());
        assert_eq!(live.len(), 1);
        match bindings.get(&live[0]) {
            Some(Binding::Button {
                next: Next::Passage(call),
            }) => {
                assert_eq!(call.passage, "next");
                assert_eq!(call.args.get("msg"), Some(&Value::from("hi")));
            }
            other => panic!("unexpected binding {other:?}"),
        }
    }

    #[test]
    fn disabled_text_button_binds_nothing() {
        let mut ids = IdProvider::new("t");
        let mut surface = MemorySurface::new();
        let mut bindings = Bindings::new();
        let mut cx = RenderCx::new(&mut ids, &mut surface, &mut bindings);

        TextButton::new("Say", "say", "msg").setup(&mut cx, &output(), true);

        assert!(bindings.is_empty());
        assert!(surface.live_buttons(&output()).is_empty());
        let disabled = surface
            .descendants(&output())
            .into_iter()
            .filter(|id| surface.node(id).is_some_and(|n| n.is_disabled()))
            .count();
        assert_eq!(disabled, 2);
    }

    #[test]
    fn sequence_sets_up_children_in_order() {
        let mut ids = IdProvider::new("t");
        let mut surface = MemorySurface::new();
        let mut bindings = Bindings::new();
        let mut cx = RenderCx::new(&mut ids, &mut surface, &mut bindings);

        Continuation::Sequence(vec![
            Button::goto("A", "a").into(),
            Button::goto("B", "b").into(),
        ])
        .setup(&mut cx, &output(), false);

        assert_eq!(surface.text(&output()), "[A] [B]");
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn drain_returns_inputs_too() {
        let mut ids = IdProvider::new("t");
        let mut surface = MemorySurface::new();
        let mut bindings = Bindings::new();
        let mut cx = RenderCx::new(&mut ids, &mut surface, &mut bindings);
        TextButton::new("Say", "say", "msg").setup(&mut cx, &output(), false);

        let drained = bindings.drain();
        assert_eq!(drained.len(), 2);
        assert!(bindings.is_empty());
    }

    #[test]
    fn continuation_serde_keeps_variant() {
        let c: Continuation = vec![
            Button::new("Cancel", Next::CancelDialog).into(),
            TextButton::new("Go", "go", "n")
                .with_converter(ValueConverter::Integer)
                .into(),
        ]
        .into();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"sequence\""));
        assert!(json.contains("\"cancel_dialog\""));
        let back: Continuation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.labels(), vec!["Cancel", "Go"]);
    }
}
