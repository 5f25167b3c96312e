//! Passage arguments and parameter declarations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};

/// Named arguments handed to a passage function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassageArgs(BTreeMap<String, Value>);

impl PassageArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an argument, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Set an argument only if it is not already present.
    pub fn insert_missing(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.entry(name.into()).or_insert_with(|| value.into());
    }

    /// Raw value of an argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Text argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Integer argument.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    /// Numeric argument.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Boolean argument.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    /// Whether an argument is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate over arguments in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Any JSON value.
    Any,
    /// A string.
    Text,
    /// An integer.
    Integer,
    /// Any number.
    Number,
    /// A boolean.
    Boolean,
}

impl ArgKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Text => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Any => "any value",
            Self::Text => "text",
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
        }
    }
}

/// A declared passage parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Accepted kind.
    pub kind: ArgKind,
    /// Whether the argument must be supplied.
    pub required: bool,
}

impl ParamSpec {
    /// A parameter that must be supplied.
    pub fn required(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    /// A parameter that may be left out.
    pub fn optional(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

/// Check `args` against the parameters `passage` declares.
pub(crate) fn validate(
    passage: &str,
    params: &[ParamSpec],
    args: &PassageArgs,
) -> EngineResult<()> {
    let invalid = |reason: String| EngineError::InvalidArguments {
        passage: passage.to_string(),
        reason,
    };

    for param in params {
        match args.get(&param.name) {
            Some(value) if !param.kind.accepts(value) => {
                return Err(invalid(format!(
                    "'{}' must be {}, got {value}",
                    param.name,
                    param.kind.describe()
                )));
            }
            None if param.required => {
                return Err(invalid(format!("missing argument '{}'", param.name)));
            }
            _ => {}
        }
    }

    if let Some((name, _)) = args
        .iter()
        .find(|(name, _)| !params.iter().any(|p| &p.name == *name))
    {
        return Err(invalid(format!("unexpected argument '{name}'")));
    }

    Ok(())
}
