//! Core types for the widget callback library
//!
//! This module defines the values that cross the host/handler boundary: the
//! widget that raised an event, the host calls a handler makes, and the
//! errors a dispatch can produce. None of these are stored by the library.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Result type for callback operations
pub type Result<T> = std::result::Result<T, CallbackError>;

/// Attribute key holding the widget identifier
pub const NAME_KEY: &str = "name";

/// Attribute key holding the on/off state of toggle widgets
pub const SWITCH_STATE_KEY: &str = "switchState";

/// The widget that raised an event
///
/// Hosts build one of these per event and hand it to the handler by
/// reference. Handlers only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Stable widget identifier
    pub name: String,
    /// Current state of a toggle widget, absent on plain buttons
    #[serde(
        rename = "switchState",
        alias = "switch_state",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub switch_state: Option<bool>,
}

impl Caller {
    /// Create a caller for a plain (non-toggle) widget
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            switch_state: None,
        }
    }

    /// Create a caller for a toggle widget in the given state
    pub fn switch(name: impl Into<String>, state: bool) -> Self {
        Self {
            name: name.into(),
            switch_state: Some(state),
        }
    }

    /// Validate a loosely typed attribute object supplied by a host
    ///
    /// `name` must be present and a string. `switchState` (or
    /// `switch_state`) is optional, but when present must be a boolean.
    /// Unknown attributes are ignored.
    pub fn from_attributes(attributes: &Value) -> Result<Self> {
        let object = attributes
            .as_object()
            .ok_or_else(|| CallbackError::InvalidCaller("caller is not an object".to_string()))?;

        let name = match object.get(NAME_KEY) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(CallbackError::InvalidAttribute {
                    attribute: NAME_KEY,
                    expected: "string",
                    found: json_type_name(other),
                })
            }
            None => return Err(CallbackError::MissingAttribute(NAME_KEY)),
        };

        let switch_state = match switch_state_value(object) {
            Some(Value::Bool(state)) => Some(*state),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(CallbackError::InvalidAttribute {
                    attribute: SWITCH_STATE_KEY,
                    expected: "boolean",
                    found: json_type_name(other),
                })
            }
        };

        Ok(Self { name, switch_state })
    }

    /// The switch state, or an error if this caller is not a toggle widget
    pub fn require_switch_state(&self) -> Result<bool> {
        self.switch_state
            .ok_or(CallbackError::MissingAttribute(SWITCH_STATE_KEY))
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.switch_state {
            Some(state) => write!(f, "{} [{}]", self.name, if state { "on" } else { "off" }),
            None => write!(f, "{}", self.name),
        }
    }
}

fn switch_state_value(object: &Map<String, Value>) -> Option<&Value> {
    object
        .get(SWITCH_STATE_KEY)
        .or_else(|| object.get("switch_state"))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single call a handler made into its host, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", content = "argument", rename_all = "snake_case")]
pub enum HostCall {
    /// Diagnostic line appended to the host output
    Log(String),
    /// Popup shown with the given text
    ShowPopup(String),
    /// Visible popup dismissed
    ClosePopup,
}

impl fmt::Display for HostCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCall::Log(message) => write!(f, "Print({:?})", message),
            HostCall::ShowPopup(text) => write!(f, "ShowPopup({:?})", text),
            HostCall::ClosePopup => write!(f, "ClosePopup()"),
        }
    }
}

/// Errors that can occur while parsing a callback definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Callback definition is empty")]
    Empty,

    #[error("Callback definition has no function name: {0}")]
    MissingName(String),

    #[error("Unterminated quoted argument in callback definition: {0}")]
    UnterminatedQuote(String),

    #[error("Missing closing parenthesis in callback definition: {0}")]
    MissingClosingParen(String),
}

/// Errors that can occur while dispatching a callback
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("Caller is missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("Caller attribute '{attribute}' must be a {expected}, found {found}")]
    InvalidAttribute {
        attribute: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid caller: {0}")]
    InvalidCaller(String),

    #[error("Callback '{0}' requires a caller")]
    MissingCaller(&'static str),

    #[error("Callback '{callback}' requires argument #{index}")]
    MissingArgument { callback: &'static str, index: usize },

    #[error("Unknown callback: {0}")]
    UnknownCallback(String),

    #[error("Invalid callback definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Host primitive '{primitive}' failed: {reason}")]
    Host {
        primitive: &'static str,
        reason: String,
    },
}
