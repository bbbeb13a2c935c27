//! Callback definition strings
//!
//! Layout files bind widgets to callbacks with strings such as
//! `ShowPopupCallback('Hello, world')`. This module splits such a string
//! into the function name and its literal arguments.

use crate::types::DefinitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed callback binding: function name plus literal arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallbackDefinition {
    /// Name the handler is registered under
    pub function_name: String,
    /// Literal arguments, passed after the caller
    pub args: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Regular,
    Text,
}

impl CallbackDefinition {
    /// Create a definition with no arguments
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            args: Vec::new(),
        }
    }

    /// Builder method: append an argument
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Parse a definition string
    ///
    /// The name runs up to the first space or `(`. Arguments are comma
    /// separated; single quotes protect spaces, commas and parentheses and
    /// allow the escapes `\'`, `\n`, `\r`, `\t` and `\b`. Anything after the
    /// closing parenthesis is ignored.
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DefinitionError::Empty);
        }

        let name_end = text.find([' ', '(']).unwrap_or(text.len());
        let function_name = &text[..name_end];
        if function_name.is_empty() {
            return Err(DefinitionError::MissingName(text.to_string()));
        }

        let args = match text.find('(') {
            Some(open) => parse_arguments(text, &text[open + 1..])?,
            None => Vec::new(),
        };

        Ok(Self {
            function_name: function_name.to_string(),
            args,
        })
    }

    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

fn parse_arguments(definition: &str, body: &str) -> Result<Vec<String>, DefinitionError> {
    let mut args = Vec::new();
    let mut argument = String::new();
    let mut mode = Mode::Regular;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match (c, mode) {
            (' ', Mode::Regular) => {}
            ('\\', Mode::Text) => match chars.next() {
                Some('\'') => argument.push('\''),
                Some('n') => argument.push('\n'),
                Some('r') => argument.push('\r'),
                Some('t') => argument.push('\t'),
                Some('b') => argument.push('\u{8}'),
                Some(_) => {}
                None => return Err(DefinitionError::UnterminatedQuote(definition.to_string())),
            },
            ('\\', Mode::Regular) => {}
            ('\'', Mode::Regular) => mode = Mode::Text,
            ('\'', Mode::Text) => mode = Mode::Regular,
            (')', Mode::Regular) => {
                args.push(argument);
                return Ok(args);
            }
            (',', Mode::Regular) => args.push(std::mem::take(&mut argument)),
            (c, _) => argument.push(c),
        }
    }

    match mode {
        Mode::Text => Err(DefinitionError::UnterminatedQuote(definition.to_string())),
        Mode::Regular => Err(DefinitionError::MissingClosingParen(definition.to_string())),
    }
}

fn escape(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    for c in arg.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for CallbackDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function_name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| format!("'{}'", escape(arg)))
            .collect();
        write!(f, "({})", args.join(", "))
    }
}

impl FromStr for CallbackDefinition {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CallbackDefinition {
    type Error = DefinitionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CallbackDefinition> for String {
    fn from(value: CallbackDefinition) -> Self {
        value.to_string()
    }
}
