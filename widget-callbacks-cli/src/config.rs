//! Session loading and validation
//!
//! A session file describes a handful of widgets, the callbacks they are
//! bound to, and the interactions to replay against them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use widget_callbacks::{CallbackDefinition, DispatchConfig};

/// Replay session (loaded from session.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub name: String,
    pub kind: WidgetKind,
    /// Initial state, only meaningful for switches
    #[serde(default)]
    pub switch_state: bool,
    pub on_click: Option<CallbackDefinition>,
    pub on_switch_on: Option<CallbackDefinition>,
    pub on_switch_off: Option<CallbackDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Button,
    Switch,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventConfig {
    pub widget: String,
    #[serde(default)]
    pub action: EventAction,
    /// Target state for `set_state`
    pub state: Option<bool>,
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_repeat() -> usize {
    1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Press and release; switches flip their state
    #[default]
    Click,
    /// Change a switch's state without firing callbacks
    SetState,
}

/// Problems found while validating a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Duplicate widget name: {0}")]
    DuplicateWidget(String),

    #[error("Event #{index} references unknown widget '{widget}'")]
    UnknownWidget { index: usize, widget: String },

    #[error("Event #{index} ({widget}): set_state requires a 'state' value")]
    MissingState { index: usize, widget: String },

    #[error("Event #{index} ({widget}): set_state only applies to switches")]
    NotASwitch { index: usize, widget: String },

    #[error("Widget '{0}' is a button but binds switch callbacks")]
    SwitchBindingOnButton(String),
}

impl SessionConfig {
    /// Look up a widget by name
    pub fn widget(&self, name: &str) -> Option<&WidgetConfig> {
        self.widgets.iter().find(|w| w.name == name)
    }

    /// Check that every event targets a known widget and every binding fits
    pub fn validate(&self) -> std::result::Result<(), SessionError> {
        let mut names = HashSet::new();
        for widget in &self.widgets {
            if !names.insert(widget.name.as_str()) {
                return Err(SessionError::DuplicateWidget(widget.name.clone()));
            }
            if widget.kind == WidgetKind::Button
                && (widget.on_switch_on.is_some() || widget.on_switch_off.is_some())
            {
                return Err(SessionError::SwitchBindingOnButton(widget.name.clone()));
            }
        }

        for (index, event) in self.events.iter().enumerate() {
            let widget = self.widget(&event.widget).ok_or_else(|| SessionError::UnknownWidget {
                index,
                widget: event.widget.clone(),
            })?;

            if event.action == EventAction::SetState {
                if widget.kind != WidgetKind::Switch {
                    return Err(SessionError::NotASwitch {
                        index,
                        widget: event.widget.clone(),
                    });
                }
                if event.state.is_none() {
                    return Err(SessionError::MissingState {
                        index,
                        widget: event.widget.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Parse and validate a session from TOML text
pub fn parse_session(content: &str) -> Result<SessionConfig> {
    let session: SessionConfig = toml::from_str(content).context("Failed to parse session")?;
    session.validate()?;
    Ok(session)
}

/// Load a session from a TOML file
pub fn load_session(path: &Path) -> Result<SessionConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {:?}", path))?;

    parse_session(&content).with_context(|| format!("Invalid session file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use widget_callbacks::ErrorPolicy;

    const SESSION: &str = r#"
        [dispatch]
        error_policy = "log_and_continue"

        [[widgets]]
        name = "Btn1"
        kind = "button"
        on_click = "ShowPopupCallback('Hello, world')"

        [[widgets]]
        name = "Sw1"
        kind = "switch"
        on_switch_on = "SwitchCallback"
        on_switch_off = "SwitchCallback"

        [[events]]
        widget = "Btn1"

        [[events]]
        widget = "Sw1"
        action = "set_state"
        state = true
    "#;

    #[test]
    fn test_session_deserialization() {
        let session = parse_session(SESSION).unwrap();
        assert_eq!(session.dispatch.error_policy, ErrorPolicy::LogAndContinue);
        assert_eq!(session.widgets.len(), 2);
        assert_eq!(session.events.len(), 2);

        let button = session.widget("Btn1").unwrap();
        let on_click = button.on_click.as_ref().unwrap();
        assert_eq!(on_click.function_name, "ShowPopupCallback");
        assert_eq!(on_click.args, vec!["Hello, world"]);

        assert_eq!(session.events[0].action, EventAction::Click);
        assert_eq!(session.events[0].repeat, 1);
        assert_eq!(session.events[1].state, Some(true));
    }

    #[test]
    fn test_session_validation() {
        let err = parse_session(
            r#"
            [[events]]
            widget = "Ghost"
        "#,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::UnknownWidget { index: 0, .. })
        ));

        let err = parse_session(
            r#"
            [[widgets]]
            name = "Btn1"
            kind = "button"
            on_switch_on = "SwitchCallback"
        "#,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::SwitchBindingOnButton(_))
        ));

        let err = parse_session(
            r#"
            [[widgets]]
            name = "Sw1"
            kind = "switch"

            [[events]]
            widget = "Sw1"
            action = "set_state"
        "#,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::MissingState { .. })
        ));
    }

    #[test]
    fn test_malformed_binding_rejected_at_load() {
        let result = parse_session(
            r#"
            [[widgets]]
            name = "Btn1"
            kind = "button"
            on_click = "ShowPopupCallback('unterminated)"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_session_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let session = load_session(file.path()).unwrap();
        assert_eq!(session.widgets.len(), 2);

        assert!(load_session(Path::new("/definitely/not/here.toml")).is_err());
    }
}
