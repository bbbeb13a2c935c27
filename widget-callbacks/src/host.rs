//! Host capabilities
//!
//! Handlers never reach for globals. Everything they can do to the outside
//! world goes through a [`Host`] they are given when the handler set is
//! built, so tests can swap in a [`RecordingHost`].

use crate::types::{CallbackError, HostCall, Result};

/// Primitives a host application exposes to callback handlers
pub trait Host {
    /// Append a line of diagnostic text to the host output
    fn log(&mut self, message: &str);

    /// Display a popup containing `text`
    fn show_popup(&mut self, text: &str) -> Result<()>;

    /// Dismiss the visible popup, if any
    fn close_popup(&mut self) -> Result<()>;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn log(&mut self, message: &str) {
        (**self).log(message)
    }

    fn show_popup(&mut self, text: &str) -> Result<()> {
        (**self).show_popup(text)
    }

    fn close_popup(&mut self) -> Result<()> {
        (**self).close_popup()
    }
}

/// Host that remembers every call in order
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    fail_popups: bool,
}

impl RecordingHost {
    /// Create an empty recording host
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: make popup primitives fail
    pub fn with_failing_popups(mut self, fail: bool) -> Self {
        self.fail_popups = fail;
        self
    }

    /// All calls made so far
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Only the diagnostic lines, in order
    pub fn log_lines(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Log(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn popup_call(&mut self, primitive: &'static str, call: HostCall) -> Result<()> {
        if self.fail_popups {
            return Err(CallbackError::Host {
                primitive,
                reason: "popup primitives disabled".to_string(),
            });
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Host for RecordingHost {
    fn log(&mut self, message: &str) {
        self.calls.push(HostCall::Log(message.to_string()));
    }

    fn show_popup(&mut self, text: &str) -> Result<()> {
        self.popup_call("ShowPopup", HostCall::ShowPopup(text.to_string()))
    }

    fn close_popup(&mut self) -> Result<()> {
        self.popup_call("ClosePopup", HostCall::ClosePopup)
    }
}

/// Host that writes diagnostics through the `log` facade
///
/// Keeps track of the popup currently on screen. Only one popup is visible
/// at a time; showing a new one replaces the text.
#[derive(Debug, Default)]
pub struct LogHost {
    visible_popup: Option<String>,
}

impl LogHost {
    /// Create a host with no popup visible
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the popup currently on screen
    pub fn visible_popup(&self) -> Option<&str> {
        self.visible_popup.as_deref()
    }
}

impl Host for LogHost {
    fn log(&mut self, message: &str) {
        log::info!(target: "widget_callbacks::host", "{}", message);
    }

    fn show_popup(&mut self, text: &str) -> Result<()> {
        log::debug!("Showing popup: {:?}", text);
        self.visible_popup = Some(text.to_string());
        Ok(())
    }

    fn close_popup(&mut self) -> Result<()> {
        match self.visible_popup.take() {
            Some(text) => log::debug!("Closing popup: {:?}", text),
            None => log::debug!("No popup visible, nothing to close"),
        }
        Ok(())
    }
}
