//! The callback handlers
//!
//! One method per UI event type. Each handler writes its diagnostic line
//! first and only then touches the host's popup primitives.

use crate::host::Host;
use crate::types::{Caller, Result};

/// Diagnostic emitted when a popup is shown
pub const POPUP_SHOWN_MESSAGE: &str = "Popup shown!";

/// Diagnostic emitted when a popup is closed
pub const POPUP_CLOSED_MESSAGE: &str = "Popup closed!";

/// The handler set, bound to the host it reports to
#[derive(Debug)]
pub struct CallbackHandlers<H> {
    host: H,
}

impl<H: Host> CallbackHandlers<H> {
    /// Create a handler set that calls into `host`
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Borrow the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back
    pub fn into_host(self) -> H {
        self.host
    }

    /// A button was pressed
    pub fn on_button_click(&mut self, caller: &Caller) {
        let button_id = &caller.name;
        self.host.log(&format!("Button clicked! ({})", button_id));
    }

    /// A switch changed state
    ///
    /// Fails if the caller carries no switch state.
    pub fn on_switch_toggle(&mut self, caller: &Caller) -> Result<()> {
        let caller_name = &caller.name;
        let message = if caller.require_switch_state()? {
            format!("Switch is ON! ({})", caller_name)
        } else {
            format!("Switch is OFF! ({})", caller_name)
        };
        self.host.log(&message);
        Ok(())
    }

    /// A popup was requested
    ///
    /// The caller only identifies the triggering widget; it does not change
    /// what is displayed.
    pub fn on_show_popup(&mut self, _caller: &Caller, popup_text: &str) -> Result<()> {
        self.host.log(POPUP_SHOWN_MESSAGE);
        self.host.show_popup(popup_text)
    }

    /// The visible popup should be dismissed
    pub fn on_close_popup(&mut self) -> Result<()> {
        self.host.log(POPUP_CLOSED_MESSAGE);
        self.host.close_popup()
    }
}
