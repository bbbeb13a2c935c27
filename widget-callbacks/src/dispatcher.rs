//! Main dispatch API
//!
//! This module provides the entry point a host uses to fire callbacks by
//! name. The Dispatcher resolves a [`CallbackDefinition`] to one of the
//! known handlers and calls it with the triggering widget and the
//! definition's literal arguments.

use crate::config::DispatchConfig;
use crate::definition::CallbackDefinition;
use crate::handlers::CallbackHandlers;
use crate::host::Host;
use crate::types::{CallbackError, Caller, Result};
use std::fmt;

/// The callbacks a host can bind widgets to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Button press
    ButtonClick,
    /// Switch state change
    SwitchToggle,
    /// Request to show a popup
    ShowPopup,
    /// Request to close the popup
    ClosePopup,
}

impl CallbackKind {
    /// Every callback, in registration order
    pub const ALL: [CallbackKind; 4] = [
        CallbackKind::ButtonClick,
        CallbackKind::SwitchToggle,
        CallbackKind::ShowPopup,
        CallbackKind::ClosePopup,
    ];

    /// Name the callback is registered under
    pub fn name(self) -> &'static str {
        match self {
            CallbackKind::ButtonClick => "ButtonCallback",
            CallbackKind::SwitchToggle => "SwitchCallback",
            CallbackKind::ShowPopup => "ShowPopupCallback",
            CallbackKind::ClosePopup => "ClosePopupCallback",
        }
    }

    /// Look up a callback by its registered name (case sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves callback definitions and runs the matching handler
pub struct Dispatcher<H> {
    handlers: CallbackHandlers<H>,
    config: DispatchConfig,
    dispatched: usize,
}

impl<H: Host> Dispatcher<H> {
    /// Create a dispatcher with default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, DispatchConfig::default())
    }

    /// Create a dispatcher with the given configuration
    pub fn with_config(host: H, config: DispatchConfig) -> Self {
        Self {
            handlers: CallbackHandlers::new(host),
            config,
            dispatched: 0,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Borrow the host
    pub fn host(&self) -> &H {
        self.handlers.host()
    }

    /// Give the host back
    pub fn into_host(self) -> H {
        self.handlers.into_host()
    }

    /// Number of callbacks that completed successfully
    pub fn dispatch_count(&self) -> usize {
        self.dispatched
    }

    /// Fire the callback named by `definition`
    ///
    /// # Arguments
    /// * `definition` - Parsed callback binding (name plus literal arguments)
    /// * `caller` - Widget that raised the event, if any
    ///
    /// # Example
    /// ```
    /// use widget_callbacks::{CallbackDefinition, Caller, Dispatcher, HostCall, RecordingHost};
    ///
    /// let mut dispatcher = Dispatcher::new(RecordingHost::new());
    /// let definition: CallbackDefinition = "ShowPopupCallback('Hello')".parse().unwrap();
    /// dispatcher.dispatch(&definition, Some(&Caller::new("Btn1"))).unwrap();
    ///
    /// assert_eq!(dispatcher.host().calls()[1], HostCall::ShowPopup("Hello".into()));
    /// ```
    pub fn dispatch(&mut self, definition: &CallbackDefinition, caller: Option<&Caller>) -> Result<()> {
        match self.invoke(definition, caller) {
            Ok(()) => {
                self.dispatched += 1;
                Ok(())
            }
            Err(e) if self.config.continues_on_error() => {
                log::error!("Error while executing callback {}: {}", definition.function_name, e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse `definition` and fire it
    pub fn dispatch_str(&mut self, definition: &str, caller: Option<&Caller>) -> Result<()> {
        match CallbackDefinition::parse(definition) {
            Ok(parsed) => self.dispatch(&parsed, caller),
            Err(e) if self.config.continues_on_error() => {
                log::error!("Ignoring malformed callback definition {:?}: {}", definition, e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn invoke(&mut self, definition: &CallbackDefinition, caller: Option<&Caller>) -> Result<()> {
        let kind = CallbackKind::from_name(&definition.function_name)
            .ok_or_else(|| CallbackError::UnknownCallback(definition.function_name.clone()))?;

        log::debug!(
            "Dispatching {} (caller: {}, args: {:?})",
            kind,
            caller.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            definition.args
        );

        match kind {
            CallbackKind::ButtonClick => {
                let caller = caller.ok_or(CallbackError::MissingCaller(kind.name()))?;
                self.handlers.on_button_click(caller);
                Ok(())
            }
            CallbackKind::SwitchToggle => {
                let caller = caller.ok_or(CallbackError::MissingCaller(kind.name()))?;
                self.handlers.on_switch_toggle(caller)
            }
            CallbackKind::ShowPopup => {
                let caller = caller.ok_or(CallbackError::MissingCaller(kind.name()))?;
                let text = definition.arg(0).ok_or(CallbackError::MissingArgument {
                    callback: kind.name(),
                    index: 0,
                })?;
                self.handlers.on_show_popup(caller, text)
            }
            CallbackKind::ClosePopup => self.handlers.on_close_popup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorPolicy;
    use crate::host::RecordingHost;
    use crate::types::HostCall;

    fn dispatcher() -> Dispatcher<RecordingHost> {
        Dispatcher::new(RecordingHost::new())
    }

    #[test]
    fn test_callback_kind_names() {
        for kind in CallbackKind::ALL {
            assert_eq!(CallbackKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CallbackKind::from_name("buttoncallback"), None);
        assert_eq!(CallbackKind::ShowPopup.to_string(), "ShowPopupCallback");
    }

    #[test]
    fn test_dispatch_each_callback() {
        let mut dispatcher = dispatcher();
        let button = Caller::new("Btn1");
        let switch = Caller::switch("Sw1", true);

        dispatcher.dispatch_str("ButtonCallback", Some(&button)).unwrap();
        dispatcher.dispatch_str("SwitchCallback", Some(&switch)).unwrap();
        dispatcher.dispatch_str("ShowPopupCallback('Hello')", Some(&button)).unwrap();
        dispatcher.dispatch_str("ClosePopupCallback()", Some(&button)).unwrap();

        assert_eq!(
            dispatcher.host().calls(),
            &[
                HostCall::Log("Button clicked! (Btn1)".into()),
                HostCall::Log("Switch is ON! (Sw1)".into()),
                HostCall::Log("Popup shown!".into()),
                HostCall::ShowPopup("Hello".into()),
                HostCall::Log("Popup closed!".into()),
                HostCall::ClosePopup,
            ]
        );
        assert_eq!(dispatcher.dispatch_count(), 4);
    }

    #[test]
    fn test_close_popup_needs_no_caller() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch_str("ClosePopupCallback", None).unwrap();
        assert_eq!(dispatcher.host().calls().len(), 2);
    }

    #[test]
    fn test_dispatch_errors() {
        let mut dispatcher = dispatcher();
        let button = Caller::new("Btn1");

        let err = dispatcher.dispatch_str("Nope", Some(&button)).unwrap_err();
        assert!(matches!(err, CallbackError::UnknownCallback(ref name) if name == "Nope"));

        let err = dispatcher.dispatch_str("ButtonCallback", None).unwrap_err();
        assert!(matches!(err, CallbackError::MissingCaller("ButtonCallback")));

        let err = dispatcher.dispatch_str("ShowPopupCallback", Some(&button)).unwrap_err();
        assert!(matches!(err, CallbackError::MissingArgument { index: 0, .. }));

        let err = dispatcher.dispatch_str("SwitchCallback", Some(&button)).unwrap_err();
        assert!(matches!(err, CallbackError::MissingAttribute("switchState")));

        let err = dispatcher.dispatch_str("ShowPopupCallback('x", Some(&button)).unwrap_err();
        assert!(matches!(err, CallbackError::Definition(_)));

        assert_eq!(dispatcher.dispatch_count(), 0);
        assert!(dispatcher.host().calls().is_empty());
    }

    #[test]
    fn test_log_and_continue_policy() {
        let config = DispatchConfig::new().with_error_policy(ErrorPolicy::LogAndContinue);
        let mut dispatcher = Dispatcher::with_config(RecordingHost::new(), config);

        dispatcher.dispatch_str("Nope", None).unwrap();
        dispatcher.dispatch_str("ShowPopupCallback('x", None).unwrap();
        dispatcher.dispatch_str("ButtonCallback", Some(&Caller::new("Btn2"))).unwrap();

        assert_eq!(dispatcher.dispatch_count(), 1);
        assert_eq!(dispatcher.host().log_lines(), vec!["Button clicked! (Btn2)"]);
    }

    #[test]
    fn test_host_failure_propagates() {
        let mut dispatcher = Dispatcher::new(RecordingHost::new().with_failing_popups(true));
        let err = dispatcher.dispatch_str("ClosePopupCallback", None).unwrap_err();
        assert!(matches!(err, CallbackError::Host { primitive: "ClosePopup", .. }));
        assert_eq!(dispatcher.host().log_lines(), vec!["Popup closed!"]);
    }

    #[test]
    fn test_dispatch_through_borrowed_host() {
        let mut host = RecordingHost::new();
        {
            let mut dispatcher = Dispatcher::new(&mut host);
            dispatcher.dispatch_str("ButtonCallback", Some(&Caller::new("Btn3"))).unwrap();
        }
        assert_eq!(host.log_lines(), vec!["Button clicked! (Btn3)"]);
    }
}
