//! Session replay
//!
//! Plays the role of the widget system: keeps each switch's current state,
//! turns a click into the callbacks the widget is bound to, and hands them
//! to the dispatcher one at a time.

use crate::config::{EventAction, EventConfig, SessionConfig, WidgetConfig, WidgetKind};
use anyhow::{Context, Result};
use std::collections::HashMap;
use widget_callbacks::{CallbackDefinition, Caller, Dispatcher, Host};

/// Counters reported after a replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub callbacks_fired: usize,
    pub unbound_clicks: usize,
}

/// Widgets and their live state during a replay
pub struct Session<'a> {
    config: &'a SessionConfig,
    switch_states: HashMap<&'a str, bool>,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a SessionConfig) -> Self {
        let switch_states = config
            .widgets
            .iter()
            .filter(|w| w.kind == WidgetKind::Switch)
            .map(|w| (w.name.as_str(), w.switch_state))
            .collect();

        Self {
            config,
            switch_states,
        }
    }

    /// Current state of a switch
    pub fn switch_state(&self, name: &str) -> Option<bool> {
        self.switch_states.get(name).copied()
    }

    /// Replay every configured event in order
    pub fn replay<H: Host>(&mut self, dispatcher: &mut Dispatcher<H>) -> Result<ReplaySummary> {
        let config = self.config;
        let mut summary = ReplaySummary::default();

        for (index, event) in config.events.iter().enumerate() {
            let widget = config
                .widget(&event.widget)
                .with_context(|| format!("Event #{} references unknown widget '{}'", index, event.widget))?;

            for _ in 0..event.repeat {
                self.apply(widget, event, dispatcher, &mut summary)
                    .with_context(|| format!("Event #{} on widget '{}' failed", index, widget.name))?;
                summary.events += 1;
            }
        }

        Ok(summary)
    }

    fn apply<H: Host>(
        &mut self,
        widget: &'a WidgetConfig,
        event: &EventConfig,
        dispatcher: &mut Dispatcher<H>,
        summary: &mut ReplaySummary,
    ) -> Result<()> {
        match event.action {
            EventAction::SetState => {
                let state = event.state.context("set_state requires a 'state' value")?;
                log::debug!("{}: state set to {}", widget.name, state);
                self.switch_states.insert(widget.name.as_str(), state);
                Ok(())
            }
            EventAction::Click => self.click(widget, dispatcher, summary),
        }
    }

    /// A switch flips and fires its state callback before the click callback
    fn click<H: Host>(
        &mut self,
        widget: &'a WidgetConfig,
        dispatcher: &mut Dispatcher<H>,
        summary: &mut ReplaySummary,
    ) -> Result<()> {
        let mut fired: Vec<&CallbackDefinition> = Vec::with_capacity(2);

        let caller = match widget.kind {
            WidgetKind::Button => Caller::new(widget.name.as_str()),
            WidgetKind::Switch => {
                let state = self.switch_states.entry(widget.name.as_str()).or_insert(false);
                *state = !*state;
                let binding = if *state {
                    widget.on_switch_on.as_ref()
                } else {
                    widget.on_switch_off.as_ref()
                };
                fired.extend(binding);
                Caller::switch(widget.name.as_str(), *state)
            }
        };
        fired.extend(widget.on_click.as_ref());

        if fired.is_empty() {
            log::debug!("{}: clicked, no callback bound", widget.name);
            summary.unbound_clicks += 1;
            return Ok(());
        }

        for definition in fired {
            log::debug!("{}: firing {}", caller, definition);
            dispatcher.dispatch(definition, Some(&caller))?;
            summary.callbacks_fired += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_session;
    use widget_callbacks::{HostCall, RecordingHost};

    const SESSION: &str = r#"
        [[widgets]]
        name = "Btn1"
        kind = "button"
        on_click = "ButtonCallback"

        [[widgets]]
        name = "Sw1"
        kind = "switch"
        on_switch_on = "SwitchCallback"
        on_switch_off = "SwitchCallback"

        [[widgets]]
        name = "Open"
        kind = "button"
        on_click = "ShowPopupCallback('Hello')"

        [[widgets]]
        name = "Close"
        kind = "button"
        on_click = "ClosePopupCallback"

        [[widgets]]
        name = "Idle"
        kind = "button"

        [[events]]
        widget = "Btn1"

        [[events]]
        widget = "Sw1"
        repeat = 2

        [[events]]
        widget = "Open"

        [[events]]
        widget = "Close"

        [[events]]
        widget = "Idle"
    "#;

    #[test]
    fn test_replay_fires_bound_callbacks_in_order() {
        let config = parse_session(SESSION).unwrap();
        let mut session = Session::new(&config);
        let mut dispatcher = Dispatcher::new(RecordingHost::new());

        let summary = session.replay(&mut dispatcher).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                events: 6,
                callbacks_fired: 5,
                unbound_clicks: 1,
            }
        );
        assert_eq!(
            dispatcher.host().calls(),
            &[
                HostCall::Log("Button clicked! (Btn1)".into()),
                HostCall::Log("Switch is ON! (Sw1)".into()),
                HostCall::Log("Switch is OFF! (Sw1)".into()),
                HostCall::Log("Popup shown!".into()),
                HostCall::ShowPopup("Hello".into()),
                HostCall::Log("Popup closed!".into()),
                HostCall::ClosePopup,
            ]
        );
        assert_eq!(session.switch_state("Sw1"), Some(false));
    }

    #[test]
    fn test_set_state_fires_nothing() {
        let config = parse_session(
            r#"
            [[widgets]]
            name = "Sw1"
            kind = "switch"
            on_switch_on = "SwitchCallback"
            on_switch_off = "SwitchCallback"

            [[events]]
            widget = "Sw1"
            action = "set_state"
            state = true

            [[events]]
            widget = "Sw1"
        "#,
        )
        .unwrap();
        let mut session = Session::new(&config);
        let mut dispatcher = Dispatcher::new(RecordingHost::new());

        session.replay(&mut dispatcher).unwrap();

        assert_eq!(dispatcher.host().log_lines(), vec!["Switch is OFF! (Sw1)"]);
    }

    #[test]
    fn test_switch_click_binding_sees_new_state() {
        let config = parse_session(
            r#"
            [[widgets]]
            name = "Sw2"
            kind = "switch"
            on_click = "SwitchCallback"

            [[events]]
            widget = "Sw2"
        "#,
        )
        .unwrap();
        let mut session = Session::new(&config);
        let mut dispatcher = Dispatcher::new(RecordingHost::new());

        session.replay(&mut dispatcher).unwrap();

        assert_eq!(dispatcher.host().log_lines(), vec!["Switch is ON! (Sw2)"]);
    }

    #[test]
    fn test_dispatch_failure_stops_replay() {
        let config = parse_session(
            r#"
            [[widgets]]
            name = "Btn1"
            kind = "button"
            on_click = "SwitchCallback"

            [[widgets]]
            name = "Btn2"
            kind = "button"
            on_click = "ButtonCallback"

            [[events]]
            widget = "Btn1"

            [[events]]
            widget = "Btn2"
        "#,
        )
        .unwrap();
        let mut session = Session::new(&config);
        let mut dispatcher = Dispatcher::new(RecordingHost::new());

        let err = session.replay(&mut dispatcher).unwrap_err();
        assert!(err.to_string().contains("Event #0 on widget 'Btn1' failed"));
        assert!(dispatcher.host().calls().is_empty());
    }
}
