//! Widget Callbacks Library
//!
//! Event handlers a GUI host invokes when the user interacts with a widget:
//! a button press, a switch changing state, and requests to show or close a
//! popup.
//!
//! # Architecture
//!
//! This library is intentionally small and synchronous:
//! - Each handler runs to completion on the host's thread, one call per event
//! - Handlers reach the outside world only through an injected [`Host`]
//! - Widgets arrive as a validated [`Caller`] instead of a loose object
//! - The [`Dispatcher`] resolves callback definitions such as
//!   `ShowPopupCallback('Hello')` to the matching handler
//!
//! The library does NOT:
//! - Queue, debounce or de-duplicate events
//! - Build widget trees or track widget state between events
//! - Implement the popup or output primitives themselves
//!
//! Session replay and logging setup live in the application layer
//! (widget-callbacks-cli).
//!
//! # Example Usage
//!
//! ```
//! use widget_callbacks::{Caller, Dispatcher, HostCall, RecordingHost};
//!
//! let mut dispatcher = Dispatcher::new(RecordingHost::new());
//!
//! dispatcher
//!     .dispatch_str("SwitchCallback", Some(&Caller::switch("Sw1", true)))
//!     .unwrap();
//! dispatcher.dispatch_str("ClosePopupCallback", None).unwrap();
//!
//! assert_eq!(
//!     dispatcher.host().calls(),
//!     &[
//!         HostCall::Log("Switch is ON! (Sw1)".into()),
//!         HostCall::Log("Popup closed!".into()),
//!         HostCall::ClosePopup,
//!     ]
//! );
//! ```

// Public modules
pub mod config;
pub mod definition;
pub mod dispatcher;
pub mod handlers;
pub mod host;
pub mod types;

// Re-export main types for convenience
pub use config::{DispatchConfig, ErrorPolicy};
pub use definition::CallbackDefinition;
pub use dispatcher::{CallbackKind, Dispatcher};
pub use handlers::CallbackHandlers;
pub use host::{Host, LogHost, RecordingHost};
pub use types::{CallbackError, Caller, DefinitionError, HostCall, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
