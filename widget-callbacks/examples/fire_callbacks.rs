//! Fire each callback once against a logging host
//!
//! Usage:
//!   cargo run -p widget-callbacks --example fire_callbacks [definition...]
//!
//! Example:
//!   cargo run -p widget-callbacks --example fire_callbacks "ShowPopupCallback('Hi')"

use std::env;
use widget_callbacks::{Caller, Dispatcher, LogHost};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut definitions: Vec<String> = env::args().skip(1).collect();
    if definitions.is_empty() {
        definitions = vec![
            "ButtonCallback".to_string(),
            "SwitchCallback".to_string(),
            "ShowPopupCallback('Hello from the demo')".to_string(),
            "ClosePopupCallback".to_string(),
        ];
    }

    let caller = Caller::switch("DemoSwitch", true);
    let mut dispatcher = Dispatcher::new(LogHost::new());

    for definition in &definitions {
        if let Err(e) = dispatcher.dispatch_str(definition, Some(&caller)) {
            eprintln!("{}: {}", definition, e);
        }
    }

    println!("\nDispatched {} of {} callbacks", dispatcher.dispatch_count(), definitions.len());
}
