//! Widget Callbacks CLI Application
//!
//! Command-line host for the widget-callbacks library.
//! It stands in for the GUI and adds:
//! - Session files describing widgets and their callback bindings
//! - Replay of clicks and switch changes through the dispatcher
//! - Direct one-off callback invocation
//! - JSON transcripts of every host call

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use widget_callbacks::{
    CallbackDefinition, Caller, DispatchConfig, Dispatcher, ErrorPolicy, LogHost,
};

mod config;
mod report;
mod session;

use report::TranscriptHost;

/// Widget Callbacks - Fire UI callbacks against a logging host
#[derive(Parser, Debug)]
#[command(name = "widget-callbacks-cli")]
#[command(about = "Replay widget interactions through UI callbacks", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a session file (session.toml) to replay
    #[arg(short, long, value_name = "FILE")]
    session: Option<PathBuf>,

    /// Callback definition to fire once, e.g. "ShowPopupCallback('Hi')"
    #[arg(long, value_name = "DEFINITION", conflicts_with = "session")]
    call: Option<String>,

    /// Name of the widget raising a --call
    #[arg(long, value_name = "NAME", default_value = "cli")]
    caller: String,

    /// Switch state of the widget raising a --call
    #[arg(long, value_name = "BOOL")]
    switch_state: Option<bool>,

    /// Log callback failures and keep going instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// Write every host call to this JSON file
    #[arg(short, long, value_name = "FILE")]
    transcript: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Widget Callbacks CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using callback library v{}", widget_callbacks::VERSION);

    if let Some(session_path) = &args.session {
        replay_mode(session_path, &args)?;
    } else if let Some(definition) = &args.call {
        call_mode(definition, &args)?;
    } else {
        // No arguments - show help
        println!("Widget Callbacks - No input specified");
        println!("\nQuick Start:");
        println!("  widget-callbacks-cli --call ButtonCallback --caller Btn1");
        println!("  widget-callbacks-cli --call SwitchCallback --caller Sw1 --switch-state true");
        println!("  widget-callbacks-cli --call \"ShowPopupCallback('Hello')\"");
        println!("\nReplay a session:");
        println!("  widget-callbacks-cli --session session.toml --transcript calls.json");
        println!("\nUse --help for more options");
    }

    Ok(())
}

/// Replay mode - load a session and play its events
fn replay_mode(session_path: &Path, args: &Args) -> Result<()> {
    log::info!("Loading session from: {:?}", session_path);
    let session_config = config::load_session(session_path)?;
    log::debug!(
        "Session loaded: {} widgets, {} events",
        session_config.widgets.len(),
        session_config.events.len()
    );

    let mut dispatch_config = session_config.dispatch.clone();
    if args.keep_going {
        dispatch_config = dispatch_config.with_error_policy(ErrorPolicy::LogAndContinue);
    }

    let mut dispatcher = Dispatcher::with_config(TranscriptHost::new(LogHost::new()), dispatch_config);
    let mut session = session::Session::new(&session_config);
    let summary = session.replay(&mut dispatcher)?;

    log::info!(
        "Replayed {} events: {} callbacks fired, {} unbound clicks",
        summary.events,
        summary.callbacks_fired,
        summary.unbound_clicks
    );
    for widget in &session_config.widgets {
        if let Some(state) = session.switch_state(&widget.name) {
            log::debug!("{}: final switch state {}", widget.name, if state { "ON" } else { "OFF" });
        }
    }

    finish(dispatcher, args.transcript.as_deref())
}

/// Call mode - fire one callback definition
fn call_mode(definition: &str, args: &Args) -> Result<()> {
    let definition: CallbackDefinition = definition.parse()?;
    let caller = Caller {
        name: args.caller.clone(),
        switch_state: args.switch_state,
    };

    let mut dispatch_config = DispatchConfig::new();
    if args.keep_going {
        dispatch_config = dispatch_config.with_error_policy(ErrorPolicy::LogAndContinue);
    }

    let mut dispatcher = Dispatcher::with_config(TranscriptHost::new(LogHost::new()), dispatch_config);
    dispatcher.dispatch(&definition, Some(&caller))?;

    finish(dispatcher, args.transcript.as_deref())
}

fn finish(dispatcher: Dispatcher<TranscriptHost<LogHost>>, transcript: Option<&Path>) -> Result<()> {
    let host = dispatcher.into_host();

    if let Some(text) = host.inner().visible_popup() {
        log::info!("Popup still visible: {:?}", text);
    }

    if let Some(path) = transcript {
        report::write_transcript(path, host.entries())?;
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
