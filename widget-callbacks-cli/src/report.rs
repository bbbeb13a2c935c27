//! Host call transcript
//!
//! Wraps another host and timestamps every call that passes through it, so
//! a replay can be written out as JSON afterwards.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use widget_callbacks::{Host, HostCall};

/// One recorded host call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub call: HostCall,
}

/// Host that records calls before forwarding them
///
/// Popup calls are only recorded once the inner host accepted them.
pub struct TranscriptHost<H> {
    inner: H,
    entries: Vec<TranscriptEntry>,
}

impl<H: Host> TranscriptHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn record(&mut self, call: HostCall) {
        self.entries.push(TranscriptEntry {
            timestamp: Utc::now(),
            call,
        });
    }
}

impl<H: Host> Host for TranscriptHost<H> {
    fn log(&mut self, message: &str) {
        self.record(HostCall::Log(message.to_string()));
        self.inner.log(message);
    }

    fn show_popup(&mut self, text: &str) -> widget_callbacks::Result<()> {
        self.inner.show_popup(text)?;
        self.record(HostCall::ShowPopup(text.to_string()));
        Ok(())
    }

    fn close_popup(&mut self) -> widget_callbacks::Result<()> {
        self.inner.close_popup()?;
        self.record(HostCall::ClosePopup);
        Ok(())
    }
}

/// Write the transcript as pretty-printed JSON
pub fn write_transcript(path: &Path, entries: &[TranscriptEntry]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create transcript file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), entries)
        .with_context(|| format!("Failed to write transcript: {:?}", path))?;

    log::info!("Wrote {} host calls to {:?}", entries.len(), path);
    Ok(())
}
