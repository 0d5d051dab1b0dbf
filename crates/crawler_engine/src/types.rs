use std::sync::mpsc;

use crawler_core::PostRecord;
use thiserror::Error;

use crate::driver::DriverError;

/// One-way progress notifications from the engine to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// Human-readable trace line.
    Log(String),
    /// Coarse phase label, e.g. "collecting".
    Status(String),
    /// Terminal event for one run.
    Finished { success: bool, message: String },
}

/// Result of one crawl run. On any failure `records` is empty, even if some
/// records had been collected before the fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    pub records: Vec<PostRecord>,
}

/// Faults that abort a whole run. Per-item extraction faults never surface
/// here; they are absorbed as rejections inside the collection loop.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("login wait timed out")]
    LoginTimeout,
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("delivery rejected with http status {0}")]
    DeliveryStatus(u16),
    #[error("delivery transport failed: {0}")]
    DeliveryTransport(String),
}

/// Fire-and-forget event receiver; the engine never blocks on it.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);

    fn log(&self, message: String) {
        self.emit(CrawlEvent::Log(message));
    }

    fn status(&self, label: &str) {
        self.emit(CrawlEvent::Status(label.to_string()));
    }
}

/// Sink that forwards events over an mpsc channel, dropping them if the
/// receiving side has gone away.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<CrawlEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<CrawlEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: CrawlEvent) {
        let _ = self.tx.send(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: CrawlEvent) {}
}
