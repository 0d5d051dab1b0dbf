use std::sync::{mpsc, Arc};
use std::thread;

use crate::session::{CrawlSettings, SessionDriver};
use crate::types::{ChannelProgressSink, CrawlEvent};

enum EngineCommand {
    Run {
        hashtag: String,
        target_count: usize,
    },
}

/// Handle for a host process: commands in, progress events out.
///
/// Runs are executed one at a time on a dedicated thread with its own tokio
/// runtime; a run never shares a browser session or dedup state with another.
/// The caller is expected to validate its inputs (non-empty hashtag, bounded
/// positive count) before invoking.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<CrawlEvent>,
}

impl EngineHandle {
    pub fn new(settings: CrawlSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let driver = Arc::new(SessionDriver::new(settings));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let driver = driver.clone();
                let event_tx = event_tx.clone();
                runtime.block_on(async move {
                    handle_command(driver.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Enqueues one crawl run.
    pub fn run(&self, hashtag: impl Into<String>, target_count: usize) {
        let _ = self.cmd_tx.send(EngineCommand::Run {
            hashtag: hashtag.into(),
            target_count,
        });
    }

    /// Non-blocking event drain.
    pub fn try_recv(&self) -> Option<CrawlEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocking event drain; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<CrawlEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    driver: &SessionDriver,
    command: EngineCommand,
    event_tx: mpsc::Sender<CrawlEvent>,
) {
    match command {
        EngineCommand::Run {
            hashtag,
            target_count,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = driver.run(&hashtag, target_count, &sink).await;
            let message = if result.success {
                format!("collected {} posts", result.records.len())
            } else {
                "crawl failed, see log".to_string()
            };
            let _ = event_tx.send(CrawlEvent::Finished {
                success: result.success,
                message,
            });
        }
    }
}
