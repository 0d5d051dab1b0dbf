//! Headless crawl runner: `crawler_app <hashtag> [count]`.
//!
//! Opens a visible browser window for the interactive login, then relays the
//! engine's progress events to the terminal until the run finishes.

mod logging;

use anyhow::{bail, Context};
use crawler_engine::{CrawlEvent, CrawlSettings, EngineHandle};
use crawler_logging::{crawler_info, crawler_warn};

/// Upper bound enforced here, not by the engine; it trusts its caller.
const MAX_TARGET_COUNT: usize = 500;
const DEFAULT_TARGET_COUNT: usize = 50;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::Both);

    let mut args = std::env::args().skip(1);
    let hashtag = args
        .next()
        .context("usage: crawler_app <hashtag> [count]")?;
    let target_count = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .context("count must be a positive integer")?,
        None => DEFAULT_TARGET_COUNT,
    };

    if hashtag.trim().is_empty() {
        bail!("hashtag must not be empty");
    }
    if target_count == 0 || target_count > MAX_TARGET_COUNT {
        bail!("count must be between 1 and {MAX_TARGET_COUNT}");
    }

    let engine = EngineHandle::new(CrawlSettings::default());
    engine.run(hashtag, target_count);

    while let Some(event) = engine.recv() {
        match event {
            CrawlEvent::Log(line) => crawler_info!("{line}"),
            CrawlEvent::Status(label) => crawler_info!("status: {label}"),
            CrawlEvent::Finished { success, message } => {
                if success {
                    crawler_info!("finished: {message}");
                    return Ok(());
                }
                crawler_warn!("finished: {message}");
                std::process::exit(1);
            }
        }
    }

    bail!("engine stopped without reporting a result");
}
