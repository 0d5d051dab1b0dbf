use crawler_core::{CollectState, ItemDisposition, PostRecord, StopReason};
use crawler_logging::{crawler_debug, crawler_info, crawler_warn};

use crate::delay::DelaySource;
use crate::driver::{DriverError, FeedPage};
use crate::extract::PostExtractor;
use crate::session::CrawlSettings;
use crate::types::ProgressSink;

/// Scroll-driven incremental collection: enumerate visible items, dedupe by
/// text fingerprint, extract, then scroll and settle; repeat until the target
/// count is reached or progress stagnates.
///
/// Per-item faults are contained here (skip) or inside the extractor
/// (rejection); only page-level faults abort the run.
pub async fn collect(
    page: &dyn FeedPage,
    target_count: usize,
    extractor: &PostExtractor,
    delays: &dyn DelaySource,
    settings: &CrawlSettings,
    sink: &dyn ProgressSink,
) -> Result<Vec<PostRecord>, DriverError> {
    let selectors = extractor.selectors();
    let mut state = CollectState::new(target_count);

    loop {
        state.begin_pass();
        let items = page.items(&selectors.item).await?;
        crawler_debug!("pass enumerated {} visible items", items.len());

        for item in items {
            // Cheap text read for dedup, without full extraction.
            let text = match item.text_of(&selectors.text).await {
                Ok(text) => text,
                Err(err) => {
                    crawler_warn!("item text read failed: {err}");
                    sink.log(format!("item read failed: {err}"));
                    continue;
                }
            };

            if state.observe_text(&text) == ItemDisposition::Duplicate {
                continue;
            }

            if let Some(record) = extractor.extract(item.as_ref()).await {
                state.accept(record);
                if state.target_reached() {
                    break;
                }
            }
        }

        sink.log(format!(
            "collected {}/{}",
            state.accepted_len(),
            state.target()
        ));

        state.finish_pass();
        match state.should_stop() {
            Some(StopReason::TargetReached) => break,
            Some(StopReason::Stagnated) => {
                crawler_info!("feed stagnated at {} records", state.accepted_len());
                sink.log("no new posts are loading".to_string());
                break;
            }
            None => {}
        }

        page.scroll_to_bottom().await?;
        let pause = delays.delay(settings.scroll_pause_min, settings.scroll_pause_max);
        tokio::time::sleep(pause).await;

        let extent = page.scroll_extent().await?;
        state.record_extent(extent);
    }

    Ok(state.into_records())
}
