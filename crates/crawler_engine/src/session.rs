use std::time::Duration;

use crawler_core::{build_search_url, format_tag, FormattedTag, PostRecord};
use crawler_logging::{crawler_info, crawler_warn};

use crate::chrome::ChromeSession;
use crate::collect::collect;
use crate::delay::{DelaySource, UniformDelay};
use crate::deliver::{DeliverySink, WebhookSink};
use crate::driver::FeedPage;
use crate::extract::{FeedSelectors, PostExtractor};
use crate::login::{await_login, LoginOutcome};
use crate::types::{CrawlError, ProgressSink, RunResult};

/// Explicit per-run configuration; nothing here is ambient process state.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Endpoint receiving the final record set.
    pub webhook_url: String,
    /// Bounds for the randomized pause after each scroll.
    pub scroll_pause_min: Duration,
    pub scroll_pause_max: Duration,
    /// Total budget for the human-completed login.
    pub login_deadline: Duration,
    /// Per-attempt probe window inside the login gate.
    pub login_probe_wait: Duration,
    /// Fixed desktop user agent reported by the session.
    pub user_agent: String,
    /// Browser window size.
    pub window: (u32, u32),
    pub locale: String,
    pub timezone: String,
    pub selectors: FeedSelectors,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            webhook_url: "https://shop.duckzill.com/api/twitter_scrap_webhook.php".to_string(),
            scroll_pause_min: Duration::from_millis(2000),
            scroll_pause_max: Duration::from_millis(5000),
            login_deadline: Duration::from_secs(300),
            login_probe_wait: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            window: (1024, 768),
            locale: "ko-KR".to_string(),
            timezone: "Asia/Seoul".to_string(),
            selectors: FeedSelectors::default(),
        }
    }
}

/// Steps of one run against an already-acquired page: navigate to the search
/// view, hold at the login gate, collect, deliver.
pub async fn run_session(
    page: &dyn FeedPage,
    settings: &CrawlSettings,
    delays: &dyn DelaySource,
    delivery: &dyn DeliverySink,
    tag: &FormattedTag,
    target_count: usize,
    sink: &dyn ProgressSink,
) -> Result<Vec<PostRecord>, CrawlError> {
    let search_url = build_search_url(&tag.encoded);
    sink.log(format!("navigating to {search_url}"));
    page.navigate(&search_url).await?;

    sink.status("awaiting login");
    sink.log("complete the login in the opened browser".to_string());
    match await_login(page, &search_url, settings, sink).await? {
        LoginOutcome::TimedOut => return Err(CrawlError::LoginTimeout),
        LoginOutcome::Authenticated => {}
    }
    sink.log("login detected".to_string());

    // Settle like a human would before the first scroll.
    let pause = delays.delay(settings.scroll_pause_min, settings.scroll_pause_max);
    tokio::time::sleep(pause).await;

    sink.status("collecting");
    let extractor = PostExtractor::new(settings.selectors.clone());
    let records = collect(page, target_count, &extractor, delays, settings, sink).await?;
    sink.log(format!("collected {} posts with images", records.len()));

    sink.status("delivering");
    delivery.deliver(&tag.formatted, &records).await?;
    sink.log("delivery accepted".to_string());

    Ok(records)
}

/// Owns the browser lifecycle and composes the login gate with the
/// collection loop. One invocation, one browser session, one result.
pub struct SessionDriver {
    settings: CrawlSettings,
    delays: Box<dyn DelaySource>,
    delivery: Box<dyn DeliverySink>,
}

impl SessionDriver {
    pub fn new(settings: CrawlSettings) -> Self {
        let delivery = WebhookSink::new(settings.webhook_url.clone());
        Self {
            settings,
            delays: Box::new(UniformDelay),
            delivery: Box::new(delivery),
        }
    }

    /// Assembles a driver from explicit parts; used by tests to inject a
    /// deterministic delay source or an alternate sink.
    pub fn with_parts(
        settings: CrawlSettings,
        delays: Box<dyn DelaySource>,
        delivery: Box<dyn DeliverySink>,
    ) -> Self {
        Self {
            settings,
            delays,
            delivery,
        }
    }

    /// Full run: acquire a browser, drive the session, tear down on every
    /// exit path, report exactly one terminal status.
    pub async fn run(
        &self,
        hashtag: &str,
        target_count: usize,
        sink: &dyn ProgressSink,
    ) -> RunResult {
        sink.status("launching browser");
        let session = match ChromeSession::launch(&self.settings).await {
            Ok(session) => session,
            Err(err) => {
                crawler_warn!("browser launch failed: {err}");
                sink.status(&format!("error: {err}"));
                return RunResult {
                    success: false,
                    records: Vec::new(),
                };
            }
        };

        let result = self
            .run_with_page(session.page(), hashtag, target_count, sink)
            .await;
        session.close().await;
        result
    }

    /// Run against a caller-provided page; the caller owns its teardown.
    pub async fn run_with_page(
        &self,
        page: &dyn FeedPage,
        hashtag: &str,
        target_count: usize,
        sink: &dyn ProgressSink,
    ) -> RunResult {
        let tag = format_tag(hashtag);
        sink.log(format!("search term: {}", tag.formatted));
        sink.log(format!("target: {target_count} posts"));

        match run_session(
            page,
            &self.settings,
            self.delays.as_ref(),
            self.delivery.as_ref(),
            &tag,
            target_count,
            sink,
        )
        .await
        {
            Ok(records) => {
                crawler_info!("run finished with {} records", records.len());
                sink.status("done");
                RunResult {
                    success: true,
                    records,
                }
            }
            Err(err) => {
                crawler_warn!("run failed: {err}");
                sink.log(format!("run failed: {err}"));
                // No partial record set on failure.
                sink.status(&format!("error: {err}"));
                RunResult {
                    success: false,
                    records: Vec::new(),
                }
            }
        }
    }
}
