use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetTimezoneOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures_util::StreamExt;

use crawler_logging::{crawler_debug, crawler_info};

use crate::driver::{DriverError, FeedItem, FeedPage};
use crate::session::CrawlSettings;

/// Launch flags that keep the automated session from advertising itself.
const BROWSER_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--disable-web-security",
    "--disable-features=IsolateOrigins,site-per-process",
    "--disable-site-isolation-trials",
];

/// How often the probe script re-checks for its selector.
const PROBE_POLL_MS: u64 = 500;

/// One live headful Chrome session driven over CDP.
///
/// Exactly one acquisition per run; [`ChromeSession::close`] releases it on
/// every exit path and swallows teardown faults, closing an already-dead
/// browser must never turn into a reported failure.
pub struct ChromeSession {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    page: ChromePage,
}

impl ChromeSession {
    pub async fn launch(settings: &CrawlSettings) -> Result<Self, DriverError> {
        let (width, height) = settings.window;
        let config = BrowserConfig::builder()
            .with_head()
            .window_size(width, height)
            .args(launch_args(settings))
            .build()
            .map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| DriverError::Launch(err.to_string()))?;

        // The CDP event stream must be pumped for the whole session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| DriverError::Launch(err.to_string()))?;

        // Mask the automation fingerprint before any navigation happens.
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            anti_detection_script(&settings.locale),
        ))
        .await
        .map_err(|err| DriverError::Launch(err.to_string()))?;

        let timezone = SetTimezoneOverrideParams::builder()
            .timezone_id(settings.timezone.clone())
            .build()
            .map_err(DriverError::Launch)?;
        page.execute(timezone)
            .await
            .map_err(|err| DriverError::Launch(err.to_string()))?;

        crawler_info!("browser session ready ({width}x{height}, {})", settings.locale);
        Ok(Self {
            browser,
            handler_task,
            page: ChromePage { page },
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// Tears the browser down; faults are swallowed unconditionally.
    pub async fn close(mut self) {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        crawler_debug!("browser session closed");
    }
}

fn launch_args(settings: &CrawlSettings) -> Vec<String> {
    let mut args: Vec<String> = BROWSER_ARGS.iter().map(|arg| arg.to_string()).collect();
    args.push(format!("--user-agent={}", settings.user_agent));
    args.push(format!("--lang={}", settings.locale));
    args
}

/// Reports the session as an ordinary user profile: no `webdriver` flag, a
/// plausible plugin list and the configured language preferences.
fn anti_detection_script(locale: &str) -> String {
    let base = locale.split('-').next().unwrap_or(locale);
    format!(
        r#"
Object.defineProperty(navigator, 'webdriver', {{ get: () => undefined }});
Object.defineProperty(navigator, 'plugins', {{ get: () => [1, 2, 3, 4, 5] }});
Object.defineProperty(navigator, 'languages', {{ get: () => ['{locale}', '{base}', 'en-US', 'en'] }});
"#
    )
}

/// [`FeedPage`] over a live CDP page. All DOM reads go through evaluated
/// scripts; items are addressed by their index in the item selector's match
/// list, so a node that detaches between enumeration and read simply resolves
/// to empty values and gets rejected downstream.
#[derive(Clone)]
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn eval_value<T: serde::de::DeserializeOwned>(
        &self,
        script: String,
    ) -> Result<T, DriverError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|err| DriverError::Script(err.to_string()))?
            .into_value::<T>()
            .map_err(|err| DriverError::Script(err.to_string()))
    }
}

#[async_trait]
impl FeedPage for ChromePage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.page
            .goto(url)
            .await
            .map_err(|err| DriverError::Navigation(err.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|err| DriverError::Navigation(err.to_string()))?;
        Ok(())
    }

    async fn items(&self, selector: &str) -> Result<Vec<Box<dyn FeedItem>>, DriverError> {
        let script = format!(
            "document.querySelectorAll({}).length",
            js_quote(selector)
        );
        let count: u64 = self.eval_value(script).await?;
        Ok((0..count as usize)
            .map(|index| {
                Box::new(ChromeItem {
                    page: self.page.clone(),
                    item_selector: selector.to_string(),
                    index,
                }) as Box<dyn FeedItem>
            })
            .collect())
    }

    async fn probe(&self, selector: &str, wait: Duration) -> Result<bool, DriverError> {
        let attempts = (wait.as_millis() as u64 / PROBE_POLL_MS).max(1);
        let script = format!(
            r#"
(async () => {{
    for (let i = 0; i < {attempts}; i++) {{
        if (document.querySelector({sel})) {{
            return true;
        }}
        await new Promise(resolve => setTimeout(resolve, {PROBE_POLL_MS}));
    }}
    return false;
}})()
"#,
            sel = js_quote(selector),
        );
        self.eval_value(script).await
    }

    async fn scroll_to_bottom(&self) -> Result<(), DriverError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|err| DriverError::Script(err.to_string()))?;
        Ok(())
    }

    async fn scroll_extent(&self) -> Result<f64, DriverError> {
        self.eval_value("document.body.scrollHeight".to_string())
            .await
    }
}

struct ChromeItem {
    page: Page,
    item_selector: String,
    index: usize,
}

impl ChromeItem {
    fn item_expr(&self) -> String {
        format!(
            "document.querySelectorAll({})[{}]",
            js_quote(&self.item_selector),
            self.index
        )
    }

    async fn eval_value<T: serde::de::DeserializeOwned>(
        &self,
        script: String,
    ) -> Result<T, DriverError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|err| DriverError::Script(err.to_string()))?
            .into_value::<T>()
            .map_err(|err| DriverError::Script(err.to_string()))
    }
}

#[async_trait]
impl FeedItem for ChromeItem {
    async fn text_of(&self, selector: &str) -> Result<String, DriverError> {
        let script = format!(
            r#"
(() => {{
    const item = {item};
    if (!item) return "";
    const el = item.querySelector({sel});
    return el ? el.innerText : "";
}})()
"#,
            item = self.item_expr(),
            sel = js_quote(selector),
        );
        self.eval_value(script).await
    }

    async fn attr_of(&self, selector: &str, name: &str) -> Result<String, DriverError> {
        let script = format!(
            r#"
(() => {{
    const item = {item};
    if (!item) return "";
    const el = item.querySelector({sel});
    return (el && el.getAttribute({attr})) || "";
}})()
"#,
            item = self.item_expr(),
            sel = js_quote(selector),
            attr = js_quote(name),
        );
        self.eval_value(script).await
    }

    async fn attr_all(&self, selector: &str, name: &str) -> Result<Vec<String>, DriverError> {
        let script = format!(
            r#"
(() => {{
    const item = {item};
    if (!item) return [];
    return Array.from(item.querySelectorAll({sel}))
        .map(el => el.getAttribute({attr}))
        .filter(value => value !== null && value !== "");
}})()
"#,
            item = self.item_expr(),
            sel = js_quote(selector),
            attr = js_quote(name),
        );
        self.eval_value(script).await
    }
}

/// Quote a string as a single-quoted JS literal.
fn js_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
