use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Browser-level faults. Per-item read errors are absorbed by the extractor;
/// everything else propagates and aborts the run.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("page script failed: {0}")]
    Script(String),
}

/// One feed item, exposed as an opaque capability: fields are read through
/// sub-selectors relative to the item node.
///
/// Reads resolve to empty values rather than failing when the target element
/// or attribute is absent; `Err` means the underlying page went away (detached
/// node, navigation) and the caller treats the item as rejected.
#[async_trait]
pub trait FeedItem: Send + Sync {
    /// Inner text of the first match of `selector`, or empty if none.
    async fn text_of(&self, selector: &str) -> Result<String, DriverError>;

    /// `name` attribute of the first match of `selector`, or empty if absent.
    async fn attr_of(&self, selector: &str, name: &str) -> Result<String, DriverError>;

    /// `name` attribute of every match of `selector`, in DOM order, skipping
    /// elements without the attribute.
    async fn attr_all(&self, selector: &str, name: &str) -> Result<Vec<String>, DriverError>;
}

/// One page of the automated browser, reduced to the operations the
/// collection engine needs. A replay-from-fixture double satisfies this
/// interface just as well as the live CDP session does.
#[async_trait]
pub trait FeedPage: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Handles for every feed item currently in the DOM.
    async fn items(&self, selector: &str) -> Result<Vec<Box<dyn FeedItem>>, DriverError>;

    /// Polls for `selector` until it matches or `wait` elapses. Returns
    /// whether it was found within the budget.
    async fn probe(&self, selector: &str, wait: Duration) -> Result<bool, DriverError>;

    async fn scroll_to_bottom(&self) -> Result<(), DriverError>;

    /// Current scrollable extent of the document body.
    async fn scroll_extent(&self) -> Result<f64, DriverError>;
}
