//! Scripted in-memory feed double: replays canned passes without a browser.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crawler_engine::{CrawlEvent, DriverError, FeedItem, FeedPage, FeedSelectors, ProgressSink};

/// One canned feed item. Cloning shares the extraction-attempt counter, so a
/// re-rendered item can be asserted to have been attempted at most once.
#[derive(Clone, Default)]
pub struct FakeItem {
    pub text: String,
    pub author: String,
    pub timestamp: String,
    pub likes: String,
    pub retweets: String,
    pub images: Vec<String>,
    pub link: String,
    pub detached: bool,
    pub extraction_attempts: Arc<AtomicUsize>,
}

impl FakeItem {
    pub fn with_images(text: &str, images: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            author: "someone".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            likes: "12".to_string(),
            retweets: "3".to_string(),
            images: images.iter().map(|s| s.to_string()).collect(),
            link: format!("/someone/status/{text}"),
            ..Self::default()
        }
    }

    pub fn text_only(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn detached(text: &str) -> Self {
        Self {
            text: text.to_string(),
            detached: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.extraction_attempts.load(Ordering::SeqCst)
    }

    fn guard(&self) -> Result<(), DriverError> {
        if self.detached {
            Err(DriverError::Script("node detached".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FeedItem for FakeItem {
    async fn text_of(&self, selector: &str) -> Result<String, DriverError> {
        self.guard()?;
        let sel = FeedSelectors::default();
        Ok(if selector == sel.text {
            self.text.clone()
        } else if selector == sel.author {
            self.author.clone()
        } else if selector == sel.like {
            self.likes.clone()
        } else if selector == sel.retweet {
            self.retweets.clone()
        } else {
            String::new()
        })
    }

    async fn attr_of(&self, selector: &str, name: &str) -> Result<String, DriverError> {
        self.guard()?;
        let sel = FeedSelectors::default();
        Ok(if selector == sel.time && name == "datetime" {
            self.timestamp.clone()
        } else if selector == sel.permalink && name == "href" {
            self.link.clone()
        } else {
            String::new()
        })
    }

    async fn attr_all(&self, selector: &str, name: &str) -> Result<Vec<String>, DriverError> {
        let sel = FeedSelectors::default();
        if selector == sel.image && name == "src" {
            // The image query is the first step of extraction.
            self.extraction_attempts.fetch_add(1, Ordering::SeqCst);
            self.guard()?;
            return Ok(self.images.clone());
        }
        self.guard()?;
        Ok(Vec::new())
    }
}

/// Replay page: each scroll advances to the next canned pass; the last pass
/// and extent repeat once the script runs out.
pub struct ScriptedPage {
    passes: Vec<Vec<FakeItem>>,
    extents: Vec<f64>,
    login_found: bool,
    cursor: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
}

impl ScriptedPage {
    pub fn new(passes: Vec<Vec<FakeItem>>, extents: Vec<f64>) -> Self {
        Self {
            passes,
            extents,
            login_found: true,
            cursor: AtomicUsize::new(0),
            navigations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login(mut self, found: bool) -> Self {
        self.login_found = found;
        self
    }

    pub fn navigated(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedPage for ScriptedPage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.navigations.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn items(&self, _selector: &str) -> Result<Vec<Box<dyn FeedItem>>, DriverError> {
        if self.passes.is_empty() {
            return Ok(Vec::new());
        }
        let index = self
            .cursor
            .load(Ordering::SeqCst)
            .min(self.passes.len() - 1);
        Ok(self.passes[index]
            .iter()
            .cloned()
            .map(|item| Box::new(item) as Box<dyn FeedItem>)
            .collect())
    }

    async fn probe(&self, _selector: &str, _wait: Duration) -> Result<bool, DriverError> {
        Ok(self.login_found)
    }

    async fn scroll_to_bottom(&self) -> Result<(), DriverError> {
        self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn scroll_extent(&self) -> Result<f64, DriverError> {
        if self.extents.is_empty() {
            return Ok(0.0);
        }
        let index = self
            .cursor
            .load(Ordering::SeqCst)
            .min(self.extents.len() - 1);
        Ok(self.extents[index])
    }
}

/// Recording progress sink.
#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<CrawlEvent>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<CrawlEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                CrawlEvent::Status(label) => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn logs(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                CrawlEvent::Log(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: CrawlEvent) {
        self.events.lock().unwrap().push(event);
    }
}
