use crawler_core::{Engagement, PostRecord};
use crawler_logging::crawler_debug;

use crate::driver::{DriverError, FeedItem};

/// CSS selectors for the feed's item structure.
///
/// Defaults target the X/Twitter live-search DOM. Every selector is relative
/// to one item node except `item`, which enumerates the feed (and doubles as
/// the signed-in marker for the login gate: it only renders on an
/// authenticated view).
#[derive(Debug, Clone)]
pub struct FeedSelectors {
    pub item: String,
    pub image: String,
    pub text: String,
    pub author: String,
    pub time: String,
    pub like: String,
    pub retweet: String,
    pub permalink: String,
}

impl Default for FeedSelectors {
    fn default() -> Self {
        Self {
            item: r#"article[data-testid="tweet"]"#.to_string(),
            image: r#"[data-testid="tweetPhoto"] img"#.to_string(),
            text: r#"[data-testid="tweetText"]"#.to_string(),
            author: r#"[data-testid="User-Name"] a"#.to_string(),
            time: "time".to_string(),
            like: r#"[data-testid="like"]"#.to_string(),
            retweet: r#"[data-testid="retweet"]"#.to_string(),
            permalink: r#"[data-testid="User-Name"] a[role="link"][dir="ltr"]"#.to_string(),
        }
    }
}

/// Per-item structural extractor with the media-presence content filter.
#[derive(Debug, Clone)]
pub struct PostExtractor {
    selectors: FeedSelectors,
}

impl PostExtractor {
    pub fn new(selectors: FeedSelectors) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &FeedSelectors {
        &self.selectors
    }

    /// Reads one item into a [`PostRecord`], or rejects it.
    ///
    /// Rejection covers both the content filter (no resolvable image source)
    /// and any driver fault while reading the item; a single bad item must
    /// never abort the run.
    pub async fn extract(&self, item: &dyn FeedItem) -> Option<PostRecord> {
        match self.try_extract(item).await {
            Ok(record) => record,
            Err(err) => {
                crawler_debug!("item read fault treated as rejection: {err}");
                None
            }
        }
    }

    async fn try_extract(&self, item: &dyn FeedItem) -> Result<Option<PostRecord>, DriverError> {
        // Content filter first: text-only posts are never collected.
        let images = item.attr_all(&self.selectors.image, "src").await?;
        if images.is_empty() {
            return Ok(None);
        }

        let text = item.text_of(&self.selectors.text).await?;
        let author = item.text_of(&self.selectors.author).await?;
        let timestamp = item.attr_of(&self.selectors.time, "datetime").await?;
        let likes = or_zero(item.text_of(&self.selectors.like).await?);
        let retweets = or_zero(item.text_of(&self.selectors.retweet).await?);
        let link = item.attr_of(&self.selectors.permalink, "href").await?;

        Ok(Some(PostRecord {
            text,
            author,
            timestamp,
            engagement: Engagement { likes, retweets },
            images,
            link,
        }))
    }
}

/// Engagement counts render as an empty badge at zero.
fn or_zero(display: String) -> String {
    if display.is_empty() {
        "0".to_string()
    } else {
        display
    }
}
