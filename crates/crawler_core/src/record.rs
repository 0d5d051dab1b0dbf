use serde::{Deserialize, Serialize};

/// Engagement counters as displayed by the feed, e.g. `"1.2K"`.
///
/// These are raw display strings on purpose: source formatting is preserved,
/// never parsed into numerics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: String,
    pub retweets: String,
}

/// One collected feed post. Immutable once constructed.
///
/// `images` is non-empty by construction: the extractor rejects any item that
/// has no resolvable image source, so a record with zero images never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Post body text; may be empty.
    pub text: String,
    /// Author display name; may be empty.
    pub author: String,
    /// ISO-8601 timestamp, or empty if unavailable.
    pub timestamp: String,
    pub engagement: Engagement,
    /// Image source URLs in DOM order.
    pub images: Vec<String>,
    /// Permalink; may be empty.
    pub link: String,
}
