/// A search term normalized into its tag and URL-encoded forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTag {
    /// Canonical display form, always `#`-prefixed.
    pub formatted: String,
    /// URL-encoded form with each `#` replaced by `%23`.
    pub encoded: String,
}

/// Normalize a raw search term into a tag: prefix `#` if absent, encode for URLs.
///
/// Idempotent: `format_tag("topic")` and `format_tag("#topic")` yield the same result.
pub fn format_tag(raw: &str) -> FormattedTag {
    let formatted = if raw.starts_with('#') {
        raw.to_string()
    } else {
        format!("#{raw}")
    };
    let encoded = formatted.replace('#', "%23");
    FormattedTag { formatted, encoded }
}

/// Build the live-search URL for an encoded query.
pub fn build_search_url(encoded_query: &str) -> String {
    format!("https://twitter.com/search?q={encoded_query}&src=typed_query&f=live")
}
