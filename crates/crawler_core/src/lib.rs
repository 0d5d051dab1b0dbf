//! Crawler core: pure state machines and the collected-record model.
mod collect;
mod login;
mod query;
mod record;

pub use collect::{CollectState, ItemDisposition, StopReason, STAGNATION_THRESHOLD};
pub use login::{format_remaining, LoginPoll, LoginWait};
pub use query::{build_search_url, format_tag, FormattedTag};
pub use record::{Engagement, PostRecord};
