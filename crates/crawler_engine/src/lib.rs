//! Crawler engine: browser session, collection loop and delivery.
mod chrome;
mod collect;
mod delay;
mod deliver;
mod driver;
mod engine;
mod extract;
mod login;
mod session;
mod types;

pub use chrome::ChromeSession;
pub use collect::collect;
pub use delay::{DelaySource, FixedDelay, UniformDelay};
pub use deliver::{DeliverySink, WebhookSink};
pub use driver::{DriverError, FeedItem, FeedPage};
pub use engine::EngineHandle;
pub use extract::{FeedSelectors, PostExtractor};
pub use login::{await_login, LoginOutcome};
pub use session::{run_session, CrawlSettings, SessionDriver};
pub use types::{ChannelProgressSink, CrawlError, CrawlEvent, NullProgressSink, ProgressSink, RunResult};
