use crawler_core::{format_remaining, LoginPoll, LoginWait};
use crawler_logging::crawler_info;

use crate::driver::{DriverError, FeedPage};
use crate::session::CrawlSettings;
use crate::types::ProgressSink;

/// Terminal outcome of the login gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    TimedOut,
}

/// Blocks collection until the signed-in marker appears or the deadline
/// elapses.
///
/// The marker only exists on an authenticated view, so a human completing the
/// login in the opened browser is all it takes to release the gate. Each
/// probe is bounded well below the overall deadline; its window is what gets
/// charged to [`LoginWait`], keeping the machine free of clock reads. On
/// success the page is re-navigated to `target_url`, because the session may
/// have been redirected away from the search view during login.
pub async fn await_login(
    page: &dyn FeedPage,
    target_url: &str,
    settings: &CrawlSettings,
    sink: &dyn ProgressSink,
) -> Result<LoginOutcome, DriverError> {
    let marker = settings.selectors.item.as_str();
    let mut wait = LoginWait::new(settings.login_deadline);

    loop {
        let found = page.probe(marker, settings.login_probe_wait).await?;
        match wait.note_attempt(found, settings.login_probe_wait) {
            LoginPoll::Authenticated => {
                crawler_info!("login marker observed after {:?}", wait.elapsed());
                page.navigate(target_url).await?;
                return Ok(LoginOutcome::Authenticated);
            }
            LoginPoll::TimedOut => {
                crawler_info!("login wait exhausted after {:?}", wait.elapsed());
                return Ok(LoginOutcome::TimedOut);
            }
            LoginPoll::Pending { remaining } => {
                sink.log(format!("time remaining: {}", format_remaining(remaining)));
            }
        }
    }
}
