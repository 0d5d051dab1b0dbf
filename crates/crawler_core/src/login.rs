use std::time::Duration;

/// Outcome of one login poll attempt, as judged by [`LoginWait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPoll {
    /// The signed-in marker was observed; the gate is done.
    Authenticated,
    /// Marker not seen yet; keep polling. Carries the remaining budget.
    Pending { remaining: Duration },
    /// The deadline elapsed without the marker appearing.
    TimedOut,
}

/// Two-state login wait machine: `pending -> authenticated` or
/// `pending -> timed_out`, both terminal.
///
/// The machine never reads a clock. The gate charges each probe attempt's
/// duration through [`LoginWait::note_attempt`], which keeps timeout behavior
/// testable without wall-clock waits.
#[derive(Debug, Clone)]
pub struct LoginWait {
    deadline: Duration,
    elapsed: Duration,
}

impl LoginWait {
    /// Fixes the deadline for the whole wait at construction.
    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            elapsed: Duration::ZERO,
        }
    }

    /// Records the result of one bounded probe attempt that took `spent`.
    pub fn note_attempt(&mut self, found: bool, spent: Duration) -> LoginPoll {
        if found {
            return LoginPoll::Authenticated;
        }
        self.elapsed += spent;
        if self.elapsed >= self.deadline {
            LoginPoll::TimedOut
        } else {
            LoginPoll::Pending {
                remaining: self.deadline - self.elapsed,
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Formats a remaining wait as `"Xm Ys"` for the progress log.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{}m {}s", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::{format_remaining, LoginPoll, LoginWait};
    use std::time::Duration;

    #[test]
    fn remaining_is_rendered_in_minutes_and_seconds() {
        assert_eq!(format_remaining(Duration::from_secs(290)), "4m 50s");
        assert_eq!(format_remaining(Duration::from_secs(9)), "0m 9s");
    }

    #[test]
    fn attempt_accounting_reaches_timeout() {
        let mut wait = LoginWait::new(Duration::from_secs(30));
        let step = Duration::from_secs(10);
        assert_eq!(
            wait.note_attempt(false, step),
            LoginPoll::Pending {
                remaining: Duration::from_secs(20)
            }
        );
        assert_eq!(
            wait.note_attempt(false, step),
            LoginPoll::Pending {
                remaining: Duration::from_secs(10)
            }
        );
        assert_eq!(wait.note_attempt(false, step), LoginPoll::TimedOut);
    }

    #[test]
    fn marker_found_wins_regardless_of_elapsed() {
        let mut wait = LoginWait::new(Duration::from_secs(30));
        wait.note_attempt(false, Duration::from_secs(20));
        assert_eq!(
            wait.note_attempt(true, Duration::from_secs(10)),
            LoginPoll::Authenticated
        );
    }
}
