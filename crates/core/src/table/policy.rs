use std::time::Duration;

use super::TableStatus;

/// Smallest accepted poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Timing rules for waiting on a freshly created table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionPolicy {
    /// Sleep before the first status poll (default: 1s).
    pub initial_delay: Duration,
    /// Sleep between polls (default: 3s).
    pub poll_interval: Duration,
    /// Ceiling on time since the create request (default: 60s).
    pub timeout: Duration,
}

impl Default for ProvisionPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            poll_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ProvisionPolicy {
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the poll interval, clamped to at least 10ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// What the provisioning loop does after a status poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Table is usable.
    Ready,
    /// Sleep, then poll again.
    Wait(Duration),
    /// The ceiling was exceeded without the table becoming active.
    TimedOut,
}

/// Pure function: decide the next step from the latest status and the time
/// elapsed since the create request.
pub fn next_poll_action(
    status: &TableStatus,
    elapsed: Duration,
    policy: &ProvisionPolicy,
) -> PollAction {
    if status.is_active() {
        PollAction::Ready
    } else if elapsed > policy.timeout {
        PollAction::TimedOut
    } else {
        PollAction::Wait(policy.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ProvisionPolicy::default();
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert_eq!(policy.poll_interval, Duration::from_secs(3));
        assert_eq!(policy.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_poll_interval_is_clamped() {
        let policy = ProvisionPolicy::default().with_poll_interval(Duration::ZERO);
        assert_eq!(policy.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_active_is_ready_even_past_timeout() {
        let policy = ProvisionPolicy::default();
        assert_eq!(
            next_poll_action(&TableStatus::Active, Duration::from_secs(120), &policy),
            PollAction::Ready
        );
    }

    #[test]
    fn test_creating_within_budget_waits() {
        let policy = ProvisionPolicy::default();
        assert_eq!(
            next_poll_action(&TableStatus::Creating, Duration::from_secs(60), &policy),
            PollAction::Wait(Duration::from_secs(3))
        );
    }

    #[test]
    fn test_creating_past_budget_times_out() {
        let policy = ProvisionPolicy::default().with_timeout(Duration::from_secs(5));
        assert_eq!(
            next_poll_action(
                &TableStatus::Creating,
                Duration::from_millis(5_001),
                &policy
            ),
            PollAction::TimedOut
        );
    }
}
