//! Refresh scheduling.
//!
//! The controller does not own a timer. The host sends a tick every poll
//! interval and the controller decides whether that tick turns into a
//! refresh request.
use std::fmt;
use std::time::Duration;

/// Cadence used when the host has no configured interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Identifies one refresh request so late responses can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshId(u64);

impl RefreshId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RefreshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refresh#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollingController {
    mode: PollMode,
    outstanding: Option<RefreshId>,
    issued: u64,
}

impl PollingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    pub fn is_suspended(&self) -> bool {
        self.mode == PollMode::Suspended
    }

    pub fn outstanding(&self) -> Option<RefreshId> {
        self.outstanding
    }

    /// Number of refresh requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Stops automatic refresh and forgets any request still in flight.
    pub fn suspend(&mut self) {
        if let Some(cancelled) = self.outstanding.take() {
            report_logging::report_debug!("{cancelled} cancelled by suspension");
        }
        self.mode = PollMode::Suspended;
    }

    /// Re-enables refresh and issues one request right away, superseding any
    /// request already in flight.
    pub fn resume(&mut self) -> RefreshId {
        self.mode = PollMode::Active;
        self.issue()
    }

    /// The interval elapsed. Returns a request to send, if one is due.
    pub fn on_tick(&mut self) -> Option<RefreshId> {
        match self.mode {
            PollMode::Suspended => None,
            PollMode::Active if self.outstanding.is_some() => None,
            PollMode::Active => Some(self.issue()),
        }
    }

    /// Claims a finished request. Only the request currently outstanding is
    /// accepted; anything else was cancelled or superseded.
    pub fn accept(&mut self, request: RefreshId) -> bool {
        if self.outstanding == Some(request) {
            self.outstanding = None;
            true
        } else {
            false
        }
    }

    fn issue(&mut self) -> RefreshId {
        self.issued += 1;
        let request = RefreshId(self.issued);
        self.outstanding = Some(request);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_issues_one_request_at_a_time() {
        let mut polling = PollingController::new();
        let first = polling.on_tick().unwrap();
        assert_eq!(polling.on_tick(), None);
        assert!(polling.accept(first));
        let second = polling.on_tick().unwrap();
        assert!(second > first);
    }

    #[test]
    fn suspend_is_idempotent() {
        let mut once = PollingController::new();
        once.on_tick();
        once.suspend();

        let mut twice = PollingController::new();
        twice.on_tick();
        twice.suspend();
        twice.suspend();

        assert_eq!(once, twice);
        assert_eq!(twice.on_tick(), None);
    }

    #[test]
    fn suspend_cancels_outstanding_request() {
        let mut polling = PollingController::new();
        let request = polling.on_tick().unwrap();
        polling.suspend();
        assert!(!polling.accept(request));
    }

    #[test]
    fn resume_while_active_issues_exactly_one_request() {
        let mut polling = PollingController::new();
        let stale = polling.on_tick().unwrap();

        let fresh = polling.resume();
        assert_eq!(polling.mode(), PollMode::Active);
        assert_eq!(polling.outstanding(), Some(fresh));
        assert_eq!(polling.issued(), 2);
        assert!(!polling.accept(stale));
        assert!(polling.accept(fresh));
    }

    #[test]
    fn failed_request_is_retried_on_next_tick() {
        let mut polling = PollingController::new();
        let request = polling.on_tick().unwrap();
        // A failure still releases the slot.
        assert!(polling.accept(request));
        assert!(polling.on_tick().is_some());
    }
}
