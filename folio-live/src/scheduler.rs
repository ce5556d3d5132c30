//! Rebuild scheduling and debounce coalescing.
//!
//! At most one rebuild is pending at any time. A request whose target time is
//! earlier than the pending one replaces it; a later or equal request is
//! dropped. Rapid file-change events therefore collapse into the single
//! earliest-requested rebuild.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Shortest delay before a transition rebuild.
pub const TRANSITION_FLOOR: Duration = Duration::from_millis(1);

/// When a requested rebuild should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Now,
    After(Duration),
    At(Instant),
}

/// Per-run flags carried by a rebuild request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub ignore_times: bool,
    pub force_copy: bool,
}

impl RunFlags {
    pub const ALL: RunFlags = RunFlags {
        ignore_times: true,
        force_copy: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run immediately; any pending rebuild was cancelled.
    Execute(RunFlags),
    /// Armed, replacing a later pending rebuild if there was one.
    Scheduled(Instant),
    /// Dropped in favour of the pending rebuild at the given instant.
    Coalesced(Instant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    at: Instant,
    flags: RunFlags,
}

#[derive(Debug, Default)]
pub struct WatchScheduler {
    pending: Option<Pending>,
}

impl WatchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, when: When, flags: RunFlags, now: Instant) -> Decision {
        let target = match when {
            When::Now => now,
            When::After(d) => now + d,
            When::At(t) => t,
        };
        if let Some(p) = self.pending {
            if target >= p.at {
                tracing::debug!(?when, "rebuild request coalesced");
                return Decision::Coalesced(p.at);
            }
        }
        if target <= now {
            self.pending = None;
            return Decision::Execute(flags);
        }
        self.pending = Some(Pending { at: target, flags });
        Decision::Scheduled(target)
    }

    /// Instant the pending rebuild is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.at)
    }

    /// Take the pending rebuild if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<RunFlags> {
        match self.pending {
            Some(p) if p.at <= now => {
                self.pending = None;
                Some(p.flags)
            }
            _ => None,
        }
    }

    /// Arm a rebuild for an availability transition reported by a build.
    ///
    /// A transition that already passed is scheduled [`TRANSITION_FLOOR`]
    /// ahead, never executed inline, so it is picked up by the timer.
    pub fn arm_transition(
        &mut self,
        next: DateTime<Utc>,
        now_utc: DateTime<Utc>,
        now: Instant,
    ) -> Decision {
        let delay = (next - now_utc)
            .to_std()
            .unwrap_or(Duration::ZERO)
            .max(TRANSITION_FLOOR);
        self.request(When::At(now + delay), RunFlags::default(), now)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FIVE: Duration = Duration::from_secs(5);

    #[test]
    fn rapid_requests_collapse_into_earliest() {
        let t0 = Instant::now();
        let mut s = WatchScheduler::new();
        let flags = RunFlags::default();

        assert_eq!(s.request(When::After(FIVE), flags, t0), Decision::Scheduled(t0 + FIVE));
        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(s.request(When::After(FIVE), flags, t1), Decision::Coalesced(t0 + FIVE));
        let t2 = t0 + Duration::from_secs(2);
        assert_eq!(s.request(When::After(FIVE), flags, t2), Decision::Coalesced(t0 + FIVE));

        assert_eq!(s.take_due(t0 + Duration::from_secs(4)), None);
        assert_eq!(s.take_due(t0 + FIVE), Some(flags));
        assert_eq!(s.deadline(), None);
        assert_eq!(s.take_due(t0 + Duration::from_secs(7)), None);
    }

    #[test]
    fn earlier_request_replaces_pending() {
        let t0 = Instant::now();
        let mut s = WatchScheduler::new();
        s.request(When::After(Duration::from_secs(60)), RunFlags::default(), t0);
        let d = s.request(When::After(FIVE), RunFlags::ALL, t0);
        assert_eq!(d, Decision::Scheduled(t0 + FIVE));
        assert_eq!(s.take_due(t0 + FIVE), Some(RunFlags::ALL));
    }

    #[test]
    fn equal_target_is_dropped() {
        let t0 = Instant::now();
        let mut s = WatchScheduler::new();
        s.request(When::At(t0 + FIVE), RunFlags::default(), t0);
        let d = s.request(When::At(t0 + FIVE), RunFlags::ALL, t0);
        assert_eq!(d, Decision::Coalesced(t0 + FIVE));
        assert_eq!(s.take_due(t0 + FIVE), Some(RunFlags::default()));
    }

    #[test]
    fn now_executes_and_cancels_pending() {
        let t0 = Instant::now();
        let mut s = WatchScheduler::new();
        s.request(When::After(FIVE), RunFlags::default(), t0);
        let flags = RunFlags {
            ignore_times: true,
            force_copy: false,
        };
        assert_eq!(s.request(When::Now, flags, t0), Decision::Execute(flags));
        assert_eq!(s.deadline(), None);
    }

    #[test]
    fn transition_arms_timer_at_offset() {
        let t0 = Instant::now();
        let now_utc = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let next = now_utc + chrono::Duration::seconds(90);
        let mut s = WatchScheduler::new();
        let d = s.arm_transition(next, now_utc, t0);
        assert_eq!(d, Decision::Scheduled(t0 + Duration::from_secs(90)));

        // A pending debounce that is earlier wins over the transition.
        let mut s = WatchScheduler::new();
        s.request(When::After(FIVE), RunFlags::default(), t0);
        assert_eq!(s.arm_transition(next, now_utc, t0), Decision::Coalesced(t0 + FIVE));
    }

    #[test]
    fn passed_transition_is_scheduled_not_dropped() {
        let t0 = Instant::now();
        let now_utc = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let mut s = WatchScheduler::new();
        let d = s.arm_transition(now_utc - chrono::Duration::seconds(1), now_utc, t0);
        assert_eq!(d, Decision::Scheduled(t0 + TRANSITION_FLOOR));
        assert_eq!(s.deadline(), Some(t0 + TRANSITION_FLOOR));
        assert_eq!(s.take_due(t0 + TRANSITION_FLOOR), Some(RunFlags::default()));
    }

    #[test]
    fn cancel_clears_pending() {
        let t0 = Instant::now();
        let mut s = WatchScheduler::new();
        s.request(When::After(FIVE), RunFlags::default(), t0);
        s.cancel();
        assert_eq!(s.take_due(t0 + FIVE), None);
    }
}
