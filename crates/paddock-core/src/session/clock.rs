//! Countdown derivation for a session snapshot.
//!
//! The countdown is never stored. Every view is recomputed from the
//! session's own fields and the caller's notion of "now".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Session, SessionStatus};

/// Remaining time at or below which a heat is in its last minute.
pub const LAST_MINUTE_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Normal,
    LastMinute,
}

/// Derived, disposable countdown state for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockView {
    pub session_id: String,
    pub status: SessionStatus,
    pub remaining_ms: i64,
    pub phase: Phase,
}

impl ClockView {
    /// Renders the remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_countdown(self.remaining_ms)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms == 0
    }
}

/// Computes the countdown for `session` as seen at `now`.
///
/// A paused session is measured up to its `pause_start`, so the open pause is
/// excluded and the view stays constant until resume. A completed session is
/// measured up to its `end_time`.
pub fn clock_view(session: &Session, now: DateTime<Utc>) -> ClockView {
    let measured_until = match session.status {
        SessionStatus::Paused => session.pause_start.unwrap_or(now),
        SessionStatus::Running => now,
        SessionStatus::Completed => session.end_time.unwrap_or(now),
    };

    let elapsed = (measured_until - session.start_time).num_milliseconds()
        - session.total_pause_duration_ms;
    let remaining_ms = (session.duration_ms() - elapsed).max(0);

    let phase = if session.is_active() && remaining_ms > 0 && remaining_ms <= LAST_MINUTE_MS {
        Phase::LastMinute
    } else {
        Phase::Normal
    };

    ClockView {
        session_id: session.id.clone(),
        status: session.status,
        remaining_ms,
        phase,
    }
}

/// Formats milliseconds as zero-padded `MM:SS`, rounding down.
pub fn format_countdown(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{minutes:02}:{seconds:02}")
}

/// Caller-side latch for the one-shot last-minute alert.
///
/// `observe` returns `true` exactly once per transition into
/// [`Phase::LastMinute`]. Observing a different session re-arms it.
#[derive(Debug, Default, Clone)]
pub struct PhaseTracker {
    last: Option<(String, Phase)>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, view: &ClockView) -> bool {
        let previous = match &self.last {
            Some((id, phase)) if *id == view.session_id => Some(*phase),
            _ => None,
        };
        self.last = Some((view.session_id.clone(), view.phase));

        view.phase == Phase::LastMinute && previous != Some(Phase::LastMinute)
    }

    /// Forgets the observed session, e.g. when the active heat is cleared.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Group, SessionDuration};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn running() -> Session {
        Session::start(Group::Basic, SessionDuration::default(), t0())
    }

    #[test]
    fn test_fresh_session_has_full_duration() {
        let view = clock_view(&running(), t0());
        assert_eq!(view.remaining_ms, 15 * 60_000);
        assert_eq!(view.phase, Phase::Normal);
        assert_eq!(view.display(), "15:00");
    }

    #[test]
    fn test_pause_accounting_example() {
        let mut session = running();
        session.pause(t0() + Duration::minutes(5)).unwrap();
        session.resume(t0() + Duration::minutes(7)).unwrap();

        let view = clock_view(&session, t0() + Duration::minutes(19));
        assert_eq!(view.remaining_ms, 0);
        assert_eq!(view.status, SessionStatus::Running);
        assert_eq!(view.phase, Phase::Normal);

        let view = clock_view(&session, t0() + Duration::minutes(10));
        assert_eq!(view.remaining_ms, 7 * 60_000);
    }

    #[test]
    fn test_paused_view_is_constant() {
        let mut session = running();
        session.pause(t0() + Duration::minutes(4)).unwrap();

        let a = clock_view(&session, t0() + Duration::minutes(5));
        let b = clock_view(&session, t0() + Duration::minutes(50));
        assert_eq!(a.remaining_ms, 11 * 60_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_running_view_is_non_increasing() {
        let mut session = running();
        session.pause(t0() + Duration::minutes(1)).unwrap();
        session.resume(t0() + Duration::minutes(3)).unwrap();

        let mut previous = i64::MAX;
        for second in (180..1_500).step_by(7) {
            let view = clock_view(&session, t0() + Duration::seconds(second));
            assert!(view.remaining_ms <= previous);
            assert!(view.remaining_ms >= 0);
            previous = view.remaining_ms;
        }
    }

    #[test]
    fn test_last_minute_phase_boundaries() {
        let session = running();
        let at = |ms: i64| clock_view(&session, t0() + Duration::milliseconds(ms));

        assert_eq!(at(14 * 60_000 - 1).phase, Phase::Normal);
        assert_eq!(at(14 * 60_000).phase, Phase::LastMinute);
        assert_eq!(at(15 * 60_000 - 1).phase, Phase::LastMinute);
        assert_eq!(at(15 * 60_000).phase, Phase::Normal);
    }

    #[test]
    fn test_completed_view_freezes_at_end() {
        let mut session = running();
        session.complete(t0() + Duration::minutes(10)).unwrap();
        let view = clock_view(&session, t0() + Duration::hours(2));
        assert_eq!(view.remaining_ms, 5 * 60_000);
        assert_eq!(view.phase, Phase::Normal);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(59_999), "00:59");
        assert_eq!(format_countdown(61_000), "01:01");
        assert_eq!(format_countdown(-5), "00:00");
    }

    #[test]
    fn test_phase_tracker_fires_once() {
        let session = running();
        let mut tracker = PhaseTracker::new();

        let normal = clock_view(&session, t0() + Duration::minutes(13));
        assert!(!tracker.observe(&normal));

        let last = clock_view(&session, t0() + Duration::seconds(14 * 60 + 10));
        assert!(tracker.observe(&last));
        let later = clock_view(&session, t0() + Duration::seconds(14 * 60 + 30));
        assert!(!tracker.observe(&later));

        let other = running();
        let other_last = clock_view(&other, t0() + Duration::seconds(14 * 60 + 10));
        assert!(tracker.observe(&other_last));
    }

    #[test]
    fn test_phase_tracker_reset_rearms() {
        let session = running();
        let mut tracker = PhaseTracker::new();
        let last = clock_view(&session, t0() + Duration::seconds(14 * 60 + 10));
        assert!(tracker.observe(&last));
        tracker.reset();
        assert!(tracker.observe(&last));
    }
}
