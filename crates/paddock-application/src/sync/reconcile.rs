//! Merging a freshly fetched snapshot into the session a client holds.

use paddock_core::session::{Session, SessionSnapshot, SessionStatus};

/// What a session poll did to the held session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// A different (or first) session is now held
    Adopted,
    /// Same session, its status or pause fields changed
    Updated,
    /// Nothing relevant changed; the local countdown keeps ticking
    Unchanged,
    /// The fetched record is older than the held one and was ignored
    Outdated,
    /// The held session disappeared without showing up as completed
    Cleared,
    /// The held session was completed
    Completed { announcement: String },
}

/// Decides which session to hold after a poll.
///
/// The fetched record replaces the held one only when it is a different
/// session or its own timing fields differ. Refetching an identical record
/// never resets a ticking countdown.
///
/// Responses may arrive out of order, so recency is read from the records
/// themselves: an earlier-started session never replaces a later one, and
/// within one session the accumulated pause total only grows.
pub fn reconcile(
    held: Option<&Session>,
    fetched: &SessionSnapshot,
) -> (Option<Session>, Reconciliation) {
    match (held, fetched.active.as_ref()) {
        (Some(current), None) => match fetched.last_completed.as_ref() {
            Some(done) if done.id == current.id => (
                None,
                Reconciliation::Completed {
                    announcement: completion_announcement(done),
                },
            ),
            _ => (None, Reconciliation::Cleared),
        },
        (None, None) => (None, Reconciliation::Unchanged),
        (None, Some(active)) => (Some(active.clone()), Reconciliation::Adopted),
        (Some(current), Some(active)) if is_outdated(current, active) => {
            (Some(current.clone()), Reconciliation::Outdated)
        }
        (Some(current), Some(active)) if current.id != active.id => {
            (Some(active.clone()), Reconciliation::Adopted)
        }
        (Some(current), Some(active)) if timing_changed(current, active) => {
            (Some(active.clone()), Reconciliation::Updated)
        }
        (Some(current), Some(_)) => (Some(current.clone()), Reconciliation::Unchanged),
    }
}

/// True when `fetched` predates the held `current` record.
fn is_outdated(current: &Session, fetched: &Session) -> bool {
    if current.id != fetched.id {
        return fetched.start_time < current.start_time;
    }
    if fetched.total_pause_duration_ms != current.total_pause_duration_ms {
        return fetched.total_pause_duration_ms < current.total_pause_duration_ms;
    }
    // A resume always adds to the total, so running with an unchanged total
    // is the record from before the pause.
    current.status == SessionStatus::Paused && fetched.status == SessionStatus::Running
}

fn timing_changed(current: &Session, fetched: &Session) -> bool {
    current.status != fetched.status
        || current.start_time != fetched.start_time
        || current.pause_start != fetched.pause_start
        || current.total_pause_duration_ms != fetched.total_pause_duration_ms
        || current.duration_minutes != fetched.duration_minutes
}

/// `Heat basic finished, medium is up next`
pub fn completion_announcement(completed: &Session) -> String {
    format!(
        "Heat {} finished, {} is up next",
        completed.group,
        completed.group.next()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use paddock_core::session::{Group, SessionDuration};

    fn running() -> Session {
        Session::start(
            Group::Basic,
            SessionDuration::default(),
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        )
    }

    fn snapshot(active: Option<&Session>, last_completed: Option<&Session>) -> SessionSnapshot {
        SessionSnapshot {
            active: active.cloned(),
            last_completed: last_completed.cloned(),
        }
    }

    #[test]
    fn test_identical_refetch_is_unchanged() {
        let session = running();
        let (held, outcome) = reconcile(Some(&session), &snapshot(Some(&session), None));
        assert_eq!(outcome, Reconciliation::Unchanged);
        assert_eq!(held, Some(session));
    }

    #[test]
    fn test_pause_is_an_update() {
        let session = running();
        let mut paused = session.clone();
        paused.pause(session.start_time + Duration::minutes(5)).unwrap();

        let (held, outcome) = reconcile(Some(&session), &snapshot(Some(&paused), None));
        assert_eq!(outcome, Reconciliation::Updated);
        assert_eq!(held, Some(paused));
    }

    #[test]
    fn test_late_response_does_not_undo_a_pause() {
        let running = running();
        let mut paused = running.clone();
        paused.pause(running.start_time + Duration::minutes(5)).unwrap();

        let (held, outcome) = reconcile(Some(&paused), &snapshot(Some(&running), None));
        assert_eq!(outcome, Reconciliation::Outdated);
        assert_eq!(held.map(|s| s.status), Some(SessionStatus::Paused));
    }

    #[test]
    fn test_late_response_does_not_undo_a_resume() {
        let session = running();
        let t0 = session.start_time;
        let mut paused = session.clone();
        paused.pause(t0 + Duration::minutes(5)).unwrap();
        let mut resumed = paused.clone();
        resumed.resume(t0 + Duration::minutes(7)).unwrap();

        let (held, outcome) = reconcile(Some(&resumed), &snapshot(Some(&paused), None));
        assert_eq!(outcome, Reconciliation::Outdated);
        assert_eq!(held, Some(resumed.clone()));

        let (held, outcome) = reconcile(Some(&paused), &snapshot(Some(&resumed), None));
        assert_eq!(outcome, Reconciliation::Updated);
        assert_eq!(held, Some(resumed));
    }

    #[test]
    fn test_earlier_session_does_not_replace_a_later_one() {
        let earlier = running();
        let later = Session::start(
            Group::Medium,
            SessionDuration::default(),
            earlier.start_time + Duration::minutes(20),
        );

        let (held, outcome) = reconcile(Some(&later), &snapshot(Some(&earlier), None));
        assert_eq!(outcome, Reconciliation::Outdated);
        assert_eq!(held.map(|s| s.id), Some(later.id));
    }

    #[test]
    fn test_new_session_is_adopted() {
        let first = running();
        let second = running();
        assert_eq!(
            reconcile(None, &snapshot(Some(&first), None)).1,
            Reconciliation::Adopted
        );
        assert_eq!(
            reconcile(Some(&first), &snapshot(Some(&second), None)).1,
            Reconciliation::Adopted
        );
    }

    #[test]
    fn test_completion_is_announced() {
        let session = running();
        let mut done = session.clone();
        done.complete(session.start_time + Duration::minutes(15)).unwrap();

        let (held, outcome) = reconcile(Some(&session), &snapshot(None, Some(&done)));
        assert!(held.is_none());
        assert_eq!(
            outcome,
            Reconciliation::Completed {
                announcement: "Heat basic finished, medium is up next".to_string()
            }
        );
    }

    #[test]
    fn test_vanished_session_is_cleared() {
        let session = running();
        let other = running();
        let mut done = other.clone();
        done.complete(other.start_time).unwrap();

        let (held, outcome) = reconcile(Some(&session), &snapshot(None, Some(&done)));
        assert!(held.is_none());
        assert_eq!(outcome, Reconciliation::Cleared);
    }
}
