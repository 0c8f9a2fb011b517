//! Ephemeral per-process session state.
//!
//! One `SessionState` lives inside the background engine. It is never
//! persisted; a process restart always comes back idle.

use chrono::{DateTime, Local};

/// State of the current watch session.
///
/// `watch_start` being `None` means no session is active and no minutes
/// accrue. `last_update` is the instant the accrual engine last accounted
/// for; every lifecycle transition resets it so paused intervals can never
/// be double-counted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// When the active session began, or `None` while idle.
    pub watch_start: Option<DateTime<Local>>,
    /// Instant of the last accrual.
    pub last_update: DateTime<Local>,
    /// Accumulated minutes of the contiguous active session.
    pub current_session_mins: f64,
    /// Whether the periodic tick is logically enabled.
    pub periodic_enabled: bool,
}

impl SessionState {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            watch_start: None,
            last_update: now,
            current_session_mins: 0.0,
            periodic_enabled: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.watch_start.is_some()
    }

    /// Begin (or re-enter) a watch session.
    ///
    /// Re-entrant starts only reset `last_update`, so the next accrual
    /// counts minutes from `now` and nothing is counted twice.
    pub fn start(&mut self, now: DateTime<Local>) {
        if self.watch_start.is_none() {
            self.watch_start = Some(now);
            self.current_session_mins = 0.0;
        }
        self.last_update = now;
    }

    /// Suspend accrual. The session length stays readable until the next
    /// start, which begins a new contiguous session.
    pub fn pause(&mut self) {
        self.watch_start = None;
    }

    /// End the session entirely.
    pub fn stop(&mut self) {
        self.watch_start = None;
        self.current_session_mins = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 9, h, m, 0).unwrap()
    }

    #[test]
    fn reentrant_start_keeps_session_length() {
        let mut session = SessionState::new(at(12, 0));
        session.start(at(12, 0));
        session.current_session_mins = 10.0;

        session.start(at(12, 30));
        assert_eq!(session.current_session_mins, 10.0);
        assert_eq!(session.last_update, at(12, 30));
        assert_eq!(session.watch_start, Some(at(12, 0)));
    }

    #[test]
    fn pause_keeps_length_stop_clears_it() {
        let mut session = SessionState::new(at(12, 0));
        session.start(at(12, 0));
        session.current_session_mins = 7.5;

        session.pause();
        assert!(!session.is_active());
        assert_eq!(session.current_session_mins, 7.5);

        session.stop();
        assert_eq!(session.current_session_mins, 0.0);
    }
}
