//! The persisted watch-time record.
//!
//! One `WatchStats` record exists per profile, stored under the
//! local-scope key `watchStats`. Field names serialize in camelCase to
//! match the extension-storage schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily history keeps the last 7 day-totals, most recent first.
pub const DAILY_HISTORY_LEN: usize = 7;
/// Weekly history keeps the last 5 week-totals, most recent first.
pub const WEEKLY_HISTORY_LEN: usize = 5;

/// Cumulative watch-time totals and their rolling history windows.
///
/// All durations are real-valued minutes and never go negative.
/// `daily_history[0]` mirrors `daily_watch_time` once an accrual has
/// happened today; likewise `weekly_history[0]` and `weekly_watch_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchStats {
    /// Minutes accrued in the current local day.
    pub daily_watch_time: f64,
    /// Minutes accrued in the current ISO week.
    pub weekly_watch_time: f64,
    /// Longest contiguous session observed this week, in minutes.
    pub longest_session: f64,
    /// Local calendar date of the last accrual write.
    pub last_updated: NaiveDate,
    /// Per-day minute totals, most recent day first, at most 7 entries.
    pub daily_history: Vec<f64>,
    /// Per-week minute totals, most recent week first, at most 5 entries.
    pub weekly_history: Vec<f64>,
}

impl WatchStats {
    /// A fresh all-zero record dated `today`, with full-length zero
    /// histories (the shape seeded on first install).
    pub fn zeroed(today: NaiveDate) -> Self {
        Self {
            daily_watch_time: 0.0,
            weekly_watch_time: 0.0,
            longest_session: 0.0,
            last_updated: today,
            daily_history: vec![0.0; DAILY_HISTORY_LEN],
            weekly_history: vec![0.0; WEEKLY_HISTORY_LEN],
        }
    }

    /// Open a new day slot at the front of the daily history, dropping
    /// the oldest entry past the bound.
    pub fn start_new_day_slot(&mut self) {
        self.daily_history.insert(0, 0.0);
        self.daily_history.truncate(DAILY_HISTORY_LEN);
    }

    /// Open a new week slot at the front of the weekly history.
    pub fn start_new_week_slot(&mut self) {
        self.weekly_history.insert(0, 0.0);
        self.weekly_history.truncate(WEEKLY_HISTORY_LEN);
    }

    /// Keep the live "today" slot in sync with the running day total.
    pub fn mirror_daily(&mut self) {
        match self.daily_history.first_mut() {
            Some(slot) => *slot = self.daily_watch_time,
            None => self.daily_history.push(self.daily_watch_time),
        }
    }

    /// Keep the live "this week" slot in sync with the running week total.
    pub fn mirror_weekly(&mut self) {
        match self.weekly_history.first_mut() {
            Some(slot) => *slot = self.weekly_watch_time,
            None => self.weekly_history.push(self.weekly_watch_time),
        }
    }
}
