//! The accrual engine.
//!
//! One tick reads the session state and folds elapsed watch time into the
//! persisted totals, rolling the day/week buckets over when the local
//! calendar has moved on since the last write. The engine is a pure
//! function of its inputs plus an injected `now`; the caller owns reading
//! and writing the persisted record around it.
//!
//! Day and week rollover are evaluated independently and can both fire on
//! the same tick; the day check runs first and the week check sees its
//! effects.

use chrono::{DateTime, Local};

use crate::calendar;
use crate::session::SessionState;
use crate::stats::{WatchStats, DAILY_HISTORY_LEN, WEEKLY_HISTORY_LEN};

/// What a single tick did to the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Minutes folded into the totals by this tick (0 while idle).
    pub accrued_minutes: f64,
    pub day_rolled: bool,
    pub week_rolled: bool,
}

/// Run one accrual tick against `stats`.
///
/// While no session is active this only performs rollover maintenance:
/// stale buckets reset to zero and the histories are backfilled with one
/// zero slot per elapsed boundary, capped at the history bound. While a
/// session is active, elapsed minutes since `session.last_update` are
/// accrued first (clamped to zero under clock skew, never negative) and a
/// rollover moves the previous bucket total down the history.
pub fn run_tick(
    stats: &mut WatchStats,
    session: &mut SessionState,
    now: DateTime<Local>,
) -> TickOutcome {
    let today = now.date_naive();

    if !session.is_active() {
        return idle_maintenance(stats, today);
    }

    let elapsed_ms = now
        .signed_duration_since(session.last_update)
        .num_milliseconds();
    // Clock skew can put last_update in the future; never accrue negative.
    let watched_minutes = (elapsed_ms as f64 / 60_000.0).max(0.0);

    stats.daily_watch_time += watched_minutes;
    stats.weekly_watch_time += watched_minutes;
    session.current_session_mins += watched_minutes;
    if session.current_session_mins > stats.longest_session {
        stats.longest_session = session.current_session_mins;
    }

    let day_rolled = !calendar::same_day(stats.last_updated, today);
    if day_rolled {
        // The head slot already holds the finished day's total; open a
        // fresh slot for today. This tick's minutes belong to the new day.
        stats.start_new_day_slot();
        stats.daily_watch_time = watched_minutes;
    }
    stats.mirror_daily();

    let week_rolled = !calendar::same_iso_week(stats.last_updated, today);
    if week_rolled {
        stats.start_new_week_slot();
        stats.weekly_watch_time = watched_minutes;
        // Longest-session is a weekly statistic; the live session carries
        // its length into the new week.
        stats.longest_session = session.current_session_mins;
    }
    stats.mirror_weekly();

    stats.last_updated = today;
    session.last_update = now;

    TickOutcome {
        accrued_minutes: watched_minutes,
        day_rolled,
        week_rolled,
    }
}

/// Rollover-only maintenance for ticks that arrive with no active session.
fn idle_maintenance(stats: &mut WatchStats, today: chrono::NaiveDate) -> TickOutcome {
    let mut day_rolled = false;
    let mut week_rolled = false;

    if !calendar::same_day(stats.last_updated, today) {
        let days = (today - stats.last_updated).num_days().max(0);
        for _ in 0..days.min(DAILY_HISTORY_LEN as i64) {
            stats.start_new_day_slot();
        }
        stats.daily_watch_time = 0.0;
        stats.mirror_daily();
        day_rolled = true;
    }

    if !calendar::same_iso_week(stats.last_updated, today) {
        let weeks = ((today - stats.last_updated).num_days() / 7).max(0);
        for _ in 0..weeks.min(WEEKLY_HISTORY_LEN as i64) {
            stats.start_new_week_slot();
        }
        stats.weekly_watch_time = 0.0;
        stats.longest_session = 0.0;
        stats.mirror_weekly();
        week_rolled = true;
    }

    stats.last_updated = today;

    TickOutcome {
        accrued_minutes: 0.0,
        day_rolled,
        week_rolled,
    }
}
