//! The limit evaluator.
//!
//! Compares the freshly accrued totals against the configured limits and
//! decides whether playback gets blocked now, blocked after the remaining
//! minutes elapse, or left alone. Pure; the engine acts on the decision.

use std::time::Duration;

use crate::settings::Settings;
use crate::stats::WatchStats;

/// What to do about the current totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitDecision {
    /// Both limits have comfortable headroom (or no limits configured).
    Within,
    /// A limit is already exhausted; block immediately.
    BlockNow,
    /// A limit will be exhausted within the next minute; block after the
    /// smallest positive remainder elapses.
    BlockAfter(Duration),
}

/// Evaluate the updated totals against the configured limits.
///
/// Absent settings mean no limits are configured and never block.
pub fn evaluate(stats: &WatchStats, settings: Option<&Settings>) -> LimitDecision {
    let Some(settings) = settings else {
        return LimitDecision::Within;
    };

    let daily_left = settings.daily_limit - stats.daily_watch_time;
    let weekly_left = settings.weekly_limit - stats.weekly_watch_time;

    if daily_left <= 0.0 || weekly_left <= 0.0 {
        return LimitDecision::BlockNow;
    }

    if daily_left <= 1.0 || weekly_left <= 1.0 {
        // A non-positive remainder contributes zero to the min, which
        // means an immediate block if the other side is exhausted.
        let daily_ms = if daily_left > 0.0 { daily_left * 60_000.0 } else { 0.0 };
        let weekly_ms = if weekly_left > 0.0 { weekly_left * 60_000.0 } else { 0.0 };
        let delay_ms = daily_ms.min(weekly_ms);

        if delay_ms > 0.0 {
            return LimitDecision::BlockAfter(Duration::from_millis(delay_ms as u64));
        }
        return LimitDecision::BlockNow;
    }

    LimitDecision::Within
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stats(daily: f64, weekly: f64) -> WatchStats {
        let mut stats = WatchStats::zeroed(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        stats.daily_watch_time = daily;
        stats.weekly_watch_time = weekly;
        stats
    }

    fn settings(daily_limit: f64, weekly_limit: f64) -> Settings {
        Settings {
            daily_limit,
            weekly_limit,
            ..Settings::default()
        }
    }

    #[test]
    fn absent_settings_never_block() {
        assert_eq!(evaluate(&stats(1e6, 1e6), None), LimitDecision::Within);
    }

    #[test]
    fn comfortable_headroom_does_nothing() {
        let decision = evaluate(&stats(10.0, 50.0), Some(&settings(30.0, 200.0)));
        assert_eq!(decision, LimitDecision::Within);
    }

    #[test]
    fn exhausted_daily_limit_blocks_now() {
        let decision = evaluate(&stats(30.0, 50.0), Some(&settings(30.0, 200.0)));
        assert_eq!(decision, LimitDecision::BlockNow);
    }

    #[test]
    fn overshot_weekly_limit_blocks_now() {
        // 580 accrued plus a 25-minute tick overshoots a 600-minute week.
        let decision = evaluate(&stats(100.0, 605.0), Some(&settings(1000.0, 600.0)));
        assert_eq!(decision, LimitDecision::BlockNow);
    }

    #[test]
    fn sub_minute_remainder_defers_by_the_remainder() {
        let decision = evaluate(&stats(29.5, 50.0), Some(&settings(30.0, 200.0)));
        assert_eq!(decision, LimitDecision::BlockAfter(Duration::from_secs(30)));
    }

    #[test]
    fn deferred_delay_takes_the_smaller_remainder() {
        let decision = evaluate(&stats(29.5, 199.75), Some(&settings(30.0, 200.0)));
        assert_eq!(decision, LimitDecision::BlockAfter(Duration::from_secs(15)));
    }
}
