//! Local-calendar comparisons for accrual rollover.
//!
//! The accrual engine keys its buckets off the viewer's local calendar, so
//! all dates here are `NaiveDate`s already resolved in the local timezone
//! (see [`local_today`]). Both predicates are pure.

use chrono::{Datelike, Local, NaiveDate};

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// True iff `a` and `b` share local year, month, and day-of-month.
pub fn same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// True iff `a` and `b` fall in the same ISO-8601 week of the same
/// calendar year.
///
/// The calendar year is compared literally, not as the ISO week-year.
/// Dates in late December and early January can share an ISO week while
/// their calendar years differ; those compare as *different* weeks here.
/// This is intentional and matches the shipped comparison of
/// year-plus-week-number, but it is flagged as a possible edge-case bug
/// for product review.
pub fn same_iso_week(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.iso_week().week() == b.iso_week().week()
}
