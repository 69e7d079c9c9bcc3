//! Monday-anchored calendar week arithmetic.
//!
//! All operations are pure and total for any integer offset. The
//! reference date is an explicit parameter; callers decide whether it is
//! the wall clock or the latest stored data date (see `Config::week_basis`).

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// A Monday–Sunday span.
///
/// `week_id` is stable for a given Monday and used as a grouping key;
/// `week_label` is the human-readable range shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBounds {
    pub week_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub week_label: String,
}

/// Most recent Monday on or before `date`. A Sunday belongs to the week
/// that began six days earlier.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Bounds of the week `offset` weeks away from the week containing
/// `reference` (offset 0 = that week, -1 = the week before).
pub fn week_bounds(reference: NaiveDate, offset: i64) -> WeekBounds {
    let start_date = monday_of(reference) + Duration::days(7 * offset);
    let end_date = start_date + Duration::days(6);
    WeekBounds {
        week_id: start_date.format("%G-W%V").to_string(),
        start_date,
        end_date,
        week_label: format!(
            "{} - {}",
            start_date.format("%m/%d"),
            end_date.format("%m/%d")
        ),
    }
}

/// `week_bounds` against today's local date.
pub fn current_week_bounds(offset: i64) -> WeekBounds {
    week_bounds(Local::now().date_naive(), offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn wednesday_resolves_to_surrounding_monday_sunday() {
        // Wednesday 2024-05-15
        let bounds = week_bounds(date(2024, 5, 15), 0);
        assert_eq!(bounds.start_date, date(2024, 5, 13));
        assert_eq!(bounds.end_date, date(2024, 5, 19));

        let prior = week_bounds(date(2024, 5, 15), -1);
        assert_eq!(prior.start_date, date(2024, 5, 6));
        assert_eq!(prior.end_date, date(2024, 5, 12));
    }

    #[test]
    fn sunday_belongs_to_the_preceding_monday() {
        // Sunday 2024-05-19
        let bounds = week_bounds(date(2024, 5, 19), 0);
        assert_eq!(bounds.start_date, date(2024, 5, 13));
    }

    #[test]
    fn monday_is_its_own_week_start() {
        let bounds = week_bounds(date(2024, 5, 13), 0);
        assert_eq!(bounds.start_date, date(2024, 5, 13));
    }

    #[test]
    fn consecutive_offsets_are_seven_days_apart() {
        let reference = date(2024, 5, 15);
        for offset in -3..3 {
            let a = week_bounds(reference, offset);
            let b = week_bounds(reference, offset + 1);
            assert_eq!(b.start_date, a.start_date + Duration::days(7));
            assert_eq!(a.end_date, a.start_date + Duration::days(6));
        }
    }

    #[test]
    fn week_id_is_stable_across_the_span() {
        let monday = week_bounds(date(2024, 5, 13), 0);
        let sunday = week_bounds(date(2024, 5, 19), 0);
        assert_eq!(monday.week_id, sunday.week_id);
        assert_eq!(monday.week_id, "2024-W20");
    }

    #[test]
    fn current_week_contains_today() {
        let today = Local::now().date_naive();
        let bounds = current_week_bounds(0);
        assert!(bounds.start_date <= today && today <= bounds.end_date);
        assert_eq!(bounds.end_date, bounds.start_date + Duration::days(6));
    }

    #[test]
    fn reference_always_falls_inside_its_own_week() {
        let mut day = date(2024, 1, 1);
        for _ in 0..30 {
            let bounds = week_bounds(day, 0);
            assert!(bounds.start_date <= day && day <= bounds.end_date);
            day += Duration::days(1);
        }
    }
}
