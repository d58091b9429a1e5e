//! Due-date arithmetic
//!
//! Temporary maintenance repairs are due a fixed number of calendar days
//! after the job card; NCAs must close within a number of working days,
//! where Saturday and Sunday do not count.

use crate::config::DueDateConfig;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Due date for a temporary repair raised on `raised_on`
#[must_use]
pub fn temporary_repair_due(config: &DueDateConfig, raised_on: NaiveDate) -> NaiveDate {
    raised_on
        .checked_add_days(Days::new(u64::from(config.temporary_repair_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Closure deadline for an NCA opened on `opened_on`
#[must_use]
pub fn nca_closure_due(config: &DueDateConfig, opened_on: NaiveDate) -> NaiveDate {
    add_working_days(opened_on, config.nca_closure_working_days)
}

/// Add `days` working days, skipping weekends
///
/// Counting starts on the day after `from`. A weekend start is not moved.
#[must_use]
pub fn add_working_days(from: NaiveDate, days: u32) -> NaiveDate {
    let mut date = from;
    let mut remaining = days;
    while remaining > 0 {
        match date.succ_opt() {
            Some(next) => date = next,
            None => return NaiveDate::MAX,
        }
        if is_working_day(date) {
            remaining -= 1;
        }
    }
    date
}

/// Monday to Friday
#[inline]
#[must_use]
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `due` has passed on `today`
#[inline]
#[must_use]
pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    today > due
}

/// Working days from `today` until `due`; negative when overdue
#[must_use]
pub fn working_days_remaining(due: NaiveDate, today: NaiveDate) -> i64 {
    let (start, end, sign) = if due >= today {
        (today, due, 1)
    } else {
        (due, today, -1)
    };
    let count = start
        .iter_days()
        .skip(1)
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d))
        .count();
    sign * i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn temporary_repair_is_fourteen_calendar_days() {
        let config = DueDateConfig::default();
        assert_eq!(temporary_repair_due(&config, date(2025, 1, 6)), date(2025, 1, 20));
        assert_eq!(temporary_repair_due(&config, date(2025, 12, 25)), date(2026, 1, 8));
    }

    #[test]
    fn nca_closure_skips_weekends() {
        let config = DueDateConfig::default();
        // Monday + 20 working days is four weeks later
        assert_eq!(nca_closure_due(&config, date(2025, 1, 6)), date(2025, 2, 3));
        // Friday + 1 working day is Monday
        assert_eq!(add_working_days(date(2025, 1, 10), 1), date(2025, 1, 13));
    }

    #[test]
    fn weekend_start_counts_from_monday() {
        assert_eq!(add_working_days(date(2025, 1, 11), 1), date(2025, 1, 13));
        assert_eq!(add_working_days(date(2025, 1, 11), 0), date(2025, 1, 11));
    }

    #[test]
    fn overdue_is_strictly_after() {
        let due = date(2025, 2, 3);
        assert!(!is_overdue(due, due));
        assert!(is_overdue(due, date(2025, 2, 4)));
    }

    #[test]
    fn remaining_working_days() {
        let due = date(2025, 1, 13); // Monday
        assert_eq!(working_days_remaining(due, date(2025, 1, 10)), 1);
        assert_eq!(working_days_remaining(due, due), 0);
        assert_eq!(working_days_remaining(date(2025, 1, 10), due), -1);
    }
}
