//! Month grid arithmetic for the journal calendar.
//!
//! Months are 0-indexed throughout (0 = January) and weeks start on Sunday.
//! Nothing here depends on a date library; chrono values are only accepted
//! as inputs to [`is_same_day`].

use crate::models::Entry;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

pub const GRID_CELLS: usize = 42;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar date without any time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay {
    pub year: i32,
    /// 0-indexed month.
    pub month: u32,
    pub day: u32,
}

impl CalendarDay {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if month > 11 || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Parses the canonical `YYYY-MM-DD` form.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.splitn(3, '-');
        let year = parts.next()?;
        let month = parts.next()?;
        let day = parts.next()?;
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return None;
        }
        if ![year, month, day].iter().all(|part| part.bytes().all(|b| b.is_ascii_digit())) {
            return None;
        }
        let month: u32 = month.parse().ok()?;
        Self::new(year.parse().ok()?, month.checked_sub(1)?, day.parse().ok()?)
    }

    /// Canonical `YYYY-MM-DD` key, the form entry dates are stored in.
    pub fn date_key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month + 1, self.day)
    }

    pub fn weekday(&self) -> u32 {
        weekday_of(self.year, self.month, self.day)
    }

    pub fn today() -> Self {
        chrono::Local::now().date_naive().calendar_day()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.date_key())
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.date_key())
    }
}

/// Anything that carries year/month/day components.
pub trait HasCalendarDay {
    fn calendar_day(&self) -> CalendarDay;
}

impl HasCalendarDay for CalendarDay {
    fn calendar_day(&self) -> CalendarDay {
        *self
    }
}

impl HasCalendarDay for NaiveDate {
    fn calendar_day(&self) -> CalendarDay {
        CalendarDay {
            year: self.year(),
            month: self.month0(),
            day: self.day(),
        }
    }
}

impl HasCalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> CalendarDay {
        self.date().calendar_day()
    }
}

impl<Tz: TimeZone> HasCalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> CalendarDay {
        self.date_naive().calendar_day()
    }
}

/// Compares calendar components only, ignoring any time of day.
pub fn is_same_day(a: &impl HasCalendarDay, b: &impl HasCalendarDay) -> bool {
    a.calendar_day() == b.calendar_day()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: CalendarDay,
    pub in_current_month: bool,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Day of week for a date, 0 = Sunday.
pub fn weekday_of(year: i32, month: u32, day: u32) -> u32 {
    const OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month = month.min(11) as usize;
    let y = i64::from(year) - i64::from(month < 2);
    let sum = y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + OFFSETS[month] + i64::from(day);
    sum.rem_euclid(7) as u32
}

/// Moves `(year, month)` by `delta` months, rolling over year boundaries.
///
/// Also normalizes an out-of-range `month`, so `advance(y, m, 0)` is always a
/// valid pair.
pub fn advance(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) + i64::from(delta);
    (total.div_euclid(12) as i32, total.rem_euclid(12) as u32)
}

/// The 6×7 cells shown for `(year, month)`, padded with adjacent-month days.
pub fn grid(year: i32, month: u32) -> [CalendarCell; GRID_CELLS] {
    let (year, month) = advance(year, month, 0);
    let (prev_year, prev_month) = advance(year, month, -1);
    let (next_year, next_month) = advance(year, month, 1);

    let leading = i64::from(weekday_of(year, month, 1));
    let length = i64::from(days_in_month(year, month));
    let prev_length = i64::from(days_in_month(prev_year, prev_month));

    std::array::from_fn(|index| {
        let offset = index as i64 - leading + 1;
        if offset < 1 {
            CalendarCell {
                date: CalendarDay {
                    year: prev_year,
                    month: prev_month,
                    day: (prev_length + offset) as u32,
                },
                in_current_month: false,
            }
        } else if offset > length {
            CalendarCell {
                date: CalendarDay {
                    year: next_year,
                    month: next_month,
                    day: (offset - length) as u32,
                },
                in_current_month: false,
            }
        } else {
            CalendarCell {
                date: CalendarDay {
                    year,
                    month,
                    day: offset as u32,
                },
                in_current_month: true,
            }
        }
    })
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month % 12) as usize]
}

/// The displayed month of a calendar widget.
///
/// The selected day is owned by the caller: navigation never touches it, and
/// [`CalendarView::select`] only reports the new value back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    year: i32,
    month: u32,
}

impl CalendarView {
    pub fn new(year: i32, month: u32) -> Self {
        let (year, month) = advance(year, month, 0);
        Self { year, month }
    }

    pub fn containing(day: &impl HasCalendarDay) -> Self {
        let day = day.calendar_day();
        Self::new(day.year, day.month)
    }

    pub fn displayed(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn advance(&mut self, delta: i32) {
        (self.year, self.month) = advance(self.year, self.month, delta);
    }

    pub fn next(&mut self) {
        self.advance(1);
    }

    pub fn prev(&mut self) {
        self.advance(-1);
    }

    pub fn cells(&self) -> [CalendarCell; GRID_CELLS] {
        grid(self.year, self.month)
    }

    pub fn select(&self, cell: &CalendarCell) -> CalendarDay {
        cell.date
    }
}

/// Entries whose stored date string equals `day` exactly.
pub fn filter_by_day(entries: &[Entry], day: &CalendarDay) -> Vec<Entry> {
    let key = day.date_key();
    entries.iter().filter(|entry| entry.date == key).cloned().collect()
}

/// Date keys that have at least one entry, for marking grid cells.
pub fn days_with_entries(entries: &[Entry]) -> HashSet<&str> {
    entries.iter().map(|entry| entry.date.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_for(cells: &[CalendarCell], year: i32, month: u32, day: u32) -> (usize, CalendarCell) {
        cells
            .iter()
            .copied()
            .enumerate()
            .find(|(_, c)| c.date == CalendarDay { year, month, day })
            .expect("day missing from grid")
    }

    #[test]
    fn weekday_matches_known_dates() {
        assert_eq!(weekday_of(2024, 1, 1), 4);
        assert_eq!(weekday_of(2023, 1, 1), 3);
        assert_eq!(weekday_of(2000, 0, 1), 6);
        assert_eq!(weekday_of(2026, 9, 16), 5);
    }

    #[test]
    fn weekday_agrees_with_chrono() {
        for year in [1900, 1999, 2000, 2023, 2024, 2100] {
            for month in 0..12 {
                let date = NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap();
                assert_eq!(
                    weekday_of(year, month, 1),
                    date.weekday().num_days_from_sunday(),
                    "{year}-{month}"
                );
                let last = NaiveDate::from_ymd_opt(year, month + 1, days_in_month(year, month));
                assert!(last.is_some());
            }
        }
    }

    #[test]
    fn leap_february_keeps_day_29_in_month() {
        let cells = grid(2024, 1);
        assert_eq!(cells.len(), GRID_CELLS);
        assert_eq!(cells[0].date, CalendarDay { year: 2024, month: 0, day: 28 });
        assert!(!cells[0].in_current_month);
        assert_eq!(cells[4].date, CalendarDay { year: 2024, month: 1, day: 1 });

        let (index, day_29) = cell_for(&cells, 2024, 1, 29);
        assert!(day_29.in_current_month);
        assert_eq!(cells[index + 1].date, CalendarDay { year: 2024, month: 2, day: 1 });
        assert!(!cells[index + 1].in_current_month);
    }

    #[test]
    fn common_february_rolls_into_march_after_day_28() {
        let cells = grid(2023, 1);
        assert_eq!(cells.len(), GRID_CELLS);
        let (index, day_28) = cell_for(&cells, 2023, 1, 28);
        assert!(day_28.in_current_month);
        let after = cells[index + 1];
        assert_eq!(after.date, CalendarDay { year: 2023, month: 2, day: 1 });
        assert!(!after.in_current_month);
        assert!(cells.iter().all(|c| !(c.date.month == 1 && c.date.day == 29)));
    }

    #[test]
    fn grid_is_contiguous_and_covers_month() {
        for (year, month) in [(2024, 0), (2024, 1), (2023, 1), (2021, 7), (2026, 9), (2015, 1)] {
            let cells = grid(year, month);
            let in_month = cells.iter().filter(|c| c.in_current_month).count();
            assert_eq!(in_month as u32, days_in_month(year, month));
            assert_eq!(cells[0].date.weekday(), 0);

            for pair in cells.windows(2) {
                let a = NaiveDate::from_ymd_opt(pair[0].date.year, pair[0].date.month + 1, pair[0].date.day).unwrap();
                let b = NaiveDate::from_ymd_opt(pair[1].date.year, pair[1].date.month + 1, pair[1].date.day).unwrap();
                assert_eq!(b.signed_duration_since(a).num_days(), 1);
            }
        }
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_padding() {
        // February 2015 starts on a Sunday and fills exactly four weeks
        let cells = grid(2015, 1);
        assert_eq!(cells[0].date, CalendarDay { year: 2015, month: 1, day: 1 });
        assert!(cells[0].in_current_month);
        assert_eq!(cells[28].date, CalendarDay { year: 2015, month: 2, day: 1 });
        assert_eq!(cells[41].date, CalendarDay { year: 2015, month: 2, day: 14 });
    }

    #[test]
    fn december_grid_spills_into_next_year() {
        let cells = grid(2024, 11);
        let last = cells[GRID_CELLS - 1];
        assert_eq!(last.date.year, 2025);
        assert_eq!(last.date.month, 0);
        assert!(!last.in_current_month);
    }

    #[test]
    fn advance_rolls_over_years() {
        assert_eq!(advance(2024, 0, -1), (2023, 11));
        assert_eq!(advance(2024, 11, 1), (2025, 0));
        assert_eq!(advance(2024, 5, -18), (2022, 11));
        assert_eq!(advance(2024, 5, 30), (2026, 11));
        assert_eq!(advance(2024, 14, 0), (2025, 2));
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(6, 0, 0).unwrap();
        let night = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(23, 59, 59).unwrap();
        assert!(is_same_day(&morning, &night));
        assert!(is_same_day(&morning, &CalendarDay { year: 2024, month: 1, day: 29 }));
        assert!(!is_same_day(&morning, &CalendarDay { year: 2024, month: 2, day: 1 }));
    }

    #[test]
    fn parses_canonical_date_strings() {
        let day = CalendarDay::parse("2024-02-29").unwrap();
        assert_eq!(day, CalendarDay { year: 2024, month: 1, day: 29 });
        assert_eq!(day.date_key(), "2024-02-29");
        assert!(CalendarDay::parse("2023-02-29").is_none());
        assert!(CalendarDay::parse("2024-13-01").is_none());
        assert!(CalendarDay::parse("2024-00-01").is_none());
        assert!(CalendarDay::parse("2024-2-1").is_none());
        assert!(CalendarDay::parse("2024-02-01 10:00").is_none());
        assert!(CalendarDay::parse("").is_none());
        assert!(CalendarDay::parse("+999-01-01").is_none());
        assert!(CalendarDay::parse("2024-+1-01").is_none());
        assert!(CalendarDay::parse("2024-01-+1").is_none());
    }

    #[test]
    fn navigation_leaves_selection_alone() {
        let selected = CalendarDay { year: 2024, month: 0, day: 15 };
        let mut view = CalendarView::containing(&selected);
        view.prev();
        assert_eq!(view.displayed(), (2023, 11));
        view.next();
        view.next();
        assert_eq!(view.displayed(), (2024, 1));
        assert_eq!(selected, CalendarDay { year: 2024, month: 0, day: 15 });

        let cells = view.cells();
        let picked = view.select(&cells[10]);
        assert_eq!(picked, cells[10].date);
        assert_eq!(view.displayed(), (2024, 1));
        assert_eq!(view.title(), "February 2024");
    }

    #[test]
    fn filters_entries_by_exact_date_string() {
        let make = |id: i64, date: &str| Entry {
            id,
            content: String::new(),
            mood_level: 3,
            date: date.to_string(),
            analysis: None,
            keywords: Vec::new(),
            is_public: false,
            is_anonymous: false,
            author: None,
            is_saved: false,
            reality_context: None,
        };
        let entries = vec![make(1, "2024-02-01"), make(2, "2024-02-02"), make(3, "2024-02-01 08:00")];
        let day = CalendarDay { year: 2024, month: 1, day: 1 };
        let hits = filter_by_day(&entries, &day);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let marked = days_with_entries(&entries);
        assert!(marked.contains("2024-02-02"));
        assert!(!marked.contains("2024-02-03"));
    }
}
