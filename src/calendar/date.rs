use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    Day,
    Week,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub iso: String,
    pub label: String,
    pub is_today: bool,
}

impl CalendarDate {
    pub fn new(date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            date,
            iso: date.format("%Y-%m-%d").to_string(),
            label: date.format("%a, %b %-d").to_string(),
            is_today: date == today,
        }
    }
}

pub fn week_of_date(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(days_from_monday))
        .unwrap_or(date)
}

/// The dates a view shows around `anchor`: the day itself, or Monday..Sunday.
pub fn calendar_dates(view: ViewMode, anchor: NaiveDate, today: NaiveDate) -> Vec<CalendarDate> {
    match view {
        ViewMode::Day => vec![CalendarDate::new(anchor, today)],
        ViewMode::Week => {
            let week_start = week_of_date(anchor);
            (0..7u64)
                .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
                .map(|date| CalendarDate::new(date, today))
                .collect()
        }
    }
}

pub fn navigate(view: ViewMode, anchor: NaiveDate, direction: Direction) -> NaiveDate {
    let step = match view {
        ViewMode::Day => Days::new(1),
        ViewMode::Week => Days::new(7),
    };
    let moved = match direction {
        Direction::Previous => anchor.checked_sub_days(step),
        Direction::Next => anchor.checked_add_days(step),
    };
    moved.unwrap_or(anchor)
}
