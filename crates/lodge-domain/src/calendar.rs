//! Calendar month arithmetic and the per-day occupancy view models.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{room::RoomFilter, stay::BookingDescriptor};

/// A calendar month, always valid once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MonthParts", into = "MonthParts")]
pub struct CalendarMonth {
    first: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct MonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<MonthParts> for CalendarMonth {
    type Error = String;

    fn try_from(parts: MonthParts) -> Result<Self, Self::Error> {
        CalendarMonth::new(parts.year, parts.month)
            .ok_or_else(|| format!("invalid month {}-{}", parts.year, parts.month))
    }
}

impl From<CalendarMonth> for MonthParts {
    fn from(month: CalendarMonth) -> Self {
        MonthParts {
            year: month.year(),
            month: month.month(),
        }
    }
}

impl CalendarMonth {
    /// Returns `None` when `month` is outside `1..=12` or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// Moves by `months`, staying put when the result would leave chrono's range.
    pub fn shift(&self, months: i32) -> Self {
        let magnitude = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.first.checked_add_months(magnitude)
        } else {
            self.first.checked_sub_months(magnitude)
        };
        shifted.map(|first| Self { first }).unwrap_or(*self)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every date of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first;
        (0..self.days_in_month()).filter_map(move |offset| first.checked_add_days(Days::new(u64::from(offset))))
    }

    /// Number of empty grid cells before day 1 in a Sunday-first week layout.
    pub fn leading_blank_days(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%B %Y"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Today,
    Booked,
    Past,
    Available,
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayStatus::Today => "Today",
            DayStatus::Booked => "Booked",
            DayStatus::Past => "Past",
            DayStatus::Available => "Available",
        };
        f.write_str(label)
    }
}

/// One day of a rendered month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub is_today: bool,
    pub is_past: bool,
    pub is_booked: bool,
    pub bookings: Vec<BookingDescriptor>,
}

/// Booked/available day counts for one month and room filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthOccupancy {
    pub month: CalendarMonth,
    pub filter: RoomFilter,
    pub booked_days: u32,
    pub available_days: u32,
    pub days_in_month: u32,
    /// `booked_days / days_in_month`, in `0.0..=1.0`.
    pub rate: f64,
}

impl MonthOccupancy {
    /// Occupancy rate as a whole percentage, rounded to nearest.
    pub fn rate_percent(&self) -> u32 {
        (self.rate * 100.0).round() as u32
    }
}

/// A fully classified month ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub month: CalendarMonth,
    pub filter: RoomFilter,
    pub leading_blank_days: u32,
    pub days: Vec<DayCell>,
    pub occupancy: MonthOccupancy,
}
