use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use lodge_domain::CalendarMonth;

use crate::CoreError;

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Returns the current calendar date at the property's offset.
    fn today_at(&self, offset: FixedOffset) -> NaiveDate {
        local_date(self.now(), offset)
    }
}

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Calendar date of `instant` as seen at `offset`.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Inclusive UTC bounds of `month` as observed at `offset`.
///
/// The upper bound is the last representable instant of the month's final day, so
/// anything stamped during 23:59:59 local still belongs to the month.
pub fn month_window(
    month: CalendarMonth,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CoreError> {
    let start = local_midnight(month.first_day(), offset)?;
    let next_first = month
        .last_day()
        .succ_opt()
        .ok_or_else(|| CoreError::Validation(format!("month {month} is out of range")))?;
    let end = local_midnight(next_first, offset)? - Duration::nanoseconds(1);
    Ok((start, end))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>, CoreError> {
    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| CoreError::Validation(format!("no local midnight for {date}")))
}
