//! Month navigation and per-day classification over an [`OccupancyIndex`].

use chrono::NaiveDate;

use lodge_domain::{CalendarMonth, DayCell, DayStatus, MonthCalendar, MonthOccupancy, RoomFilter};

use crate::occupancy::OccupancyIndex;

/// Navigation actions offered by a month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthNavigation {
    Previous,
    Next,
    Today,
}

pub struct CalendarService;

impl CalendarService {
    /// Applies a navigation step to the displayed month.
    pub fn navigate(current: CalendarMonth, step: MonthNavigation, today: NaiveDate) -> CalendarMonth {
        match step {
            MonthNavigation::Previous => current.previous(),
            MonthNavigation::Next => current.next(),
            MonthNavigation::Today => CalendarMonth::containing(today),
        }
    }

    /// Classifies one date. Precedence is today, then booked, then past, then available;
    /// the individual flags are reported regardless of precedence.
    pub fn classify_day(
        today: NaiveDate,
        date: NaiveDate,
        index: &OccupancyIndex,
        filter: RoomFilter,
    ) -> DayCell {
        let bookings = index.bookings_for(filter, date).to_vec();
        let is_today = date == today;
        let is_past = date < today;
        let is_booked = !bookings.is_empty();
        let status = if is_today {
            DayStatus::Today
        } else if is_booked {
            DayStatus::Booked
        } else if is_past {
            DayStatus::Past
        } else {
            DayStatus::Available
        };
        DayCell {
            date,
            status,
            is_today,
            is_past,
            is_booked,
            bookings,
        }
    }

    pub fn month_occupancy(
        index: &OccupancyIndex,
        filter: RoomFilter,
        month: CalendarMonth,
    ) -> MonthOccupancy {
        let days_in_month = month.days_in_month();
        let booked_days = index.booked_days_in_month(filter, month);
        MonthOccupancy {
            month,
            filter,
            booked_days,
            available_days: days_in_month - booked_days,
            days_in_month,
            rate: f64::from(booked_days) / f64::from(days_in_month),
        }
    }

    pub fn month_calendar(
        index: &OccupancyIndex,
        filter: RoomFilter,
        month: CalendarMonth,
        today: NaiveDate,
    ) -> MonthCalendar {
        MonthCalendar {
            month,
            filter,
            leading_blank_days: month.leading_blank_days(),
            days: month
                .days()
                .map(|date| Self::classify_day(today, date, index, filter))
                .collect(),
            occupancy: Self::month_occupancy(index, filter, month),
        }
    }
}
