//! Monthly aggregation and front-page figures computed from a stay snapshot.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use lodge_domain::{round_money, CalendarMonth, Dashboard, MonthlySummary, RoomId, RoomUsage, Stay};

use crate::{
    time::{local_date, month_window},
    CoreError,
};

pub struct SummaryService;

impl SummaryService {
    /// Summarizes the stays created during `month`/`year` at `offset`.
    ///
    /// Stays are bucketed by `created_at`, never by their check-in or check-out dates.
    pub fn aggregate(
        stays: &[Stay],
        month: u32,
        year: i32,
        offset: FixedOffset,
    ) -> Result<MonthlySummary, CoreError> {
        let calendar_month = CalendarMonth::new(year, month).ok_or_else(|| {
            CoreError::Validation(format!("month must be between 1 and 12, got {month}"))
        })?;
        let (start, end) = month_window(calendar_month, offset)?;

        let mut bills: Vec<Stay> = stays
            .iter()
            .filter(|stay| stay.created_at >= start && stay.created_at <= end)
            .cloned()
            .collect();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut summary = MonthlySummary {
            month,
            year,
            total_bills: bills.len(),
            total_revenue: Decimal::ZERO,
            total_room_charges: Decimal::ZERO,
            total_food_charges: Decimal::ZERO,
            total_other_charges: Decimal::ZERO,
            total_sgst: Decimal::ZERO,
            total_cgst: Decimal::ZERO,
            bills: Vec::new(),
            room_usage: Self::room_usage(&bills),
        };
        for bill in &bills {
            summary.total_revenue += bill.totals.grand_total;
            summary.total_room_charges += bill.charges.room;
            summary.total_food_charges += bill.charges.food;
            summary.total_other_charges += bill.charges.other;
            summary.total_sgst += bill.totals.sgst;
            summary.total_cgst += bill.totals.cgst;
        }
        summary.bills = bills;

        debug!(
            month = %calendar_month,
            scanned = stays.len(),
            bills = summary.total_bills,
            "monthly summary aggregated"
        );
        Ok(summary)
    }

    /// Mean grand total per bill, zero when the month has no bills.
    pub fn average_bill_value(summary: &MonthlySummary) -> Decimal {
        if summary.total_bills == 0 {
            return Decimal::ZERO;
        }
        round_money(summary.total_revenue / Decimal::from(summary.total_bills))
    }

    /// Bookings and revenue per primary room, busiest first.
    ///
    /// A multi-room stay is attributed to its first room only.
    pub fn room_usage(stays: &[Stay]) -> Vec<RoomUsage> {
        let mut usage: HashMap<RoomId, RoomUsage> = HashMap::new();
        for stay in stays {
            let Some(room) = stay.primary_room() else {
                continue;
            };
            let entry = usage.entry(room).or_insert(RoomUsage {
                room,
                bookings: 0,
                revenue: Decimal::ZERO,
            });
            entry.bookings += 1;
            entry.revenue += stay.totals.grand_total;
        }
        let mut usage: Vec<RoomUsage> = usage.into_values().collect();
        usage.sort_by(|a, b| b.bookings.cmp(&a.bookings).then(a.room.cmp(&b.room)));
        usage
    }

    /// Front-page figures as of `now`, with days and months taken at `offset`.
    pub fn dashboard(
        stays: &[Stay],
        now: DateTime<Utc>,
        offset: FixedOffset,
        recent_limit: usize,
    ) -> Dashboard {
        let today = local_date(now, offset);
        let this_month = CalendarMonth::containing(today);

        let mut today_bills = 0;
        let mut monthly_revenue = Decimal::ZERO;
        for stay in stays {
            let created = local_date(stay.created_at, offset);
            if created == today {
                today_bills += 1;
            }
            if this_month.contains(created) {
                monthly_revenue += stay.totals.grand_total;
            }
        }

        let mut recent_stays = stays.to_vec();
        recent_stays.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_stays.truncate(recent_limit);

        Dashboard {
            total_bills: stays.len(),
            today_bills,
            monthly_revenue,
            recent_stays,
        }
    }
}
