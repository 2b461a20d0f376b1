//! Per-date, per-room occupancy derived from a snapshot of stays.
//!
//! The index is a view: it is rebuilt from the full stay set before every query
//! batch and never mutated or persisted.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use lodge_domain::{BookingDescriptor, CalendarMonth, RoomFilter, RoomId, Stay};

/// Two or more stays claiming the same room on the same date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomConflict {
    pub room: RoomId,
    pub date: NaiveDate,
    pub stay_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    filter: RoomFilter,
    by_date: BTreeMap<NaiveDate, Vec<BookingDescriptor>>,
    by_room: HashMap<RoomId, BTreeMap<NaiveDate, Vec<BookingDescriptor>>>,
}

impl OccupancyIndex {
    /// Indexes every stay of the property.
    pub fn build(stays: &[Stay]) -> Self {
        Self::build_filtered(stays, RoomFilter::All)
    }

    /// Indexes only the stays visible through `filter`.
    pub fn build_filtered(stays: &[Stay], filter: RoomFilter) -> Self {
        let mut index = Self {
            filter,
            ..Self::default()
        };
        for stay in stays.iter().filter(|stay| filter.admits(&stay.room_ids)) {
            let Some((check_in, check_out)) = stay.stay_range() else {
                continue;
            };
            let descriptor = BookingDescriptor::from(stay);
            for date in occupied_dates(check_in, check_out) {
                index
                    .by_date
                    .entry(date)
                    .or_default()
                    .push(descriptor.clone());
                for room in &stay.room_ids {
                    index
                        .by_room
                        .entry(*room)
                        .or_default()
                        .entry(date)
                        .or_default()
                        .push(descriptor.clone());
                }
            }
        }
        debug!(
            stays = stays.len(),
            dates = index.by_date.len(),
            %filter,
            "occupancy index built"
        );
        index
    }

    /// The filter the index was built with.
    pub fn filter(&self) -> RoomFilter {
        self.filter
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn is_booked(&self, filter: RoomFilter, date: NaiveDate) -> bool {
        !self.bookings_for(filter, date).is_empty()
    }

    /// Every booking on `date`, one descriptor per stay.
    pub fn bookings_on(&self, date: NaiveDate) -> &[BookingDescriptor] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bookings on `date` restricted to `filter`.
    pub fn bookings_for(&self, filter: RoomFilter, date: NaiveDate) -> &[BookingDescriptor] {
        match filter {
            RoomFilter::All => self.bookings_on(date),
            RoomFilter::Room(room) => self
                .by_room
                .get(&room)
                .and_then(|dates| dates.get(&date))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// Distinct dates with at least one booking for `filter`.
    pub fn booked_dates(&self, filter: RoomFilter) -> BTreeSet<NaiveDate> {
        match filter {
            RoomFilter::All => self.by_date.keys().copied().collect(),
            RoomFilter::Room(room) => self
                .by_room
                .get(&room)
                .map(|dates| dates.keys().copied().collect())
                .unwrap_or_default(),
        }
    }

    /// Booked dates of `month` with their bookings, ascending by date.
    pub fn bookings_in_month(
        &self,
        filter: RoomFilter,
        month: CalendarMonth,
    ) -> Vec<(NaiveDate, Vec<BookingDescriptor>)> {
        let range = month.first_day()..=month.last_day();
        let dates = match filter {
            RoomFilter::All => Some(&self.by_date),
            RoomFilter::Room(room) => self.by_room.get(&room),
        };
        dates
            .map(|dates| {
                dates
                    .range(range)
                    .map(|(date, bookings)| (*date, bookings.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of distinct dates in `month` with a booking for `filter`.
    pub fn booked_days_in_month(&self, filter: RoomFilter, month: CalendarMonth) -> u32 {
        month
            .days()
            .filter(|date| self.is_booked(filter, *date))
            .count() as u32
    }

    /// Room/date pairs claimed by more than one stay, ordered by date then room.
    pub fn conflicts(&self) -> Vec<RoomConflict> {
        let mut conflicts: Vec<RoomConflict> = self
            .by_room
            .iter()
            .flat_map(|(room, dates)| {
                dates
                    .iter()
                    .filter(|(_, bookings)| bookings.len() > 1)
                    .map(move |(date, bookings)| RoomConflict {
                        room: *room,
                        date: *date,
                        stay_ids: bookings.iter().map(|b| b.stay_id).collect(),
                    })
            })
            .collect();
        conflicts.sort_by(|a, b| (a.date, a.room).cmp(&(b.date, b.room)));
        conflicts
    }
}

/// Dates from `check_in` through `check_out`, both inclusive.
///
/// An inverted range yields nothing.
pub fn occupied_dates(check_in: NaiveDate, check_out: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    check_in
        .iter_days()
        .take_while(move |date| *date <= check_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lodge_domain::{Charges, GuestAddress, InvoiceTotals, Payment};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(guest: &str, rooms: &[RoomId], range: Option<(NaiveDate, NaiveDate)>) -> Stay {
        Stay {
            id: Uuid::new_v4(),
            invoice_number: format!("GR-{guest}"),
            guest_names: vec![guest.to_string()],
            room_ids: rooms.to_vec(),
            contact_phone: "9876543210".into(),
            check_in: range.map(|(start, _)| start),
            check_out: range.map(|(_, end)| end),
            charges: Charges::default(),
            payment: Payment::default(),
            address: GuestAddress::default(),
            totals: InvoiceTotals::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn three_night_range_occupies_both_endpoints() {
        let stays = vec![stay(
            "Asha",
            &[RoomId::C1, RoomId::D2],
            Some((date(2024, 6, 10), date(2024, 6, 12))),
        )];
        let index = OccupancyIndex::build(&stays);
        for room in [RoomId::C1, RoomId::D2] {
            let booked = index.booked_dates(RoomFilter::Room(room));
            assert_eq!(
                booked.into_iter().collect::<Vec<_>>(),
                vec![date(2024, 6, 10), date(2024, 6, 11), date(2024, 6, 12)]
            );
        }
        assert!(!index.is_booked(RoomFilter::Room(RoomId::C1), date(2024, 6, 13)));
        assert!(!index.is_booked(RoomFilter::Room(RoomId::G1), date(2024, 6, 11)));
    }

    #[test]
    fn same_day_stay_occupies_one_date() {
        let day = date(2024, 6, 10);
        let index = OccupancyIndex::build(&[stay("Ravi", &[RoomId::G1], Some((day, day)))]);
        assert_eq!(index.booked_dates(RoomFilter::All).len(), 1);
    }

    #[test]
    fn inverted_range_occupies_nothing() {
        // Boundary case kept from legacy records: no error, just no dates.
        let stays = vec![stay(
            "Meera",
            &[RoomId::C2],
            Some((date(2024, 6, 12), date(2024, 6, 10))),
        )];
        let index = OccupancyIndex::build(&stays);
        assert!(index.is_empty());
        assert_eq!(occupied_dates(date(2024, 6, 12), date(2024, 6, 10)).count(), 0);
    }

    #[test]
    fn stays_without_both_dates_are_skipped() {
        let mut partial = stay("Kiran", &[RoomId::C3], None);
        partial.check_in = Some(date(2024, 6, 1));
        let index = OccupancyIndex::build(&[partial, stay("Dev", &[RoomId::C4], None)]);
        assert!(index.is_empty());
    }

    #[test]
    fn all_filter_keeps_disjoint_rooms_on_the_same_date() {
        let day = date(2024, 6, 15);
        let first = stay("Asha", &[RoomId::C1], Some((day, day)));
        let second = stay("Ravi", &[RoomId::G2], Some((day, day)));
        let index = OccupancyIndex::build(&[first.clone(), second.clone()]);
        let bookings = index.bookings_on(day);
        assert_eq!(bookings.len(), 2);
        assert!(bookings.iter().any(|b| b.stay_id == first.id));
        assert!(bookings.iter().any(|b| b.stay_id == second.id));
        assert!(index.conflicts().is_empty());
    }

    #[test]
    fn multi_room_stay_appears_once_in_the_ungrouped_view() {
        let day = date(2024, 6, 15);
        let index = OccupancyIndex::build(&[stay("Asha", &[RoomId::C1, RoomId::C2], Some((day, day)))]);
        assert_eq!(index.bookings_on(day).len(), 1);
        assert_eq!(index.bookings_for(RoomFilter::Room(RoomId::C2), day).len(), 1);
    }

    #[test]
    fn filtered_build_drops_other_rooms() {
        let day = date(2024, 6, 15);
        let stays = vec![
            stay("Asha", &[RoomId::C1], Some((day, day))),
            stay("Ravi", &[RoomId::G2], Some((day, day))),
        ];
        let index = OccupancyIndex::build_filtered(&stays, RoomFilter::Room(RoomId::G2));
        assert_eq!(index.filter(), RoomFilter::Room(RoomId::G2));
        assert_eq!(index.bookings_on(day).len(), 1);
        assert_eq!(index.bookings_on(day)[0].guest_names, vec!["Ravi".to_string()]);
    }

    #[test]
    fn overlapping_stays_on_one_room_are_reported_as_conflicts() {
        let first = stay("Asha", &[RoomId::D1], Some((date(2024, 6, 1), date(2024, 6, 3))));
        let second = stay("Ravi", &[RoomId::D1], Some((date(2024, 6, 3), date(2024, 6, 4))));
        let index = OccupancyIndex::build(&[first.clone(), second.clone()]);
        let conflicts = index.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].room, RoomId::D1);
        assert_eq!(conflicts[0].date, date(2024, 6, 3));
        assert_eq!(conflicts[0].stay_ids, vec![first.id, second.id]);
    }

    #[test]
    fn month_queries_clip_to_the_month() {
        let stays = vec![stay(
            "Asha",
            &[RoomId::C1],
            Some((date(2024, 5, 30), date(2024, 6, 2))),
        )];
        let index = OccupancyIndex::build(&stays);
        let june = CalendarMonth::new(2024, 6).unwrap();
        let listed = index.bookings_in_month(RoomFilter::All, june);
        assert_eq!(
            listed.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
            vec![date(2024, 6, 1), date(2024, 6, 2)]
        );
        assert_eq!(index.booked_days_in_month(RoomFilter::All, june), 2);
        assert_eq!(index.booked_days_in_month(RoomFilter::Room(RoomId::C2), june), 0);
    }
}
