use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    memory::MemoryStore,
    storage::{RecordFilter, RecordStore},
    time::FixedClock,
    CoreError, LedgerSettings, StayLedger,
};
use lodge_domain::{
    CalendarMonth, Charges, DayStatus, GuestAddress, NewStay, RoomFilter, RoomId, Stay,
};

/// Delegates to a memory store and counts inserts.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore<Stay>,
    inserts: AtomicUsize,
}

impl RecordStore<Stay> for CountingStore {
    fn insert(&self, record: Stay) -> Result<Uuid, CoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(record)
    }

    fn find_all(&self, filter: Option<&RecordFilter>) -> Result<Vec<Stay>, CoreError> {
        self.inner.find_all(filter)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Stay>, CoreError> {
        self.inner.find_by_id(id)
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError> {
        self.inner.delete_by_id(id)
    }
}

/// Fails every call, standing in for an unreachable backend.
struct BrokenStore;

impl RecordStore<Stay> for BrokenStore {
    fn insert(&self, _record: Stay) -> Result<Uuid, CoreError> {
        Err(CoreError::Storage("backend offline".into()))
    }

    fn find_all(&self, _filter: Option<&RecordFilter>) -> Result<Vec<Stay>, CoreError> {
        Err(CoreError::Storage("backend offline".into()))
    }

    fn find_by_id(&self, _id: Uuid) -> Result<Option<Stay>, CoreError> {
        Err(CoreError::Storage("backend offline".into()))
    }

    fn delete_by_id(&self, _id: Uuid) -> Result<bool, CoreError> {
        Err(CoreError::Storage("backend offline".into()))
    }
}

fn june_15_ist() -> FixedClock {
    // 2024-06-15 10:00 at +05:30
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 4, 30, 0).unwrap())
}

fn ledger_with(store: Arc<dyn RecordStore<Stay>>) -> StayLedger {
    StayLedger::new(store, Arc::new(june_15_ist()), LedgerSettings::default())
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn booking(guest: &str, room: RoomId) -> NewStay {
    NewStay::new(guest, room, "9876543210")
}

#[test]
fn create_stay_computes_invoice_and_persists_once() {
    let store = Arc::new(CountingStore::default());
    let ledger = ledger_with(store.clone());

    let mut input = booking("Asha", RoomId::D1)
        .with_dates(date(6, 14), date(6, 16))
        .with_charges(Charges::new(dec!(1000), dec!(250.333), dec!(0)));
    input.address = GuestAddress {
        line: "12 Lake Road".into(),
        city: "Udaipur".into(),
        state: "Rajasthan".into(),
        pincode: "313001".into(),
    };
    let stay = ledger.create_stay(input).expect("create stay");

    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(stay.totals.grand_total, dec!(1312.85));
    assert_eq!(stay.invoice_number, format!("GR{}", june_15_ist().0.timestamp_millis()));
    assert_eq!(ledger.get_stay(stay.id).expect("stored"), stay);
}

#[test]
fn validation_failure_never_reaches_the_store() {
    let store = Arc::new(CountingStore::default());
    let ledger = ledger_with(store.clone());

    let mut input = booking("Asha", RoomId::C1);
    input.guest_names.clear();
    let err = ledger.create_stay(input).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert!(ledger.list_stays().unwrap().is_empty());
}

#[test]
fn inverted_dates_are_rejected_on_creation() {
    let store = Arc::new(CountingStore::default());
    let ledger = ledger_with(store.clone());
    let input = booking("Ravi", RoomId::G1).with_dates(date(6, 12), date(6, 10));
    assert!(ledger.create_stay(input).unwrap_err().is_validation());
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
}

#[test]
fn generated_invoice_numbers_stay_unique_within_one_millisecond() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    let first = ledger.create_stay(booking("Asha", RoomId::C1)).unwrap();
    let second = ledger.create_stay(booking("Ravi", RoomId::C2)).unwrap();
    assert_ne!(first.invoice_number, second.invoice_number);
}

#[test]
fn supplied_invoice_number_must_be_unused() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    let mut input = booking("Asha", RoomId::C1);
    input.invoice_number = Some("GR-001".into());
    ledger.create_stay(input.clone()).expect("first use");
    assert!(ledger.create_stay(input).unwrap_err().is_validation());
}

#[test]
fn delete_unknown_stay_is_not_found() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    let missing = Uuid::new_v4();
    match ledger.delete_stay(missing) {
        Err(CoreError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(ledger.get_stay(missing).unwrap_err().is_not_found());
}

#[test]
fn delete_removes_the_stay() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    let stay = ledger.create_stay(booking("Asha", RoomId::C1)).unwrap();
    ledger.delete_stay(stay.id).expect("delete");
    assert!(ledger.list_stays().unwrap().is_empty());
}

#[test]
fn store_failures_are_terminal() {
    let ledger = ledger_with(Arc::new(BrokenStore));
    let err = ledger.create_stay(booking("Asha", RoomId::C1)).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert!(matches!(ledger.monthly_summary(6, 2024), Err(CoreError::Storage(_))));
}

#[test]
fn monthly_summary_and_dashboard_use_the_property_clock() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    ledger
        .create_stay(booking("Asha", RoomId::C1).with_charges(Charges::new(dec!(2000), dec!(0), dec!(0))))
        .unwrap();

    let summary = ledger.monthly_summary(6, 2024).unwrap();
    assert_eq!(summary.total_bills, 1);
    assert_eq!(summary.total_revenue, dec!(2100.00));
    assert_eq!(summary.total_sgst, dec!(50.00));
    assert!(ledger.monthly_summary(7, 2024).unwrap().bills.is_empty());

    let dashboard = ledger.dashboard().unwrap();
    assert_eq!(dashboard.today_bills, 1);
    assert_eq!(dashboard.monthly_revenue, dec!(2100.00));
}

#[test]
fn month_calendar_marks_booked_days_and_today() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    ledger
        .create_stay(booking("Asha", RoomId::D2).with_dates(date(6, 14), date(6, 16)))
        .unwrap();

    let june = CalendarMonth::new(2024, 6).unwrap();
    let view = ledger.month_calendar(RoomFilter::Room(RoomId::D2), june).unwrap();
    assert_eq!(view.days[13].status, DayStatus::Booked);
    assert_eq!(view.days[14].status, DayStatus::Today);
    assert!(view.days[14].is_booked);
    assert_eq!(view.days[0].status, DayStatus::Past);
    assert_eq!(view.days[20].status, DayStatus::Available);
    assert_eq!(view.occupancy.booked_days, 3);

    let other_room = ledger.month_calendar(RoomFilter::Room(RoomId::C1), june).unwrap();
    assert_eq!(other_room.occupancy.booked_days, 0);
}

#[test]
fn overlapping_rooms_are_reported_but_accepted() {
    let ledger = ledger_with(Arc::new(MemoryStore::new()));
    ledger
        .create_stay(booking("Asha", RoomId::G2).with_dates(date(6, 1), date(6, 2)))
        .unwrap();
    ledger
        .create_stay(booking("Ravi", RoomId::G2).with_dates(date(6, 2), date(6, 3)))
        .expect("double booking is accepted");

    let conflicts = ledger.conflicts().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].date, date(6, 2));
    assert!(ledger.warnings().unwrap().is_empty());
}
