//! Stay ledger facade: validation, invoicing and persistence of guest stays, and the
//! derived views built from them.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use lodge_domain::{
    CalendarMonth, Dashboard, MonthCalendar, MonthlySummary, NewStay, RoomFilter, Stay,
};

use crate::{
    calendar_service::CalendarService,
    invoice::compute_invoice,
    occupancy::{OccupancyIndex, RoomConflict},
    storage::RecordStore,
    summary_service::SummaryService,
    time::{Clock, SystemClock},
    validation::{prepare_new_stay, stay_warnings},
    CoreError,
};

pub const DEFAULT_INVOICE_PREFIX: &str = "GR";
/// Minutes east of UTC used when nothing else is configured (+05:30).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;
pub const DEFAULT_RECENT_STAYS: usize = 5;

/// Property-level knobs the ledger needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    pub invoice_prefix: String,
    pub utc_offset: FixedOffset,
    pub recent_stays_limit: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            invoice_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .unwrap_or_else(|| Utc.fix()),
            recent_stays_limit: DEFAULT_RECENT_STAYS,
        }
    }
}

/// Facade over the stay collection.
///
/// Every query refetches the full collection and recomputes its view; nothing is
/// cached between calls.
pub struct StayLedger {
    store: Arc<dyn RecordStore<Stay>>,
    clock: Arc<dyn Clock>,
    settings: LedgerSettings,
}

impl StayLedger {
    pub fn new(
        store: Arc<dyn RecordStore<Stay>>,
        clock: Arc<dyn Clock>,
        settings: LedgerSettings,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    pub fn with_system_clock(store: Arc<dyn RecordStore<Stay>>, settings: LedgerSettings) -> Self {
        Self::new(store, Arc::new(SystemClock), settings)
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Today's date at the property.
    pub fn today(&self) -> NaiveDate {
        self.clock.today_at(self.settings.utc_offset)
    }

    pub fn current_month(&self) -> CalendarMonth {
        CalendarMonth::containing(self.today())
    }

    /// Validates `input`, computes its invoice and persists it with a single insert.
    pub fn create_stay(&self, input: NewStay) -> Result<Stay, CoreError> {
        let input = prepare_new_stay(input)?;
        let existing = self.store.find_all(None)?;
        let used: HashSet<&str> = existing.iter().map(|s| s.invoice_number.as_str()).collect();
        let now = self.clock.now();

        let invoice_number = match input.invoice_number {
            Some(number) if used.contains(number.as_str()) => {
                warn!(invoice = %number, "rejected duplicate invoice number");
                return Err(CoreError::Validation(format!(
                    "invoice number {number} is already used"
                )));
            }
            Some(number) => number,
            None => self.next_invoice_number(&used, now),
        };

        let mut stay = Stay {
            id: Uuid::nil(),
            invoice_number,
            guest_names: input.guest_names,
            room_ids: input.room_ids,
            contact_phone: input.contact_phone,
            check_in: input.check_in,
            check_out: input.check_out,
            totals: compute_invoice(&input.charges),
            charges: input.charges,
            payment: input.payment,
            address: input.address,
            created_at: now,
        };
        stay.id = self.store.insert(stay.clone())?;
        info!(
            id = %stay.id,
            invoice = %stay.invoice_number,
            rooms = %stay.rooms_label(),
            grand_total = %stay.totals.grand_total,
            "stay created"
        );
        Ok(stay)
    }

    /// All stays, most recently created first.
    pub fn list_stays(&self) -> Result<Vec<Stay>, CoreError> {
        let mut stays = self.store.find_all(None)?;
        stays.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stays)
    }

    pub fn get_stay(&self, id: Uuid) -> Result<Stay, CoreError> {
        self.store.find_by_id(id)?.ok_or(CoreError::NotFound(id))
    }

    pub fn delete_stay(&self, id: Uuid) -> Result<(), CoreError> {
        if !self.store.delete_by_id(id)? {
            return Err(CoreError::NotFound(id));
        }
        info!(id = %id, "stay deleted");
        Ok(())
    }

    pub fn monthly_summary(&self, month: u32, year: i32) -> Result<MonthlySummary, CoreError> {
        let stays = self.store.find_all(None)?;
        SummaryService::aggregate(&stays, month, year, self.settings.utc_offset)
    }

    pub fn occupancy(&self, filter: RoomFilter) -> Result<OccupancyIndex, CoreError> {
        let stays = self.store.find_all(None)?;
        Ok(OccupancyIndex::build_filtered(&stays, filter))
    }

    /// Day cells and occupancy figures for `month`, classified against today's date.
    pub fn month_calendar(
        &self,
        filter: RoomFilter,
        month: CalendarMonth,
    ) -> Result<MonthCalendar, CoreError> {
        let index = self.occupancy(filter)?;
        Ok(CalendarService::month_calendar(
            &index,
            filter,
            month,
            self.today(),
        ))
    }

    pub fn dashboard(&self) -> Result<Dashboard, CoreError> {
        let stays = self.store.find_all(None)?;
        Ok(SummaryService::dashboard(
            &stays,
            self.clock.now(),
            self.settings.utc_offset,
            self.settings.recent_stays_limit,
        ))
    }

    /// Rooms claimed by more than one stay on the same date. Creation never rejects these.
    pub fn conflicts(&self) -> Result<Vec<RoomConflict>, CoreError> {
        Ok(self.occupancy(RoomFilter::All)?.conflicts())
    }

    pub fn warnings(&self) -> Result<Vec<String>, CoreError> {
        Ok(stay_warnings(&self.store.find_all(None)?))
    }

    /// `<prefix><unix millis>`, bumped past any number already in use.
    fn next_invoice_number(&self, used: &HashSet<&str>, now: DateTime<Utc>) -> String {
        let mut stamp = now.timestamp_millis();
        loop {
            let candidate = format!("{}{}", self.settings.invoice_prefix, stamp);
            if !used.contains(candidate.as_str()) {
                return candidate;
            }
            stamp += 1;
        }
    }
}
