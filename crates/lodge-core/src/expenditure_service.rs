//! Property expenses: recording, filtering and monthly totals.

use std::{collections::BTreeMap, sync::Arc};

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use lodge_domain::{CalendarMonth, Expenditure, ExpenditureCategory, NewExpenditure};

use crate::{storage::RecordStore, time::Clock, validation::prepare_new_expenditure, CoreError};

/// Narrows an expenditure listing. Empty fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureFilter {
    pub category: Option<ExpenditureCategory>,
    pub month: Option<CalendarMonth>,
}

impl ExpenditureFilter {
    pub fn category(category: ExpenditureCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn month(month: CalendarMonth) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn matches(&self, expenditure: &Expenditure) -> bool {
        self.category.map_or(true, |c| c == expenditure.category)
            && self.month.map_or(true, |m| m.contains(expenditure.date))
    }
}

pub struct ExpenditureBook {
    store: Arc<dyn RecordStore<Expenditure>>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl ExpenditureBook {
    pub fn new(
        store: Arc<dyn RecordStore<Expenditure>>,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            clock,
            offset,
        }
    }

    /// Persists an expense. A missing date means today at the property.
    pub fn record(&self, input: NewExpenditure) -> Result<Expenditure, CoreError> {
        let input = prepare_new_expenditure(input)?;
        let mut expenditure = Expenditure {
            id: Uuid::nil(),
            description: input.description,
            amount: input.amount,
            category: input.category,
            date: input
                .date
                .unwrap_or_else(|| self.clock.today_at(self.offset)),
            created_at: self.clock.now(),
        };
        expenditure.id = self.store.insert(expenditure.clone())?;
        info!(
            id = %expenditure.id,
            category = %expenditure.category,
            amount = %expenditure.amount,
            "expenditure recorded"
        );
        Ok(expenditure)
    }

    /// Matching expenses, latest date first.
    pub fn list(&self, filter: &ExpenditureFilter) -> Result<Vec<Expenditure>, CoreError> {
        let mut entries: Vec<Expenditure> = self
            .store
            .find_all(None)?
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        entries.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(entries)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        if !self.store.delete_by_id(id)? {
            return Err(CoreError::NotFound(id));
        }
        info!(id = %id, "expenditure deleted");
        Ok(())
    }

    /// Sum of amounts per calendar month of the expense date.
    pub fn monthly_totals(&self) -> Result<BTreeMap<CalendarMonth, Decimal>, CoreError> {
        let mut totals = BTreeMap::new();
        for entry in self.store.find_all(None)? {
            *totals
                .entry(CalendarMonth::containing(entry.date))
                .or_insert(Decimal::ZERO) += entry.amount;
        }
        Ok(totals)
    }

    pub fn total(&self, filter: &ExpenditureFilter) -> Result<Decimal, CoreError> {
        Ok(self.list(filter)?.iter().map(|entry| entry.amount).sum())
    }
}
