//! Shared traits and money helpers for lodge records.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Number of decimal places kept for every monetary amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Exposes a stable identifier for entities stored in a record store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// An entity that a record store can persist.
///
/// The store owns identifier assignment: records are built with a nil id and
/// receive their real one through [`Record::assign_id`] on insertion.
pub trait Record: Identifiable + Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Name of the collection the record lives in (file stem, table name, ...).
    const COLLECTION: &'static str;

    fn assign_id(&mut self, id: Uuid);

    fn created_at(&self) -> DateTime<Utc>;
}

/// Rounds a monetary amount to two decimal places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
