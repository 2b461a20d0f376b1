//! Guest stays and their invoice snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, room::RoomId};

/// Raw charges billed for a stay, before tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charges {
    #[serde(default)]
    pub room: Decimal,
    #[serde(default)]
    pub food: Decimal,
    #[serde(default)]
    pub other: Decimal,
}

impl Charges {
    pub fn new(room: Decimal, food: Decimal, other: Decimal) -> Self {
        Self { room, food, other }
    }

    /// Unrounded sum of the three charges.
    pub fn sum(&self) -> Decimal {
        self.room + self.food + self.other
    }
}

/// Payment bookkeeping, independent of the tax computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub advance: Decimal,
    #[serde(default)]
    pub due: Decimal,
}

/// Tax breakdown and totals computed from [`Charges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub total_tax: Decimal,
    pub grand_total: Decimal,
}

/// Postal address of the primary guest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestAddress {
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

impl GuestAddress {
    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && self.city.is_empty() && self.state.is_empty() && self.pincode.is_empty()
    }
}

/// One guest booking together with its persisted invoice snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stay {
    pub id: Uuid,
    pub invoice_number: String,
    pub guest_names: Vec<String>,
    /// Occupied rooms, duplicate free; the first entry is the primary room.
    pub room_ids: Vec<RoomId>,
    pub contact_phone: String,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub charges: Charges,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default, skip_serializing_if = "GuestAddress::is_empty")]
    pub address: GuestAddress,
    pub totals: InvoiceTotals,
    pub created_at: DateTime<Utc>,
}

impl Stay {
    /// First listed guest, used as the invoice addressee.
    pub fn primary_guest(&self) -> &str {
        self.guest_names.first().map(String::as_str).unwrap_or_default()
    }

    pub fn primary_room(&self) -> Option<RoomId> {
        self.room_ids.first().copied()
    }

    /// Comma separated room codes, e.g. `C1, D2`.
    pub fn rooms_label(&self) -> String {
        self.room_ids
            .iter()
            .map(RoomId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check-in and check-out when both are recorded.
    pub fn stay_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.check_in?, self.check_out?))
    }
}

impl Identifiable for Stay {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Stay {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}]",
            self.invoice_number,
            self.primary_guest(),
            self.rooms_label()
        )
    }
}

impl Record for Stay {
    const COLLECTION: &'static str = "stays";

    fn assign_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Caller input for creating a stay. Totals and identifiers are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStay {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub guest_names: Vec<String>,
    #[serde(default)]
    pub room_ids: Vec<RoomId>,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub charges: Charges,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub address: GuestAddress,
}

impl NewStay {
    pub fn new(guest: impl Into<String>, room: RoomId, contact_phone: impl Into<String>) -> Self {
        Self {
            guest_names: vec![guest.into()],
            room_ids: vec![room],
            contact_phone: contact_phone.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        self.check_in = Some(check_in);
        self.check_out = Some(check_out);
        self
    }

    pub fn with_charges(mut self, charges: Charges) -> Self {
        self.charges = charges;
        self
    }
}

/// Per-date occupancy entry describing which stay claims a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDescriptor {
    pub stay_id: Uuid,
    pub guest_names: Vec<String>,
    pub room_ids: Vec<RoomId>,
    pub invoice_number: String,
}

impl From<&Stay> for BookingDescriptor {
    fn from(stay: &Stay) -> Self {
        Self {
            stay_id: stay.id,
            guest_names: stay.guest_names.clone(),
            room_ids: stay.room_ids.clone(),
            invoice_number: stay.invoice_number.clone(),
        }
    }
}
