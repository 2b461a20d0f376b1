//! Aggregated report shapes handed to the rendering layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{room::RoomId, stay::Stay};

/// Bookings and revenue attributed to one room within a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUsage {
    pub room: RoomId,
    pub bookings: usize,
    pub revenue: Decimal,
}

/// Financial totals for the stays created within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub total_bills: usize,
    pub total_revenue: Decimal,
    pub total_room_charges: Decimal,
    pub total_food_charges: Decimal,
    pub total_other_charges: Decimal,
    pub total_sgst: Decimal,
    pub total_cgst: Decimal,
    /// Matching stays, most recently created first.
    pub bills: Vec<Stay>,
    pub room_usage: Vec<RoomUsage>,
}

/// Front-page figures for the property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_bills: usize,
    pub today_bills: usize,
    pub monthly_revenue: Decimal,
    pub recent_stays: Vec<Stay>,
}
