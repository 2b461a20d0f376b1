//! Property expenses recorded outside the invoice flow.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Enumerates the expense buckets offered to staff.
pub enum ExpenditureCategory {
    #[default]
    General,
    Maintenance,
    #[serde(rename = "Food & Supplies")]
    FoodAndSupplies,
    Utilities,
    #[serde(rename = "Staff Salary")]
    StaffSalary,
    Marketing,
    Equipment,
    Other,
}

impl ExpenditureCategory {
    pub const ALL: [ExpenditureCategory; 8] = [
        ExpenditureCategory::General,
        ExpenditureCategory::Maintenance,
        ExpenditureCategory::FoodAndSupplies,
        ExpenditureCategory::Utilities,
        ExpenditureCategory::StaffSalary,
        ExpenditureCategory::Marketing,
        ExpenditureCategory::Equipment,
        ExpenditureCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenditureCategory::General => "General",
            ExpenditureCategory::Maintenance => "Maintenance",
            ExpenditureCategory::FoodAndSupplies => "Food & Supplies",
            ExpenditureCategory::Utilities => "Utilities",
            ExpenditureCategory::StaffSalary => "Staff Salary",
            ExpenditureCategory::Marketing => "Marketing",
            ExpenditureCategory::Equipment => "Equipment",
            ExpenditureCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenditureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenditureCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ExpenditureCategory::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown expenditure category `{trimmed}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expenditure {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: ExpenditureCategory,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for Expenditure {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Expenditure {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.date, self.description, self.category)
    }
}

impl Record for Expenditure {
    const COLLECTION: &'static str = "expenditures";

    fn assign_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Caller input for recording an expense. The date defaults to today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExpenditure {
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: ExpenditureCategory,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
