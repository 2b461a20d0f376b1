//! Input checks applied before anything is persisted, plus consistency warnings for
//! records that were stored by older builds.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use lodge_domain::{NewExpenditure, NewStay, RoomId, Stay};

use crate::{invoice::compute_invoice, CoreError};

/// Number of digits in a contact phone number.
pub const PHONE_DIGITS: usize = 10;

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Normalizes and checks a stay request.
///
/// Guest names are trimmed and blank ones dropped; rooms are deduplicated keeping
/// first-seen order. Every problem found is reported in a single error.
pub fn prepare_new_stay(mut input: NewStay) -> Result<NewStay, CoreError> {
    let mut problems = Vec::new();

    input.guest_names = input
        .guest_names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if input.guest_names.is_empty() {
        problems.push("at least one guest name is required".to_string());
    }

    let mut rooms: Vec<RoomId> = Vec::with_capacity(input.room_ids.len());
    for room in input.room_ids {
        if !rooms.contains(&room) {
            rooms.push(room);
        }
    }
    input.room_ids = rooms;
    if input.room_ids.is_empty() {
        problems.push("at least one room is required".to_string());
    }

    input.contact_phone = input.contact_phone.trim().to_string();
    if !is_valid_phone(&input.contact_phone) {
        problems.push(format!(
            "contact phone must be exactly {PHONE_DIGITS} digits"
        ));
    }

    if let (Some(check_in), Some(check_out)) = (input.check_in, input.check_out) {
        if check_out < check_in {
            problems.push(format!(
                "check-out {check_out} is before check-in {check_in}"
            ));
        }
    }

    for (label, amount) in [
        ("room charges", input.charges.room),
        ("food charges", input.charges.food),
        ("other charges", input.charges.other),
        ("advance payment", input.payment.advance),
        ("due payment", input.payment.due),
    ] {
        if amount < Decimal::ZERO {
            problems.push(format!("{label} must not be negative"));
        }
    }

    if let Some(number) = input.invoice_number.as_mut() {
        *number = number.trim().to_string();
        if number.is_empty() {
            problems.push("invoice number must not be blank".to_string());
        }
    }

    reject_if_any(problems, "stay")?;
    Ok(input)
}

/// Checks an expense entry: a description and a positive amount.
pub fn prepare_new_expenditure(mut input: NewExpenditure) -> Result<NewExpenditure, CoreError> {
    let mut problems = Vec::new();
    input.description = input.description.trim().to_string();
    if input.description.is_empty() {
        problems.push("description is required".to_string());
    }
    if input.amount <= Decimal::ZERO {
        problems.push("amount must be greater than zero".to_string());
    }
    reject_if_any(problems, "expenditure")?;
    Ok(input)
}

fn reject_if_any(problems: Vec<String>, kind: &str) -> Result<(), CoreError> {
    if problems.is_empty() {
        return Ok(());
    }
    let message = problems.join("; ");
    warn!(kind, reason = %message, "rejected input");
    Err(CoreError::Validation(message))
}

/// Inconsistencies in already stored stays. Nothing here blocks reads.
pub fn stay_warnings(stays: &[Stay]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for stay in stays {
        *seen.entry(stay.invoice_number.as_str()).or_default() += 1;
        if let Some((check_in, check_out)) = stay.stay_range() {
            if check_out < check_in {
                warnings.push(format!(
                    "stay {} has check-out {} before check-in {}",
                    stay.invoice_number, check_out, check_in
                ));
            }
        }
        if stay.room_ids.is_empty() {
            warnings.push(format!("stay {} lists no rooms", stay.invoice_number));
        }
        if compute_invoice(&stay.charges) != stay.totals {
            warnings.push(format!(
                "stay {} totals do not match its charges",
                stay.invoice_number
            ));
        }
    }

    let mut duplicates: Vec<_> = seen.into_iter().filter(|(_, count)| *count > 1).collect();
    duplicates.sort();
    for (number, count) in duplicates {
        warnings.push(format!("invoice number {number} is used by {count} stays"));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use lodge_domain::{Charges, ExpenditureCategory, GuestAddress, Payment};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn phone_must_be_ten_digits() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("98765 4321"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("+919876543210"));
    }

    #[test]
    fn normalizes_names_and_rooms() {
        let mut input = NewStay::new("  Asha ", RoomId::C2, " 9876543210 ");
        input.guest_names.push("   ".into());
        input.guest_names.push("Ravi".into());
        input.room_ids.extend([RoomId::C1, RoomId::C2]);
        let prepared = prepare_new_stay(input).expect("valid stay");
        assert_eq!(prepared.guest_names, vec!["Asha".to_string(), "Ravi".to_string()]);
        assert_eq!(prepared.room_ids, vec![RoomId::C2, RoomId::C1]);
        assert_eq!(prepared.contact_phone, "9876543210");
    }

    #[test]
    fn collects_every_problem() {
        let input = NewStay {
            invoice_number: Some("  ".into()),
            contact_phone: "12".into(),
            check_in: Some(date(12)),
            check_out: Some(date(10)),
            charges: Charges::new(dec!(-1), dec!(0), dec!(0)),
            ..NewStay::default()
        };
        let err = prepare_new_stay(input).unwrap_err();
        let CoreError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("guest name"));
        assert!(message.contains("room"));
        assert!(message.contains("contact phone"));
        assert!(message.contains("check-out"));
        assert!(message.contains("room charges must not be negative"));
        assert!(message.contains("invoice number"));
    }

    #[test]
    fn same_day_stay_is_accepted() {
        let input = NewStay::new("Asha", RoomId::G1, "9876543210").with_dates(date(5), date(5));
        assert!(prepare_new_stay(input).is_ok());
    }

    #[test]
    fn expenditure_requires_description_and_positive_amount() {
        let bad = NewExpenditure {
            description: " ".into(),
            amount: dec!(0),
            category: ExpenditureCategory::Utilities,
            date: None,
        };
        assert!(prepare_new_expenditure(bad).unwrap_err().is_validation());

        let good = NewExpenditure {
            description: " Diesel ".into(),
            amount: dec!(800),
            ..NewExpenditure::default()
        };
        assert_eq!(prepare_new_expenditure(good).unwrap().description, "Diesel");
    }

    #[test]
    fn warns_about_inconsistent_records() {
        let charges = Charges::new(dec!(1000), dec!(0), dec!(0));
        let make = |number: &str, totals| Stay {
            id: Uuid::new_v4(),
            invoice_number: number.into(),
            guest_names: vec!["Asha".into()],
            room_ids: vec![RoomId::C1],
            contact_phone: "9876543210".into(),
            check_in: Some(date(3)),
            check_out: Some(date(1)),
            charges,
            payment: Payment::default(),
            address: GuestAddress::default(),
            totals,
            created_at: Utc::now(),
        };
        let stays = vec![
            make("GR1", compute_invoice(&charges)),
            make("GR1", Default::default()),
        ];
        let warnings = stay_warnings(&stays);
        assert_eq!(warnings.iter().filter(|w| w.contains("before check-in")).count(), 2);
        assert_eq!(warnings.iter().filter(|w| w.contains("do not match")).count(), 1);
        assert!(warnings.iter().any(|w| w == "invoice number GR1 is used by 2 stays"));
    }
}
