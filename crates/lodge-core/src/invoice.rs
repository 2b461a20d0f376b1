//! Invoice calculator: raw charges to tax breakdown and totals.

use rust_decimal::Decimal;

use lodge_domain::{round_money, Charges, InvoiceTotals};

/// Combined SGST + CGST rate applied to the subtotal (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Computes the tax breakdown for `charges`.
///
/// Every output is rounded on its own from the unrounded intermediates, so
/// `sgst + cgst` and `subtotal + total_tax` can sit one cent away from
/// `total_tax` and `grand_total` on exact half-cent boundaries.
pub fn compute_invoice(charges: &Charges) -> InvoiceTotals {
    let subtotal = charges.sum();
    let total_tax = subtotal * TAX_RATE;
    let half_tax = total_tax / Decimal::TWO;
    InvoiceTotals {
        subtotal: round_money(subtotal),
        sgst: round_money(half_tax),
        cgst: round_money(half_tax),
        total_tax: round_money(total_tax),
        grand_total: round_money(subtotal + total_tax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_each_output_independently() {
        let totals = compute_invoice(&Charges::new(dec!(1000), dec!(250.333), dec!(0)));
        assert_eq!(totals.subtotal, dec!(1250.33));
        assert_eq!(totals.total_tax, dec!(62.52));
        assert_eq!(totals.sgst, dec!(31.26));
        assert_eq!(totals.cgst, dec!(31.26));
        assert_eq!(totals.grand_total, dec!(1312.85));
    }

    #[test]
    fn zero_charges_yield_zero_totals() {
        let totals = compute_invoice(&Charges::default());
        assert_eq!(totals, InvoiceTotals::default());
        assert!(totals.grand_total.is_zero());
    }

    #[test]
    fn tax_rate_is_five_percent() {
        assert_eq!(TAX_RATE, dec!(0.05));
    }

    #[test]
    fn whole_amounts_split_tax_evenly() {
        let totals = compute_invoice(&Charges::new(dec!(2000), dec!(500), dec!(100)));
        assert_eq!(totals.subtotal, dec!(2600));
        assert_eq!(totals.total_tax, dec!(130.00));
        assert_eq!(totals.sgst, dec!(65.00));
        assert_eq!(totals.grand_total, dec!(2730.00));
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (0u64..10_000_000u64).prop_map(|raw| Decimal::new(raw as i64, 2))
    }

    proptest! {
        #[test]
        fn tax_halves_match_and_totals_stay_within_a_cent(
            room in cents(),
            food in cents(),
            other in cents(),
        ) {
            let totals = compute_invoice(&Charges::new(room, food, other));
            prop_assert_eq!(totals.sgst, totals.cgst);
            prop_assert_eq!(totals.subtotal, room + food + other);
            prop_assert!((totals.total_tax - (totals.sgst + totals.cgst)).abs() <= dec!(0.01));
            prop_assert!(
                (totals.grand_total - (totals.subtotal + totals.total_tax)).abs() <= dec!(0.01)
            );
            prop_assert!(totals.grand_total >= totals.subtotal);
        }
    }
}
