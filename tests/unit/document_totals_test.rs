// Property-based tests for document total computation.
//
// Totals are recomputed as a whole from lines, tax and discount. Line amounts
// stay exact; only the tax halves and the grand total are rounded to the
// minor unit.

use proptest::prelude::*;
use rust_decimal::Decimal;

use dealdesk::modules::documents::models::{DocumentTotals, LineItem, TaxSpec};

fn line(description: &str, quantity: Decimal, unit_price: Decimal, position: i32) -> LineItem {
    LineItem::new(description.to_string(), quantity, unit_price, position).unwrap()
}

fn price(cents: u64) -> Decimal {
    Decimal::new(cents as i64, 2)
}

prop_compose! {
    fn arb_line(position: i32)(
        quantity in 1u32..1_000u32,
        unit_price_cents in 0u64..10_000_000u64,
    ) -> LineItem {
        line("Widget", Decimal::from(quantity), price(unit_price_cents), position)
    }
}

proptest! {
    #[test]
    fn subtotal_is_exact_sum_of_line_amounts(
        lines in proptest::collection::vec(arb_line(0), 0..20),
        cgst in 0u8..=50u8,
        sgst in 0u8..=50u8,
    ) {
        let tax = TaxSpec::Percentage {
            cgst_percent: Decimal::from(cgst),
            sgst_percent: Decimal::from(sgst),
        };
        let totals = DocumentTotals::compute(&lines, &tax, Decimal::ZERO);

        let expected: Decimal = lines.iter().map(|l| l.amount).sum();
        prop_assert_eq!(totals.subtotal, expected);
    }

    #[test]
    fn computation_is_deterministic(
        lines in proptest::collection::vec(arb_line(0), 0..20),
        cgst in 0u8..=50u8,
        sgst in 0u8..=50u8,
        discount_cents in 0u64..1_000_000u64,
    ) {
        let tax = TaxSpec::Percentage {
            cgst_percent: Decimal::from(cgst),
            sgst_percent: Decimal::from(sgst),
        };
        let discount = price(discount_cents);

        let first = DocumentTotals::compute(&lines, &tax, discount);
        let second = DocumentTotals::compute(&lines, &tax, discount);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn totals_fields_never_disagree(
        lines in proptest::collection::vec(arb_line(0), 0..20),
        cgst in 0u8..=50u8,
        sgst in 0u8..=50u8,
        discount_cents in 0u64..1_000_000u64,
    ) {
        let tax = TaxSpec::Percentage {
            cgst_percent: Decimal::from(cgst),
            sgst_percent: Decimal::from(sgst),
        };
        let discount = price(discount_cents);
        let totals = DocumentTotals::compute(&lines, &tax, discount);

        prop_assert_eq!(totals.tax_amount, totals.cgst_amount + totals.sgst_amount);
        prop_assert_eq!(
            totals.total_amount,
            (totals.subtotal + totals.tax_amount - discount).round_dp(2)
        );
    }

    #[test]
    fn flat_tax_ignores_subtotal(
        lines in proptest::collection::vec(arb_line(0), 0..20),
        flat_cents in 0u64..1_000_000u64,
    ) {
        let tax = TaxSpec::Flat { amount: price(flat_cents) };
        let totals = DocumentTotals::compute(&lines, &tax, Decimal::ZERO);

        prop_assert_eq!(totals.tax_amount, price(flat_cents));
        prop_assert_eq!(totals.cgst_amount, Decimal::ZERO);
        prop_assert_eq!(totals.sgst_amount, Decimal::ZERO);
    }

    #[test]
    fn tax_halves_are_rounded_to_minor_unit(
        lines in proptest::collection::vec(arb_line(0), 1..20),
        cgst in 0u8..=50u8,
        sgst in 0u8..=50u8,
    ) {
        let tax = TaxSpec::Percentage {
            cgst_percent: Decimal::from(cgst),
            sgst_percent: Decimal::from(sgst),
        };
        let totals = DocumentTotals::compute(&lines, &tax, Decimal::ZERO);

        prop_assert!(totals.cgst_amount.normalize().scale() <= 2);
        prop_assert!(totals.sgst_amount.normalize().scale() <= 2);
        prop_assert!(totals.total_amount.normalize().scale() <= 2);
    }
}

#[test]
fn known_gst_example() {
    // 2 x 500 + 1 x 300 at 9% + 9% with a 100 discount
    let lines = vec![
        line("Service A", Decimal::from(2), Decimal::from(500), 0),
        line("Service B", Decimal::from(1), Decimal::from(300), 1),
    ];
    let tax = TaxSpec::Percentage {
        cgst_percent: Decimal::from(9),
        sgst_percent: Decimal::from(9),
    };

    let totals = DocumentTotals::compute(&lines, &tax, Decimal::from(100));

    assert_eq!(totals.subtotal, Decimal::from(1300));
    assert_eq!(totals.cgst_amount, Decimal::from(117));
    assert_eq!(totals.sgst_amount, Decimal::from(117));
    assert_eq!(totals.tax_amount, Decimal::from(234));
    assert_eq!(totals.total_amount, Decimal::from(1434));
}

#[test]
fn uneven_percentage_rounds_each_half_separately() {
    // 9% of 333.33 = 29.9997, rounds to 30.00 per half
    let lines = vec![line("Consulting", Decimal::from(1), price(33_333), 0)];
    let tax = TaxSpec::Percentage {
        cgst_percent: Decimal::from(9),
        sgst_percent: Decimal::from(9),
    };

    let totals = DocumentTotals::compute(&lines, &tax, Decimal::ZERO);

    assert_eq!(totals.cgst_amount, Decimal::new(3000, 2));
    assert_eq!(totals.sgst_amount, Decimal::new(3000, 2));
    assert_eq!(totals.total_amount, Decimal::new(39_333, 2));
}

#[test]
fn empty_line_list_yields_tax_minus_discount() {
    let tax = TaxSpec::Flat {
        amount: Decimal::from(50),
    };
    let totals = DocumentTotals::compute(&[], &tax, Decimal::from(20));

    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.total_amount, Decimal::from(30));
}

#[test]
fn discount_can_push_total_negative() {
    let lines = vec![line("Widget", Decimal::from(1), Decimal::from(100), 0)];
    let tax = TaxSpec::Flat {
        amount: Decimal::ZERO,
    };

    let totals = DocumentTotals::compute(&lines, &tax, Decimal::from(500));

    assert_eq!(totals.total_amount, Decimal::from(-400));
}
