// Property-based tests for line item amount derivation.
//
// The amount column is quantity × unit price kept exact; rounding only ever
// happens at document level. Bad numeric input is a typed validation error,
// never a silent zero.

use proptest::prelude::*;
use rust_decimal::Decimal;

use dealdesk::modules::documents::models::LineItem;

fn quantity(millis: u64) -> Decimal {
    Decimal::new(millis as i64, 3)
}

fn price(cents: u64) -> Decimal {
    Decimal::new(cents as i64, 2)
}

proptest! {
    #[test]
    fn amount_is_exact_product(
        quantity_millis in 1u64..1_000_000u64,
        unit_price_cents in 0u64..100_000_000u64,
    ) {
        let quantity = quantity(quantity_millis);
        let unit_price = price(unit_price_cents);

        let line = LineItem::new("Widget".to_string(), quantity, unit_price, 0).unwrap();

        prop_assert_eq!(line.amount, quantity * unit_price);
    }

    #[test]
    fn recalculate_is_idempotent(
        quantity_millis in 1u64..1_000_000u64,
        unit_price_cents in 0u64..100_000_000u64,
    ) {
        let mut line = LineItem::new(
            "Widget".to_string(),
            quantity(quantity_millis),
            price(unit_price_cents),
            0,
        )
        .unwrap();

        let first = line.amount;
        line.recalculate();
        prop_assert_eq!(line.amount, first);
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected(
        quantity_millis in 0i64..1_000_000i64,
        unit_price_cents in 0u64..1_000_000u64,
    ) {
        let result = LineItem::new(
            "Widget".to_string(),
            Decimal::new(-quantity_millis, 3),
            price(unit_price_cents),
            0,
        );
        prop_assert!(result.is_err());
    }

    #[test]
    fn negative_price_is_rejected(
        quantity_millis in 1u64..1_000_000u64,
        unit_price_cents in 1i64..1_000_000i64,
    ) {
        let result = LineItem::new(
            "Widget".to_string(),
            quantity(quantity_millis),
            Decimal::new(-unit_price_cents, 2),
            0,
        );
        prop_assert!(result.is_err());
    }
}

#[test]
fn fractional_quantity_keeps_sub_paisa_precision() {
    // 2.5 hours at 999.99: the exact product carries three decimals
    let line = LineItem::new(
        "Consulting hours".to_string(),
        Decimal::new(25, 1),
        Decimal::new(99_999, 2),
        0,
    )
    .unwrap();

    assert_eq!(line.amount, Decimal::new(2_499_975, 3));
}

#[test]
fn quantity_precision_is_capped_at_three_decimals() {
    let result = LineItem::new(
        "Bulk cable".to_string(),
        Decimal::new(10_001, 4),
        Decimal::from(10),
        0,
    );
    assert!(result.is_err());
}

#[test]
fn price_precision_is_capped_at_two_decimals() {
    let result = LineItem::new(
        "Widget".to_string(),
        Decimal::ONE,
        Decimal::new(10_001, 3),
        0,
    );
    assert!(result.is_err());
}

#[test]
fn overlong_description_is_rejected() {
    let result = LineItem::new("x".repeat(256), Decimal::ONE, Decimal::from(10), 0);
    assert!(result.is_err());
}
