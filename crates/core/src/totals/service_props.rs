//! Property-based tests for the totals calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::TotalsCalculator;
use super::types::{DiscountType, ItemKind, LineItem, TaxComponent};

/// Strategy for a non-negative quantity (0 to 10,000, 2dp).
fn quantity() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for a non-negative unit price (0 to 100,000.00).
fn unit_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for a percentage in [0, 100].
fn percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for a fixed discount (may exceed the subtotal; the
/// calculator clamps).
fn fixed_discount() -> impl Strategy<Value = Decimal> {
    (0i64..20_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for a small set of uniquely named tax components.
fn tax_components() -> impl Strategy<Value = Vec<TaxComponent>> {
    prop::collection::vec(0i64..=2_800i64, 0..4).prop_map(|rates| {
        rates
            .into_iter()
            .enumerate()
            .map(|(i, r)| TaxComponent::new(format!("TAX{i}"), Decimal::new(r, 2)))
            .collect()
    })
}

fn item_strategy() -> impl Strategy<Value = LineItem> {
    (
        quantity(),
        unit_price(),
        prop_oneof![Just(DiscountType::Fixed), Just(DiscountType::Percentage)],
        percentage(),
        fixed_discount(),
        tax_components(),
    )
        .prop_map(|(qty, price, dtype, pct, fixed, taxes)| LineItem {
            kind: ItemKind::Product,
            name: "Widget".to_string(),
            description: None,
            quantity: qty,
            unit_price: price,
            discount_type: dtype,
            discount_value: match dtype {
                DiscountType::Percentage => pct,
                DiscountType::Fixed => fixed,
            },
            tax_components: taxes,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any valid line, `total == taxable + Σ tax components`.
    #[test]
    fn prop_line_total_is_taxable_plus_taxes(item in item_strategy()) {
        let totals = TotalsCalculator::line_totals(&item, 0).unwrap();
        let tax_sum: Decimal = totals.tax_amounts.iter().map(|t| t.amount).sum();
        prop_assert_eq!(totals.total, totals.taxable + tax_sum);
    }

    /// Discount is always within `[0, subtotal]` and no stage goes
    /// negative.
    #[test]
    fn prop_discount_clamped_and_stages_non_negative(item in item_strategy()) {
        let totals = TotalsCalculator::line_totals(&item, 0).unwrap();
        prop_assert!(totals.discount >= Decimal::ZERO);
        prop_assert!(totals.discount <= totals.subtotal);
        prop_assert!(totals.taxable >= Decimal::ZERO);
        prop_assert!(totals.total >= Decimal::ZERO);
    }

    /// Document grand total is the exact sum of line totals, and each
    /// document aggregate is the sum of its line parts.
    #[test]
    fn prop_document_totals_are_sums(items in prop::collection::vec(item_strategy(), 0..6)) {
        let (lines, totals) = TotalsCalculator::document_totals(&items).unwrap();
        let line_sum: Decimal = lines.iter().map(|l| l.total).sum();
        let subtotal_sum: Decimal = lines.iter().map(|l| l.subtotal).sum();
        let discount_sum: Decimal = lines.iter().map(|l| l.discount).sum();
        prop_assert_eq!(totals.grand_total, line_sum);
        prop_assert_eq!(totals.subtotal, subtotal_sum);
        prop_assert_eq!(totals.discount_total, discount_sum);
        prop_assert_eq!(
            totals.grand_total,
            totals.subtotal - totals.discount_total + totals.tax_total
        );
    }

    /// A 100% discount always zeroes the line regardless of taxes.
    #[test]
    fn prop_full_percentage_discount_zeroes_line(
        qty in quantity(),
        price in unit_price(),
        taxes in tax_components(),
    ) {
        let item = LineItem {
            kind: ItemKind::Service,
            name: "Service".to_string(),
            description: None,
            quantity: qty,
            unit_price: price,
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::ONE_HUNDRED,
            tax_components: taxes,
        };
        let totals = TotalsCalculator::line_totals(&item, 0).unwrap();
        prop_assert_eq!(totals.taxable, Decimal::ZERO);
        prop_assert_eq!(totals.total, Decimal::ZERO);
    }
}
