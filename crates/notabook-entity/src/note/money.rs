//! Monetary rounding.

use rust_decimal::{Decimal, RoundingStrategy};

use super::line_item::NewLineItem;

/// Round to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest total a note can carry, matching the `NUMERIC(14, 2)` column.
pub const MAX_TOTAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Note total: the unrounded sum of `quantity * unit_price`, rounded once.
///
/// Returns `None` when the arithmetic overflows.
pub fn compute_total<'a>(items: impl IntoIterator<Item = &'a NewLineItem>) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(item.quantity.checked_mul(item.unit_price)?)
        })
        .map(round_money)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal) -> NewLineItem {
        NewLineItem {
            article: String::new(),
            description: "x".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_total_of_scenario() {
        let items = [item(dec!(2.5), dec!(10.00)), item(dec!(1.0), dec!(5.00))];
        assert_eq!(compute_total(&items), Some(dec!(30.00)));
    }

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.13));
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_money(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn test_rounding_applies_to_sum() {
        // Per-line rounding would give 1.00.
        let items = [
            item(dec!(0.333), dec!(1)),
            item(dec!(0.333), dec!(1)),
            item(dec!(0.339), dec!(1)),
        ];
        assert_eq!(compute_total(&items), Some(dec!(1.01)));
    }

    #[test]
    fn test_overflow_yields_none() {
        assert_eq!(compute_total(&[item(Decimal::MAX, dec!(2))]), None);
        assert_eq!(
            compute_total(&[item(Decimal::MAX, dec!(1)), item(Decimal::MAX, dec!(1))]),
            None
        );
    }

    #[test]
    fn test_max_total_value() {
        assert_eq!(MAX_TOTAL, dec!(999999999999.99));
    }
}
