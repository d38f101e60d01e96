//! Line item and total rules applied before any note write.

use rust_decimal::Decimal;

use notabook_core::error::AppError;
use notabook_core::result::AppResult;
use notabook_entity::note::{MAX_TOTAL, NewLineItem, compute_total};

/// Items normalized and checked, with the total they produce.
#[derive(Debug)]
pub(crate) struct CheckedItems {
    pub items: Vec<NewLineItem>,
    pub total: Decimal,
}

/// Trim every item and enforce the write-time rules: at least one item,
/// a description on each, strictly positive quantity, non-negative unit
/// price, and a strictly positive rounded total no larger than [`MAX_TOTAL`].
pub(crate) fn check_line_items(items: &[NewLineItem]) -> AppResult<CheckedItems> {
    if items.is_empty() {
        return Err(AppError::validation("At least one line item is required"));
    }

    let items = items
        .iter()
        .zip(1..)
        .map(|(item, line_no)| check_item(item, line_no))
        .collect::<AppResult<Vec<_>>>()?;

    let total = compute_total(&items)
        .filter(|total| *total <= MAX_TOTAL)
        .ok_or_else(|| AppError::validation(format!("Note total must not exceed {MAX_TOTAL}")))?;
    if total <= Decimal::ZERO {
        return Err(AppError::validation("Note total must be greater than zero"));
    }
    Ok(CheckedItems { items, total })
}

fn check_item(item: &NewLineItem, line_no: u32) -> AppResult<NewLineItem> {
    let description = item.description.trim();
    if description.is_empty() {
        return Err(AppError::validation(format!(
            "Line {line_no}: description is required"
        )));
    }
    if item.quantity <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "Line {line_no}: quantity must be greater than zero"
        )));
    }
    if item.unit_price < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "Line {line_no}: unit price must not be negative"
        )));
    }
    Ok(NewLineItem {
        article: item.article.trim().to_string(),
        description: description.to_string(),
        quantity: item.quantity,
        unit_price: item.unit_price,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use notabook_core::error::ErrorKind;

    use super::*;
    use crate::testing::item;

    #[test]
    fn test_total_is_rounded_sum() {
        let checked =
            check_line_items(&[item(dec!(2.5), dec!(10.00)), item(dec!(1.0), dec!(5.00))]).unwrap();
        assert_eq!(checked.total, dec!(30.00));
        assert_eq!(checked.items.len(), 2);
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = check_line_items(&[]).unwrap_err();
        assert_eq!(err.message, "At least one line item is required");
    }

    #[test]
    fn test_item_rules() {
        let mut blank = item(dec!(1), dec!(1));
        blank.description = "   ".to_string();
        assert!(check_line_items(&[blank]).is_err());
        assert!(check_line_items(&[item(dec!(0), dec!(1))]).is_err());
        assert!(check_line_items(&[item(dec!(-1), dec!(1))]).is_err());
        assert!(check_line_items(&[item(dec!(1), dec!(-0.01))]).is_err());
    }

    #[test]
    fn test_zero_total_rejected() {
        let err = check_line_items(&[item(dec!(3), dec!(0))]).unwrap_err();
        assert_eq!(err.message, "Note total must be greater than zero");
        // 0.001 rounds to 0.00
        assert!(check_line_items(&[item(dec!(0.001), dec!(1))]).is_err());
    }

    #[test]
    fn test_oversized_total_rejected() {
        let err = check_line_items(&[item(Decimal::MAX, dec!(2))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Note total must not exceed 999999999999.99");

        let err = check_line_items(&[item(Decimal::MAX, dec!(1)), item(Decimal::MAX, dec!(1))])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        // Fits in a Decimal but not in the stored column.
        let err = check_line_items(&[item(dec!(10000000000000), dec!(1))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let checked = check_line_items(&[item(dec!(999999999999.99), dec!(1))]).unwrap();
        assert_eq!(checked.total, MAX_TOTAL);
    }

    #[test]
    fn test_trims_text() {
        let mut padded = item(dec!(1), dec!(1));
        padded.article = " CU-01 ".to_string();
        padded.description = " Cobre ".to_string();
        let checked = check_line_items(&[padded]).unwrap();
        assert_eq!(checked.items[0].article, "CU-01");
        assert_eq!(checked.items[0].description, "Cobre");
    }
}
