//! Line items of a note.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notabook_core::types::NoteId;

use super::money::round_money;

/// A persisted line of a note. `line_no` runs contiguously from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    /// Owning note.
    pub note_id: NoteId,
    /// 1-based position within the note.
    pub line_no: i32,
    /// Article code.
    pub article: String,
    /// Free-text description.
    pub description: String,
    /// Quantity in kilograms.
    pub quantity: Decimal,
    /// Price per kilogram.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Rounded line amount, for display only. Totals are summed unrounded.
    pub fn amount(&self) -> Decimal {
        round_money(self.quantity * self.unit_price)
    }
}

/// A line item as submitted by a caller, before it has a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Article code.
    #[serde(default)]
    pub article: String,
    /// Free-text description.
    pub description: String,
    /// Quantity in kilograms.
    pub quantity: Decimal,
    /// Price per kilogram.
    pub unit_price: Decimal,
}

impl NewLineItem {
    /// Attach the item to a note at the given 1-based position.
    pub fn into_line_item(self, note_id: NoteId, line_no: i32) -> LineItem {
        LineItem {
            note_id,
            line_no,
            article: self.article,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Number the submitted items 1..=n in submission order.
pub fn number_items(note_id: NoteId, items: Vec<NewLineItem>) -> Vec<LineItem> {
    items
        .into_iter()
        .zip(1..)
        .map(|(item, line_no)| item.into_line_item(note_id, line_no))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_number_items_is_contiguous() {
        let note_id = NoteId::new();
        let items = (0..3)
            .map(|i| NewLineItem {
                article: format!("A{i}"),
                description: "Cobre".to_string(),
                quantity: dec!(1),
                unit_price: dec!(2),
            })
            .collect();
        let numbered = number_items(note_id, items);
        let positions: Vec<i32> = numbered.iter().map(|l| l.line_no).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(numbered[2].article, "A2");
    }

    #[test]
    fn test_amount_rounds() {
        let line = NewLineItem {
            article: String::new(),
            description: "Aluminio".to_string(),
            quantity: dec!(1.005),
            unit_price: dec!(1),
        }
        .into_line_item(NoteId::new(), 1);
        assert_eq!(line.amount(), dec!(1.01));
    }
}
