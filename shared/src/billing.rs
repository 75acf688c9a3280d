//! Pure invoice logic: draft assembly, numbering, and totals
//!
//! Everything here is deterministic and database-free so the rules can be
//! exercised without a running server. The backend applies the same logic
//! before touching Postgres.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for sequential invoice numbers ("FAC-000001")
pub const INVOICE_NUMBER_PREFIX: &str = "FAC";

/// Compute the next invoice number from the latest issued one.
///
/// `None` (no invoices yet) and numbers with an unparseable suffix both
/// restart the sequence at 1. Zero padding is six digits; the counter keeps
/// growing past 999999 without truncation.
pub fn next_invoice_number(latest: Option<&str>) -> String {
    let next = latest
        .and_then(|number| number.split('-').nth(1))
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .map_or(1, |n| n + 1);
    format!("{}-{:06}", INVOICE_NUMBER_PREFIX, next)
}

/// Round a monetary amount to cents, half away from zero
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computed invoice totals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Totals over a set of draft lines.
///
/// `subtotal` is the sum of quantity times unit price, `tax_amount` applies
/// `tax_rate` as a percentage, and `total` is their sum. Line and header
/// discounts are recorded on invoices but deliberately do not participate
/// in this arithmetic; see the module tests.
pub fn compute_totals(items: &[DraftItem], tax_rate: Decimal) -> InvoiceTotals {
    let subtotal: Decimal = items.iter().map(DraftItem::line_total).sum();
    let subtotal = round_currency(subtotal);
    let tax_amount = round_currency(subtotal * tax_rate / Decimal::from(100));
    InvoiceTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// A line on an in-progress invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    /// Stock on hand when the product was added, used by the draft guard
    pub available_stock: i32,
}

impl DraftItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// An invoice being assembled, before anything is written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub tax_rate: Decimal,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<DraftItem>,
}

/// Rejections produced while assembling a draft
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    #[error("insufficient stock for {product_name}: {available} available, {requested} requested")]
    InsufficientStock {
        product_name: String,
        available: i32,
        requested: i32,
    },
    #[error("product is not on the draft")]
    UnknownProduct,
}

impl InvoiceDraft {
    pub fn new(tax_rate: Decimal) -> Self {
        Self {
            tax_rate,
            ..Self::default()
        }
    }

    /// Add a product to the draft.
    ///
    /// Adding a product already on the draft merges into the existing line
    /// instead of appending a second one, and the stock guard is re-checked
    /// against the combined quantity.
    pub fn add_item(&mut self, item: DraftItem) -> Result<(), DraftError> {
        if item.quantity <= 0 {
            return Err(DraftError::InvalidQuantity);
        }
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            let merged = existing.quantity + item.quantity;
            if merged > item.available_stock {
                return Err(DraftError::InsufficientStock {
                    product_name: item.product_name,
                    available: item.available_stock,
                    requested: merged,
                });
            }
            existing.quantity = merged;
            existing.available_stock = item.available_stock;
            return Ok(());
        }
        if item.quantity > item.available_stock {
            return Err(DraftError::InsufficientStock {
                product_name: item.product_name,
                available: item.available_stock,
                requested: item.quantity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Set the quantity of a line. Zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) -> Result<(), DraftError> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }
        let line = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or(DraftError::UnknownProduct)?;
        if quantity > line.available_stock {
            return Err(DraftError::InsufficientStock {
                product_name: line.product_name.clone(),
                available: line.available_stock,
                requested: quantity,
            });
        }
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|line| line.product_id != product_id);
    }

    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(&self.items, self.tax_rate)
    }

    /// Sum of line discounts, carried on the invoice header for reference
    pub fn total_discount(&self) -> Decimal {
        self.items.iter().map(|line| line.discount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn item(id: Uuid, quantity: i32, unit_price: &str, stock: i32) -> DraftItem {
        DraftItem {
            product_id: id,
            product_name: format!("Producto {}", id),
            product_code: "FER-0001".to_string(),
            quantity,
            unit_price: dec(unit_price),
            discount: Decimal::ZERO,
            available_stock: stock,
        }
    }

    #[test]
    fn first_invoice_number_starts_the_sequence() {
        assert_eq!(next_invoice_number(None), "FAC-000001");
    }

    #[test]
    fn invoice_number_increments_and_keeps_padding() {
        assert_eq!(next_invoice_number(Some("FAC-000042")), "FAC-000043");
        assert_eq!(next_invoice_number(Some("FAC-000999")), "FAC-001000");
        assert_eq!(next_invoice_number(Some("FAC-999999")), "FAC-1000000");
    }

    #[test]
    fn garbage_suffix_restarts_the_sequence() {
        assert_eq!(next_invoice_number(Some("FAC-")), "FAC-000001");
        assert_eq!(next_invoice_number(Some("FACTURA")), "FAC-000001");
        assert_eq!(next_invoice_number(Some("FAC-00X2")), "FAC-000001");
    }

    #[test]
    fn totals_apply_tax_over_subtotal() {
        let items = vec![
            item(Uuid::new_v4(), 2, "10.00", 50),
            item(Uuid::new_v4(), 1, "5.00", 50),
        ];
        let totals = compute_totals(&items, dec("16"));
        assert_eq!(totals.subtotal, dec("25.00"));
        assert_eq!(totals.tax_amount, dec("4.00"));
        assert_eq!(totals.total, dec("29.00"));
    }

    #[test]
    fn totals_round_half_away_from_zero() {
        let items = vec![item(Uuid::new_v4(), 3, "0.115", 10)];
        let totals = compute_totals(&items, dec("19"));
        // 0.345 rounds up to 0.35, not down to 0.34
        assert_eq!(totals.subtotal, dec("0.35"));
        assert_eq!(totals.tax_amount, dec("0.07"));
        assert_eq!(totals.total, dec("0.42"));
    }

    #[test]
    fn discounts_never_change_totals() {
        let plain = vec![item(Uuid::new_v4(), 4, "25.00", 10)];
        let mut discounted = plain.clone();
        discounted[0].discount = dec("15.00");
        assert_eq!(
            compute_totals(&plain, dec("19")),
            compute_totals(&discounted, dec("19"))
        );
    }

    #[test]
    fn header_discount_is_the_sum_of_line_discounts() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let mut first = item(Uuid::new_v4(), 1, "10.00", 5);
        first.discount = dec("2.00");
        let mut second = item(Uuid::new_v4(), 1, "20.00", 5);
        second.discount = dec("1.50");
        draft.add_item(first).unwrap();
        draft.add_item(second).unwrap();
        assert_eq!(draft.total_discount(), dec("3.50"));
    }

    #[test]
    fn adding_beyond_stock_is_rejected() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let id = Uuid::new_v4();
        let err = draft.add_item(item(id, 6, "10.00", 5)).unwrap_err();
        assert!(matches!(
            err,
            DraftError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        assert!(draft.is_empty());
    }

    #[test]
    fn duplicate_product_merges_into_one_line() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let id = Uuid::new_v4();
        draft.add_item(item(id, 2, "10.00", 10)).unwrap();
        draft.add_item(item(id, 3, "10.00", 10)).unwrap();
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, 5);
    }

    #[test]
    fn merge_recheck_covers_combined_quantity() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let id = Uuid::new_v4();
        draft.add_item(item(id, 4, "10.00", 5)).unwrap();
        let err = draft.add_item(item(id, 2, "10.00", 5)).unwrap_err();
        assert!(matches!(
            err,
            DraftError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        // The failed add leaves the existing line untouched
        assert_eq!(draft.items[0].quantity, 4);
    }

    #[test]
    fn zero_quantity_add_is_invalid() {
        let mut draft = InvoiceDraft::new(dec("16"));
        assert_eq!(
            draft.add_item(item(Uuid::new_v4(), 0, "10.00", 5)),
            Err(DraftError::InvalidQuantity)
        );
    }

    #[test]
    fn update_quantity_to_zero_removes_the_line() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let id = Uuid::new_v4();
        draft.add_item(item(id, 2, "10.00", 10)).unwrap();
        draft.update_quantity(id, 0).unwrap();
        assert!(draft.is_empty());
    }

    #[test]
    fn update_quantity_respects_the_stock_guard() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let id = Uuid::new_v4();
        draft.add_item(item(id, 2, "10.00", 5)).unwrap();
        assert!(draft.update_quantity(id, 6).is_err());
        assert!(draft.update_quantity(id, 5).is_ok());
        assert_eq!(draft.items[0].quantity, 5);
    }

    #[test]
    fn updating_an_absent_line_is_an_error() {
        let mut draft = InvoiceDraft::new(dec("16"));
        assert_eq!(
            draft.update_quantity(Uuid::new_v4(), 3),
            Err(DraftError::UnknownProduct)
        );
    }

    proptest! {
        #[test]
        fn numbering_increments_from_any_count(n in 1u64..999_999) {
            let current = format!("FAC-{:06}", n);
            let next = next_invoice_number(Some(&current));
            prop_assert_eq!(next, format!("FAC-{:06}", n + 1));
        }

        #[test]
        fn totals_invariant_total_is_subtotal_plus_tax(
            quantity in 1i32..1_000,
            cents in 1i64..1_000_000,
            rate_percent in 0i64..50,
        ) {
            let items = vec![DraftItem {
                product_id: Uuid::new_v4(),
                product_name: "Tornillo".to_string(),
                product_code: "FER-0002".to_string(),
                quantity,
                unit_price: Decimal::new(cents, 2),
                discount: Decimal::ZERO,
                available_stock: quantity,
            }];
            let totals = compute_totals(&items, Decimal::from(rate_percent));
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
            prop_assert!(totals.tax_amount >= Decimal::ZERO);
        }
    }
}
