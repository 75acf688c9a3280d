//! Billing and invoicing tests
//!
//! Exercises the pure invoice logic the backend applies before touching
//! Postgres: sequential numbering, totals arithmetic, the draft stock
//! guard, and status handling.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    compute_totals, next_invoice_number, round_currency, DraftError, DraftItem, InvoiceDraft,
    InvoiceStatus,
};
use uuid::Uuid;

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn line(quantity: i32, unit_price: &str, stock: i32) -> DraftItem {
    DraftItem {
        product_id: Uuid::new_v4(),
        product_name: "Martillo de una".to_string(),
        product_code: "FER-0100".to_string(),
        quantity,
        unit_price: dec(unit_price),
        discount: Decimal::ZERO,
        available_stock: stock,
    }
}

// ============================================================================
// Invoice Numbering
// ============================================================================

mod invoice_numbering {
    use super::*;

    #[test]
    fn sequence_starts_at_one() {
        assert_eq!(next_invoice_number(None), "FAC-000001");
    }

    #[test]
    fn sequence_increments_from_latest() {
        assert_eq!(next_invoice_number(Some("FAC-000001")), "FAC-000002");
        assert_eq!(next_invoice_number(Some("FAC-000099")), "FAC-000100");
    }

    #[test]
    fn padding_is_six_digits() {
        assert_eq!(next_invoice_number(Some("FAC-000009")).len(), 10);
        assert_eq!(next_invoice_number(Some("FAC-099999")), "FAC-100000");
    }

    #[test]
    fn counter_grows_past_the_padding_width() {
        assert_eq!(next_invoice_number(Some("FAC-999999")), "FAC-1000000");
        assert_eq!(next_invoice_number(Some("FAC-1000000")), "FAC-1000001");
    }

    #[test]
    fn unparseable_latest_restarts_the_sequence() {
        assert_eq!(next_invoice_number(Some("")), "FAC-000001");
        assert_eq!(next_invoice_number(Some("FAC-ABCDEF")), "FAC-000001");
        assert_eq!(next_invoice_number(Some("sin-guion")), "FAC-000001");
    }

    /// A run of consecutive sales produces a gap-free sequence
    #[test]
    fn consecutive_sales_never_skip_a_number() {
        let mut latest: Option<String> = None;
        for expected in 1..=50u64 {
            let number = next_invoice_number(latest.as_deref());
            assert_eq!(number, format!("FAC-{:06}", expected));
            latest = Some(number);
        }
    }
}

// ============================================================================
// Totals Arithmetic
// ============================================================================

mod totals {
    use super::*;

    #[test]
    fn subtotal_is_quantity_times_unit_price() {
        let items = vec![line(3, "2500.00", 100), line(2, "1200.50", 100)];
        let totals = compute_totals(&items, Decimal::ZERO);
        // 3 * 2500.00 + 2 * 1200.50 = 9901.00
        assert_eq!(totals.subtotal, dec("9901.00"));
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, dec("9901.00"));
    }

    #[test]
    fn tax_is_a_percentage_of_the_subtotal() {
        let items = vec![line(1, "100.00", 10)];
        let totals = compute_totals(&items, dec("19"));
        assert_eq!(totals.subtotal, dec("100.00"));
        assert_eq!(totals.tax_amount, dec("19.00"));
        assert_eq!(totals.total, dec("119.00"));
    }

    #[test]
    fn amounts_round_to_cents_half_away_from_zero() {
        assert_eq!(round_currency(dec("10.005")), dec("10.01"));
        assert_eq!(round_currency(dec("10.004")), dec("10.00"));
        assert_eq!(round_currency(dec("-10.005")), dec("-10.01"));
    }

    #[test]
    fn line_discounts_do_not_reduce_the_total() {
        let plain = vec![line(2, "50.00", 10)];
        let mut discounted = plain.clone();
        discounted[0].discount = dec("20.00");

        let without = compute_totals(&plain, dec("19"));
        let with = compute_totals(&discounted, dec("19"));
        assert_eq!(without, with);
    }

    #[test]
    fn empty_item_list_yields_zero_totals() {
        let totals = compute_totals(&[], dec("19"));
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn draft_totals_match_the_free_function() {
        let mut draft = InvoiceDraft::new(dec("16"));
        draft.add_item(line(2, "4500.00", 20)).unwrap();
        draft.add_item(line(1, "12900.00", 5)).unwrap();

        let expected = compute_totals(&draft.items, dec("16"));
        assert_eq!(draft.totals(), expected);
    }
}

// ============================================================================
// Draft Stock Guard
// ============================================================================

mod draft_guard {
    use super::*;

    #[test]
    fn selling_more_than_on_hand_is_rejected() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let err = draft.add_item(line(8, "1000.00", 5)).unwrap_err();
        assert!(matches!(
            err,
            DraftError::InsufficientStock {
                available: 5,
                requested: 8,
                ..
            }
        ));
        assert!(draft.is_empty());
    }

    #[test]
    fn same_product_twice_merges_and_rechecks_stock() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let mut first = line(3, "1000.00", 5);
        let id = first.product_id;
        draft.add_item(first.clone()).unwrap();

        // Second add of the same product with combined quantity 6 > 5
        first.quantity = 3;
        let err = draft.add_item(first).unwrap_err();
        assert!(matches!(err, DraftError::InsufficientStock { .. }));

        // The existing line is untouched by the failed merge
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].product_id, id);
        assert_eq!(draft.items[0].quantity, 3);
    }

    #[test]
    fn quantity_update_to_zero_drops_the_line() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let item = line(2, "1000.00", 10);
        let id = item.product_id;
        draft.add_item(item).unwrap();

        draft.update_quantity(id, 0).unwrap();
        assert!(draft.is_empty());
    }

    #[test]
    fn updating_a_line_that_is_not_there_fails() {
        let mut draft = InvoiceDraft::new(dec("16"));
        assert_eq!(
            draft.update_quantity(Uuid::new_v4(), 1),
            Err(DraftError::UnknownProduct)
        );
    }

    #[test]
    fn header_discount_accumulates_line_discounts() {
        let mut draft = InvoiceDraft::new(dec("16"));
        let mut a = line(1, "10000.00", 10);
        a.discount = dec("500.00");
        let mut b = line(1, "8000.00", 10);
        b.discount = dec("250.00");
        draft.add_item(a).unwrap();
        draft.add_item(b).unwrap();
        assert_eq!(draft.total_discount(), dec("750.00"));
    }
}

// ============================================================================
// Invoice Status
// ============================================================================

mod status {
    use super::*;

    #[test]
    fn stored_values_parse_back() {
        for status in [
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
            InvoiceStatus::Overdue,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("anulada"), None);
    }

    #[test]
    fn search_accepts_spanish_terms() {
        assert_eq!(
            InvoiceStatus::from_search_term("pagada"),
            Some(InvoiceStatus::Paid)
        );
        assert_eq!(
            InvoiceStatus::from_search_term("PENDIENTE"),
            Some(InvoiceStatus::Pending)
        );
        assert_eq!(
            InvoiceStatus::from_search_term(" vencida "),
            Some(InvoiceStatus::Overdue)
        );
        assert_eq!(
            InvoiceStatus::from_search_term("cancelada"),
            Some(InvoiceStatus::Cancelled)
        );
    }

    #[test]
    fn search_accepts_stored_english_values_too() {
        assert_eq!(
            InvoiceStatus::from_search_term("paid"),
            Some(InvoiceStatus::Paid)
        );
        assert_eq!(
            InvoiceStatus::from_search_term("overdue"),
            Some(InvoiceStatus::Overdue)
        );
    }

    #[test]
    fn product_words_are_not_statuses() {
        assert_eq!(InvoiceStatus::from_search_term("taladro"), None);
        assert_eq!(InvoiceStatus::from_search_term("FAC-000001"), None);
        assert_eq!(InvoiceStatus::from_search_term(""), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        // 0.01 to 100000.00, two decimal places
        (1i64..=10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=500
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The next number is always the numeric successor
        #[test]
        fn numbering_is_dense(n in 1u64..2_000_000u64) {
            let current = if n < 1_000_000 {
                format!("FAC-{:06}", n)
            } else {
                format!("FAC-{}", n)
            };
            let next = next_invoice_number(Some(&current));
            let suffix: u64 = next.split('-').nth(1).unwrap().parse().unwrap();
            prop_assert_eq!(suffix, n + 1);
        }

        /// Total always equals subtotal plus tax, for any cart
        #[test]
        fn total_decomposes_into_subtotal_and_tax(
            carts in prop::collection::vec((quantity_strategy(), price_strategy()), 1..10),
            rate in 0i64..=50,
        ) {
            let items: Vec<DraftItem> = carts
                .iter()
                .map(|(quantity, price)| {
                    let mut item = line(*quantity, "0", i32::MAX);
                    item.unit_price = *price;
                    item
                })
                .collect();
            let totals = compute_totals(&items, Decimal::from(rate));
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
        }

        /// Tax never goes negative and never exceeds the subtotal at <= 100%
        #[test]
        fn tax_is_bounded_by_the_subtotal(
            quantity in quantity_strategy(),
            price in price_strategy(),
            rate in 0i64..=100,
        ) {
            let mut item = line(quantity, "0", i32::MAX);
            item.unit_price = price;
            let totals = compute_totals(&[item], Decimal::from(rate));
            prop_assert!(totals.tax_amount >= Decimal::ZERO);
            prop_assert!(totals.tax_amount <= totals.subtotal);
        }

        /// The draft guard always holds: no line ever exceeds its stock
        #[test]
        fn draft_lines_never_exceed_stock(
            adds in prop::collection::vec((1i32..=20, 1i32..=15), 1..30),
        ) {
            let mut draft = InvoiceDraft::new(dec("19"));
            let id = Uuid::new_v4();
            for (quantity, stock) in adds {
                let mut item = line(quantity, "100.00", stock);
                item.product_id = id;
                // Ignore rejections; only accepted adds may change the draft
                let _ = draft.add_item(item);
                if let Some(current) = draft.items.first() {
                    prop_assert!(current.quantity <= current.available_stock);
                }
            }
        }
    }
}
