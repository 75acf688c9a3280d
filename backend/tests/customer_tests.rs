//! Customer registry tests
//!
//! Covers contact data validation and the purchase statistics a customer
//! card shows.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{validate_colombian_phone, validate_email};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// ============================================================================
// Contact Validation
// ============================================================================

mod contact_validation {
    use super::*;

    #[test]
    fn emails_need_an_at_sign_and_a_domain() {
        assert!(validate_email("cliente@gmail.com").is_ok());
        assert!(validate_email("compras@constructora.com.co").is_ok());
        assert!(validate_email("sin-arroba.com").is_err());
        assert!(validate_email("corto@x").is_err());
    }

    #[test]
    fn landlines_have_seven_digits() {
        assert!(validate_colombian_phone("6012345").is_ok());
        assert!(validate_colombian_phone("601-2345").is_ok());
    }

    #[test]
    fn mobiles_have_ten_digits() {
        assert!(validate_colombian_phone("3001234567").is_ok());
        assert!(validate_colombian_phone("310 555 1234").is_ok());
    }

    #[test]
    fn international_format_carries_the_country_code() {
        assert!(validate_colombian_phone("+57 300 123 4567").is_ok());
        assert!(validate_colombian_phone("573001234567").is_ok());
    }

    #[test]
    fn wrong_lengths_and_foreign_codes_fail() {
        assert!(validate_colombian_phone("12345").is_err());
        assert!(validate_colombian_phone("30012345678").is_err());
        assert!(validate_colombian_phone("+1 555 123 4567").is_err());
        assert!(validate_colombian_phone("").is_err());
    }
}

// ============================================================================
// Purchase Statistics
// ============================================================================

mod purchase_stats {
    use super::*;

    struct Purchase {
        total: Decimal,
        date: NaiveDate,
        cancelled: bool,
    }

    /// Mirror of the SQL aggregate behind the customer card: cancelled
    /// invoices never count toward the statistics.
    fn summarize(purchases: &[Purchase]) -> (i64, Decimal, Option<NaiveDate>) {
        let mut count = 0;
        let mut total = Decimal::ZERO;
        let mut last: Option<NaiveDate> = None;
        for purchase in purchases.iter().filter(|p| !p.cancelled) {
            count += 1;
            total += purchase.total;
            last = Some(last.map_or(purchase.date, |d| d.max(purchase.date)));
        }
        (count, total, last)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn statistics_accumulate_over_purchases() {
        let purchases = vec![
            Purchase {
                total: dec("45000.00"),
                date: day(2024, 5, 2),
                cancelled: false,
            },
            Purchase {
                total: dec("12500.00"),
                date: day(2024, 6, 17),
                cancelled: false,
            },
        ];

        let (count, total, last) = summarize(&purchases);
        assert_eq!(count, 2);
        assert_eq!(total, dec("57500.00"));
        assert_eq!(last, Some(day(2024, 6, 17)));
    }

    #[test]
    fn cancelled_invoices_never_count() {
        let purchases = vec![
            Purchase {
                total: dec("45000.00"),
                date: day(2024, 5, 2),
                cancelled: false,
            },
            Purchase {
                total: dec("999999.00"),
                date: day(2024, 7, 1),
                cancelled: true,
            },
        ];

        let (count, total, last) = summarize(&purchases);
        assert_eq!(count, 1);
        assert_eq!(total, dec("45000.00"));
        assert_eq!(last, Some(day(2024, 5, 2)));
    }

    #[test]
    fn a_customer_with_no_purchases_has_empty_statistics() {
        let (count, total, last) = summarize(&[]);
        assert_eq!(count, 0);
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(last, None);
    }

    #[test]
    fn last_purchase_is_the_most_recent_date() {
        let purchases = vec![
            Purchase {
                total: dec("100.00"),
                date: day(2024, 6, 17),
                cancelled: false,
            },
            Purchase {
                total: dec("100.00"),
                date: day(2024, 3, 4),
                cancelled: false,
            },
        ];

        let (_, _, last) = summarize(&purchases);
        assert_eq!(last, Some(day(2024, 6, 17)));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

/// Generate valid Colombian mobile numbers
fn mobile_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "3[0-9]{9}",
        // With separators, as people actually type them
        "3[0-9]{2} [0-9]{3} [0-9]{4}",
        "3[0-9]{2}-[0-9]{3}-[0-9]{4}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every ten-digit mobile validates regardless of separators
    #[test]
    fn mobiles_validate_with_any_separator(phone in mobile_strategy()) {
        prop_assert!(validate_colombian_phone(&phone).is_ok());
    }

    /// Prefixing the country code keeps a mobile valid
    #[test]
    fn country_code_prefix_stays_valid(digits in "3[0-9]{9}") {
        let international = format!("+57{}", digits);
        prop_assert!(validate_colombian_phone(&international).is_ok());
    }
}
