//! System settings and user preferences tests
//!
//! Covers the well-known setting keys, the tax-rate fallback chain, and
//! the preference whitelists.

use rust_decimal::Decimal;
use shared::{
    setting_keys, UserPreferences, ALLOWED_FONT_SIZES, ALLOWED_THEMES, FALLBACK_TAX_RATE,
};

// ============================================================================
// Setting Keys
// ============================================================================

mod keys {
    use super::*;

    #[test]
    fn well_known_keys_are_snake_case_and_distinct() {
        let keys = [
            setting_keys::COMPANY_NAME,
            setting_keys::COMPANY_NIT,
            setting_keys::COMPANY_ADDRESS,
            setting_keys::COMPANY_PHONE,
            setting_keys::COMPANY_EMAIL,
            setting_keys::DEFAULT_TAX_RATE,
        ];

        for key in keys {
            assert!(key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }

        let mut unique = keys.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), keys.len());
    }
}

// ============================================================================
// Tax Rate Fallback
// ============================================================================

mod tax_rate {
    use super::*;

    /// Mirror of the chain the billing service walks: stored value, then
    /// the fallback constant.
    fn effective_rate(stored: Option<&str>) -> Decimal {
        stored
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| {
                FALLBACK_TAX_RATE
                    .parse()
                    .unwrap_or_else(|_| Decimal::from(16))
            })
    }

    #[test]
    fn the_fallback_constant_parses() {
        let rate: Decimal = FALLBACK_TAX_RATE.parse().unwrap();
        assert_eq!(rate, Decimal::new(160, 1)); // 16.0
    }

    #[test]
    fn a_stored_rate_wins_over_the_fallback() {
        assert_eq!(effective_rate(Some("19")), Decimal::from(19));
        assert_eq!(effective_rate(Some("8.5")), Decimal::new(85, 1));
    }

    #[test]
    fn missing_or_garbled_rates_fall_back() {
        let fallback: Decimal = FALLBACK_TAX_RATE.parse().unwrap();
        assert_eq!(effective_rate(None), fallback);
        assert_eq!(effective_rate(Some("diecis\u{00e9}is")), fallback);
        assert_eq!(effective_rate(Some("")), fallback);
    }
}

// ============================================================================
// Preference Whitelists
// ============================================================================

mod preferences {
    use super::*;

    #[test]
    fn defaults_are_light_and_medium() {
        let preferences = UserPreferences::default();
        assert_eq!(preferences.theme, "light");
        assert_eq!(preferences.font_size, "medium");
    }

    #[test]
    fn defaults_are_whitelisted() {
        let preferences = UserPreferences::default();
        assert!(ALLOWED_THEMES.contains(&preferences.theme.as_str()));
        assert!(ALLOWED_FONT_SIZES.contains(&preferences.font_size.as_str()));
    }

    #[test]
    fn the_theme_whitelist_is_exactly_light_and_dark() {
        assert_eq!(ALLOWED_THEMES, &["light", "dark"]);
        assert!(!ALLOWED_THEMES.contains(&"solarized"));
    }

    #[test]
    fn the_font_whitelist_covers_three_sizes() {
        assert_eq!(ALLOWED_FONT_SIZES, &["small", "medium", "large"]);
        assert!(!ALLOWED_FONT_SIZES.contains(&"tiny"));
        assert!(!ALLOWED_FONT_SIZES.contains(&"x-large"));
    }
}
