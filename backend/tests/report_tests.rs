//! Reporting tests
//!
//! Covers stock report numbering and classification, resolution stamping,
//! sales report date windows, and CSV export shape.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde::Serialize;
use shared::{generate_report_number, ReportPriority, ReportStatus, ReportType};

// ============================================================================
// Report Numbers
// ============================================================================

mod report_numbers {
    use super::*;

    #[test]
    fn number_embeds_the_millisecond_timestamp() {
        assert_eq!(generate_report_number(1718041200000), "REP-1718041200000");
        assert_eq!(generate_report_number(0), "REP-0");
    }

    #[test]
    fn distinct_instants_give_distinct_numbers() {
        let first = generate_report_number(1718041200000);
        let second = generate_report_number(1718041200001);
        assert_ne!(first, second);
    }
}

// ============================================================================
// Classification Parsing
// ============================================================================

mod classification {
    use super::*;

    #[test]
    fn report_types_parse_from_stored_values() {
        assert_eq!(ReportType::parse("low_stock"), Some(ReportType::LowStock));
        assert_eq!(ReportType::parse("damaged"), Some(ReportType::Damaged));
        assert_eq!(ReportType::parse("expired"), Some(ReportType::Expired));
        assert_eq!(ReportType::parse("recount"), Some(ReportType::Recount));
        assert_eq!(ReportType::parse("otro"), None);
    }

    #[test]
    fn priorities_parse_from_stored_values() {
        for priority in [
            ReportPriority::Low,
            ReportPriority::Medium,
            ReportPriority::High,
            ReportPriority::Critical,
        ] {
            assert_eq!(ReportPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(ReportPriority::parse("urgente"), None);
    }

    #[test]
    fn statuses_parse_from_stored_values() {
        for status in [
            ReportStatus::Open,
            ReportStatus::InProgress,
            ReportStatus::Resolved,
            ReportStatus::Dismissed,
        ] {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReportStatus::parse("cerrado"), None);
    }
}

// ============================================================================
// Resolution Stamping
// ============================================================================

mod resolution {
    use super::*;

    /// Mirror of the stamping applied on status updates: only a resolved
    /// report carries resolver metadata.
    fn stamp(status: ReportStatus, resolver: &str) -> Option<String> {
        if status == ReportStatus::Resolved {
            Some(resolver.to_string())
        } else {
            None
        }
    }

    #[test]
    fn resolving_records_the_resolver() {
        assert_eq!(
            stamp(ReportStatus::Resolved, "bodeguero"),
            Some("bodeguero".to_string())
        );
    }

    #[test]
    fn any_other_status_clears_the_resolver() {
        assert_eq!(stamp(ReportStatus::Open, "bodeguero"), None);
        assert_eq!(stamp(ReportStatus::InProgress, "bodeguero"), None);
        assert_eq!(stamp(ReportStatus::Dismissed, "bodeguero"), None);
    }

    #[test]
    fn reopening_a_resolved_report_drops_the_stamp() {
        let stamped = stamp(ReportStatus::Resolved, "bodeguero");
        assert!(stamped.is_some());
        let reopened = stamp(ReportStatus::Open, "bodeguero");
        assert!(reopened.is_none());
    }
}

// ============================================================================
// Sales Report Windows
// ============================================================================

mod sales_window {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Mirror of the window defaulting: a missing end falls back to today,
    /// a missing start covers the previous thirty days.
    fn resolve_window(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate), &'static str> {
        let end = end.unwrap_or(today);
        let start = start.unwrap_or(end - Duration::days(30));
        if start > end {
            return Err("start after end");
        }
        Ok((start, end))
    }

    #[test]
    fn missing_bounds_default_to_the_last_thirty_days() {
        let today = day(2024, 6, 15);
        let (start, end) = resolve_window(None, None, today).unwrap();
        assert_eq!(end, today);
        assert_eq!(start, day(2024, 5, 16));
    }

    #[test]
    fn an_explicit_window_is_kept() {
        let today = day(2024, 6, 15);
        let (start, end) =
            resolve_window(Some(day(2024, 1, 1)), Some(day(2024, 3, 31)), today).unwrap();
        assert_eq!(start, day(2024, 1, 1));
        assert_eq!(end, day(2024, 3, 31));
    }

    #[test]
    fn inverted_windows_are_rejected() {
        let today = day(2024, 6, 15);
        let result = resolve_window(Some(day(2024, 6, 10)), Some(day(2024, 6, 1)), today);
        assert!(result.is_err());
    }

    #[test]
    fn the_default_window_crosses_month_and_year_boundaries() {
        let (start, end) = resolve_window(None, None, day(2024, 1, 10)).unwrap();
        assert_eq!(end, day(2024, 1, 10));
        assert_eq!(start, day(2023, 12, 11));
    }
}

// ============================================================================
// CSV Export Shape
// ============================================================================

mod csv_export {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        code: String,
        name: String,
        stock: i32,
    }

    #[test]
    fn export_writes_headers_then_rows() {
        let rows = vec![
            Row {
                code: "FER-0001".to_string(),
                name: "Martillo".to_string(),
                stock: 12,
            },
            Row {
                code: "FER-0002".to_string(),
                name: "Destornillador".to_string(),
                stock: 40,
            },
        ];

        let mut writer = csv::Writer::from_writer(vec![]);
        for row in &rows {
            writer.serialize(row).unwrap();
        }
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("code,name,stock"));
        assert_eq!(lines.next(), Some("FER-0001,Martillo,12"));
        assert_eq!(lines.next(), Some("FER-0002,Destornillador,40"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn an_empty_export_is_just_empty() {
        let writer = csv::Writer::from_writer(vec![]);
        let bytes = writer.into_inner().unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .serialize(Row {
                code: "FER-0003".to_string(),
                name: "Tornillo, caja x100".to_string(),
                stock: 7,
            })
            .unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.contains("\"Tornillo, caja x100\""));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Report numbers are injective over timestamps
    #[test]
    fn report_numbers_never_collide(a in 0i64..=i64::MAX / 2, b in 0i64..=i64::MAX / 2) {
        if a != b {
            prop_assert_ne!(generate_report_number(a), generate_report_number(b));
        }
    }

    /// The default window always spans exactly thirty days
    #[test]
    fn default_window_is_thirty_days(days_from_epoch in 0i64..=40_000) {
        let today = NaiveDate::from_num_days_from_ce_opt(719_163 + days_from_epoch as i32);
        prop_assume!(today.is_some());
        let today = today.unwrap();
        let start = today - Duration::days(30);
        prop_assert_eq!((today - start).num_days(), 30);
    }
}
