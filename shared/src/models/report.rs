//! Stock report classification types

use serde::{Deserialize, Serialize};

/// What kind of incident a stock report describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    LowStock,
    Damaged,
    Expired,
    Recount,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::LowStock => "low_stock",
            ReportType::Damaged => "damaged",
            ReportType::Expired => "expired",
            ReportType::Recount => "recount",
        }
    }

    pub fn parse(value: &str) -> Option<ReportType> {
        match value {
            "low_stock" => Some(ReportType::LowStock),
            "damaged" => Some(ReportType::Damaged),
            "expired" => Some(ReportType::Expired),
            "recount" => Some(ReportType::Recount),
            _ => None,
        }
    }
}

/// Urgency assigned when the report is raised
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPriority::Low => "low",
            ReportPriority::Medium => "medium",
            ReportPriority::High => "high",
            ReportPriority::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<ReportPriority> {
        match value {
            "low" => Some(ReportPriority::Low),
            "medium" => Some(ReportPriority::Medium),
            "high" => Some(ReportPriority::High),
            "critical" => Some(ReportPriority::Critical),
            _ => None,
        }
    }
}

/// Workflow state of a stock report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    InProgress,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(value: &str) -> Option<ReportStatus> {
        match value {
            "open" => Some(ReportStatus::Open),
            "in_progress" => Some(ReportStatus::InProgress),
            "resolved" => Some(ReportStatus::Resolved),
            "dismissed" => Some(ReportStatus::Dismissed),
            _ => None,
        }
    }
}

/// Generate a report number from a millisecond timestamp
pub fn generate_report_number(timestamp_millis: i64) -> String {
    format!("REP-{}", timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_numbers_embed_the_timestamp() {
        assert_eq!(generate_report_number(1718041200000), "REP-1718041200000");
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ReportStatus::Open,
            ReportStatus::InProgress,
            ReportStatus::Resolved,
            ReportStatus::Dismissed,
        ] {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReportStatus::parse("closed"), None);
    }
}
