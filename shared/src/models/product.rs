//! Stock movement and stock level types

use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Entry,
    Exit,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
            MovementType::Adjustment => "adjustment",
        }
    }

    pub fn parse(value: &str) -> Option<MovementType> {
        match value {
            "entry" => Some(MovementType::Entry),
            "exit" => Some(MovementType::Exit),
            "adjustment" => Some(MovementType::Adjustment),
            _ => None,
        }
    }
}

/// Severity of a product's stock level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Low,
    Normal,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Normal => "normal",
        }
    }
}

/// Classify a stock level against its minimum threshold.
///
/// Out of stock is critical; at or below half the minimum is low.
pub fn classify_stock_status(stock: i32, min_stock: i32) -> StockStatus {
    if stock <= 0 {
        StockStatus::Critical
    } else if stock <= min_stock / 2 {
        StockStatus::Low
    } else {
        StockStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stock_is_critical() {
        assert_eq!(classify_stock_status(0, 10), StockStatus::Critical);
        assert_eq!(classify_stock_status(-1, 10), StockStatus::Critical);
    }

    #[test]
    fn half_of_minimum_is_low() {
        assert_eq!(classify_stock_status(5, 10), StockStatus::Low);
        assert_eq!(classify_stock_status(3, 10), StockStatus::Low);
    }

    #[test]
    fn above_half_is_normal() {
        assert_eq!(classify_stock_status(6, 10), StockStatus::Normal);
        assert_eq!(classify_stock_status(100, 10), StockStatus::Normal);
    }
}
