//! Invoice status handling

use serde::{Deserialize, Serialize};

/// Lifecycle states of an invoice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn parse(value: &str) -> Option<InvoiceStatus> {
        match value {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            "overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }

    /// Match a free-text search word against a status, accepting the
    /// Spanish terms cashiers actually type alongside the stored values.
    pub fn from_search_term(term: &str) -> Option<InvoiceStatus> {
        match term.trim().to_lowercase().as_str() {
            "pagada" | "paid" => Some(InvoiceStatus::Paid),
            "pendiente" | "pending" => Some(InvoiceStatus::Pending),
            "cancelada" | "cancelled" => Some(InvoiceStatus::Cancelled),
            "vencida" | "overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_accept_spanish_and_english() {
        assert_eq!(
            InvoiceStatus::from_search_term("pagada"),
            Some(InvoiceStatus::Paid)
        );
        assert_eq!(
            InvoiceStatus::from_search_term("Pendiente"),
            Some(InvoiceStatus::Pending)
        );
        assert_eq!(
            InvoiceStatus::from_search_term("cancelled"),
            Some(InvoiceStatus::Cancelled)
        );
        assert_eq!(
            InvoiceStatus::from_search_term("vencida"),
            Some(InvoiceStatus::Overdue)
        );
        assert_eq!(InvoiceStatus::from_search_term("martillo"), None);
    }
}
