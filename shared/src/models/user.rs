//! User roles, application sections, and preferences

use serde::{Deserialize, Serialize};

/// Fixed roles available to store staff
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    /// Cashier: sells and consults, never edits catalog data
    Cajero,
    /// Warehouse: manages stock, never touches billing
    Bodega,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Cajero => "cajero",
            UserRole::Bodega => "bodega",
        }
    }

    /// Parse a stored role string. Unknown values yield `None`, never an error.
    pub fn parse(role: &str) -> Option<UserRole> {
        match role {
            "admin" => Some(UserRole::Admin),
            "cajero" => Some(UserRole::Cajero),
            "bodega" => Some(UserRole::Bodega),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application sections a role can access
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Inventory,
    Billing,
    Customers,
    Suppliers,
    Reports,
    Settings,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Inventory => "inventory",
            Section::Billing => "billing",
            Section::Customers => "customers",
            Section::Suppliers => "suppliers",
            Section::Reports => "reports",
            Section::Settings => "settings",
        }
    }
}

const ADMIN_SECTIONS: &[Section] = &[
    Section::Dashboard,
    Section::Inventory,
    Section::Billing,
    Section::Customers,
    Section::Suppliers,
    Section::Reports,
    Section::Settings,
];

const CAJERO_SECTIONS: &[Section] = &[
    Section::Inventory,
    Section::Reports,
    Section::Billing,
    Section::Customers,
];

const BODEGA_SECTIONS: &[Section] = &[Section::Inventory, Section::Reports];

/// Resolve the sections a role may access.
///
/// Total over arbitrary input: an unrecognized role resolves to the empty
/// set rather than an error, so a corrupted profile row degrades to
/// "no access" instead of breaking the session.
pub fn sections_for_role(role: &str) -> &'static [Section] {
    match UserRole::parse(role) {
        Some(UserRole::Admin) => ADMIN_SECTIONS,
        Some(UserRole::Cajero) => CAJERO_SECTIONS,
        Some(UserRole::Bodega) => BODEGA_SECTIONS,
        None => &[],
    }
}

/// First permitted section, used as the landing view after login
pub fn default_section_for_role(role: &str) -> Option<Section> {
    sections_for_role(role).first().copied()
}

/// Per-user display preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub theme: String,
    pub font_size: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            font_size: "medium".to_string(),
        }
    }
}

/// Accepted values for the `theme` preference
pub const ALLOWED_THEMES: &[&str] = &["light", "dark"];

/// Accepted values for the `font_size` preference
pub const ALLOWED_FONT_SIZES: &[&str] = &["small", "medium", "large"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gets_every_section() {
        let sections = sections_for_role("admin");
        assert_eq!(sections.len(), 7);
        assert_eq!(sections.first(), Some(&Section::Dashboard));
        assert!(sections.contains(&Section::Settings));
    }

    #[test]
    fn cajero_sells_but_never_configures() {
        let sections = sections_for_role("cajero");
        assert_eq!(
            sections,
            &[
                Section::Inventory,
                Section::Reports,
                Section::Billing,
                Section::Customers,
            ]
        );
        assert!(!sections.contains(&Section::Suppliers));
        assert!(!sections.contains(&Section::Settings));
    }

    #[test]
    fn bodega_is_stock_only() {
        assert_eq!(
            sections_for_role("bodega"),
            &[Section::Inventory, Section::Reports]
        );
    }

    #[test]
    fn unknown_role_resolves_to_nothing() {
        assert!(sections_for_role("gerente").is_empty());
        assert!(sections_for_role("").is_empty());
        assert!(sections_for_role("ADMIN").is_empty());
    }

    #[test]
    fn default_section_is_first_permitted() {
        assert_eq!(default_section_for_role("admin"), Some(Section::Dashboard));
        assert_eq!(
            default_section_for_role("cajero"),
            Some(Section::Inventory)
        );
        assert_eq!(default_section_for_role("desconocido"), None);
    }
}
