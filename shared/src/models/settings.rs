//! System settings keys

/// Well-known setting keys the application reads
pub mod setting_keys {
    pub const COMPANY_NAME: &str = "company_name";
    pub const COMPANY_NIT: &str = "company_nit";
    pub const COMPANY_ADDRESS: &str = "company_address";
    pub const COMPANY_PHONE: &str = "company_phone";
    pub const COMPANY_EMAIL: &str = "company_email";
    pub const DEFAULT_TAX_RATE: &str = "default_tax_rate";
}

/// Fallback IVA percentage when `default_tax_rate` is missing or unparseable
pub const FALLBACK_TAX_RATE: &str = "16.0";
