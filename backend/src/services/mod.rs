//! Business logic services for the Ferreteria Management System

pub mod auth;
pub mod billing;
pub mod customer;
pub mod dashboard;
pub mod inventory;
pub mod report;
pub mod settings;
pub mod supplier;
pub mod user_admin;

pub use auth::AuthService;
pub use billing::BillingService;
pub use customer::CustomerService;
pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use report::ReportService;
pub use settings::SettingsService;
pub use supplier::SupplierService;
pub use user_admin::UserAdminService;
