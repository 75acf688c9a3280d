//! HTTP handlers for the Ferreteria Management System

pub mod auth;
pub mod billing;
pub mod customer;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod report;
pub mod settings;
pub mod supplier;
pub mod user_admin;

pub use auth::*;
pub use billing::*;
pub use customer::*;
pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use report::*;
pub use settings::*;
pub use supplier::*;
pub use user_admin::*;
