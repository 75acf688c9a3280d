//! Shared types and models for the Ferreteria Management System
//!
//! This crate contains the domain types and the pure business logic
//! (invoice drafts, numbering, totals, section resolution) shared between
//! the backend service and other components of the system.

pub mod billing;
pub mod models;
pub mod types;
pub mod validation;

pub use billing::*;
pub use models::*;
pub use types::*;
pub use validation::*;
