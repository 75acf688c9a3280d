//! Domain models for the Ferreteria Management System

mod invoice;
mod product;
mod report;
mod settings;
mod user;

pub use invoice::*;
pub use product::*;
pub use report::*;
pub use settings::*;
pub use user::*;
