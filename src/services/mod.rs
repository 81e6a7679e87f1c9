//! Use cases. Each function owns its transaction and publishes domain events
//! only after commit.
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod suppliers;
