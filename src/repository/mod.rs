//! SQLite access, one module per table group.
//!
//! Functions take any `SqliteExecutor` so the same query runs against the
//! pool or inside a caller's transaction (`&mut *tx`).
pub mod admin;
pub mod cart;
pub mod inventory;
pub mod order;
pub mod product;
pub mod supplier;
