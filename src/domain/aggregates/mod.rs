//! Aggregates module
pub mod product;
pub mod inventory;
pub mod order;
pub mod cart;
pub mod supplier;
pub mod admin_user;

pub use product::{Product, ProductError, StockChange};
pub use inventory::{AlertAction, AlertType, MovementType, StockAlert, StockMovement};
pub use order::{Order, OrderError, OrderItem, OrderStatus};
pub use cart::{Cart, CartError, CartItem, CartLine};
pub use supplier::Supplier;
pub use admin_user::{AdminSession, AdminUser};
