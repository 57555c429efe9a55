//! Catalog Models
//!
//! SurrealDB document models for the CRUD collections.

pub mod serde_helpers;

pub mod coupon;
pub mod expense;
pub mod menu_item;
pub mod payment;

pub use coupon::{Coupon, CouponApplied, CouponApply, CouponCreate, CouponUpdate};
pub use expense::{Expense, ExpenseCategory, ExpenseCreate, ExpenseUpdate};
pub use menu_item::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use payment::{Payment, PaymentCreate, PaymentStatus};
