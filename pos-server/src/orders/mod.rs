//! 订单核心 - order/table/seat consistency subsystem
//!
//! # 模块结构
//!
//! - [`model`] - 订单实体与请求载荷
//! - [`storage`] - redb 事务存储 (unit of work)
//! - [`manager`] - 订单生命周期管理器
//! - [`money`] - 账单金额计算
//!
//! Booking and release always flow through [`OrderManager`]; nothing else
//! mutates seat occupancy.

pub mod error;
pub mod manager;
pub mod model;
pub mod money;
pub mod storage;

pub use error::{OrderError, OrderResult};
pub use manager::OrderManager;
pub use model::{
    Bills, BillsOverride, CustomerDetails, Discount, Order, OrderAddItems, OrderCreate,
    OrderItem, OrderReplaceItems, OrderStatus, OrderType, OrderUpdate, SeatRef, TableRef,
};
pub use storage::{PosStorage, StorageError};
