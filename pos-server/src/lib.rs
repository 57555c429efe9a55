//! POS Server - 单店餐厅销售终端后端
//!
//! # 架构概述
//!
//! 本模块是 POS 后端的主入口，提供以下核心功能：
//!
//! - **订单核心** (`orders`): 订单/桌台/座位一致性子系统，redb 事务存储
//! - **桌台聚合** (`floor`): 座位占用与桌台状态推导
//! - **目录数据** (`db`): 嵌入式 SurrealDB 存储 (菜单/优惠券/支出/收款)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── floor/         # 桌台/座位聚合
//! ├── orders/        # 订单生命周期 + 事务存储
//! ├── db/            # 目录数据库层
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志等工具
//! ```
//!
//! Seat occupancy has a single source of truth (the seat status/order
//! pair inside each table document); every order mutation that touches
//! seats runs inside one redb write transaction, so a table can never be
//! observed half-booked.

pub mod api;
pub mod core;
pub mod db;
pub mod floor;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use db::DbService;
pub use floor::{DiningTable, SeatStatus, TableStatus};
pub use orders::{OrderManager, PosStorage};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置进程环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}
