use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::{OrderManager, PosStorage};

/// 服务器状态 - 持有所有服务的共享引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 (目录数据) |
/// | orders | OrderManager | 订单/桌台核心 (redb) |
///
/// Cloning is cheap: the database handle and the order storage are both
/// reference-counted.
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 订单生命周期管理器
    pub orders: OrderManager,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, db: Surreal<Db>, orders: OrderManager) -> Self {
        Self { config, db, orders }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 目录数据库 (work_dir/database/catalog.db)
    /// 3. 订单核心存储 (work_dir/database/floor.redb)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_dir = config.database_dir();

        let catalog_path = db_dir.join("catalog.db");
        let db_service = DbService::new(&catalog_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let storage = PosStorage::open(db_dir.join("floor.redb"))
            .expect("Failed to open order storage");
        let orders = OrderManager::new(storage);

        Self::new(config.clone(), db_service.db, orders)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
