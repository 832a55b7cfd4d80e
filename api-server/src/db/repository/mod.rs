//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! # ID Convention
//!
//! 全栈统一使用 "table:id" 格式：
//!   - 解析: let id: RecordId = "menu_item:abc".parse()?;
//!   - 创建: new_record_id("menu_item")
//!   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId
//!
//! 引用字段 (customer / restaurant / order_id ...) 存字符串，
//! 查询时按字符串相等比较。

// Auth
pub mod user;

// Catalog
pub mod menu_item;
pub mod restaurant;

// Cart & Orders
pub mod cart;
pub mod delivery;
pub mod order;

// Re-exports
pub use cart::CartRepository;
pub use delivery::DeliveryRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use restaurant::RestaurantRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // 唯一索引冲突单独归类，handler 层映射到 409
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// 生成新的 RecordId (uuid v4 key)
pub fn new_record_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, uuid::Uuid::new_v4().simple().to_string())
}

/// 解析 "table:id" 字符串，校验表名
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let record_id: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid id: {}", id)))?;
    if record_id.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected {} id, got: {}",
            table, id
        )));
    }
    Ok(record_id)
}

/// 当前时间的 RFC 3339 字符串
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
