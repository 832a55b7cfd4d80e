//! Database Module
//!
//! 嵌入式 SurrealDB：RocksDB 引擎 (生产) / 内存引擎 (测试)。
//! 打开连接后立即定义 schema（幂等，`IF NOT EXISTS`）。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "smartbite";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open the RocksDB-backed database under `data_dir`
    pub async fn open(data_dir: &str) -> Result<Self, AppError> {
        let path = format!("{}/db", data_dir);
        let db = Surreal::new::<RocksDb>(path.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        Self::init(db).await
    }

    /// Open an in-memory database (测试用)
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {}", e)))?;

        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);

        Ok(Self { db })
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    pub fn into_inner(self) -> Surreal<Db> {
        self.db
    }
}

/// 定义表与唯一索引
///
/// 表都是 SCHEMALESS，约束在仓储层维护；唯一索引交给存储引擎，
/// 这样注册邮箱冲突、购物车行冲突在并发下也成立。
async fn define_schema(db: &Surreal<Db>) -> surrealdb::Result<()> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user FIELDS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS restaurant SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS cart_item SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS delivery SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_delivery_order ON TABLE delivery FIELDS order_id UNIQUE;
        ",
    )
    .await?
    .check()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_rocksdb_and_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let service = DbService::open(dir.path().to_str().unwrap()).await.unwrap();

        // 二次执行是 no-op (IF NOT EXISTS)
        define_schema(service.db()).await.unwrap();

        let mut result = service
            .db()
            .query("CREATE user:probe SET email = 'probe@example.com' RETURN AFTER")
            .await
            .unwrap();
        let rows: Vec<serde_json::Value> = result.take(0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["email"], "probe@example.com");
    }

    #[tokio::test]
    async fn unique_email_index_rejects_duplicates() {
        let service = DbService::open_in_memory().await.unwrap();

        service
            .db()
            .query("CREATE user SET email = 'dup@example.com'")
            .await
            .unwrap()
            .check()
            .unwrap();

        let result = service
            .db()
            .query("CREATE user SET email = 'dup@example.com'")
            .await
            .unwrap()
            .check();
        assert!(result.is_err());
    }
}
