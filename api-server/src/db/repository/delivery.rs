//! Delivery Repository

use super::{BaseRepository, RepoError, RepoResult, now_rfc3339, parse_record_id};
use crate::db::models::DeliveryRecord;
use shared::DeliveryStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const DELIVERY_TABLE: &str = "delivery";

#[derive(Clone)]
pub struct DeliveryRepository {
    base: BaseRepository,
}

impl DeliveryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DeliveryRecord>> {
        let record_id = parse_record_id(DELIVERY_TABLE, id)?;
        let record: Option<DeliveryRecord> = self.base.db().select(record_id).await?;
        Ok(record)
    }

    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Option<DeliveryRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM delivery WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?;
        let records: Vec<DeliveryRecord> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// 待接单池 (status = pending，任何配送员可见)
    pub async fn find_pending(&self) -> RepoResult<Vec<DeliveryRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM delivery WHERE status = $status ORDER BY created_at")
            .bind(("status", DeliveryStatus::Pending))
            .await?;
        let records: Vec<DeliveryRecord> = result.take(0)?;
        Ok(records)
    }

    /// 某配送员名下的配送单
    pub async fn find_by_agent(&self, agent: &str) -> RepoResult<Vec<DeliveryRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM delivery WHERE agent = $agent ORDER BY created_at DESC")
            .bind(("agent", agent.to_string()))
            .await?;
        let records: Vec<DeliveryRecord> = result.take(0)?;
        Ok(records)
    }

    /// Guarded assign: pending → assigned，同时写入 agent
    ///
    /// 两个配送员抢同一单时只有一个成功。
    pub async fn assign_guarded(&self, id: &str, agent: &str) -> RepoResult<DeliveryRecord> {
        let record_id = parse_record_id(DELIVERY_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $to, agent = $agent, updated_at = $now \
                 WHERE status = $from",
            )
            .bind(("id", record_id))
            .bind(("to", DeliveryStatus::Assigned))
            .bind(("from", DeliveryStatus::Pending))
            .bind(("agent", agent.to_string()))
            .bind(("now", now_rfc3339()))
            .await?;
        let records: Vec<DeliveryRecord> = result.take(0)?;
        records.into_iter().next().ok_or_else(|| {
            RepoError::Duplicate(format!("Delivery {} is no longer pending", id))
        })
    }

    /// Guarded advance: 仅当状态仍是 `from` 且 agent 匹配时推进到 `to`
    pub async fn advance_guarded(
        &self,
        id: &str,
        agent: &str,
        from: DeliveryStatus,
        to: DeliveryStatus,
    ) -> RepoResult<DeliveryRecord> {
        let record_id = parse_record_id(DELIVERY_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $to, updated_at = $now \
                 WHERE status = $from AND agent = $agent",
            )
            .bind(("id", record_id))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("agent", agent.to_string()))
            .bind(("now", now_rfc3339()))
            .await?;
        let records: Vec<DeliveryRecord> = result.take(0)?;
        records.into_iter().next().ok_or_else(|| {
            RepoError::Duplicate(format!(
                "Delivery {} was modified concurrently (expected status {})",
                id, from
            ))
        })
    }
}
