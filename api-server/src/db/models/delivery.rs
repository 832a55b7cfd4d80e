//! Delivery Model
//!
//! 与订单 1:1 (唯一索引 uniq_delivery_order)，状态独立存储，
//! 通过同步规则与订单状态保持一致。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::DeliveryStatus;
use surrealdb::RecordId;

/// Delivery record entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// 所属订单 ("orders:xxx")
    pub order_id: String,
    pub status: DeliveryStatus,
    /// 取餐地点 (餐厅地址快照)
    #[serde(default)]
    pub pickup_location: Option<String>,
    pub delivery_address: String,
    /// 接单配送员 ("user:xxx"，assign 后写入)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
