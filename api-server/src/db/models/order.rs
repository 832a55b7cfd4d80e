//! Order Models
//!
//! Order 拥有 order_item (结算时原子创建)；`unit_price` 是下单时刻的
//! 快照，之后菜单改价不回写。

use super::delivery::DeliveryRecord;
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{OrderStatus, OrderType};
use surrealdb::RecordId;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// 下单顾客 ("user:xxx")
    pub customer: String,
    /// 餐厅 ("restaurant:xxx")
    pub restaurant: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// order_type = delivery 时必填
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// 结算时按快照价计算的总额
    pub total: Decimal,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Order line item entity (随订单原子创建，之后不可变)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// 所属订单 ("orders:xxx")
    pub order_id: String,
    /// 菜品 ("menu_item:xxx")
    pub menu_item: String,
    /// 下单时刻的菜品名快照
    pub name: String,
    pub quantity: i64,
    /// 下单时刻的单价快照
    pub unit_price: Decimal,
}

/// Full order detail (订单 + 行 + 配送单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryRecord>,
}
