//! Cart Models
//!
//! 购物车与顾客 1:1，身份折叠进顾客 ID；cart_item 的主键是
//! `(customer, menu_item)` 的确定性组合键，新增走原子 UPSERT。
//! 合计永远在读取时重算，不落库。

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart entry entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// 所属顾客 ("user:xxx")
    pub customer: String,
    /// 菜品 ("menu_item:xxx")
    pub menu_item: String,
    pub quantity: i64,
    pub updated_at: Option<String>,
}

/// 购物车行视图：当前菜品名/价 + 行小计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub entry_id: String,
    pub menu_item: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub subtotal: Decimal,
}

/// 购物车视图：读取时重算的纯计算结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Decimal,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
