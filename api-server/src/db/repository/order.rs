//! Order Repository
//!
//! 订单的创建只发生在结算事务里 (见 `orders::checkout`)；
//! 这里提供读取和带条件守卫的状态更新。

use super::{BaseRepository, RepoError, RepoResult, now_rfc3339, parse_record_id};
use crate::db::models::{Order, OrderLineItem};
use shared::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const ORDER_TABLE: &str = "orders";
pub const ORDER_ITEM_TABLE: &str = "order_item";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    pub async fn find_by_customer(&self, customer: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", customer.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    pub async fn find_by_restaurant(&self, restaurant: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE restaurant = $restaurant ORDER BY created_at DESC")
            .bind(("restaurant", restaurant.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// All orders (admin 视图)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at DESC")
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Line items of an order
    pub async fn line_items(&self, order_id: &str) -> RepoResult<Vec<OrderLineItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order_id = $order_id ORDER BY name")
            .bind(("order_id", order_id.to_string()))
            .await?;
        let items: Vec<OrderLineItem> = result.take(0)?;
        Ok(items)
    }

    /// Guarded status update
    ///
    /// 只有当前状态仍是 `from` 时才写入 `to`——两个经理并发推进
    /// 同一订单时只有一个会成功，另一个拿到 Duplicate(冲突)。
    pub async fn update_status_guarded(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<Order> {
        let record_id = parse_record_id(ORDER_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $to, updated_at = $now WHERE status = $from")
            .bind(("id", record_id))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("now", now_rfc3339()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders.into_iter().next().ok_or_else(|| {
            RepoError::Duplicate(format!(
                "Order {} was modified concurrently (expected status {})",
                id, from
            ))
        })
    }
}
