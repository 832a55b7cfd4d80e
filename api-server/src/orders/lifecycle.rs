//! Lifecycle - 订单与配送状态推进
//!
//! 订单与配送的状态独立存储，由两条同步规则保持一致：
//!
//! 1. 配送单到达 `delivered` 时，所属订单若非终态则自动 `completed`
//! 2. 订单被 `cancelled` 时，未终结的配送单强制 `cancelled`
//!
//! 两条规则都和触发它们的状态写入在同一个事务里。
//! 所有状态写入都带条件守卫 (WHERE status = 期望值)，并发推进只有一方成功。

use shared::{DeliveryStatus, OrderStatus, UserRole};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{DeliveryRecord, Order};
use crate::db::repository::{
    self, DeliveryRepository, OrderRepository, UserRepository, order::ORDER_TABLE,
};
use crate::utils::{AppError, AppResult};

/// 订单/配送生命周期服务
#[derive(Clone)]
pub struct LifecycleService {
    db: Surreal<Db>,
}

impl LifecycleService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Manager advances an order's status
    ///
    /// - 状态机拒绝的迁移 → InvalidTransition (409)
    /// - 非本餐厅经理 → Forbidden
    /// - 取消外送订单时，未终结的配送单在同一事务里强制 cancelled
    pub async fn update_order_status(
        &self,
        manager: &CurrentUser,
        order_id: &str,
        to: OrderStatus,
    ) -> AppResult<Order> {
        let orders = OrderRepository::new(self.db.clone());
        let order = orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

        self.require_order_manager(manager, &order).await?;

        // 状态机校验 (不合法直接 409，不写库)
        order.status.transition(to)?;

        if to == OrderStatus::Cancelled {
            self.cancel_order_with_delivery(order_id, order.status).await?;
        } else {
            orders
                .update_status_guarded(order_id, order.status, to)
                .await?;
        }

        tracing::info!(
            order = %order_id,
            from = %order.status,
            to = %to,
            operator = %manager.user_id,
            "Order status updated"
        );

        orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::database("Order vanished after update".to_string()))
    }

    /// Delivery agent claims a pending delivery (pending → assigned)
    pub async fn assign_delivery(
        &self,
        agent: &CurrentUser,
        delivery_id: &str,
    ) -> AppResult<DeliveryRecord> {
        agent.require_role(UserRole::Delivery)?;

        let deliveries = DeliveryRepository::new(self.db.clone());
        let record = deliveries
            .find_by_id(delivery_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Delivery {} not found", delivery_id)))?;

        record.status.transition(DeliveryStatus::Assigned)?;

        let record = deliveries.assign_guarded(delivery_id, &agent.user_id).await?;

        tracing::info!(
            delivery = %delivery_id,
            agent = %agent.user_id,
            "Delivery assigned"
        );

        Ok(record)
    }

    /// Assigned agent advances the delivery one step
    ///
    /// - 跳级 / 回退 / cancelled 目标 → InvalidTransition (409)
    /// - 非被指派的配送员 → Forbidden
    /// - 到达 delivered 时，所属订单在同一事务里自动 completed (若非终态)
    pub async fn advance_delivery(
        &self,
        agent: &CurrentUser,
        delivery_id: &str,
        to: DeliveryStatus,
    ) -> AppResult<DeliveryRecord> {
        agent.require_role(UserRole::Delivery)?;

        let deliveries = DeliveryRepository::new(self.db.clone());
        let record = deliveries
            .find_by_id(delivery_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Delivery {} not found", delivery_id)))?;

        if record.agent.as_deref() != Some(agent.user_id.as_str()) {
            return Err(AppError::forbidden(
                "Only the assigned agent may advance this delivery",
            ));
        }

        record.status.transition(to)?;

        if to == DeliveryStatus::Delivered {
            self.deliver_and_complete_order(&record, record.status, &agent.user_id)
                .await?;
        } else {
            deliveries
                .advance_guarded(delivery_id, &agent.user_id, record.status, to)
                .await?;
        }

        tracing::info!(
            delivery = %delivery_id,
            from = %record.status,
            to = %to,
            agent = %agent.user_id,
            "Delivery status updated"
        );

        deliveries
            .find_by_id(delivery_id)
            .await?
            .ok_or_else(|| AppError::database("Delivery vanished after update".to_string()))
    }

    /// 经理只能操作自己餐厅的订单
    async fn require_order_manager(&self, manager: &CurrentUser, order: &Order) -> AppResult<()> {
        manager.require_role(UserRole::Manager)?;

        let users = UserRepository::new(self.db.clone());
        let user = users
            .find_by_id(&manager.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.restaurant.as_deref() != Some(order.restaurant.as_str()) {
            return Err(AppError::forbidden(
                "Order belongs to a different restaurant",
            ));
        }
        Ok(())
    }

    /// 同步规则 2：取消订单 + 强制取消未终结的配送单 (单事务)
    async fn cancel_order_with_delivery(
        &self,
        order_id: &str,
        from: OrderStatus,
    ) -> AppResult<()> {
        let order_rid = repository::parse_record_id(ORDER_TABLE, order_id)
            .map_err(AppError::from)?;

        self.db
            .query("BEGIN TRANSACTION")
            .query(
                "LET $updated = UPDATE $order_rid \
                     SET status = $cancelled, updated_at = $now WHERE status = $from",
            )
            .query(r#"IF array::len($updated) == 0 { THROW "status changed concurrently" }"#)
            .query(
                "UPDATE delivery SET status = $delivery_cancelled, updated_at = $now \
                 WHERE order_id = $order_ref AND status IN $active",
            )
            .query("COMMIT TRANSACTION")
            .bind(("order_rid", order_rid))
            .bind(("order_ref", order_id.to_string()))
            .bind(("cancelled", OrderStatus::Cancelled))
            .bind(("delivery_cancelled", DeliveryStatus::Cancelled))
            .bind(("from", from))
            .bind((
                "active",
                vec![
                    DeliveryStatus::Pending,
                    DeliveryStatus::Assigned,
                    DeliveryStatus::PickedUp,
                    DeliveryStatus::InTransit,
                ],
            ))
            .bind(("now", repository::now_rfc3339()))
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .check()
            .map_err(map_concurrent_conflict)?;
        Ok(())
    }

    /// 同步规则 1：配送到达 delivered + 订单自动 completed (单事务)
    async fn deliver_and_complete_order(
        &self,
        record: &DeliveryRecord,
        from: DeliveryStatus,
        agent: &str,
    ) -> AppResult<()> {
        let delivery_rid = record
            .id
            .clone()
            .ok_or_else(|| AppError::database("Delivery record without id".to_string()))?;
        let order_rid = repository::parse_record_id(ORDER_TABLE, &record.order_id)
            .map_err(AppError::from)?;

        self.db
            .query("BEGIN TRANSACTION")
            .query(
                "LET $updated = UPDATE $delivery_rid \
                     SET status = $delivered, updated_at = $now \
                     WHERE status = $from AND agent = $agent",
            )
            .query(r#"IF array::len($updated) == 0 { THROW "status changed concurrently" }"#)
            .query(
                "UPDATE $order_rid SET status = $completed, updated_at = $now \
                 WHERE status IN $non_terminal",
            )
            .query("COMMIT TRANSACTION")
            .bind(("delivery_rid", delivery_rid))
            .bind(("order_rid", order_rid))
            .bind(("delivered", DeliveryStatus::Delivered))
            .bind(("completed", OrderStatus::Completed))
            .bind(("from", from))
            .bind(("agent", agent.to_string()))
            .bind((
                "non_terminal",
                vec![
                    OrderStatus::Placed,
                    OrderStatus::Confirmed,
                    OrderStatus::Preparing,
                    OrderStatus::Ready,
                ],
            ))
            .bind(("now", repository::now_rfc3339()))
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .check()
            .map_err(map_concurrent_conflict)?;
        Ok(())
    }
}

/// 事务里的 THROW (守卫失败) 映射为 409，其余是真库错
fn map_concurrent_conflict(e: surrealdb::Error) -> AppError {
    let msg = e.to_string();
    if msg.contains("status changed concurrently") {
        AppError::conflict("Status changed concurrently, retry with fresh state")
    } else {
        AppError::database(msg)
    }
}
