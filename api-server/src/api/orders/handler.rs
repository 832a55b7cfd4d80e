//! Order API Handlers
//!
//! 列表按角色收窄：顾客看自己的单，经理看本店的单，admin 看全部。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderDetail};
use crate::db::repository::{DeliveryRepository, OrderRepository, UserRepository};
use crate::orders::{CheckoutService, LifecycleService, PlaceOrderRequest};
use crate::utils::{AppError, AppResult};
use shared::{OrderStatus, UserRole};

/// 状态流转请求
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// POST /api/orders - 从购物车下单 (事务)
pub async fn place(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<OrderDetail>> {
    current_user.require_role(UserRole::Customer)?;

    let service = CheckoutService::new(state.db.clone());
    let detail = service.place_order(&current_user.user_id, req).await?;
    Ok(Json(detail))
}

/// GET /api/orders - 订单列表 (按角色收窄)
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());

    let orders = match current_user.role {
        UserRole::Customer => repo.find_by_customer(&current_user.user_id).await?,
        UserRole::Manager => {
            let restaurant = manager_restaurant(&state, &current_user).await?;
            repo.find_by_restaurant(&restaurant).await?
        }
        UserRole::Admin => repo.find_all().await?,
        UserRole::Delivery => {
            return Err(AppError::forbidden(
                "Delivery agents list their tasks under /api/delivery",
            ));
        }
    };

    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情 (行项目 + 配送单)
pub async fn get_detail(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    let deliveries = DeliveryRepository::new(state.db.clone());
    let delivery = deliveries.find_by_order(&id).await?;

    ensure_can_view(&state, &current_user, &order, delivery.as_ref()).await?;

    let items = repo.line_items(&id).await?;
    Ok(Json(OrderDetail {
        order,
        items,
        delivery,
    }))
}

/// PUT /api/orders/:id/status - 状态流转 (仅本店经理)
///
/// cancelled 会在同一事务里取消未完成的配送单。
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let service = LifecycleService::new(state.db.clone());
    let order = service
        .update_order_status(&current_user, &id, req.status)
        .await?;
    Ok(Json(order))
}

/// manager 必须绑定了餐厅才能看店内订单
async fn manager_restaurant(
    state: &ServerState,
    current_user: &CurrentUser,
) -> AppResult<String> {
    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_id(&current_user.user_id)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    user.restaurant
        .ok_or_else(|| AppError::forbidden("Manager account has no restaurant assigned"))
}

/// 顾客本人、本店经理、admin、被指派的配送员可见
async fn ensure_can_view(
    state: &ServerState,
    current_user: &CurrentUser,
    order: &Order,
    delivery: Option<&crate::db::models::DeliveryRecord>,
) -> AppResult<()> {
    match current_user.role {
        UserRole::Admin => Ok(()),
        UserRole::Customer if order.customer == current_user.user_id => Ok(()),
        UserRole::Manager => {
            let restaurant = manager_restaurant(state, current_user).await?;
            if order.restaurant == restaurant {
                Ok(())
            } else {
                Err(AppError::forbidden("Order belongs to another restaurant"))
            }
        }
        UserRole::Delivery
            if delivery
                .and_then(|d| d.agent.as_deref())
                == Some(current_user.user_id.as_str()) =>
        {
            Ok(())
        }
        _ => Err(AppError::forbidden("Not allowed to view this order")),
    }
}
