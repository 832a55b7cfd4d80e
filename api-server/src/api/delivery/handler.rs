//! Delivery API Handlers
//!
//! 待认领池对所有配送员可见，推进只允许被指派的那一位。
//! 送达时所属订单在同一事务里自动 completed。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{DeliveryRecord, UserResponse};
use crate::db::repository::{DeliveryRepository, UserRepository};
use crate::orders::LifecycleService;
use crate::utils::AppResult;
use shared::DeliveryStatus;

/// 配送状态推进请求
#[derive(Debug, Deserialize)]
pub struct UpdateDeliveryStatusRequest {
    pub status: DeliveryStatus,
}

/// 接单状态开关
#[derive(Debug, Deserialize)]
pub struct SetAvailabilityRequest {
    pub is_available: bool,
}

/// GET /api/delivery/pending - 待认领配送单
///
/// 池子对所有配送员一样，角色检查在路由层。
pub async fn pending(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<DeliveryRecord>>> {
    let repo = DeliveryRepository::new(state.db.clone());
    let records = repo.find_pending().await?;
    Ok(Json(records))
}

/// GET /api/delivery/mine - 我名下的配送单
pub async fn mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<DeliveryRecord>>> {
    let repo = DeliveryRepository::new(state.db.clone());
    let records = repo.find_by_agent(&current_user.user_id).await?;
    Ok(Json(records))
}

/// POST /api/delivery/:id/assign - 认领配送单 (pending → assigned)
///
/// 两个配送员同时认领时只有一个成功，另一个拿到 409。
pub async fn assign(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeliveryRecord>> {
    let service = LifecycleService::new(state.db.clone());
    let record = service.assign_delivery(&current_user, &id).await?;
    Ok(Json(record))
}

/// PUT /api/delivery/:id/status - 推进配送状态 (一次一步)
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateDeliveryStatusRequest>,
) -> AppResult<Json<DeliveryRecord>> {
    let service = LifecycleService::new(state.db.clone());
    let record = service
        .advance_delivery(&current_user, &id, req.status)
        .await?;
    Ok(Json(record))
}

/// PUT /api/delivery/availability - 配送员上/下线
pub async fn set_availability(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<SetAvailabilityRequest>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .set_availability(&current_user.user_id, req.is_available)
        .await?;

    tracing::info!(
        agent = %current_user.user_id,
        available = req.is_available,
        "Agent availability changed"
    );
    Ok(Json(user.into()))
}
