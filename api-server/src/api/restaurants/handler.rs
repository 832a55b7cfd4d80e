//! Restaurant API Handlers
//!
//! 列表对所有登录用户可见；创建/下架仅 admin，
//! 更新允许 admin 或该餐厅的 manager。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use crate::db::repository::{RestaurantRepository, UserRepository};
use crate::utils::{AppError, AppResult};
use shared::UserRole;

/// 对外的餐厅视图 (id 转为字符串)
#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub contact_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_active: bool,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id.map(|id| id.to_string()).unwrap_or_default(),
            name: r.name,
            address: r.address,
            contact_info: r.contact_info,
            location: r.location,
            is_active: r.is_active,
        }
    }
}

/// GET /api/restaurants - 餐厅列表
///
/// admin 看到全部 (含已下架)，其余角色只看到营业中的。
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<RestaurantResponse>>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurants = match current_user.role {
        UserRole::Admin => repo.find_all().await?,
        _ => repo.find_all_active().await?,
    };
    Ok(Json(restaurants.into_iter().map(|r| r.into()).collect()))
}

/// GET /api/restaurants/:id - 单个餐厅
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RestaurantResponse>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;
    Ok(Json(restaurant.into()))
}

/// POST /api/restaurants - 创建餐厅 (admin)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<RestaurantResponse>> {
    current_user.require_role(UserRole::Admin)?;
    payload.validate()?;

    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo.create(payload).await?;

    tracing::info!(
        restaurant = %restaurant.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        "Restaurant created"
    );
    Ok(Json(restaurant.into()))
}

/// PUT /api/restaurants/:id - 更新餐厅 (admin 或本店 manager)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<RestaurantResponse>> {
    ensure_can_manage(&state, &current_user, &id).await?;

    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo.update(&id, payload).await?;
    Ok(Json(restaurant.into()))
}

/// DELETE /api/restaurants/:id - 下架餐厅 (软删除，admin)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<RestaurantResponse>> {
    current_user.require_role(UserRole::Admin)?;

    let repo = RestaurantRepository::new(state.db.clone());
    let restaurant = repo.deactivate(&id).await?;

    tracing::info!(restaurant = %id, "Restaurant deactivated");
    Ok(Json(restaurant.into()))
}

/// admin 放行；manager 仅限自己名下的餐厅
async fn ensure_can_manage(
    state: &ServerState,
    current_user: &CurrentUser,
    restaurant_id: &str,
) -> AppResult<()> {
    match current_user.role {
        UserRole::Admin => Ok(()),
        UserRole::Manager => {
            let users = UserRepository::new(state.db.clone());
            let user = users
                .find_by_id(&current_user.user_id)
                .await?
                .ok_or_else(AppError::unauthorized)?;
            if user.restaurant.as_deref() == Some(restaurant_id) {
                Ok(())
            } else {
                Err(AppError::forbidden("Not the manager of this restaurant"))
            }
        }
        _ => Err(AppError::forbidden("admin or manager role required")),
    }
}
