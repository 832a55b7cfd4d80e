//! Menu API Handlers
//!
//! 顾客只看到在售菜品；本店 manager (或 admin) 看到全量并可增删改。

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{MenuItemRepository, UserRepository};
use crate::utils::{AppError, AppResult};
use shared::UserRole;

/// 对外的菜品视图
#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub restaurant: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id.map(|id| id.to_string()).unwrap_or_default(),
            restaurant: item.restaurant,
            name: item.name,
            description: item.description,
            price: item.price,
            available: item.available,
        }
    }
}

/// GET /api/menu/restaurant/:restaurant_id - 餐厅菜单
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<MenuItemResponse>>> {
    let full_view = can_manage(&state, &current_user, &restaurant_id).await?;

    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo
        .find_by_restaurant(&restaurant_id, !full_view)
        .await?;
    Ok(Json(items.into_iter().map(|i| i.into()).collect()))
}

/// GET /api/menu/:id - 单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItemResponse>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    Ok(Json(item.into()))
}

/// POST /api/menu/restaurant/:restaurant_id - 新增菜品
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItemResponse>> {
    ensure_can_manage(&state, &current_user, &restaurant_id).await?;
    payload.validate()?;

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(&restaurant_id, payload).await?;

    tracing::info!(
        restaurant = %restaurant_id,
        item = %item.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        "Menu item created"
    );
    Ok(Json(item.into()))
}

/// PUT /api/menu/:id - 更新菜品 (含上/下架)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItemResponse>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    ensure_can_manage(&state, &current_user, &existing.restaurant).await?;

    let item = repo.update(&id, payload).await?;
    Ok(Json(item.into()))
}

/// DELETE /api/menu/:id - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    ensure_can_manage(&state, &current_user, &existing.restaurant).await?;

    let deleted = repo.delete(&id).await?;
    Ok(Json(deleted))
}

/// admin 或本店 manager 可管理，其余角色只读
async fn can_manage(
    state: &ServerState,
    current_user: &CurrentUser,
    restaurant_id: &str,
) -> AppResult<bool> {
    match current_user.role {
        UserRole::Admin => Ok(true),
        UserRole::Manager => {
            let users = UserRepository::new(state.db.clone());
            let user = users
                .find_by_id(&current_user.user_id)
                .await?
                .ok_or_else(AppError::unauthorized)?;
            Ok(user.restaurant.as_deref() == Some(restaurant_id))
        }
        _ => Ok(false),
    }
}

async fn ensure_can_manage(
    state: &ServerState,
    current_user: &CurrentUser,
    restaurant_id: &str,
) -> AppResult<()> {
    if can_manage(state, current_user, restaurant_id).await? {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Not allowed to manage this restaurant's menu",
        ))
    }
}
