//! Admin API Handlers
//!
//! 经理账号只能在这里创建，必须绑定一家已存在的餐厅。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserResponse};
use crate::db::repository::{RestaurantRepository, UserRepository};
use crate::utils::{AppError, AppResult};
use shared::UserRole;

/// 创建经理请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateManagerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// 绑定的餐厅 ID ("restaurant:xxx")
    pub restaurant: String,
}

/// 经理视图 (带餐厅名)
#[derive(Debug, Serialize)]
pub struct ManagerView {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
}

/// GET /api/admin/users - 全部用户
pub async fn list_users(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(|u| u.into()).collect()))
}

/// GET /api/admin/managers - 经理列表 (带餐厅名)
pub async fn list_managers(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ManagerView>>> {
    let users = UserRepository::new(state.db.clone());
    let restaurants = RestaurantRepository::new(state.db.clone());

    let managers = users.find_by_role(UserRole::Manager).await?;
    let mut views = Vec::with_capacity(managers.len());
    for manager in managers {
        let restaurant_name = match manager.restaurant.as_deref() {
            Some(rid) => restaurants.find_by_id(rid).await?.map(|r| r.name),
            None => None,
        };
        views.push(ManagerView {
            user: manager.into(),
            restaurant_name,
        });
    }

    Ok(Json(views))
}

/// POST /api/admin/managers - 创建经理账号
pub async fn create_manager(
    State(state): State<ServerState>,
    Json(req): Json<CreateManagerRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate()?;

    let restaurants = RestaurantRepository::new(state.db.clone());
    restaurants
        .find_by_id(&req.restaurant)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", req.restaurant)))?;

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    let users = UserRepository::new(state.db.clone());
    let manager = users
        .create(UserCreate {
            name: req.name,
            email: req.email,
            phone: req.phone,
            password_hash,
            role: UserRole::Manager,
            restaurant: Some(req.restaurant),
        })
        .await?;

    tracing::info!(
        manager = %manager.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        "Manager account created"
    );
    Ok(Json(manager.into()))
}
