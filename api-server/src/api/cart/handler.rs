//! Cart API Handlers
//!
//! 小计和总价每次读取时现算，不落库。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CartView;
use crate::db::repository::CartRepository;
use crate::utils::AppResult;
use shared::UserRole;

/// 加购请求
#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub menu_item: String,
    /// 省略时加购 1 份
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// 改量请求 (quantity <= 0 等价删除)
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// GET /api/cart - 当前购物车 (带菜品信息和总价)
pub async fn contents(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<CartView>> {
    current_user.require_role(UserRole::Customer)?;

    let repo = CartRepository::new(state.db.clone());
    let view = repo.contents(&current_user.user_id).await?;
    Ok(Json(view))
}

/// POST /api/cart - 加购 (同菜品累加数量)
pub async fn add_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<AddCartItemRequest>,
) -> AppResult<Json<CartView>> {
    current_user.require_role(UserRole::Customer)?;

    let repo = CartRepository::new(state.db.clone());
    repo.add_item(&current_user.user_id, &req.menu_item, req.quantity)
        .await?;

    let view = repo.contents(&current_user.user_id).await?;
    Ok(Json(view))
}

/// PUT /api/cart/items/:entry_id - 设置某行数量
pub async fn set_quantity(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(entry_id): Path<String>,
    Json(req): Json<SetQuantityRequest>,
) -> AppResult<Json<CartView>> {
    current_user.require_role(UserRole::Customer)?;

    let repo = CartRepository::new(state.db.clone());
    repo.set_quantity(&current_user.user_id, &entry_id, req.quantity)
        .await?;

    let view = repo.contents(&current_user.user_id).await?;
    Ok(Json(view))
}

/// DELETE /api/cart - 清空购物车 (幂等)
pub async fn clear(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<CartView>> {
    current_user.require_role(UserRole::Customer)?;

    let repo = CartRepository::new(state.db.clone());
    repo.clear(&current_user.user_id).await?;
    Ok(Json(CartView::empty()))
}
