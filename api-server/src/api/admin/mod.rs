//! Admin API 模块
//!
//! 用户总览与经理账号管理，全部要求 admin 角色。

mod handler;

pub use handler::{CreateManagerRequest, ManagerView};

use axum::{
    Router,
    middleware,
    routing::get,
};

use crate::auth::middleware::require_role;
use crate::core::ServerState;
use shared::UserRole;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route("/managers", get(handler::list_managers).post(handler::create_manager))
        .route_layer(middleware::from_fn(require_role(UserRole::Admin)))
}
