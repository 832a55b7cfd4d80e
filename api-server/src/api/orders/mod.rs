//! Order API 模块
//!
//! 下单走事务服务，状态流转走状态机校验，handler 只做路由和鉴权。

mod handler;

pub use handler::UpdateOrderStatusRequest;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route("/{id}", get(handler::get_detail))
        .route("/{id}/status", put(handler::update_status))
}
