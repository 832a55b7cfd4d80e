//! Cart API 模块
//!
//! 购物车只属于当前登录的顾客，路径里不带用户 ID。

mod handler;

pub use handler::{AddCartItemRequest, SetQuantityRequest};

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::contents)
                .post(handler::add_item)
                .delete(handler::clear),
        )
        .route("/items/{entry_id}", put(handler::set_quantity))
}
