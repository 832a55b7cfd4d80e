//! Menu API 模块
//!
//! 菜单项挂在餐厅之下，列表/创建走 /restaurant/{id} 子路径。

mod handler;

pub use handler::MenuItemResponse;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/restaurant/{restaurant_id}",
            get(handler::list_for_restaurant).post(handler::create),
        )
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
