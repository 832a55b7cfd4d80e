//! Delivery API 模块
//!
//! 配送员认领/推进配送单，并维护自己的接单状态。

mod handler;

pub use handler::{SetAvailabilityRequest, UpdateDeliveryStatusRequest};

use axum::{
    Router,
    middleware,
    routing::{get, post, put},
};

use crate::auth::middleware::require_role;
use crate::core::ServerState;
use shared::UserRole;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/delivery", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/pending", get(handler::pending))
        .route("/mine", get(handler::mine))
        .route("/availability", put(handler::set_availability))
        .route("/{id}/assign", post(handler::assign))
        .route("/{id}/status", put(handler::update_status))
        .route_layer(middleware::from_fn(require_role(UserRole::Delivery)))
}
