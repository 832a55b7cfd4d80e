//! Auth API 模块
//!
//! 注册/登录是全站仅有的公开接口，其余都要求 Bearer 令牌。

mod handler;

pub use handler::{AuthResponse, LoginRequest, SignupRequest};

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
