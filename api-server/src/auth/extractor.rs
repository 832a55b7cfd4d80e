//! CurrentUser 提取器
//!
//! 认证中间件已把 [`CurrentUser`] 放进请求扩展，handler 参数里的
//! `CurrentUser` 只是把它取出来；没走中间件的路由 (测试或单独挂载)
//! 退回到 [`middleware::authenticate`] 验证 Bearer 头。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, middleware};
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // 中间件注入过就直接复用
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let user = middleware::authenticate(&state.get_jwt_service(), auth_header)?;

        // 留在扩展里，后续提取不再验证
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::db::DbService;
    use shared::UserRole;

    async fn test_state() -> ServerState {
        let db = DbService::open_in_memory().await.unwrap().into_inner();
        ServerState::with_db(Config::from_env(), db)
    }

    fn parts_with_header(header: Option<&str>) -> Parts {
        let mut builder = http::Request::builder().uri("/api/cart");
        if let Some(value) = header {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn reuses_user_from_extensions_without_header() {
        let state = test_state().await;
        let mut parts = parts_with_header(None);
        parts.extensions.insert(CurrentUser {
            user_id: "user:alice".into(),
            name: "Alice".into(),
            role: UserRole::Customer,
        });

        let user = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.user_id, "user:alice");
    }

    #[tokio::test]
    async fn falls_back_to_bearer_header() {
        let state = test_state().await;
        let token = state
            .get_jwt_service()
            .generate_token("user:bob", "Bob", UserRole::Delivery)
            .unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));

        let user = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.user_id, "user:bob");
        assert_eq!(user.role, UserRole::Delivery);

        // 成功后写回扩展，供同一请求的后续提取复用
        assert!(parts.extensions.get::<CurrentUser>().is_some());
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = test_state().await;
        let mut parts = parts_with_header(None);

        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
