//! 认证中间件
//!
//! 为 JWT 认证和角色检查提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::UserRole;

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health`
/// - `/api/auth/signup`, `/api/auth/login`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证
    let is_public_api_route =
        path == "/api/health" || path == "/api/auth/login" || path == "/api/auth/signup";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(&jwt_service, auth_header) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_rejected",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e)
        }
    }
}

/// 验证 `Authorization` 头并解析出 [`CurrentUser`]
///
/// 中间件和 extractor 共用的一段逻辑：
/// - 无头 → `Unauthorized`
/// - 非 Bearer / 令牌无效 → `InvalidToken`，过期 → `TokenExpired`
pub(crate) fn authenticate(
    jwt_service: &JwtService,
    auth_header: Option<&str>,
) -> Result<CurrentUser, AppError> {
    let token = auth_header
        .ok_or(AppError::Unauthorized)
        .and_then(|header| {
            JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
        })?;

    let claims = jwt_service.validate_token(token).map_err(|e| match e {
        crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;

    CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))
}

/// 角色检查中间件 - 要求特定角色
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/menu", post(handler::create))
///     .route_layer(middleware::from_fn(require_role(UserRole::Manager)));
/// ```
///
/// # 错误
///
/// 角色不符返回 403 Forbidden
pub fn require_role(
    role: UserRole,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or(AppError::Unauthorized)?;

            if user.role != role {
                security_log!(
                    "WARN",
                    "role_denied",
                    user = user.user_id.clone(),
                    required = role.as_str(),
                    actual = user.role.as_str()
                );
                return Err(AppError::forbidden(format!("{} role required", role)));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, JwtService};

    fn jwt_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "a-test-secret-of-at-least-32-bytes!".into(),
            expiration_minutes: 60,
            issuer: "smartbite".into(),
            audience: "smartbite-api".into(),
        })
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let result = authenticate(&jwt_service(), None);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let result = authenticate(&jwt_service(), Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn valid_token_yields_current_user() {
        let service = jwt_service();
        let token = service
            .generate_token("user:alice", "Alice", UserRole::Customer)
            .unwrap();

        let user = authenticate(&service, Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(user.user_id, "user:alice");
        assert_eq!(user.role, UserRole::Customer);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let result = authenticate(&jwt_service(), Some("Bearer not.a.jwt"));
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }
}
