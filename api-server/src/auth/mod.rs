//! 认证模块
//!
//! JWT 签发/验证、当前用户提取、认证与角色中间件。

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};

use shared::UserRole;

/// 当前登录用户 (从 JWT Claims 解析，注入请求扩展)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// user 表记录 ID (如 "user:abc123")
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: UserRole = claims.role.parse()?;
        Ok(Self {
            user_id: claims.sub,
            name: claims.name,
            role,
        })
    }
}

impl CurrentUser {
    /// 要求特定角色，否则 403
    pub fn require_role(&self, role: UserRole) -> Result<(), crate::AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(crate::AppError::forbidden(format!(
                "{} role required",
                role
            )))
        }
    }
}
