//! User Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_id, now_rfc3339, parse_record_id};
use crate::db::models::{User, UserCreate};
use shared::UserRole;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new user
    ///
    /// 邮箱唯一索引冲突返回 [`RepoError::Duplicate`]
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let id = new_record_id(USER_TABLE);
        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            phone: data.phone,
            password_hash: data.password_hash,
            role: data.role,
            restaurant: data.restaurant,
            is_available: match data.role {
                UserRole::Delivery => Some(false),
                _ => None,
            },
            created_at: Some(now_rfc3339()),
        };

        let created: Option<User> = self.base.db().create(id).content(user).await?;
        created.ok_or_else(|| RepoError::Database("User creation returned nothing".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_record_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find all users (admin 视图)
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users)
    }

    pub async fn find_by_role(&self, role: UserRole) -> RepoResult<Vec<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = $role ORDER BY created_at DESC")
            .bind(("role", role))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users)
    }

    /// 配送员上/下线
    pub async fn set_availability(&self, id: &str, is_available: bool) -> RepoResult<User> {
        let record_id = parse_record_id(USER_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET is_available = $available")
            .bind(("id", record_id))
            .bind(("available", is_available))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}
