//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notabook_core::error::AppError;
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{PageRequest, PageResponse, UserId};
use notabook_entity::user::{CreateUser, UpdateUser, User};

use super::{storage_error, violated_constraint};
use crate::traits::UserStore;

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match violated_constraint(&e) {
        Some("users_email_key") => AppError::conflict("Email already in use"),
        _ => storage_error(message)(e),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find user by email"))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(UserId::new())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(data.active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error("Failed to create user"))
    }

    async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, email = $3, role = $4, active = $5, \
                              password_hash = COALESCE($6, password_hash), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(data.role)
        .bind(data.active)
        .bind(data.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error("Failed to update user"))?
        .or_not_found("User")
    }

    async fn set_active(&self, id: UserId, active: bool) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to update user status"))?
        .or_not_found("User")
    }
}
