//! Persistence service for the `users` table

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{
    error::{ServiceError, ServiceResult},
    models::User,
};

/// Operations over the user record
#[async_trait]
pub trait UserService: Send + Sync {
    /// Insert a user and return the row as persisted
    async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User>;

    /// Point lookup by id
    async fn get_user(&self, id: i64) -> ServiceResult<User>;

    /// One page of users, newest id first, plus the count of all users
    async fn list_users(&self, page_size: i32, page: i32) -> ServiceResult<(Vec<User>, i64)>;

    /// Replace name and email, refreshing `updated_at`
    async fn update_user(&self, id: i64, name: &str, email: &str) -> ServiceResult<User>;

    /// Hard delete
    async fn delete_user(&self, id: i64) -> ServiceResult<()>;
}

/// Limit/offset window derived from 1-based page parameters.
///
/// This is the only place pagination defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: i32 = 10;

    /// Non-positive `page_size` becomes 10, non-positive `page` becomes 1
    pub fn new(page_size: i32, page: i32) -> Self {
        let page_size = if page_size <= 0 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        let page = page.max(1);
        let offset = (i64::from(page) - 1) * i64::from(page_size);

        Self {
            limit: i64::from(page_size),
            offset: offset.max(0),
        }
    }
}

/// PostgreSQL-backed user service
#[derive(Clone)]
pub struct PgUserService {
    pool: PgPool,
}

impl PgUserService {
    /// Create a new service over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User> {
        info!("Creating user with email: {}", email);

        let now = Utc::now();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(ServiceError::store("create user"))
    }

    async fn get_user(&self, id: i64) -> ServiceResult<User> {
        debug!("Finding user by ID: {}", id);

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(ServiceError::store("get user"))?
        .ok_or(ServiceError::NotFound(id))
    }

    async fn list_users(&self, page_size: i32, page: i32) -> ServiceResult<(Vec<User>, i64)> {
        let window = Pagination::new(page_size, page);
        debug!(
            "Listing users with limit {} offset {}",
            window.limit, window.offset
        );

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(ServiceError::store("list users"))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(ServiceError::store("count users"))?;

        Ok((users, total))
    }

    async fn update_user(&self, id: i64, name: &str, email: &str) -> ServiceResult<User> {
        info!("Updating user: {}", id);

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $1, email = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(ServiceError::store("update user"))?
        .ok_or(ServiceError::NotFound(id))
    }

    async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ServiceError::store("delete user"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(id));
        }

        Ok(())
    }
}
