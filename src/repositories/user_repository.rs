use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::UserRepository;
use crate::models::user::{DealerSummary, User};
use crate::utils::errors::{AppError, AppResult};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DealerRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, phone, role, favorites, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role.as_ref())
        .bind(&user.favorites)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Email is already registered".to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    async fn dealer_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<DealerSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DealerRow>(
            "SELECT id, name, email, phone FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DealerSummary {
                id: r.id,
                name: r.name,
                email: r.email,
                phone: r.phone,
            })
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), phone = COALESCE($3, phone), updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn add_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET favorites = CASE
                    WHEN $2 = ANY(favorites) THEN favorites
                    ELSE array_append(favorites, $2)
                END,
                updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(vehicle_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn remove_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET favorites = array_remove(favorites, $2), updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(vehicle_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
