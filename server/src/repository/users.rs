use super::StoreError;
use crate::models::user::{User, UserRef};
use chrono::Utc;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct Credentials {
    id: i64,
    email: String,
    created_at: chrono::DateTime<Utc>,
    password: String,
}

/// A concurrent signup can pass the email lookup and lose on the UNIQUE index.
fn insert_error(e: sqlx::Error) -> StoreError {
    let taken = e
        .as_database_error()
        .map_or(false, |db| db.is_unique_violation());
    if taken {
        StoreError::EmailTaken
    } else {
        StoreError::Database(e)
    }
}

pub struct UserStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(StoreError::EmailTaken);
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password, created_at) VALUES (?, ?, ?)
             RETURNING id, email, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(insert_error)?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// The user and their stored bcrypt hash, for login.
    pub async fn credentials(&self, email: &str) -> Result<Option<(User, String)>, StoreError> {
        let row = sqlx::query_as::<_, Credentials>(
            "SELECT id, email, created_at, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|c| {
            (
                User {
                    id: c.id,
                    email: c.email,
                    created_at: c.created_at,
                },
                c.password,
            )
        }))
    }

    pub async fn resolve(&self, user: &UserRef) -> Result<User, StoreError> {
        let found = match user {
            UserRef::Email(email) => self.find_by_email(email).await?,
            UserRef::Id(id) => self.find_by_id(*id).await?,
        };
        found.ok_or(StoreError::UserNotFound)
    }
}
