use super::StoreError;
use crate::models::job_link::JobLink;
use crate::models::user::User;
use chrono::Utc;
use jobscrape_cli::JobRecord;
use sqlx::SqlitePool;
use tracing::info;

const COLUMNS: &str =
    "id, user_id, title, company, platform, location, job_type, pay, created_at";

/// Saved job records, always scoped to one owner.
pub struct JobLinkStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobLinkStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn list_for_user(&self, user: &User) -> Result<Vec<JobLink>, StoreError> {
        let links = sqlx::query_as::<_, JobLink>(&format!(
            "SELECT {} FROM job_links WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            COLUMNS
        ))
        .bind(user.id)
        .fetch_all(self.pool)
        .await?;
        Ok(links)
    }

    /// Exact match on all six fields; `IS` makes two NULLs equal.
    pub async fn exists(&self, user: &User, record: &JobRecord) -> Result<bool, StoreError> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM job_links
             WHERE user_id = ?
               AND title IS ? AND company IS ? AND platform IS ?
               AND location IS ? AND job_type IS ? AND pay IS ?
             LIMIT 1",
        )
        .bind(user.id)
        .bind(&record.title)
        .bind(&record.company)
        .bind(&record.platform)
        .bind(&record.location)
        .bind(&record.job_type)
        .bind(&record.pay)
        .fetch_optional(self.pool)
        .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, user: &User, record: &JobRecord) -> Result<JobLink, StoreError> {
        if self.exists(user, record).await? {
            return Err(StoreError::Duplicate);
        }

        let link = sqlx::query_as::<_, JobLink>(&format!(
            "INSERT INTO job_links (user_id, title, company, platform, location, job_type, pay, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            COLUMNS
        ))
        .bind(user.id)
        .bind(&record.title)
        .bind(&record.company)
        .bind(&record.platform)
        .bind(&record.location)
        .bind(&record.job_type)
        .bind(&record.pay)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        info!("Saved job {} for user {}", link.id, user.id);
        Ok(link)
    }

    async fn find(&self, id: i64) -> Result<Option<JobLink>, StoreError> {
        let link = sqlx::query_as::<_, JobLink>(&format!(
            "SELECT {} FROM job_links WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(link)
    }

    /// Records of other users are reported as missing.
    pub async fn get_for_user(&self, id: i64, user: &User) -> Result<JobLink, StoreError> {
        match self.find(id).await? {
            Some(link) if link.user_id == user.id => Ok(link),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn owned(&self, id: i64, user: &User, action: &'static str) -> Result<JobLink, StoreError> {
        let link = self.find(id).await?.ok_or(StoreError::NotFound)?;
        if link.user_id != user.id {
            return Err(StoreError::PermissionDenied(action));
        }
        Ok(link)
    }

    pub async fn update(
        &self,
        id: i64,
        user: &User,
        record: &JobRecord,
    ) -> Result<JobLink, StoreError> {
        self.owned(id, user, "update").await?;

        let link = sqlx::query_as::<_, JobLink>(&format!(
            "UPDATE job_links
             SET title = ?, company = ?, platform = ?, location = ?, job_type = ?, pay = ?
             WHERE id = ?
             RETURNING {}",
            COLUMNS
        ))
        .bind(&record.title)
        .bind(&record.company)
        .bind(&record.platform)
        .bind(&record.location)
        .bind(&record.job_type)
        .bind(&record.pay)
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        info!("Updated job {} for user {}", id, user.id);
        Ok(link)
    }

    pub async fn delete(&self, id: i64, user: &User) -> Result<(), StoreError> {
        self.owned(id, user, "delete").await?;

        sqlx::query("DELETE FROM job_links WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        info!("Deleted job {} for user {}", id, user.id);
        Ok(())
    }
}
