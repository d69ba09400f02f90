//! Postgres storage

use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::announcements::Announcement;
use crate::announcements::AnnouncementId;
use crate::announcements::now;
use crate::staff::Staff;

use super::CreateAnnouncementValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateAnnouncementValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres version of staff
#[derive(sqlx::FromRow)]
struct PostgresStaff {
    username: String,
    created_at: NaiveDateTime,
}

impl PostgresStaff {
    fn into_staff(self) -> Staff {
        Staff {
            username: self.username,
            created_at: self.created_at,
        }
    }
}

/// Postgres version of announcement
#[derive(sqlx::FromRow)]
struct PostgresAnnouncement {
    id: Uuid,
    title: String,
    message: String,
    priority: String,
    start_date: Option<NaiveDate>,
    end_date: NaiveDate,
    is_active: bool,
    created_by: String,
    created_at: NaiveDateTime,
}

impl PostgresAnnouncement {
    fn into_announcement(self) -> Announcement {
        Announcement {
            id: AnnouncementId::new(self.id),
            title: self.title,
            message: self.message,
            priority: self.priority,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }

    fn into_announcement_multiple(announcements: Vec<Self>) -> Vec<Announcement> {
        announcements
            .into_iter()
            .map(Self::into_announcement)
            .collect()
    }
}

/// Postgres storage
#[derive(Clone, Debug)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> anyhow::Result<Self> {
        let database_connection_string =
            std::env::var("DATABASE_URL").context("`DATABASE_URL` is not set")?;

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .context("Could not connect to the database")?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> anyhow::Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .context("Migrations could not run")?;

        Ok(Self { connection_pool })
    }
}

/// Turn the storage ID back into a UUID
///
/// IDs are only created by [`Storage::parse_announcement_id`] or this storage
fn to_uuid(id: &AnnouncementId) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

impl Storage for Postgres {
    fn parse_announcement_id(&self, id: &str) -> Option<AnnouncementId> {
        Uuid::parse_str(id).ok().map(AnnouncementId::new)
    }

    async fn find_single_staff_by_username(&self, username: &str) -> Result<Option<Staff>> {
        let staff = sqlx::query_as::<_, PostgresStaff>(
            r"
            SELECT username, created_at
            FROM staff
            WHERE username = $1
            LIMIT 1
            ",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(staff.map(PostgresStaff::into_staff))
    }

    async fn create_staff(&self, username: &str) -> Result<Staff> {
        let staff = sqlx::query_as::<_, PostgresStaff>(
            r"
            INSERT INTO staff (username, created_at)
            VALUES ($1, $2)
            RETURNING username, created_at
            ",
        )
        .bind(username)
        .bind(now())
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(staff.into_staff())
    }

    async fn count_staff(&self) -> Result<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        usize::try_from(count).map_err(connection_error)
    }

    async fn find_unexpired_announcements(&self, today: NaiveDate) -> Result<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, PostgresAnnouncement>(
            r"
            SELECT *
            FROM announcements
            WHERE is_active = TRUE
                AND end_date >= $1
            ",
        )
        .bind(today)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(PostgresAnnouncement::into_announcement_multiple(
            announcements,
        ))
    }

    async fn find_all_announcements(&self) -> Result<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, PostgresAnnouncement>(
            r"
            SELECT *
            FROM announcements
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(PostgresAnnouncement::into_announcement_multiple(
            announcements,
        ))
    }

    async fn find_single_announcement_by_id(
        &self,
        id: &AnnouncementId,
    ) -> Result<Option<Announcement>> {
        let Some(id) = to_uuid(id) else {
            return Ok(None);
        };

        let announcement = sqlx::query_as::<_, PostgresAnnouncement>(
            r"
            SELECT *
            FROM announcements
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(announcement.map(PostgresAnnouncement::into_announcement))
    }

    async fn create_announcement(
        &self,
        values: &CreateAnnouncementValues<'_>,
    ) -> Result<AnnouncementId> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r"
            INSERT INTO announcements
                (id, title, message, priority, start_date, end_date, is_active, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.title)
        .bind(values.message)
        .bind(values.priority)
        .bind(values.start_date)
        .bind(values.end_date)
        .bind(values.is_active)
        .bind(&values.staff.username)
        .bind(now())
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(AnnouncementId::new(id))
    }

    async fn update_announcement(
        &self,
        id: &AnnouncementId,
        values: &UpdateAnnouncementValues<'_>,
    ) -> Result<u64> {
        let Some(id) = to_uuid(id) else {
            return Ok(0);
        };

        // rows where every given value is already set are left alone
        let result = sqlx::query(
            r"
            UPDATE announcements
            SET
                title = COALESCE($2, title),
                message = COALESCE($3, message),
                priority = COALESCE($4, priority),
                start_date = CASE WHEN $5 THEN $6 ELSE start_date END,
                end_date = COALESCE($7, end_date),
                is_active = COALESCE($8, is_active)
            WHERE id = $1
                AND (
                    ($2::TEXT IS NOT NULL AND title IS DISTINCT FROM $2)
                    OR ($3::TEXT IS NOT NULL AND message IS DISTINCT FROM $3)
                    OR ($4::TEXT IS NOT NULL AND priority IS DISTINCT FROM $4)
                    OR ($5 AND start_date IS DISTINCT FROM $6::DATE)
                    OR ($7::DATE IS NOT NULL AND end_date IS DISTINCT FROM $7)
                    OR ($8::BOOLEAN IS NOT NULL AND is_active IS DISTINCT FROM $8)
                )
            ",
        )
        .bind(id)
        .bind(values.title)
        .bind(values.message)
        .bind(values.priority)
        .bind(values.start_date.is_some())
        .bind(values.start_date.flatten())
        .bind(values.end_date)
        .bind(values.is_active)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_announcement(&self, id: &AnnouncementId) -> Result<u64> {
        let Some(id) = to_uuid(id) else {
            return Ok(0);
        };

        let result = sqlx::query(
            r"
            DELETE FROM announcements
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(result.rows_affected())
    }
}

fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
