//! All things related to the storage of announcements and staff

use std::future::Future;

use chrono::NaiveDate;
use thiserror::Error;

use crate::announcements::Announcement;
use crate::announcements::AnnouncementId;
use crate::staff::Staff;

#[cfg(not(feature = "postgres"))]
pub use memory::Memory;
#[cfg(feature = "postgres")]
pub use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> anyhow::Result<Memory> {
    Ok(Memory::new())
}

/// Setup the storage
///
/// Uses the `DATABASE_URL` environment variable, migrations will be run
#[cfg(feature = "postgres")]
pub async fn setup() -> anyhow::Result<Postgres> {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create an Announcement
pub struct CreateAnnouncementValues<'a> {
    /// Staff member creating the announcement
    pub staff: &'a Staff,

    pub title: &'a str,

    pub message: &'a str,

    /// Stored as given, not limited to the known priorities
    pub priority: &'a str,

    pub start_date: Option<NaiveDate>,

    pub end_date: NaiveDate,

    pub is_active: bool,
}

/// Values to update an Announcement
///
/// Only the fields with a value will be changed
#[derive(Debug, Default)]
pub struct UpdateAnnouncementValues<'a> {
    pub title: Option<&'a str>,

    pub message: Option<&'a str>,

    pub priority: Option<&'a str>,

    /// `Some(None)` removes the start date
    pub start_date: Option<Option<NaiveDate>>,

    pub end_date: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

impl UpdateAnnouncementValues<'_> {
    /// Nothing would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.message.is_none()
            && self.priority.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_active.is_none()
    }
}

/// Storage with all supported operations
pub trait Storage: Clone + Send + Sync + 'static {
    /// Check if the identifier could belong to an announcement in this storage
    ///
    /// Does not check if the announcement exists
    fn parse_announcement_id(&self, id: &str) -> Option<AnnouncementId>;

    /// Find a single staff member by username
    fn find_single_staff_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Staff>>> + Send;

    /// Add a staff member
    fn create_staff(&self, username: &str) -> impl Future<Output = Result<Staff>> + Send;

    /// Count all staff members
    fn count_staff(&self) -> impl Future<Output = Result<usize>> + Send;

    /// Find all active announcements that did not end before `today`
    ///
    /// The start date is not considered, in no particular order
    fn find_unexpired_announcements(
        &self,
        today: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Announcement>>> + Send;

    /// Find all announcements, newest first
    fn find_all_announcements(&self) -> impl Future<Output = Result<Vec<Announcement>>> + Send;

    /// Find a single announcement by ID
    fn find_single_announcement_by_id(
        &self,
        id: &AnnouncementId,
    ) -> impl Future<Output = Result<Option<Announcement>>> + Send;

    /// Create an announcement, returns the new ID
    fn create_announcement(
        &self,
        values: &CreateAnnouncementValues<'_>,
    ) -> impl Future<Output = Result<AnnouncementId>> + Send;

    /// Update an announcement
    ///
    /// Returns the number of announcements actually modified, setting values equal to
    /// the current ones does not count as a modification
    fn update_announcement(
        &self,
        id: &AnnouncementId,
        values: &UpdateAnnouncementValues<'_>,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Delete an announcement, returns the number of deleted announcements
    fn delete_announcement(&self, id: &AnnouncementId) -> impl Future<Output = Result<u64>> + Send;
}
