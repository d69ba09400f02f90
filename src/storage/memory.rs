//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::announcements::Announcement;
use crate::announcements::AnnouncementId;
use crate::announcements::now;
use crate::staff::Staff;

use super::CreateAnnouncementValues;
use super::Result;
use super::Storage;
use super::UpdateAnnouncementValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All staff members, by username
    staff: Arc<Mutex<HashMap<String, Staff>>>,

    /// All announcements in storage
    announcements: Arc<Mutex<HashMap<Uuid, Announcement>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

/// Set `field` to `value`, tell if anything changed
fn replace<T>(field: &mut T, value: T) -> bool
where
    T: PartialEq,
{
    if *field == value {
        false
    } else {
        *field = value;
        true
    }
}

impl Storage for Memory {
    fn parse_announcement_id(&self, id: &str) -> Option<AnnouncementId> {
        Uuid::parse_str(id).ok().map(AnnouncementId::new)
    }

    async fn find_single_staff_by_username(&self, username: &str) -> Result<Option<Staff>> {
        Ok(self.staff.lock().await.get(username).cloned())
    }

    async fn create_staff(&self, username: &str) -> Result<Staff> {
        let staff = Staff {
            username: username.to_string(),
            created_at: now(),
        };

        self.staff
            .lock()
            .await
            .insert(staff.username.clone(), staff.clone());

        Ok(staff)
    }

    async fn count_staff(&self) -> Result<usize> {
        Ok(self.staff.lock().await.len())
    }

    async fn find_unexpired_announcements(&self, today: NaiveDate) -> Result<Vec<Announcement>> {
        Ok(self
            .announcements
            .lock()
            .await
            .values()
            .filter(|announcement| announcement.is_active && announcement.end_date >= today)
            .cloned()
            .collect())
    }

    async fn find_all_announcements(&self) -> Result<Vec<Announcement>> {
        let mut announcements = self
            .announcements
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();

        announcements.sort_by(crate::announcements::newest_first);

        Ok(announcements)
    }

    async fn find_single_announcement_by_id(
        &self,
        id: &AnnouncementId,
    ) -> Result<Option<Announcement>> {
        let Ok(id) = Uuid::parse_str(id.as_str()) else {
            return Ok(None);
        };

        Ok(self.announcements.lock().await.get(&id).cloned())
    }

    async fn create_announcement(
        &self,
        values: &CreateAnnouncementValues<'_>,
    ) -> Result<AnnouncementId> {
        let id = Uuid::new_v4();

        let announcement = Announcement {
            id: AnnouncementId::new(id),
            title: values.title.to_string(),
            message: values.message.to_string(),
            priority: values.priority.to_string(),
            start_date: values.start_date,
            end_date: values.end_date,
            is_active: values.is_active,
            created_by: values.staff.username.clone(),
            created_at: now(),
        };

        let announcement_id = announcement.id.clone();

        self.announcements.lock().await.insert(id, announcement);

        Ok(announcement_id)
    }

    async fn update_announcement(
        &self,
        id: &AnnouncementId,
        values: &UpdateAnnouncementValues<'_>,
    ) -> Result<u64> {
        let Ok(id) = Uuid::parse_str(id.as_str()) else {
            return Ok(0);
        };

        let mut announcements = self.announcements.lock().await;

        let Some(announcement) = announcements.get_mut(&id) else {
            return Ok(0);
        };

        let mut modified = false;

        if let Some(title) = values.title {
            modified |= replace(&mut announcement.title, title.to_string());
        }

        if let Some(message) = values.message {
            modified |= replace(&mut announcement.message, message.to_string());
        }

        if let Some(priority) = values.priority {
            modified |= replace(&mut announcement.priority, priority.to_string());
        }

        if let Some(start_date) = values.start_date {
            modified |= replace(&mut announcement.start_date, start_date);
        }

        if let Some(end_date) = values.end_date {
            modified |= replace(&mut announcement.end_date, end_date);
        }

        if let Some(is_active) = values.is_active {
            modified |= replace(&mut announcement.is_active, is_active);
        }

        Ok(u64::from(modified))
    }

    async fn delete_announcement(&self, id: &AnnouncementId) -> Result<u64> {
        let Ok(id) = Uuid::parse_str(id.as_str()) else {
            return Ok(0);
        };

        Ok(u64::from(
            self.announcements.lock().await.remove(&id).is_some(),
        ))
    }
}
