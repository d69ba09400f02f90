use axum::Extension;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;

use crate::announcements::Announcement;
use crate::announcements::AnnouncementId;
use crate::announcements::DEFAULT_PRIORITY;
use crate::announcements::displayable;
use crate::announcements::parse_date;
use crate::announcements::today;
use crate::staff::Staff;
use crate::storage::CreateAnnouncementValues;
use crate::storage::Storage;
use crate::storage::UpdateAnnouncementValues;

use super::Confirmation;
use super::CurrentStaff;
use super::Error;
use super::Form;
use super::Patch;
use super::PathParameters;
use super::Success;

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl AnnouncementResponse {
    fn from_announcement(announcement: Announcement) -> Self {
        Self {
            id: announcement.id.to_string(),
            title: announcement.title,
            message: announcement.message,
            priority: announcement.priority,
            start_date: announcement.start_date,
            end_date: announcement.end_date,
            is_active: announcement.is_active,
            created_by: announcement.created_by,
            created_at: announcement.created_at,
        }
    }

    fn from_announcement_multiple(announcements: Vec<Announcement>) -> Vec<Self> {
        announcements
            .into_iter()
            .map(Self::from_announcement)
            .collect()
    }
}

/// Announcements to show right now, public
pub async fn list_active<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<AnnouncementResponse>>, Error> {
    let today = today();

    let announcements = storage
        .find_unexpired_announcements(today)
        .await
        .map_err(|err| {
            tracing::error!("Could not load active announcements: {err}");

            Error::internal_server_error("Failed to load announcements")
        })?;

    Ok(Success::ok(AnnouncementResponse::from_announcement_multiple(
        displayable(announcements, today),
    )))
}

/// All announcements, for managing them
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    _current_staff: CurrentStaff<S>,
) -> Result<Success<Vec<AnnouncementResponse>>, Error> {
    let announcements = storage.find_all_announcements().await.map_err(|err| {
        tracing::error!("Could not load announcements: {err}");

        Error::internal_server_error("Failed to load announcements")
    })?;

    Ok(Success::ok(AnnouncementResponse::from_announcement_multiple(
        announcements,
    )))
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementForm {
    title: String,
    message: String,
    priority: Option<String>,
    start_date: Option<String>,
    end_date: String,
    is_active: Option<bool>,
}

pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    current_staff: CurrentStaff<S>,
    Form(form): Form<CreateAnnouncementForm>,
) -> Result<Success<Confirmation>, Error> {
    let invalid_date = || Error::bad_request("Invalid date format. Use YYYY-MM-DD");

    // an empty start date is the same as no start date
    let start_date = match form.start_date.as_deref() {
        None | Some("") => None,
        Some(start_date) => Some(parse_date(start_date).ok_or_else(invalid_date)?),
    };

    let end_date = parse_date(&form.end_date).ok_or_else(invalid_date)?;

    let values = CreateAnnouncementValues {
        staff: &current_staff,
        title: &form.title,
        message: &form.message,
        priority: form.priority.as_deref().unwrap_or(DEFAULT_PRIORITY),
        start_date,
        end_date,
        is_active: form.is_active.unwrap_or(true),
    };

    let id = storage.create_announcement(&values).await.map_err(|err| {
        tracing::error!("Could not create announcement: {err}");

        Error::internal_server_error("Failed to create announcement")
    })?;

    tracing::info!(
        "Announcement {id} created by {}",
        current_staff.username
    );

    Ok(Success::ok(Confirmation::with_id(
        "Announcement created successfully",
        id,
    )))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAnnouncementForm {
    #[serde(default)]
    title: Patch<String>,

    #[serde(default)]
    message: Patch<String>,

    #[serde(default)]
    priority: Patch<String>,

    #[serde(default)]
    start_date: Patch<String>,

    #[serde(default)]
    end_date: Patch<String>,

    #[serde(default)]
    is_active: Patch<bool>,
}

pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_staff: CurrentStaff<S>,
    PathParameters(announcement_id): PathParameters<String>,
    Form(form): Form<UpdateAnnouncementForm>,
) -> Result<Success<Confirmation>, Error> {
    update_announcement(&storage, &current_staff, &announcement_id, form).await
}

/// `/announcements/active` is not an announcement, handled like any other unknown ID
pub async fn update_active<S: Storage>(
    Extension(storage): Extension<S>,
    current_staff: CurrentStaff<S>,
    Form(form): Form<UpdateAnnouncementForm>,
) -> Result<Success<Confirmation>, Error> {
    update_announcement(&storage, &current_staff, "active", form).await
}

async fn update_announcement<S: Storage>(
    storage: &S,
    current_staff: &Staff,
    announcement_id: &str,
    form: UpdateAnnouncementForm,
) -> Result<Success<Confirmation>, Error> {
    let announcement = get_announcement(storage, announcement_id).await?;

    // an empty start date removes it, an end date is always required
    let start_date = match form.start_date.value().map(String::as_str) {
        None => None,
        Some("") => Some(None),
        Some(start_date) => Some(Some(parse_date_field("start_date", start_date)?)),
    };

    let end_date = form
        .end_date
        .value()
        .map(|end_date| parse_date_field("end_date", end_date))
        .transpose()?;

    let values = UpdateAnnouncementValues {
        title: form.title.value().map(String::as_str),
        message: form.message.value().map(String::as_str),
        priority: form.priority.value().map(String::as_str),
        start_date,
        end_date,
        is_active: form.is_active.value().copied(),
    };

    if values.is_empty() {
        return Err(Error::bad_request("No valid fields to update"));
    }

    let modified = storage
        .update_announcement(&announcement.id, &values)
        .await
        .map_err(|err| {
            tracing::error!("Could not update announcement {}: {err}", announcement.id);

            Error::internal_server_error("Failed to update announcement")
        })?;

    // unchanged values can not be told apart from a failed update
    if modified == 0 {
        tracing::debug!("Announcement {} not modified", announcement.id);

        return Err(Error::internal_server_error("Failed to update announcement"));
    }

    tracing::info!(
        "Announcement {} updated by {}",
        announcement.id,
        current_staff.username
    );

    Ok(Success::ok(Confirmation::new(
        "Announcement updated successfully",
    )))
}

pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    current_staff: CurrentStaff<S>,
    PathParameters(announcement_id): PathParameters<String>,
) -> Result<Success<Confirmation>, Error> {
    delete_announcement(&storage, &current_staff, &announcement_id).await
}

/// `/announcements/active` is not an announcement, handled like any other unknown ID
pub async fn delete_active<S: Storage>(
    Extension(storage): Extension<S>,
    current_staff: CurrentStaff<S>,
) -> Result<Success<Confirmation>, Error> {
    delete_announcement(&storage, &current_staff, "active").await
}

async fn delete_announcement<S: Storage>(
    storage: &S,
    current_staff: &Staff,
    announcement_id: &str,
) -> Result<Success<Confirmation>, Error> {
    let announcement_id = parse_announcement_id(storage, announcement_id)?;

    let deleted = storage
        .delete_announcement(&announcement_id)
        .await
        .map_err(|err| {
            tracing::error!("Could not delete announcement {announcement_id}: {err}");

            Error::internal_server_error("Failed to delete announcement")
        })?;

    if deleted == 0 {
        return Err(Error::not_found("Announcement not found"));
    }

    tracing::info!(
        "Announcement {announcement_id} deleted by {}",
        current_staff.username
    );

    Ok(Success::ok(Confirmation::new(
        "Announcement deleted successfully",
    )))
}

fn parse_announcement_id<S: Storage>(
    storage: &S,
    announcement_id: &str,
) -> Result<AnnouncementId, Error> {
    storage
        .parse_announcement_id(announcement_id)
        .ok_or_else(|| Error::bad_request("Invalid announcement ID"))
}

fn parse_date_field(field: &str, date: &str) -> Result<NaiveDate, Error> {
    parse_date(date)
        .ok_or_else(|| Error::bad_request(format!("Invalid {field} format. Use YYYY-MM-DD")))
}

async fn get_announcement<S: Storage>(
    storage: &S,
    announcement_id: &str,
) -> Result<Announcement, Error> {
    let announcement_id = parse_announcement_id(storage, announcement_id)?;

    storage
        .find_single_announcement_by_id(&announcement_id)
        .await
        .map_err(|err| {
            tracing::error!("Could not load announcement {announcement_id}: {err}");

            Error::internal_server_error("Failed to load announcement")
        })?
        .map_or_else(|| Err(Error::not_found("Announcement not found")), Ok)
}
