//! Announcements and the rules for displaying them

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Format of every date stored on an announcement
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Priority used when none is provided
pub const DEFAULT_PRIORITY: &str = "medium";

/// Opaque identifier of an announcement
///
/// The storage decides what a valid identifier looks like, see
/// [`Storage::parse_announcement_id`](crate::storage::Storage::parse_announcement_id)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnouncementId(String);

impl AnnouncementId {
    pub fn new<I>(id: I) -> Self
    where
        I: ToString,
    {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Known priorities, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Interpret a stored priority
    ///
    /// Priorities are not validated on write, anything unknown ranks as medium
    pub fn from_stored(priority: &str) -> Self {
        match priority {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl Announcement {
    /// Should the announcement be shown on the given day
    ///
    /// Active, not yet expired and already started; a missing start date means it
    /// has always been started
    pub fn is_displayable_on(&self, today: NaiveDate) -> bool {
        self.is_active
            && self.end_date >= today
            && self.start_date.is_none_or(|start_date| start_date <= today)
    }

    pub fn priority(&self) -> Priority {
        Priority::from_stored(&self.priority)
    }
}

/// Order for displaying: highest priority first, oldest first within a priority
pub fn display_order(a: &Announcement, b: &Announcement) -> Ordering {
    a.priority()
        .rank()
        .cmp(&b.priority().rank())
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Order for managing: newest first
pub fn newest_first(a: &Announcement, b: &Announcement) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Keep the announcements to display today, in display order
pub fn displayable(announcements: Vec<Announcement>, today: NaiveDate) -> Vec<Announcement> {
    let mut announcements = announcements
        .into_iter()
        .filter(|announcement| announcement.is_displayable_on(today))
        .collect::<Vec<_>>();

    announcements.sort_by(display_order);

    announcements
}

/// Parse a `YYYY-MM-DD` date
///
/// Only the canonical, zero-padded form is accepted so stored dates keep
/// sorting chronologically
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;

    (parsed.format(DATE_FORMAT).to_string() == date).then_some(parsed)
}

/// The current day, according to the server
pub fn today() -> NaiveDate {
    now().date()
}

/// The current time, according to the server
///
/// Same clock as [`today`], used for every creation timestamp
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
