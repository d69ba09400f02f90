mod announcement_update;
mod announcements;
mod invalid_json;
