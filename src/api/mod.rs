//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::put;

pub use current_staff::CurrentStaff;
pub use request::Form;
pub use request::Patch;
pub use request::PathParameters;
pub use response::Confirmation;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod announcements;
mod current_staff;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    Router::new()
        .route(
            "/announcements",
            get(announcements::list::<S>).post(announcements::create::<S>),
        )
        .route(
            "/announcements/active",
            get(announcements::list_active::<S>)
                .put(announcements::update_active::<S>)
                .delete(announcements::delete_active::<S>),
        )
        .route(
            "/announcements/{announcement}",
            put(announcements::update::<S>).delete(announcements::delete::<S>),
        )
}
