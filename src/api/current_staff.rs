//! Current staff service
//!
//! Get the current staff member from the request based on the `teacher_username`
//! query parameter. The username is only looked up, nothing else is verified.

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::extract::Query;
use axum::http::request::Parts;
use serde::Deserialize;

use crate::api::Error;
use crate::staff::Staff;
use crate::storage::Storage;

/// Query parameters identifying the staff member
#[derive(Debug, Deserialize)]
struct StaffQuery {
    teacher_username: Option<String>,
}

/// Current staff service
#[derive(Clone)]
pub struct CurrentStaff<S: Storage> {
    /// The actual staff member
    staff: Arc<Staff>,

    storage: PhantomData<S>,
}

impl<S: Storage> CurrentStaff<S> {
    /// Create the current staff from a staff member
    fn new(staff: Staff) -> Self {
        Self {
            staff: Arc::new(staff),
            storage: PhantomData,
        }
    }
}

impl<S: Storage> Deref for CurrentStaff<S> {
    type Target = Staff;

    fn deref(&self) -> &Self::Target {
        &self.staff
    }
}

impl<S, B> FromRequestParts<B> for CurrentStaff<S>
where
    S: Storage,
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &B) -> Result<Self, Self::Rejection> {
        // a query string that does not parse does not identify anyone either
        let username = parts
            .extract::<Query<StaffQuery>>()
            .await
            .ok()
            .and_then(|Query(query)| query.teacher_username)
            .filter(|username| !username.is_empty());

        let Some(username) = username else {
            tracing::debug!("Missing `teacher_username`");

            return Err(Error::unauthorized("Authentication required for this action"));
        };

        let Extension(storage) = parts
            .extract::<Extension<S>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get storage"))?;

        let staff = storage
            .find_single_staff_by_username(&username)
            .await
            .map_err(|err| {
                tracing::error!("Could not look up staff member {username}: {err}");

                Error::internal_server_error("Failed to look up staff member")
            })?;

        if let Some(staff) = staff {
            Ok(CurrentStaff::new(staff))
        } else {
            tracing::debug!("Unknown staff member: {username}");

            Err(Error::unauthorized("Invalid teacher credentials"))
        }
    }
}
