use anyhow::Result;
use chrono::naive::NaiveDateTime;

use crate::storage::Storage;
use crate::utils::env_var_list;

/// A staff member allowed to manage announcements
#[derive(Clone, Debug)]
pub struct Staff {
    pub username: String,
    pub created_at: NaiveDateTime,
}

/// Make sure every staff member from `INITIAL_STAFF` exists
pub async fn ensure_initial_staff<S: Storage>(storage: &S) -> Result<()> {
    for username in env_var_list("INITIAL_STAFF") {
        if storage
            .find_single_staff_by_username(&username)
            .await?
            .is_none()
        {
            let staff = storage.create_staff(&username).await?;

            tracing::info!(
                "Added staff member: {} at {}",
                staff.username,
                staff.created_at
            );
        }
    }

    if storage.count_staff().await? == 0 {
        tracing::warn!(
            "No staff members available, set `INITIAL_STAFF` to be able to manage announcements"
        );
    }

    Ok(())
}
