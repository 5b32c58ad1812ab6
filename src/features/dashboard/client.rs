//! Dashboard counts, read from the `totalElements` of one-item list pages.

use crate::{
    client::{AppError, Gateway, ListQuery, Page},
    features::dashboard::types::DashboardStats,
};
use serde::de::IgnoredAny;

pub const LOAD_FAILED: &str = "Failed to load dashboard statistics";

/// # Errors
/// Returns the first gateway error.
pub async fn fetch_stats(gateway: &Gateway) -> Result<DashboardStats, AppError> {
    let one_item = ListQuery::with_size(1);
    let users_path = one_item.to_path("/users");
    let roles_path = one_item.to_path("/roles");

    let (users, roles) = tokio::try_join!(
        gateway.get::<Page<IgnoredAny>>(&users_path),
        gateway.get::<Page<IgnoredAny>>(&roles_path),
    )?;

    Ok(DashboardStats {
        total_users: users.total_elements,
        active_roles: roles.total_elements,
    })
}
