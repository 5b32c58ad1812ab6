//! Client helpers for permission endpoints.

use crate::{
    client::{AppError, Gateway, ListQuery, Page},
    features::{
        permissions::types::{CreatePermissionRequest, NewPermission, Permission},
        path_id,
    },
};

/// Fetches one page of the permission catalog.
pub async fn list_permissions(
    gateway: &Gateway,
    query: &ListQuery,
) -> Result<Page<Permission>, AppError> {
    gateway.get(&query.to_path("/permissions")).await
}

pub async fn create_permission(gateway: &Gateway, permission: &NewPermission) -> Result<(), AppError> {
    gateway
        .post_discard(
            "/permissions",
            &CreatePermissionRequest::from_form(permission),
        )
        .await
}

pub async fn delete_permission(gateway: &Gateway, id: &str) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway.delete(&format!("/permissions/{id}")).await
}
