//! Client helpers for role endpoints, including the bulk role-permission
//! contract (read ids, replace the whole set).

use crate::{
    client::{AppError, Gateway, ListQuery, Page},
    features::{
        path_id,
        roles::types::{NewRole, Role, RoleChanges, RoleRequest},
    },
};
use serde::Deserialize;

/// One entry of `GET /roles/{id}/permissions`. Backends return either bare
/// ids or full permission objects; both reduce to the id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PermissionRef {
    Id(String),
    Object { id: String },
}

impl PermissionRef {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

pub async fn list_roles(gateway: &Gateway, query: &ListQuery) -> Result<Page<Role>, AppError> {
    gateway.get(&query.to_path("/roles")).await
}

pub async fn create_role(gateway: &Gateway, role: &NewRole) -> Result<(), AppError> {
    let body = RoleRequest {
        name: role.name.trim(),
        description: role.description.trim(),
        priority: role.priority,
    };
    gateway.post_discard("/roles", &body).await
}

pub async fn update_role(gateway: &Gateway, id: &str, changes: &RoleChanges) -> Result<(), AppError> {
    let id = path_id(id)?;
    let body = RoleRequest {
        name: changes.name.trim(),
        description: changes.description.trim(),
        priority: changes.priority,
    };
    gateway.put_discard(&format!("/roles/{id}"), &body).await
}

pub async fn delete_role(gateway: &Gateway, id: &str) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway.delete(&format!("/roles/{id}")).await
}

/// Ids of the permissions currently granted to the role, in server order.
pub async fn role_permission_ids(gateway: &Gateway, id: &str) -> Result<Vec<String>, AppError> {
    let id = path_id(id)?;
    let refs: Option<Vec<PermissionRef>> = gateway.get(&format!("/roles/{id}/permissions")).await?;
    Ok(refs
        .unwrap_or_default()
        .into_iter()
        .map(PermissionRef::into_id)
        .collect())
}

/// Replaces the role's permission set with exactly `permission_ids`.
pub async fn replace_role_permissions(
    gateway: &Gateway,
    id: &str,
    permission_ids: &[String],
) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway
        .put_discard(&format!("/roles/{id}/permissions"), permission_ids)
        .await
}
