//! Client helpers for user endpoints. Paths live here so screens and editors
//! never format URLs themselves; authorization is enforced by the backend.

use crate::{
    client::{AppError, Gateway, ListQuery, Page},
    features::path_id,
    features::users::types::{
        AssignRoleRequest, CreateUserRequest, NewUser, UpdateUserRequest, UserChanges, UserSummary,
    },
};

/// Fetches one page of users.
pub async fn list_users(gateway: &Gateway, query: &ListQuery) -> Result<Page<UserSummary>, AppError> {
    gateway.get(&query.to_path("/users")).await
}

pub async fn create_user(gateway: &Gateway, user: &NewUser) -> Result<(), AppError> {
    gateway
        .post_discard("/users", &CreateUserRequest::from_form(user))
        .await
}

pub async fn update_user(gateway: &Gateway, id: &str, changes: &UserChanges) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway
        .put_discard(
            &format!("/users/{id}"),
            &UpdateUserRequest::from_changes(changes),
        )
        .await
}

pub async fn delete_user(gateway: &Gateway, id: &str) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway.delete(&format!("/users/{id}")).await
}

pub async fn activate_user(gateway: &Gateway, id: &str) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway.post_empty(&format!("/users/{id}/activate")).await
}

pub async fn deactivate_user(gateway: &Gateway, id: &str) -> Result<(), AppError> {
    let id = path_id(id)?;
    gateway.post_empty(&format!("/users/{id}/deactivate")).await
}

/// Grants one role to one user.
pub async fn assign_role(gateway: &Gateway, user_id: &str, role_id: &str) -> Result<(), AppError> {
    let user_id = path_id(user_id)?;
    path_id(role_id)?;
    gateway
        .post_discard(
            &format!("/users/{user_id}/roles"),
            &AssignRoleRequest {
                role_id: role_id.trim(),
            },
        )
        .await
}

/// Revokes one role from one user.
pub async fn remove_role(gateway: &Gateway, user_id: &str, role_id: &str) -> Result<(), AppError> {
    let user_id = path_id(user_id)?;
    let role_id = path_id(role_id)?;
    gateway
        .delete(&format!("/users/{user_id}/roles/{role_id}"))
        .await
}
