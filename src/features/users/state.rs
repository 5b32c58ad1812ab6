//! Users screen model: the last fetched list plus the search and status
//! filters. Every accepted mutation is followed by a full re-fetch; nothing is
//! patched locally.

use crate::{
    client::{AppError, Gateway, ListQuery},
    features::{
        Committed,
        users::{
            client,
            types::{NewUser, UserChanges, UserStatus, UserSummary},
        },
    },
};
use secrecy::ExposeSecret;
use tracing::info;

pub const LOAD_FAILED: &str = "Failed to load users";
pub const CREATE_FAILED: &str = "Failed to create user";
pub const UPDATE_FAILED: &str = "Failed to update user";
pub const DELETE_FAILED: &str = "Failed to delete user";
pub const STATUS_FAILED: &str = "Failed to update user status";

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

#[derive(Clone, Debug, Default)]
pub struct UsersScreen {
    users: Vec<UserSummary>,
    search: String,
    status_filter: Option<UserStatus>,
}

impl UsersScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    /// Takes a list fetched elsewhere, e.g. by a role assignment.
    pub fn replace_users(&mut self, users: Vec<UserSummary>) {
        self.users = users;
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    pub fn set_status_filter(&mut self, status: Option<UserStatus>) {
        self.status_filter = status;
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&UserSummary> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Users matching the search text (username or email) and status filter.
    #[must_use]
    pub fn filtered(&self) -> Vec<&UserSummary> {
        self.users
            .iter()
            .filter(|user| {
                self.search.is_empty()
                    || user.username.to_lowercase().contains(&self.search)
                    || user.email.to_lowercase().contains(&self.search)
            })
            .filter(|user| self.status_filter.is_none_or(|status| user.status == status))
            .collect()
    }

    /// Replaces the local list with the first page from the server.
    ///
    /// # Errors
    /// Returns the gateway error; the previous list is kept.
    pub async fn refresh(&mut self, gateway: &Gateway) -> Result<(), AppError> {
        let page = client::list_users(gateway, &ListQuery::default()).await?;
        self.users = page.content;
        Ok(())
    }

    /// # Errors
    /// Returns `AppError::Validation` without a request when the form is
    /// incomplete, otherwise the gateway error of the create itself.
    pub async fn create(&mut self, gateway: &Gateway, user: NewUser) -> Result<Committed, AppError> {
        validate_new_user(&user)?;
        client::create_user(gateway, &user).await?;
        info!(username = %user.username.trim(), "user created");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// # Errors
    /// Returns `AppError::Validation` for incomplete changes, otherwise the
    /// gateway error.
    pub async fn update(
        &mut self,
        gateway: &Gateway,
        id: &str,
        changes: &UserChanges,
    ) -> Result<Committed, AppError> {
        validate_identity_fields(&changes.username, &changes.email)?;
        client::update_user(gateway, id, changes).await?;
        info!(user_id = %id, "user updated");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// # Errors
    /// Returns the gateway error of the delete itself.
    pub async fn delete(&mut self, gateway: &Gateway, id: &str) -> Result<Committed, AppError> {
        client::delete_user(gateway, id).await?;
        info!(user_id = %id, "user deleted");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// Deactivates an active user and activates any other, then refreshes.
    /// Returns the status the user was moved towards.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the user is not in the current list,
    /// otherwise the gateway error.
    pub async fn toggle_status(
        &mut self,
        gateway: &Gateway,
        id: &str,
    ) -> Result<(UserStatus, Committed), AppError> {
        let current = self
            .find(id.trim())
            .map(|user| user.status)
            .ok_or_else(|| AppError::Validation("User not found in the current list.".to_string()))?;

        let target = if current == UserStatus::Active {
            client::deactivate_user(gateway, id).await?;
            UserStatus::Inactive
        } else {
            client::activate_user(gateway, id).await?;
            UserStatus::Active
        };
        info!(user_id = %id, status = %target, "user status changed");

        Ok((target, Committed::new(self.refresh(gateway).await)))
    }
}

fn validate_new_user(user: &NewUser) -> Result<(), AppError> {
    validate_identity_fields(&user.username, &user.email)?;
    if user.password.expose_secret().chars().count() < PASSWORD_MIN {
        return Err(AppError::Validation(format!(
            "Password must be at least {PASSWORD_MIN} characters."
        )));
    }
    Ok(())
}

fn validate_identity_fields(username: &str, email: &str) -> Result<(), AppError> {
    let length = username.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
        return Err(AppError::Validation(format!(
            "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters."
        )));
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required.".to_string(),
        ));
    }
    Ok(())
}
