//! Roles screen model. System roles are protected here: update and delete on
//! a role flagged `system` fail locally and never reach the network.

use crate::{
    client::{AppError, Gateway, ListQuery},
    features::{
        Committed,
        roles::{
            client,
            types::{NewRole, PRIORITY_MAX, PRIORITY_MIN, Role, RoleChanges},
        },
    },
};
use tracing::info;

pub const LOAD_FAILED: &str = "Failed to load roles";
pub const CREATE_FAILED: &str = "Failed to create role";
pub const UPDATE_FAILED: &str = "Failed to update role";
pub const DELETE_FAILED: &str = "Failed to delete role";

const NAME_MAX: usize = 100;

#[derive(Clone, Debug, Default)]
pub struct RolesScreen {
    roles: Vec<Role>,
    search: String,
}

impl RolesScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == id)
    }

    #[must_use]
    pub fn filtered(&self) -> Vec<&Role> {
        self.roles
            .iter()
            .filter(|role| {
                self.search.is_empty()
                    || role.name.to_lowercase().contains(&self.search)
                    || role.description.to_lowercase().contains(&self.search)
            })
            .collect()
    }

    /// # Errors
    /// Returns the gateway error; the previous list is kept.
    pub async fn refresh(&mut self, gateway: &Gateway) -> Result<(), AppError> {
        let page = client::list_roles(gateway, &ListQuery::default()).await?;
        self.roles = page.content;
        Ok(())
    }

    /// # Errors
    /// Returns `AppError::Validation` for an invalid form, otherwise the
    /// gateway error.
    pub async fn create(&mut self, gateway: &Gateway, role: &NewRole) -> Result<Committed, AppError> {
        validate_role_fields(&role.name, role.priority)?;
        client::create_role(gateway, role).await?;
        info!(role = %role.name.trim(), "role created");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// # Errors
    /// Returns `AppError::Validation` for system roles, unknown roles or an
    /// invalid form, otherwise the gateway error.
    pub async fn update(
        &mut self,
        gateway: &Gateway,
        id: &str,
        changes: &RoleChanges,
    ) -> Result<Committed, AppError> {
        self.mutable_role(id)?;
        validate_role_fields(&changes.name, changes.priority)?;
        client::update_role(gateway, id, changes).await?;
        info!(role_id = %id, "role updated");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// # Errors
    /// Returns `AppError::Validation` for system or unknown roles, otherwise
    /// the gateway error.
    pub async fn delete(&mut self, gateway: &Gateway, id: &str) -> Result<Committed, AppError> {
        self.mutable_role(id)?;
        client::delete_role(gateway, id).await?;
        info!(role_id = %id, "role deleted");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// Looks up a role that may be changed.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the role is unknown or built-in.
    pub fn mutable_role(&self, id: &str) -> Result<&Role, AppError> {
        let role = self
            .find(id.trim())
            .ok_or_else(|| AppError::Validation("Role not found in the current list.".to_string()))?;
        ensure_not_system(role)?;
        Ok(role)
    }
}

/// # Errors
/// Returns `AppError::Validation` when `role` is a system role.
pub fn ensure_not_system(role: &Role) -> Result<(), AppError> {
    if role.system {
        Err(AppError::Validation(format!(
            "System role '{}' cannot be modified.",
            role.name
        )))
    } else {
        Ok(())
    }
}

fn validate_role_fields(name: &str, priority: u8) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Role name is required.".to_string()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(AppError::Validation(format!(
            "Role name must be at most {NAME_MAX} characters."
        )));
    }
    if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        return Err(AppError::Validation(format!(
            "Priority must be between {PRIORITY_MIN} and {PRIORITY_MAX}."
        )));
    }
    Ok(())
}
