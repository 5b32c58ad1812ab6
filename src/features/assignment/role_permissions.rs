use crate::{
    client::{AppError, Gateway, ListQuery},
    features::{
        permissions::{self, types::Permission},
        roles::{self, state::ensure_not_system, types::Role},
    },
};
use tracing::info;

pub const LOAD_FAILED: &str = "Failed to load permissions";
pub const SAVE_FAILED: &str = "Failed to update permissions";

/// Checklist of a role's permissions. Toggles only touch the local selection;
/// `save` sends the whole selection as the new set.
#[derive(Clone, Debug)]
pub struct RolePermissionEditor {
    role: Role,
    catalog: Vec<Permission>,
    selected: Vec<String>,
}

impl RolePermissionEditor {
    /// Loads the permission catalog and the role's current permission ids.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for system roles, without any request,
    /// or the gateway error.
    pub async fn open(gateway: &Gateway, role: Role) -> Result<Self, AppError> {
        ensure_not_system(&role)?;

        let catalog = permissions::client::list_permissions(gateway, &ListQuery::default())
            .await?
            .content;
        let selected = roles::client::role_permission_ids(gateway, &role.id).await?;

        Ok(Self {
            role,
            catalog,
            selected,
        })
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn catalog(&self) -> &[Permission] {
        &self.catalog
    }

    /// Selected permission ids in selection order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, permission_id: &str) -> bool {
        self.selected.iter().any(|id| id == permission_id)
    }

    /// Removes `permission_id` if selected, appends it otherwise. Returns the
    /// new membership.
    pub fn toggle(&mut self, permission_id: &str) -> bool {
        if let Some(position) = self.selected.iter().position(|id| id == permission_id) {
            self.selected.remove(position);
            false
        } else {
            self.selected.push(permission_id.to_string());
            true
        }
    }

    /// Replaces the role's permissions with the current selection. The
    /// selection is kept as-is when the request fails.
    ///
    /// # Errors
    /// Returns the gateway error.
    pub async fn save(&self, gateway: &Gateway) -> Result<(), AppError> {
        roles::client::replace_role_permissions(gateway, &self.role.id, &self.selected).await?;
        info!(role_id = %self.role.id, count = self.selected.len(), "role permissions replaced");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::RolePermissionEditor;
    use crate::client::AppError;
    use crate::features::roles::types::Role;
    use crate::test_support::{can_bind_localhost, gateway_for};
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn role(system: bool) -> Role {
        serde_json::from_value(json!({
            "id": "r-7",
            "name": if system { "SUPER_ADMIN" } else { "Support" },
            "system": system,
            "priority": 40
        }))
        .unwrap()
    }

    async fn mount_catalog(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/permissions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "content": [
                        { "id": "A", "name": "users:read", "action": "READ" },
                        { "id": "B", "name": "users:update", "action": "UPDATE" },
                        { "id": "C", "name": "users:delete", "action": "DELETE" }
                    ],
                    "totalElements": 3
                }
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn toggle_removes_or_appends_in_order() {
        let mut editor = RolePermissionEditor {
            role: role(false),
            catalog: Vec::new(),
            selected: vec!["A".to_string(), "B".to_string()],
        };
        assert!(!editor.toggle("A"));
        assert!(editor.toggle("C"));
        assert!(editor.toggle("A"));
        assert_eq!(editor.selected(), ["B", "C", "A"]);
        assert!(editor.is_selected("C"));
    }

    #[tokio::test]
    async fn save_keeps_selection_when_rejected() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        Mock::given(method("GET"))
            .and(path("/roles/r-7/permissions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ["A"] })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/roles/r-7/permissions"))
            .and(body_json(json!(["A", "B"])))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "Permission B is retired" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        let mut editor = RolePermissionEditor::open(&gateway, role(false)).await?;
        assert_eq!(editor.catalog().len(), 3);
        editor.toggle("B");

        let err = editor.save(&gateway).await.unwrap_err();
        assert_eq!(
            err.user_message(super::SAVE_FAILED),
            "Permission B is retired"
        );
        assert_eq!(editor.selected(), ["A", "B"]);
        Ok(())
    }

    #[tokio::test]
    async fn system_role_is_refused_before_any_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        let result = RolePermissionEditor::open(&gateway, role(true)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        Ok(())
    }
}
