//! Permissions screen model. The search text is sent to the server on refresh
//! and also applied locally across name, action and resource.

use crate::{
    client::{AppError, Gateway, ListQuery},
    features::{
        Committed,
        permissions::{
            client,
            types::{NewPermission, Permission},
        },
    },
};
use tracing::info;

pub const LOAD_FAILED: &str = "Failed to load permissions";
pub const CREATE_FAILED: &str = "Failed to create permission";
pub const DELETE_FAILED: &str = "Failed to delete permission";

#[derive(Clone, Debug, Default)]
pub struct PermissionsScreen {
    permissions: Vec<Permission>,
    search: String,
}

impl PermissionsScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_string();
    }

    #[must_use]
    pub fn filtered(&self) -> Vec<&Permission> {
        let needle = self.search.to_lowercase();
        self.permissions
            .iter()
            .filter(|permission| {
                needle.is_empty()
                    || permission.name.to_lowercase().contains(&needle)
                    || permission.action.as_str().to_lowercase().contains(&needle)
                    || permission.resource.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// # Errors
    /// Returns the gateway error; the previous list is kept.
    pub async fn refresh(&mut self, gateway: &Gateway) -> Result<(), AppError> {
        let query = ListQuery::default().search(Some(self.search.as_str()));
        let page = client::list_permissions(gateway, &query).await?;
        self.permissions = page.content;
        Ok(())
    }

    /// # Errors
    /// Returns `AppError::Validation` when the name is blank, otherwise the
    /// gateway error.
    pub async fn create(
        &mut self,
        gateway: &Gateway,
        permission: &NewPermission,
    ) -> Result<Committed, AppError> {
        if permission.name.trim().is_empty() {
            return Err(AppError::Validation(
                "Permission name is required.".to_string(),
            ));
        }
        client::create_permission(gateway, permission).await?;
        info!(permission = %permission.name.trim(), action = %permission.action, "permission created");
        Ok(Committed::new(self.refresh(gateway).await))
    }

    /// # Errors
    /// Returns the gateway error.
    pub async fn delete(&mut self, gateway: &Gateway, id: &str) -> Result<Committed, AppError> {
        client::delete_permission(gateway, id).await?;
        info!(permission_id = %id, "permission deleted");
        Ok(Committed::new(self.refresh(gateway).await))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::PermissionsScreen;
    use crate::client::AppError;
    use crate::features::permissions::types::{NewPermission, PermissionAction};
    use crate::test_support::{can_bind_localhost, gateway_for};
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn refresh_sends_search_and_filters_locally() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/permissions"))
            .and(query_param("search", "users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "content": [
                        { "id": "p-1", "name": "users:read", "action": "READ", "resource": "users" },
                        { "id": "p-2", "name": "users:delete", "action": "DELETE", "resource": "users" }
                    ],
                    "totalElements": 2
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        let mut screen = PermissionsScreen::new();
        screen.set_search("users");
        screen.refresh(&gateway).await?;
        assert_eq!(screen.permissions().len(), 2);

        screen.set_search("delete");
        let filtered = screen.filtered();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "p-2");
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_form_and_blank_name_is_rejected() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/permissions"))
            .and(body_json(json!({
                "name": "reports:read",
                "action": "READ",
                "conditions": "owner == self"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/permissions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "content": [], "totalElements": 0 } })),
            )
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        let mut screen = PermissionsScreen::new();

        let blank = NewPermission::default();
        assert!(matches!(
            screen.create(&gateway, &blank).await,
            Err(AppError::Validation(_))
        ));

        let form = NewPermission {
            name: "reports:read".to_string(),
            action: PermissionAction::Read,
            resource_id: None,
            conditions: Some("owner == self".to_string()),
        };
        let committed = screen.create(&gateway, &form).await?;
        assert!(committed.refresh_error().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn accepted_delete_reports_only_the_failed_refetch() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/permissions/p-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/permissions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        let mut screen = PermissionsScreen::new();
        let committed = screen.delete(&gateway, "p-1").await?;
        let err = committed.refresh_error().unwrap();
        assert_eq!(err.user_message(super::LOAD_FAILED), "Failed to load permissions");
        Ok(())
    }
}
