use crate::client::envelope::null_as_default;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionAction {
    Create,
    #[default]
    Read,
    Update,
    Delete,
    #[serde(rename = "*")]
    All,
    #[serde(other)]
    Other,
}

impl PermissionAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::All => "*",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "READ" => Ok(Self::Read),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "*" | "ALL" => Ok(Self::All),
            other => Err(format!(
                "invalid action '{other}', expected CREATE, READ, UPDATE, DELETE or *"
            )),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: PermissionAction,
    #[serde(default = "unknown_resource", deserialize_with = "resource_or_unknown")]
    pub resource: String,
    /// Opaque policy expression; never interpreted client-side.
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

const UNKNOWN_RESOURCE: &str = "N/A";

fn unknown_resource() -> String {
    UNKNOWN_RESOURCE.to_string()
}

fn resource_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|resource| !resource.trim().is_empty())
        .unwrap_or_else(unknown_resource))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPermission {
    pub name: String,
    pub action: PermissionAction,
    pub resource_id: Option<String>,
    pub conditions: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePermissionRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<&'a str>,
    pub action: PermissionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<&'a str>,
}

impl<'a> CreatePermissionRequest<'a> {
    pub(crate) fn from_form(form: &'a NewPermission) -> Self {
        let present = |value: &'a Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };
        Self {
            name: form.name.trim(),
            resource_id: present(&form.resource_id),
            action: form.action,
            conditions: present(&form.conditions),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{CreatePermissionRequest, NewPermission, Permission, PermissionAction};
    use serde_json::json;

    #[test]
    fn permission_defaults_action_and_resource() {
        let permission: Permission = serde_json::from_value(json!({
            "id": "p-1",
            "name": "users:read",
            "resource": null
        }))
        .unwrap();
        assert_eq!(permission.action, PermissionAction::Read);
        assert_eq!(permission.resource, "N/A");

        let permission: Permission = serde_json::from_value(json!({
            "id": "p-2",
            "name": "everything",
            "action": "*",
            "resource": "users"
        }))
        .unwrap();
        assert_eq!(permission.action, PermissionAction::All);
        assert_eq!(permission.resource, "users");
    }

    #[test]
    fn unrecognized_action_is_kept_as_other() {
        let permission: Permission = serde_json::from_value(json!({
            "id": "p-3",
            "name": "reports:export",
            "action": "EXPORT"
        }))
        .unwrap();
        assert_eq!(permission.action, PermissionAction::Other);
        assert_eq!(permission.resource, "N/A");
    }

    #[test]
    fn action_parses_from_console_input() {
        assert_eq!("update".parse::<PermissionAction>(), Ok(PermissionAction::Update));
        assert_eq!("*".parse::<PermissionAction>(), Ok(PermissionAction::All));
        assert!("export".parse::<PermissionAction>().is_err());
    }

    #[test]
    fn create_request_skips_blank_optionals() {
        let form = NewPermission {
            name: "audit:read".to_string(),
            action: PermissionAction::Read,
            resource_id: None,
            conditions: Some(" ".to_string()),
        };
        let body = serde_json::to_value(CreatePermissionRequest::from_form(&form)).unwrap();
        assert_eq!(body, json!({ "name": "audit:read", "action": "READ" }));
    }
}
