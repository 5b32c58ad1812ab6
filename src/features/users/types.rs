use crate::client::envelope::null_as_default;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Account status as reported by the backend.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Locked,
    #[default]
    Pending,
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Locked => "LOCKED",
            Self::Pending => "PENDING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "LOCKED" => Ok(Self::Locked),
            "PENDING" => Ok(Self::Pending),
            other => Err(format!(
                "invalid status '{other}', expected ACTIVE, INACTIVE, LOCKED or PENDING"
            )),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: UserStatus,
    #[serde(default)]
    pub mfa_enabled: bool,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Role names (or ids, depending on the backend) currently held.
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

/// Form data for a new account. The password stays wrapped until the request
/// body is built.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub phone: Option<String>,
    pub role_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: UserStatus,
}

impl UserChanges {
    /// Pre-fills the edit form from an existing user, as the edit dialog does.
    #[must_use]
    pub fn from_user(user: &UserSummary) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            status: user.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateUserRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    pub role_ids: &'a [String],
}

impl<'a> CreateUserRequest<'a> {
    pub(crate) fn from_form(user: &'a NewUser) -> Self {
        Self {
            username: user.username.trim(),
            email: user.email.trim(),
            password: user.password.expose_secret(),
            phone: user
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|phone| !phone.is_empty()),
            role_ids: &user.role_ids,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateUserRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub status: UserStatus,
}

impl<'a> UpdateUserRequest<'a> {
    pub(crate) fn from_changes(changes: &'a UserChanges) -> Self {
        Self {
            username: changes.username.trim(),
            email: changes.email.trim(),
            phone: changes.phone.as_deref().map_or("", str::trim),
            status: changes.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignRoleRequest<'a> {
    pub role_id: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{CreateUserRequest, NewUser, UserStatus, UserSummary};
    use secrecy::SecretString;
    use serde_json::json;

    #[test]
    fn summary_defaults_missing_status_and_null_roles() {
        let user: UserSummary = serde_json::from_value(json!({
            "id": "u-1",
            "username": "ada",
            "email": "ada@example.com",
            "status": null,
            "roles": null
        }))
        .unwrap();
        assert_eq!(user.status, UserStatus::Pending);
        assert!(user.roles.is_empty());
        assert!(!user.mfa_enabled);
    }

    #[test]
    fn unknown_status_is_kept_as_unknown() {
        let user: UserSummary = serde_json::from_value(json!({
            "id": "u-2",
            "username": "bob",
            "email": "bob@example.com",
            "status": "SUSPENDED"
        }))
        .unwrap();
        assert_eq!(user.status, UserStatus::Unknown);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("active".parse::<UserStatus>(), Ok(UserStatus::Active));
        assert_eq!(" Locked ".parse::<UserStatus>(), Ok(UserStatus::Locked));
        assert!("gone".parse::<UserStatus>().is_err());
        assert_eq!(UserStatus::Inactive.to_string(), "INACTIVE");
    }

    #[test]
    fn create_request_omits_blank_phone() {
        let form = NewUser {
            username: " ada ".to_string(),
            email: "ada@example.com".to_string(),
            password: SecretString::from("correct horse"),
            phone: Some("  ".to_string()),
            role_ids: vec!["r-1".to_string()],
        };
        let body = serde_json::to_value(CreateUserRequest::from_form(&form)).unwrap();
        assert_eq!(
            body,
            json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "correct horse",
                "roleIds": ["r-1"]
            })
        );
    }
}
