//! Table layouts for the records the console prints.

use crate::{
    cli::output::TableDisplay,
    features::{
        auth::Identity, dashboard::DashboardStats, permissions::Permission, roles::Role,
        users::UserSummary,
    },
};

fn yes_no(value: bool) -> String {
    (if value { "yes" } else { "no" }).to_string()
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

impl TableDisplay for UserSummary {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Username", "Email", "Status", "MFA", "Roles", "Last login"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.email.clone(),
            self.status.to_string(),
            yes_no(self.mfa_enabled),
            self.roles.join(", "),
            or_dash(self.last_login_at.as_deref()),
        ]
    }
}

impl TableDisplay for Role {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Priority", "System", "Users", "Permissions", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            format!("{} ({})", self.priority, self.priority_level()),
            yes_no(self.system),
            self.assigned_user_count.to_string(),
            self.permission_names.len().to_string(),
            or_dash(Some(&self.description)),
        ]
    }
}

impl TableDisplay for Permission {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Action", "Resource", "Conditions"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.action.to_string(),
            self.resource.clone(),
            or_dash(self.conditions.as_deref()),
        ]
    }
}

impl TableDisplay for Identity {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Username", "Email", "Status", "MFA", "Roles"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.email.clone(),
            self.status.to_string(),
            yes_no(self.mfa_enabled),
            self.roles.join(", "),
        ]
    }
}

impl TableDisplay for DashboardStats {
    fn headers() -> Vec<&'static str> {
        vec!["Total users", "Active roles"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.total_users.to_string(), self.active_roles.to_string()]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::cli::output::TableDisplay;
    use crate::features::{permissions::Permission, roles::Role};
    use serde_json::json;

    #[test]
    fn role_row_shows_priority_band_and_counts() {
        let role: Role = serde_json::from_value(json!({
            "id": "r-1", "name": "ADMIN", "priority": 90, "system": true,
            "permissions": ["users:read", "users:update"], "userCount": 3
        }))
        .unwrap();
        let row = role.row();
        assert_eq!(row[2], "90 (Critical)");
        assert_eq!(row[3], "yes");
        assert_eq!(row[4], "3");
        assert_eq!(row[5], "2");
        assert_eq!(row[6], "-");
    }

    #[test]
    fn permission_row_uses_placeholders() {
        let permission: Permission = serde_json::from_value(json!({
            "id": "p-1", "name": "audit:read", "action": "*", "resource": null
        }))
        .unwrap();
        assert_eq!(permission.row(), ["p-1", "audit:read", "*", "N/A", "-"]);
    }
}
