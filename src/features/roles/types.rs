use crate::client::envelope::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PRIORITY_MIN: u8 = 1;
pub const PRIORITY_MAX: u8 = 100;
pub const DEFAULT_PRIORITY: u8 = 50;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Built-in roles cannot be edited, deleted or re-permissioned.
    #[serde(default)]
    pub system: bool,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(
        default,
        rename = "permissions",
        deserialize_with = "null_as_default"
    )]
    pub permission_names: Vec<String>,
    #[serde(default, rename = "userCount")]
    pub assigned_user_count: u64,
}

const fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl Role {
    #[must_use]
    pub fn priority_level(&self) -> PriorityLevel {
        PriorityLevel::from_priority(self.priority)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    #[must_use]
    pub fn from_priority(priority: u8) -> Self {
        match priority {
            80.. => Self::Critical,
            60..=79 => Self::High,
            40..=59 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub priority: u8,
}

impl Default for NewRole {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleChanges {
    pub name: String,
    pub description: String,
    pub priority: u8,
}

impl RoleChanges {
    #[must_use]
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
            priority: role.priority,
        }
    }
}

/// Body shared by create and update.
#[derive(Debug, Serialize)]
pub(crate) struct RoleRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub priority: u8,
}
