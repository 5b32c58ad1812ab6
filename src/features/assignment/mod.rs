//! Assignment editors for the two many-to-many relations. They follow
//! different server contracts and are kept apart on purpose:
//!
//! - role to permission: local checklist, one full-replace `PUT` on save;
//! - user to role: one request per assign or remove, then a full user
//!   re-fetch.

pub mod role_permissions;
pub mod user_roles;

pub use role_permissions::RolePermissionEditor;
pub use user_roles::{UserRoleEditor, partition_roles};
