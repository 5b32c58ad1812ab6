pub mod client;
pub mod state;
pub mod types;

pub use state::PermissionsScreen;
pub use types::{NewPermission, Permission, PermissionAction};
