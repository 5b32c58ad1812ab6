pub mod client;
pub mod state;
pub mod types;

pub use state::RolesScreen;
pub use types::{NewRole, PriorityLevel, Role, RoleChanges};
