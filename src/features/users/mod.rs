pub mod client;
pub mod state;
pub mod types;

pub use state::UsersScreen;
pub use types::{NewUser, UserChanges, UserStatus, UserSummary};
