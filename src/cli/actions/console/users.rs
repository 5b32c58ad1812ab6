use super::Console;
use crate::{
    cli::{
        output::{self, render_list},
        shell::UsersCommand,
    },
    client::AppError,
    features::{
        Committed,
        assignment::{
            UserRoleEditor, partition_roles,
            user_roles::{ASSIGN_FAILED, REMOVE_FAILED},
        },
        roles::state::LOAD_FAILED as ROLES_LOAD_FAILED,
        users::{
            NewUser, UserChanges, UserStatus,
            state::{CREATE_FAILED, DELETE_FAILED, LOAD_FAILED, STATUS_FAILED, UPDATE_FAILED},
        },
    },
};
use secrecy::SecretString;
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub(super) async fn users(&mut self, command: UsersCommand) -> io::Result<()> {
        match command {
            UsersCommand::List { search, status } => {
                self.users.set_search(search.as_deref().unwrap_or_default());
                self.users.set_status_filter(status);
                self.list_users().await
            }
            UsersCommand::Create {
                username,
                email,
                phone,
                role_ids,
            } => {
                let Some(password) = self.ask("Password: ").await? else {
                    return Ok(());
                };
                let user = NewUser {
                    username,
                    email,
                    password: SecretString::from(password),
                    phone,
                    role_ids,
                };
                let result = self.users.create(self.session.gateway(), user).await;
                self.outcome(result, "User created successfully", CREATE_FAILED, LOAD_FAILED)
            }
            UsersCommand::Update {
                id,
                username,
                email,
                phone,
                status,
            } => self.update_user(&id, username, email, phone, status).await,
            UsersCommand::Delete { id } => {
                let result = self.users.delete(self.session.gateway(), &id).await;
                self.outcome(result, "User deleted successfully", DELETE_FAILED, LOAD_FAILED)
            }
            UsersCommand::Toggle { id } => self.toggle_user(&id).await,
            UsersCommand::Roles { id } => self.user_roles(&id).await,
            UsersCommand::Assign { id, role } => self.change_role(&id, &role, true).await,
            UsersCommand::Unassign { id, role } => self.change_role(&id, &role, false).await,
        }
    }

    async fn list_users(&mut self) -> io::Result<()> {
        if let Err(err) = self.users.refresh(self.session.gateway()).await {
            return self.report(&err, LOAD_FAILED);
        }
        let rendered = render_list(&self.users.filtered(), self.format);
        self.say(&rendered)
    }

    /// Makes sure `id` is in the local list, fetching once if it is not.
    async fn ensure_user_loaded(&mut self, id: &str) -> Result<(), AppError> {
        if self.users.find(id).is_none() {
            self.users.refresh(self.session.gateway()).await?;
        }
        if self.users.find(id).is_none() {
            return Err(AppError::Validation(format!("User '{id}' not found.")));
        }
        Ok(())
    }

    async fn update_user(
        &mut self,
        id: &str,
        username: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        status: Option<UserStatus>,
    ) -> io::Result<()> {
        if let Err(err) = self.ensure_user_loaded(id).await {
            return self.report(&err, LOAD_FAILED);
        }
        let Some(user) = self.users.find(id) else {
            return Ok(());
        };

        let mut changes = UserChanges::from_user(user);
        if let Some(username) = username {
            changes.username = username;
        }
        if let Some(email) = email {
            changes.email = email;
        }
        if let Some(phone) = phone {
            changes.phone = Some(phone).filter(|phone| !phone.trim().is_empty());
        }
        if let Some(status) = status {
            changes.status = status;
        }

        let result = self.users.update(self.session.gateway(), id, &changes).await;
        self.outcome(result, "User updated successfully", UPDATE_FAILED, LOAD_FAILED)
    }

    async fn toggle_user(&mut self, id: &str) -> io::Result<()> {
        if let Err(err) = self.ensure_user_loaded(id).await {
            return self.report(&err, LOAD_FAILED);
        }
        match self.users.toggle_status(self.session.gateway(), id).await {
            Ok((status, committed)) => {
                let done = if status == UserStatus::Active {
                    "User activated successfully"
                } else {
                    "User deactivated successfully"
                };
                self.outcome(Ok(committed), done, STATUS_FAILED, LOAD_FAILED)
            }
            Err(err) => self.report(&err, STATUS_FAILED),
        }
    }

    async fn user_roles(&mut self, id: &str) -> io::Result<()> {
        if let Err(err) = self.users.refresh(self.session.gateway()).await {
            return self.report(&err, LOAD_FAILED);
        }
        if let Err(err) = self.roles.refresh(self.session.gateway()).await {
            return self.report(&err, ROLES_LOAD_FAILED);
        }
        let Some(user) = self.users.find(id) else {
            return self.say(&output::error(&format!("User '{id}' not found.")));
        };

        let (assigned, available) = partition_roles(user, self.roles.roles());
        let assigned = render_list(&assigned, self.format);
        let available = render_list(&available, self.format);
        self.say("Assigned roles:")?;
        self.say(&assigned)?;
        self.say("Available roles:")?;
        self.say(&available)
    }

    async fn change_role(&mut self, id: &str, role: &str, grant: bool) -> io::Result<()> {
        let role_id = match self.resolve_role_id(role).await {
            Ok(role_id) => role_id,
            Err(err) => return self.report(&err, ROLES_LOAD_FAILED),
        };

        let editor = UserRoleEditor::new(id);
        let (result, done, fallback) = if grant {
            (
                editor.assign(self.session.gateway(), &role_id).await,
                "Role assigned successfully",
                ASSIGN_FAILED,
            )
        } else {
            (
                editor.remove(self.session.gateway(), &role_id).await,
                "Role removed successfully",
                REMOVE_FAILED,
            )
        };

        match result {
            Ok(Committed {
                refreshed: Ok(users),
            }) => {
                self.users.replace_users(users);
                self.say(&output::success(done))
            }
            Ok(Committed { refreshed: Err(err) }) => {
                self.say(&output::success(done))?;
                self.report(&err, LOAD_FAILED)
            }
            Err(err) => self.report(&err, fallback),
        }
    }

    /// Prints the result of a mutation. An accepted change is always reported
    /// as done; a failed re-fetch after it gets its own `reload_failed` notice.
    pub(super) fn outcome(
        &mut self,
        result: Result<Committed, AppError>,
        done: &str,
        fallback: &str,
        reload_failed: &str,
    ) -> io::Result<()> {
        match result {
            Ok(committed) => {
                self.say(&output::success(done))?;
                match committed.refresh_error() {
                    Some(err) => self.report(err, reload_failed),
                    None => Ok(()),
                }
            }
            Err(err) => self.report(&err, fallback),
        }
    }
}
