use super::Console;
use crate::{
    cli::{output::render_list, shell::PermissionsCommand},
    features::permissions::{
        NewPermission,
        state::{CREATE_FAILED, DELETE_FAILED, LOAD_FAILED},
    },
};
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub(super) async fn permissions(&mut self, command: PermissionsCommand) -> io::Result<()> {
        match command {
            PermissionsCommand::List { search } => {
                self.permissions
                    .set_search(search.as_deref().unwrap_or_default());
                if let Err(err) = self.permissions.refresh(self.session.gateway()).await {
                    return self.report(&err, LOAD_FAILED);
                }
                let rendered = render_list(&self.permissions.filtered(), self.format);
                self.say(&rendered)
            }
            PermissionsCommand::Create {
                name,
                action,
                resource,
                conditions,
            } => {
                let permission = NewPermission {
                    name,
                    action,
                    resource_id: resource,
                    conditions,
                };
                let result = self
                    .permissions
                    .create(self.session.gateway(), &permission)
                    .await;
                self.outcome(result, "Permission created successfully", CREATE_FAILED, LOAD_FAILED)
            }
            PermissionsCommand::Delete { id } => {
                let result = self.permissions.delete(self.session.gateway(), &id).await;
                self.outcome(result, "Permission deleted successfully", DELETE_FAILED, LOAD_FAILED)
            }
        }
    }
}
