use super::Console;
use crate::{
    cli::{
        output::{self, render_item, render_list},
        shell::RolesCommand,
    },
    client::AppError,
    features::{
        assignment::{
            RolePermissionEditor,
            role_permissions::{LOAD_FAILED as PERMISSIONS_LOAD_FAILED, SAVE_FAILED},
        },
        roles::{
            NewRole, Role, RoleChanges,
            state::{CREATE_FAILED, DELETE_FAILED, LOAD_FAILED, UPDATE_FAILED},
            types::DEFAULT_PRIORITY,
        },
    },
};
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

const CHECKLIST_PROMPT: &str = "Toggle numbers, 'save' or 'cancel': ";

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub(super) async fn roles(&mut self, command: RolesCommand) -> io::Result<()> {
        match command {
            RolesCommand::List { search } => {
                self.roles.set_search(search.as_deref().unwrap_or_default());
                if let Err(err) = self.roles.refresh(self.session.gateway()).await {
                    return self.report(&err, LOAD_FAILED);
                }
                let rendered = render_list(&self.roles.filtered(), self.format);
                self.say(&rendered)
            }
            RolesCommand::Show { id } => match self.loaded_role(&id).await {
                Ok(role) => {
                    let rendered = render_item(&role, self.format);
                    self.say(&rendered)?;
                    if !role.permission_names.is_empty() {
                        self.say(&format!("Permissions: {}", role.permission_names.join(", ")))?;
                    }
                    Ok(())
                }
                Err(err) => self.report(&err, LOAD_FAILED),
            },
            RolesCommand::Create {
                name,
                description,
                priority,
            } => {
                let role = NewRole {
                    name,
                    description: description.unwrap_or_default(),
                    priority: priority.unwrap_or(DEFAULT_PRIORITY),
                };
                let result = self.roles.create(self.session.gateway(), &role).await;
                self.outcome(result, "Role created successfully", CREATE_FAILED, LOAD_FAILED)
            }
            RolesCommand::Update {
                id,
                name,
                description,
                priority,
            } => {
                let role = match self.loaded_role(&id).await {
                    Ok(role) => role,
                    Err(err) => return self.report(&err, LOAD_FAILED),
                };
                let mut changes = RoleChanges::from_role(&role);
                if let Some(name) = name {
                    changes.name = name;
                }
                if let Some(description) = description {
                    changes.description = description;
                }
                if let Some(priority) = priority {
                    changes.priority = priority;
                }
                let result = self.roles.update(self.session.gateway(), &id, &changes).await;
                self.outcome(result, "Role updated successfully", UPDATE_FAILED, LOAD_FAILED)
            }
            RolesCommand::Delete { id } => {
                if let Err(err) = self.loaded_role(&id).await {
                    return self.report(&err, LOAD_FAILED);
                }
                let result = self.roles.delete(self.session.gateway(), &id).await;
                self.outcome(result, "Role deleted successfully", DELETE_FAILED, LOAD_FAILED)
            }
            RolesCommand::Permissions { id } => self.edit_role_permissions(&id).await,
        }
    }

    /// Role `id` from the local list, fetching once if it is not there.
    async fn loaded_role(&mut self, id: &str) -> Result<Role, AppError> {
        if self.roles.find(id).is_none() {
            self.roles.refresh(self.session.gateway()).await?;
        }
        self.roles
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("Role '{id}' not found.")))
    }

    /// Accepts a role id or a case-insensitive role name.
    pub(super) async fn resolve_role_id(&mut self, key: &str) -> Result<String, AppError> {
        let key = key.trim();
        let lookup = |roles: &[Role]| {
            roles
                .iter()
                .find(|role| role.id == key)
                .or_else(|| roles.iter().find(|role| role.name.eq_ignore_ascii_case(key)))
                .map(|role| role.id.clone())
        };

        if let Some(id) = lookup(self.roles.roles()) {
            return Ok(id);
        }
        self.roles.refresh(self.session.gateway()).await?;
        lookup(self.roles.roles())
            .ok_or_else(|| AppError::Validation(format!("Role '{key}' not found.")))
    }

    async fn edit_role_permissions(&mut self, id: &str) -> io::Result<()> {
        let role = match self.loaded_role(id).await {
            Ok(role) => role,
            Err(err) => return self.report(&err, LOAD_FAILED),
        };
        let mut editor = match RolePermissionEditor::open(self.session.gateway(), role).await {
            Ok(editor) => editor,
            Err(err) => return self.report(&err, PERMISSIONS_LOAD_FAILED),
        };

        loop {
            self.print_checklist(&editor)?;
            let Some(line) = self.ask(CHECKLIST_PROMPT).await? else {
                return Ok(());
            };

            match line.trim() {
                "save" => match editor.save(self.session.gateway()).await {
                    Ok(()) => {
                        self.say(&output::success("Permissions updated successfully"))?;
                        if let Err(err) = self.roles.refresh(self.session.gateway()).await {
                            self.report(&err, LOAD_FAILED)?;
                        }
                        return Ok(());
                    }
                    Err(err) => self.report(&err, SAVE_FAILED)?,
                },
                "cancel" => return self.say(&output::info("No changes saved.")),
                input => {
                    let picks = parse_picks(input, editor.catalog().len());
                    match picks {
                        Some(picks) => {
                            for index in picks {
                                let permission_id = editor.catalog()[index].id.clone();
                                editor.toggle(&permission_id);
                            }
                        }
                        None => self.say(&output::warning(&format!(
                            "Enter numbers between 1 and {}, 'save' or 'cancel'.",
                            editor.catalog().len()
                        )))?,
                    }
                }
            }
        }
    }

    fn print_checklist(&mut self, editor: &RolePermissionEditor) -> io::Result<()> {
        self.say(&format!("Permissions for role '{}':", editor.role().name))?;
        for (index, permission) in editor.catalog().iter().enumerate() {
            let mark = if editor.is_selected(&permission.id) { "x" } else { " " };
            self.say(&format!(
                "  [{mark}] {:>2}. {} ({} on {})",
                index + 1,
                permission.name,
                permission.action,
                permission.resource
            ))?;
        }
        Ok(())
    }
}

/// One-based picks separated by spaces or commas, as zero-based indexes.
fn parse_picks(input: &str, len: usize) -> Option<Vec<usize>> {
    let picks: Option<Vec<usize>> = input
        .split([' ', ','])
        .filter(|word| !word.is_empty())
        .map(|word| {
            word.parse::<usize>()
                .ok()
                .filter(|pick| (1..=len).contains(pick))
                .map(|pick| pick - 1)
        })
        .collect();
    picks.filter(|picks| !picks.is_empty())
}
