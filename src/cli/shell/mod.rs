//! Command grammar for the interactive console.
//!
//! Each input line is split into words and parsed with a `clap` command that
//! has no binary name, so `users list --search ada` reads the same way a
//! subcommand would on the real command line.

pub mod prompt;

use crate::features::{permissions::PermissionAction, users::UserStatus};
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command, builder::ValueParser};

pub use prompt::Prompt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    WhoAmI,
    Login { username: Option<String> },
    Logout,
    Dashboard,
    Mfa,
    Exit,
    Users(UsersCommand),
    Roles(RolesCommand),
    Permissions(PermissionsCommand),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsersCommand {
    List {
        search: Option<String>,
        status: Option<UserStatus>,
    },
    Create {
        username: String,
        email: String,
        phone: Option<String>,
        role_ids: Vec<String>,
    },
    Update {
        id: String,
        username: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        status: Option<UserStatus>,
    },
    Delete { id: String },
    Toggle { id: String },
    Roles { id: String },
    Assign { id: String, role: String },
    Unassign { id: String, role: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RolesCommand {
    List {
        search: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        name: String,
        description: Option<String>,
        priority: Option<u8>,
    },
    Update {
        id: String,
        name: Option<String>,
        description: Option<String>,
        priority: Option<u8>,
    },
    Delete {
        id: String,
    },
    Permissions {
        id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PermissionsCommand {
    List {
        search: Option<String>,
    },
    Create {
        name: String,
        action: PermissionAction,
        resource: Option<String>,
        conditions: Option<String>,
    },
    Delete {
        id: String,
    },
}

fn id_arg() -> Arg {
    Arg::new("id").help("Identifier").required(true)
}

fn search_arg() -> Arg {
    Arg::new("search")
        .short('s')
        .long("search")
        .help("Case-insensitive text filter")
}

fn status_parser() -> ValueParser {
    ValueParser::from(|value: &str| value.parse::<UserStatus>())
}

fn action_parser() -> ValueParser {
    ValueParser::from(|value: &str| value.parse::<PermissionAction>())
}

fn priority_arg() -> Arg {
    Arg::new("priority")
        .short('p')
        .long("priority")
        .help("Priority from 1 (lowest) to 100 (highest)")
        .value_parser(clap::value_parser!(u8).range(1..=100))
}

fn users_command() -> Command {
    Command::new("users")
        .about("Manage user accounts")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List users")
                .arg(search_arg())
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("ACTIVE, INACTIVE, LOCKED or PENDING")
                        .value_parser(status_parser()),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Create a user; the password is prompted for")
                .arg(Arg::new("username").required(true))
                .arg(Arg::new("email").required(true))
                .arg(Arg::new("phone").long("phone"))
                .arg(
                    Arg::new("role")
                        .long("role")
                        .help("Role id to grant; repeatable")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Update a user; omitted fields keep their values")
                .arg(id_arg())
                .arg(Arg::new("username").long("username"))
                .arg(Arg::new("email").long("email"))
                .arg(Arg::new("phone").long("phone"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_parser(status_parser()),
                ),
        )
        .subcommand(Command::new("delete").about("Delete a user").arg(id_arg()))
        .subcommand(
            Command::new("toggle")
                .about("Activate or deactivate a user")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("roles")
                .about("Show assigned and available roles")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("assign")
                .about("Grant a role (id or name) to a user")
                .arg(id_arg())
                .arg(Arg::new("role").required(true)),
        )
        .subcommand(
            Command::new("unassign")
                .about("Revoke a role (id or name) from a user")
                .arg(id_arg())
                .arg(Arg::new("role").required(true)),
        )
}

fn roles_command() -> Command {
    Command::new("roles")
        .about("Manage roles")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List roles").arg(search_arg()))
        .subcommand(Command::new("show").about("Show one role").arg(id_arg()))
        .subcommand(
            Command::new("create")
                .about("Create a role")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("description").short('d').long("description"))
                .arg(priority_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Update a role; omitted fields keep their values")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("description").short('d').long("description"))
                .arg(priority_arg()),
        )
        .subcommand(Command::new("delete").about("Delete a role").arg(id_arg()))
        .subcommand(
            Command::new("permissions")
                .about("Edit the permissions granted by a role")
                .arg(id_arg()),
        )
}

fn permissions_command() -> Command {
    Command::new("permissions")
        .about("Manage permissions")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List permissions")
                .arg(search_arg()),
        )
        .subcommand(
            Command::new("create")
                .about("Create a permission")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("action")
                        .short('a')
                        .long("action")
                        .help("CREATE, READ, UPDATE, DELETE or *")
                        .value_parser(action_parser()),
                )
                .arg(Arg::new("resource").short('r').long("resource"))
                .arg(Arg::new("conditions").short('c').long("conditions")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a permission")
                .arg(id_arg()),
        )
}

/// Grammar of one console line.
#[must_use]
pub fn grammar() -> Command {
    Command::new("userhub")
        .no_binary_name(true)
        .disable_version_flag(true)
        .color(ColorChoice::Never)
        .subcommand_required(true)
        .help_template("{subcommands}")
        .subcommand(Command::new("whoami").about("Show the signed-in operator"))
        .subcommand(
            Command::new("login")
                .about("Sign in again")
                .arg(Arg::new("username")),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("dashboard").about("Show headline counts"))
        .subcommand(Command::new("mfa").about("Enroll in two-factor authentication"))
        .subcommand(
            Command::new("exit")
                .about("Leave the console")
                .visible_alias("quit"),
        )
        .subcommand(users_command())
        .subcommand(roles_command())
        .subcommand(permissions_command())
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

// Required args are enforced by clap before these run.
fn required(matches: &ArgMatches, id: &str) -> String {
    string(matches, id).unwrap_or_default()
}

fn users(matches: &ArgMatches) -> Option<UsersCommand> {
    let command = match matches.subcommand()? {
        ("list", m) => UsersCommand::List {
            search: string(m, "search"),
            status: m.get_one::<UserStatus>("status").copied(),
        },
        ("create", m) => UsersCommand::Create {
            username: required(m, "username"),
            email: required(m, "email"),
            phone: string(m, "phone"),
            role_ids: m
                .get_many::<String>("role")
                .map(|roles| roles.cloned().collect())
                .unwrap_or_default(),
        },
        ("update", m) => UsersCommand::Update {
            id: required(m, "id"),
            username: string(m, "username"),
            email: string(m, "email"),
            phone: string(m, "phone"),
            status: m.get_one::<UserStatus>("status").copied(),
        },
        ("delete", m) => UsersCommand::Delete { id: required(m, "id") },
        ("toggle", m) => UsersCommand::Toggle { id: required(m, "id") },
        ("roles", m) => UsersCommand::Roles { id: required(m, "id") },
        ("assign", m) => UsersCommand::Assign {
            id: required(m, "id"),
            role: required(m, "role"),
        },
        ("unassign", m) => UsersCommand::Unassign {
            id: required(m, "id"),
            role: required(m, "role"),
        },
        _ => return None,
    };
    Some(command)
}

fn roles(matches: &ArgMatches) -> Option<RolesCommand> {
    let command = match matches.subcommand()? {
        ("list", m) => RolesCommand::List {
            search: string(m, "search"),
        },
        ("show", m) => RolesCommand::Show { id: required(m, "id") },
        ("create", m) => RolesCommand::Create {
            name: required(m, "name"),
            description: string(m, "description"),
            priority: m.get_one::<u8>("priority").copied(),
        },
        ("update", m) => RolesCommand::Update {
            id: required(m, "id"),
            name: string(m, "name"),
            description: string(m, "description"),
            priority: m.get_one::<u8>("priority").copied(),
        },
        ("delete", m) => RolesCommand::Delete { id: required(m, "id") },
        ("permissions", m) => RolesCommand::Permissions { id: required(m, "id") },
        _ => return None,
    };
    Some(command)
}

fn permissions(matches: &ArgMatches) -> Option<PermissionsCommand> {
    let command = match matches.subcommand()? {
        ("list", m) => PermissionsCommand::List {
            search: string(m, "search"),
        },
        ("create", m) => PermissionsCommand::Create {
            name: required(m, "name"),
            action: m
                .get_one::<PermissionAction>("action")
                .copied()
                .unwrap_or_default(),
            resource: string(m, "resource"),
            conditions: string(m, "conditions"),
        },
        ("delete", m) => PermissionsCommand::Delete { id: required(m, "id") },
        _ => return None,
    };
    Some(command)
}

/// Parses the words of one line.
///
/// # Errors
/// Returns the clap error, which also carries help output for `help` and
/// `--help`.
pub fn parse<I, T>(words: I) -> Result<ShellCommand, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut grammar = grammar();
    let matches = grammar.try_get_matches_from_mut(words)?;

    let command = match matches.subcommand() {
        Some(("whoami", _)) => Some(ShellCommand::WhoAmI),
        Some(("login", m)) => Some(ShellCommand::Login {
            username: string(m, "username"),
        }),
        Some(("logout", _)) => Some(ShellCommand::Logout),
        Some(("dashboard", _)) => Some(ShellCommand::Dashboard),
        Some(("mfa", _)) => Some(ShellCommand::Mfa),
        Some(("exit", _)) => Some(ShellCommand::Exit),
        Some(("users", m)) => users(m).map(ShellCommand::Users),
        Some(("roles", m)) => roles(m).map(ShellCommand::Roles),
        Some(("permissions", m)) => permissions(m).map(ShellCommand::Permissions),
        _ => None,
    };

    command.ok_or_else(|| grammar.error(clap::error::ErrorKind::InvalidSubcommand, "unknown command"))
}

/// Splits a line into words. Single and double quotes group words; a
/// backslash escapes the next character outside single quotes.
///
/// # Errors
/// Returns a message when a quote or escape is left open.
pub fn split(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                let escaped = chars.next().ok_or("dangling escape at end of line")?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
