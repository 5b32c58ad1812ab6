//! Interactive console over the session store and the screen models.
//!
//! Each command runs to completion before the next line is read. Failures are
//! printed and the prompt comes back; only I/O errors on the console's own
//! input or output end the loop.

mod auth;
mod dashboard;
mod display;
mod mfa;
mod permissions;
mod roles;
mod users;

use crate::{
    cli::{
        output::{self, OutputFormat},
        shell::{self, Prompt, ShellCommand},
        telemetry,
    },
    client::{AppError, ConsoleConfig},
    features::{
        auth::SessionStore, permissions::PermissionsScreen, roles::RolesScreen,
        users::UsersScreen,
    },
};
use anyhow::Result;
use secrecy::SecretString;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info};

const PROMPT: &str = "userhub> ";

#[derive(Debug)]
pub struct Args {
    pub config: ConsoleConfig,
    pub format: OutputFormat,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

/// Execute the console action on stdin and stdout.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the terminal fails.
pub async fn execute(args: Args) -> Result<()> {
    info!(api = %args.config.api_base_url, timeout = ?args.config.timeout, "starting console");

    let session = SessionStore::new(args.config)?;
    let mut console = Console::new(
        session,
        BufReader::new(tokio::io::stdin()),
        io::stdout(),
        args.format,
    );
    let result = console.run(args.username, args.password).await;

    telemetry::shutdown_tracer();
    result
}

enum Flow {
    Continue,
    Exit,
}

pub struct Console<R, W> {
    session: SessionStore,
    prompt: Prompt<R>,
    out: W,
    format: OutputFormat,
    users: UsersScreen,
    roles: RolesScreen,
    permissions: PermissionsScreen,
}

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    pub fn new(session: SessionStore, input: R, out: W, format: OutputFormat) -> Self {
        Self {
            session,
            prompt: Prompt::new(input),
            out,
            format,
            users: UsersScreen::new(),
            roles: RolesScreen::new(),
            permissions: PermissionsScreen::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Resolves the session, signs in if needed, then reads commands until
    /// `exit` or end of input.
    ///
    /// # Errors
    /// Returns I/O errors on the console's input or output.
    pub async fn run(
        &mut self,
        mut username: Option<String>,
        mut password: Option<SecretString>,
    ) -> Result<()> {
        self.session.check_auth().await;

        loop {
            if !self.session.is_authenticated()
                && !self.sign_in(username.take(), password.take()).await?
            {
                break;
            }

            let Some(line) = self.ask(PROMPT).await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let words = match shell::split(line) {
                Ok(words) => words,
                Err(message) => {
                    self.say(&output::error(&message))?;
                    continue;
                }
            };

            let command = match shell::parse(words) {
                Ok(command) => command,
                Err(err) => {
                    self.say(err.render().to_string().trim_end())?;
                    continue;
                }
            };

            debug!(?command, "console command");
            if let Flow::Exit = self.dispatch(command).await? {
                break;
            }

            if self.session.take_login_redirect() {
                self.say(&output::warning("Your session has expired. Please sign in again."))?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    async fn dispatch(&mut self, command: ShellCommand) -> io::Result<Flow> {
        match command {
            ShellCommand::Exit => return Ok(Flow::Exit),
            ShellCommand::WhoAmI => self.whoami()?,
            ShellCommand::Login { username } => {
                self.sign_in(username, None).await?;
            }
            ShellCommand::Logout => self.logout().await?,
            ShellCommand::Dashboard => self.dashboard().await?,
            ShellCommand::Mfa => self.mfa().await?,
            ShellCommand::Users(command) => self.users(command).await?,
            ShellCommand::Roles(command) => self.roles(command).await?,
            ShellCommand::Permissions(command) => self.permissions(command).await?,
        }
        Ok(Flow::Continue)
    }

    /// Writes `label` without a newline and reads the answer.
    async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        self.prompt.line().await
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn report(&mut self, err: &AppError, fallback: &str) -> io::Result<()> {
        debug!(error = %err, "command failed");
        self.say(&output::error(&err.user_message(fallback)))
    }
}
