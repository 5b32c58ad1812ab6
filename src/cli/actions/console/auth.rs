use super::Console;
use crate::{
    cli::output::{self, render_item},
    features::auth::{Credentials, state::LOGIN_FAILED},
};
use secrecy::SecretString;
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

impl<R: AsyncBufRead + Unpin, W: Write> Console<R, W> {
    /// Prompts until a login succeeds. Preset values are used for the first
    /// attempt only. Returns `false` when input ends first.
    pub(super) async fn sign_in(
        &mut self,
        mut username: Option<String>,
        mut password: Option<SecretString>,
    ) -> io::Result<bool> {
        loop {
            let username = match username.take() {
                Some(username) => username,
                None => match self.ask("Username or email: ").await? {
                    Some(username) => username,
                    None => return Ok(false),
                },
            };
            let password = match password.take() {
                Some(password) => password,
                None => match self.ask("Password: ").await? {
                    Some(password) => SecretString::from(password),
                    None => return Ok(false),
                },
            };

            match self.session.login(Credentials::new(username, password)).await {
                Ok(()) => {
                    // Login only counts once the identity read-back succeeded.
                    let Some(identity) = self.session.identity() else {
                        self.say(&output::error(LOGIN_FAILED))?;
                        continue;
                    };
                    // A fresh login satisfies any pending redirect.
                    self.session.take_login_redirect();
                    self.say(&output::success(&format!(
                        "Signed in as {}",
                        identity.username
                    )))?;
                    return Ok(true);
                }
                Err(err) => self.report(&err, LOGIN_FAILED)?,
            }
        }
    }

    pub(super) fn whoami(&mut self) -> io::Result<()> {
        match self.session.identity() {
            Some(identity) => {
                let rendered = render_item(&identity, self.format);
                self.say(&rendered)
            }
            None => self.say(&output::info("Not signed in.")),
        }
    }

    pub(super) async fn logout(&mut self) -> io::Result<()> {
        self.session.logout().await;
        self.say(&output::success("Signed out."))
    }
}
