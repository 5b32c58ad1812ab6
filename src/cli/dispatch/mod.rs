use crate::{
    cli::{
        actions::{Action, console::Args},
        commands::api::{ARG_API_URL, ARG_FORMAT, ARG_TIMEOUT, ARG_USERNAME, ENV_PASSWORD},
        output::OutputFormat,
    },
    client::{ConfigOverrides, ConsoleConfig},
};
use anyhow::{Result, anyhow};
use secrecy::SecretString;
use std::env::var;

/// # Errors
/// Returns an error if an argument cannot be interpreted.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let config = ConsoleConfig::load(ConfigOverrides {
        api_base_url: matches.get_one::<String>(ARG_API_URL).cloned(),
        timeout_seconds: matches.get_one::<u64>(ARG_TIMEOUT).copied(),
    });

    let format = matches
        .get_one::<String>(ARG_FORMAT)
        .map(|value| value.parse::<OutputFormat>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();

    let username = matches
        .get_one::<String>(ARG_USERNAME)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let password = var(ENV_PASSWORD)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from);

    Ok(Action::Console(Args {
        config,
        format,
        username,
        password,
    }))
}

#[cfg(test)]
mod tests {
    use super::handler;
    use crate::cli::{actions::Action, commands, output::OutputFormat};
    use secrecy::ExposeSecret;
    use std::time::Duration;

    #[test]
    fn builds_console_action_from_flags_and_env() {
        temp_env::with_vars(
            [
                ("USERHUB_API_URL", None),
                ("USERHUB_TIMEOUT", None),
                ("USERHUB_FORMAT", None),
                ("USERHUB_USERNAME", None),
                ("USERHUB_PASSWORD", Some("s3cret-pass")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "userhub",
                    "--api-url",
                    " https://ums.example.com/api/v1 ",
                    "--timeout",
                    "7",
                    "--format",
                    "json",
                    "--username",
                    "ada",
                ]);
                let Ok(Action::Console(args)) = handler(&matches) else {
                    panic!("expected console action");
                };
                assert_eq!(args.config.api_base_url, "https://ums.example.com/api/v1");
                assert_eq!(args.config.timeout, Duration::from_secs(7));
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.username.as_deref(), Some("ada"));
                assert_eq!(
                    args.password.as_ref().map(|password| password.expose_secret()),
                    Some("s3cret-pass")
                );
            },
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("USERHUB_API_URL", Some("   ")),
                ("USERHUB_TIMEOUT", None),
                ("USERHUB_FORMAT", None),
                ("USERHUB_USERNAME", Some(" ")),
                ("USERHUB_PASSWORD", Some("")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["userhub"]);
                let Ok(Action::Console(args)) = handler(&matches) else {
                    panic!("expected console action");
                };
                assert_eq!(args.config.api_base_url, "http://localhost/api/v1");
                assert_eq!(args.config.timeout, Duration::from_secs(30));
                assert_eq!(args.format, OutputFormat::Table);
                assert!(args.username.is_none());
                assert!(args.password.is_none());
            },
        );
    }
}
