use crate::cli::output::FORMAT_VALUES;
use crate::client::config::DEFAULT_API_BASE_URL;
use clap::{Arg, Command, builder::PossibleValuesParser};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_FORMAT: &str = "format";
pub const ARG_USERNAME: &str = "username";

/// Password is read from the environment only, never from argv.
pub const ENV_PASSWORD: &str = "USERHUB_PASSWORD";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .short('a')
                .long("api-url")
                .help("Base URL of the user-management API")
                .long_help(format!(
                    "Base URL of the user-management API, including the version prefix (default: {DEFAULT_API_BASE_URL})"
                ))
                .env("USERHUB_API_URL"),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("30")
                .env("USERHUB_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_FORMAT)
                .short('f')
                .long("format")
                .help("Output format for listings")
                .default_value("table")
                .env("USERHUB_FORMAT")
                .value_parser(PossibleValuesParser::new(FORMAT_VALUES)),
        )
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Username or email used to sign in when no session exists")
                .long_help(format!(
                    "Username or email used to sign in when no session exists. The password is read from {ENV_PASSWORD} or prompted for."
                ))
                .env("USERHUB_USERNAME"),
        )
}
