//! Console configuration: the API base URL and the request timeout. Defaults
//! are compiled in and may be overridden from CLI flags or environment
//! variables. Configuration values are public; do not store secrets here.

use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost/api/v1";
/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Console configuration shared by the gateway and the CLI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Optional values layered over the defaults, e.g. parsed CLI flags.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl ConsoleConfig {
    /// Builds a config from defaults plus the provided overrides.
    #[must_use]
    pub fn load(overrides: ConfigOverrides) -> Self {
        let mut config = Self::default();
        apply_overrides(&mut config, overrides);
        config
    }

    /// Joins `path` onto the configured base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        build_url_with_base(&self.api_base_url, path)
    }
}

fn apply_overrides(config: &mut ConsoleConfig, overrides: ConfigOverrides) {
    if let Some(value) = overrides
        .api_base_url
        .as_deref()
        .and_then(normalize_value)
    {
        config.api_base_url = value;
    }
    if let Some(seconds) = overrides.timeout_seconds.filter(|seconds| *seconds > 0) {
        config.timeout = Duration::from_secs(seconds);
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builds a URL from an explicit base URL and the provided path.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
