use std::time::Duration;

/// The `User-Agent` header to send when issuing HTTP requests.
pub const HTTP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The duration before a HTTP request times out.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The environment variable prefix for configuration overrides.
pub const CONFIG_ENV_PREFIX: &str = "YABOT_";

/// The default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
