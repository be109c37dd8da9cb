//! Configuration loading
use std::collections::HashMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

use crate::consts;

/// The complete bot configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Tracing configuration
    #[serde(default)]
    pub tracing: TracingConfig,
    /// IRC client configuration
    pub irc: IrcConfig,
    /// YaCy peer configuration
    pub yacy: YacyConfig,
}

impl Config {
    /// Returns the figment that layers environment variables prefixed with `YABOT_` on top of the
    /// TOML file at `path`.
    ///
    /// Nested keys are separated by `__`, e.g. `YABOT_YACY__PASSWORD`.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(consts::CONFIG_ENV_PREFIX).split("__"))
    }

    /// Loads the configuration from the TOML file at `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider fails or a required value is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        let path = path.as_ref();

        trace!(?path, "loading config");

        let config = Self::figment(path).extract()?;

        trace!(?path, "loaded config");

        Ok(config)
    }
}

/// OpenTelemetry export settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TracingConfig {
    /// Enable tracing
    pub enabled: bool,
}

/// Connection details for the YaCy peer whose status is polled.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct YacyConfig {
    /// The base URL of the peer, e.g. `http://localhost:8090`.
    pub url: Url,
    /// The administrator username.
    pub username: String,
    /// The administrator password.
    pub password: Option<String>,
}

/// Per-channel settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrcChannelConfig {
    /// The shared key to access the channel.
    pub key: Option<String>,
}

/// TLS settings for the IRC connection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrcTlsConfig {
    /// Enable TLS.
    pub enabled: bool,
}

/// IRC network and identity settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrcConfig {
    /// The client's nickname.
    pub nickname: String,
    /// Alternative nicknames for the client, if the default is taken.
    #[serde(default)]
    pub alt_nicks: Vec<String>,
    /// The client's username.
    pub username: Option<String>,
    /// The client's real name.
    pub realname: Option<String>,
    /// The hostname of the server to connect to.
    pub hostname: String,
    /// The password to connect to the server.
    pub password: Option<String>,
    /// The port number of the server to connect to.
    pub port: Option<u16>,
    /// TLS configuration.
    pub tls: Option<IrcTlsConfig>,
    /// List of channels to join.
    #[serde(default)]
    pub channels: HashMap<String, Option<IrcChannelConfig>>,
}

impl IrcConfig {
    /// Returns the configured port, or the default port for the chosen transport.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.fallback_port())
    }

    /// Return the port number to use based on whether the connection requires TLS or not.
    fn fallback_port(&self) -> u16 {
        if self.tls.as_ref().is_some_and(|tls| tls.enabled) {
            6697
        } else {
            6667
        }
    }
}

impl From<IrcConfig> for irc::client::data::Config {
    fn from(config: IrcConfig) -> Self {
        let port = config.port();
        let use_tls = config.tls.as_ref().map(|tls| tls.enabled);
        let channel_keys = config
            .channels
            .iter()
            .filter_map(|(name, channel)| {
                let key = channel.as_ref()?.key.clone()?;

                Some((name.clone(), key))
            })
            .collect();
        let channels = config.channels.into_keys().collect();

        Self {
            nickname: Some(config.nickname),
            alt_nicks: config.alt_nicks,
            username: config.username,
            realname: config.realname,
            server: Some(config.hostname),
            password: config.password,
            port: Some(port),
            use_tls,
            channels,
            channel_keys,
            ..Default::default()
        }
    }
}
