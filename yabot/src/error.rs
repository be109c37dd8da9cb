//! Error types

use miette::Diagnostic;
use thiserror::Error;

/// Application errors for configuration, IRC, and plugin operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration could not be loaded or is invalid.
    #[error("Could not load configuration")]
    Config(#[source] Box<figment::Error>),
    /// Failed to create the IRC client.
    #[error("Could not create IRC client")]
    IrcClient(#[source] irc::error::Error),
    /// Failed to register with the IRC server.
    #[error("Could not send registration details for IRC")]
    IrcRegistration(#[source] irc::error::Error),
    /// General IRC communication error.
    #[error("IRC error")]
    Irc(#[from] irc::error::Error),
    /// Failed to build the shared HTTP client.
    #[error("Could not build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Plugin system error.
    #[error("Plugin error: {0}")]
    Plugin(Box<dyn std::error::Error + Send + Sync>),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
