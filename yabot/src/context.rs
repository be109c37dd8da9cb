use crate::{Config, Error, http};

/// Shared context for plugin invocations.
pub struct Context {
    /// The bot configuration.
    pub config: Config,
    /// The shared HTTP client.
    pub http: reqwest::Client,
}

impl Context {
    /// Creates a new context with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = http::build_client().map_err(Error::HttpClient)?;

        Ok(Self::with_client(config, http))
    }

    /// Creates a new context around an existing HTTP client.
    #[must_use]
    pub const fn with_client(config: Config, http: reqwest::Client) -> Self {
        Self { config, http }
    }
}
