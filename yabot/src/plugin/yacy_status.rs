use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use crate::config::YacyConfig;
use crate::plugin::prelude::*;

/// The command that triggers a status lookup.
pub const COMMAND: &str = ".ppm";
/// The path of the status document, relative to the peer's base URL.
pub const STATUS_PATH: &str = "xml/status_p.xml";
/// The opening tag of the pages-per-minute element.
const PPM_TAG: &str = "<ppm>";

/// Captures the text following the opening tag, up to the next tag.
static PPM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ppm>([^<]*)").expect("ppm pattern is valid"));

/// Reports the current crawl rate of a YaCy peer.
pub struct YacyStatus {
    client: reqwest::Client,
    command: YabotCommand,
    status_url: Url,
    username: String,
    password: Option<String>,
}

/// Errors that can occur during execution.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid peer url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("peer returned an error status: {0}")]
    Status(#[source] reqwest::Error),
    #[error("unable to read status document: {0}")]
    Body(#[source] reqwest::Error),
}

/// What came of a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The message did not invoke the command.
    NotInvoked,
    /// The command ran, but the status document had no pages-per-minute figure.
    NoFigure,
    /// The command ran and found the current pages-per-minute figure.
    Figure(String),
}

#[async_trait]
impl Plugin for YacyStatus {
    fn new(ctx: &Context) -> Result<Self, YabotError> {
        Self::with_client(ctx.http.clone(), &ctx.config.yacy)
            .map_err(|err| YabotError::Plugin(Box::new(err)))
    }

    fn name() -> Name {
        Name::from("yacy_status")
    }

    fn author() -> Author {
        Author::from("Mikkel Kroman <mk@maero.dk>")
    }

    fn version() -> Version {
        Version::from("0.1")
    }

    async fn handle_message(
        &self,
        message: &Message,
        client: &Client,
    ) -> Result<Propagation, YabotError> {
        let Command::PRIVMSG(_, ref user_message) = message.command else {
            return Ok(Propagation::Continue);
        };

        let outcome = self
            .process(user_message)
            .await
            .map_err(|err| YabotError::Plugin(Box::new(err)))?;

        match outcome {
            Outcome::NotInvoked => Ok(Propagation::Continue),
            Outcome::NoFigure => Ok(Propagation::Stop),
            Outcome::Figure(ppm) => {
                if let Some(target) = message.response_target() {
                    client.send_action(target, ppm)?;
                }

                Ok(Propagation::Stop)
            }
        }
    }
}

impl YacyStatus {
    /// Creates a new plugin that polls the peer described by `config` using `client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the status URL cannot be derived from the configured base URL.
    pub fn with_client(client: reqwest::Client, config: &YacyConfig) -> Result<Self, Error> {
        Ok(Self {
            client,
            command: YabotCommand::new(COMMAND),
            status_url: status_url(&config.url)?,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Returns the URL of the status document.
    #[must_use]
    pub const fn status_url(&self) -> &Url {
        &self.status_url
    }

    /// Fetches the status document if `user_message` invokes the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the status document could not be fetched.
    pub async fn process(&self, user_message: &str) -> Result<Outcome, Error> {
        if !self.command.is_invoked_by(user_message) {
            return Ok(Outcome::NotInvoked);
        }

        Ok(self
            .fetch_ppm()
            .await?
            .map_or(Outcome::NoFigure, Outcome::Figure))
    }

    /// Requests the status document and extracts the pages-per-minute figure from it.
    ///
    /// Returns `Ok(None)` if the document has no pages-per-minute figure.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the peer responds with a non-success status (e.g.
    /// because the credentials were rejected), or the body cannot be read.
    #[instrument(skip(self), fields(url = %self.status_url))]
    pub async fn fetch_ppm(&self) -> Result<Option<String>, Error> {
        debug!("requesting status document");

        let response = self
            .client
            .get(self.status_url.clone())
            .basic_auth(&self.username, self.password.as_ref())
            .send()
            .await
            .map_err(Error::Request)?
            .error_for_status()
            .map_err(Error::Status)?;
        let body = response.text().await.map_err(Error::Body)?;
        let ppm = extract_ppm(&body);

        debug!(?ppm, "extracted pages per minute");

        Ok(ppm)
    }
}

/// Returns the URL of the status document for the peer at `base`.
///
/// # Errors
///
/// Returns an error if `base` cannot be a base URL.
pub fn status_url(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();

    // Without a trailing slash the last path segment would be replaced when joining.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(STATUS_PATH)
}

/// Extracts the pages-per-minute figure from a status document.
///
/// Only the first line containing `<ppm>` is considered. The figure is the text between the tag
/// and the next tag on that line, with surrounding whitespace trimmed. A line without any text
/// after the tag yields no figure.
#[must_use]
pub fn extract_ppm(body: &str) -> Option<String> {
    let line = body.lines().find(|line| line.contains(PPM_TAG))?;
    let figure = PPM_RE.captures(line)?.get(1)?.as_str().trim();

    (!figure.is_empty()).then(|| figure.to_string())
}
