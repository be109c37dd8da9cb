//! HTTP features

use reqwest::{Client, ClientBuilder};

use crate::consts;

/// Returns a default HTTP client builder.
///
/// Redirects are not followed and requests time out after [`consts::HTTP_TIMEOUT`].
#[must_use]
pub fn builder() -> ClientBuilder {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(consts::HTTP_TIMEOUT)
        .user_agent(consts::HTTP_USER_AGENT)
}

/// Builds a default HTTP client.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client() -> Result<Client, reqwest::Error> {
    builder().build()
}
