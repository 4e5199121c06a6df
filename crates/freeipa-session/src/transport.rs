//! HTTP transport construction.

use freeipa_core::{Error, Result};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::warn;

const USER_AGENT: &str = concat!("freeipa-session/", env!("CARGO_PKG_VERSION"));

/// Connect timeout applied to the transport (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds the HTTP client handed to the directory connector.
///
/// TLS certificate verification is skipped if and only if
/// `insecure_skip_verify` is true. Outbound proxy behavior follows the
/// ambient process proxy configuration; it is not overridable per field.
/// Cookies are enabled because FreeIPA sessions are cookie-based.
///
/// # Errors
///
/// Returns [`Error::Transport`] when the client cannot be constructed.
pub fn build_http_client(insecure_skip_verify: bool) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .cookie_store(true);

    if insecure_skip_verify {
        warn!("TLS certificate verification disabled for FreeIPA transport");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|err| Error::Transport(err.to_string()))
}
