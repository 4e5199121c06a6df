//! Keytab materialization and connection bootstrap for FreeIPA clients.
//!
//! This crate turns a validated configuration into a connected directory
//! client handle: it materializes keytab bytes from a path or inline
//! base64 text, builds the HTTP transport, and drives the appropriate
//! authentication path through the [`DirectoryConnector`] boundary.

#![deny(missing_docs)]

mod connector;
mod keytab;
mod session;
mod transport;

pub use connector::{AuthMode, DirectoryConnector, DirectoryHandle, KerberosConnectOptions};
pub use keytab::{materialize, KeytabStream};
pub use session::{bootstrap, Session};
pub use transport::{build_http_client, DEFAULT_CONNECT_TIMEOUT_SECS};

/// Convenient result alias that reuses the core error type.
pub type Result<T> = freeipa_core::Result<T>;
