//! The directory client boundary.
//!
//! The FreeIPA RPC client is an external collaborator; this module defines
//! the trait it must implement and the opaque handle it hands back.

use crate::keytab::KeytabStream;
use async_trait::async_trait;
use freeipa_core::Result;
use secrecy::SecretString;
use std::fmt;
use std::fs::File;

/// Authentication mode a handle was bootstrapped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Username/password authentication.
    Password,
    /// Kerberos keytab authentication.
    Kerberos,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password => f.write_str("password"),
            Self::Kerberos => f.write_str("kerberos"),
        }
    }
}

/// Inputs for a Kerberos connect call.
///
/// Owns both streams; they are closed when this value drops, which happens
/// once the connect call completes, regardless of outcome.
#[derive(Debug)]
pub struct KerberosConnectOptions {
    /// Open krb5 configuration file.
    pub krb5_conf: File,
    /// Keytab byte stream.
    pub keytab: KeytabStream,
    /// Kerberos principal to authenticate as.
    pub principal: String,
    /// Kerberos realm the principal belongs to.
    pub realm: String,
}

/// Boundary to the external FreeIPA RPC client.
///
/// Implementations perform the actual handshake; errors they return are
/// wrapped as connection errors by the bootstrap flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Performs a username/password connect against `host`.
    async fn connect_password(
        &self,
        host: &str,
        transport: reqwest::Client,
        username: &str,
        password: &SecretString,
    ) -> Result<DirectoryHandle>;

    /// Performs a keytab-based Kerberos connect against `host`.
    async fn connect_kerberos(
        &self,
        host: &str,
        transport: reqwest::Client,
        options: KerberosConnectOptions,
    ) -> Result<DirectoryHandle>;
}

/// Opaque, reusable handle to a connected FreeIPA client.
///
/// Cheap to clone; downstream directory-object operations treat it as a
/// shared, long-lived resource.
#[derive(Debug, Clone)]
pub struct DirectoryHandle {
    host: String,
    mode: AuthMode,
    transport: reqwest::Client,
}

impl DirectoryHandle {
    /// Creates a handle. Called by connector implementations after a
    /// successful handshake.
    #[must_use]
    pub fn new(host: impl Into<String>, mode: AuthMode, transport: reqwest::Client) -> Self {
        Self {
            host: host.into(),
            mode,
            transport,
        }
    }

    /// Host the handle is connected to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Authentication mode the handle was bootstrapped with.
    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Transport the handle was bootstrapped with.
    #[must_use]
    pub const fn transport(&self) -> &reqwest::Client {
        &self.transport
    }
}
