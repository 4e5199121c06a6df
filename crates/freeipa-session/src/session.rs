//! Connection bootstrap and session ownership.
//!
//! One connection attempt runs resolve, validate, materialize, and connect
//! to completion on a single logical flow. Each attempt builds its own
//! resolved snapshot and opens its own file descriptors, so independent
//! attempts may run concurrently without coordination.

use crate::connector::{AuthMode, DirectoryConnector, DirectoryHandle, KerberosConnectOptions};
use crate::keytab;
use crate::transport::build_http_client;
use freeipa_core::config::{resolve, ConfigDefaults, EnvironmentReader, RawConfig, ResolvedConfig};
use freeipa_core::validate::validate;
use freeipa_core::{Error, Result};
use secrecy::ExposeSecret;
use std::fs::File;
use tracing::info;

/// Connects to FreeIPA using a validated configuration.
///
/// Builds the transport, acquires the Kerberos credential streams when
/// Kerberos mode is selected, and invokes the matching connect path on the
/// directory connector. Both credential streams are scoped to the connect
/// call and are closed once it returns, success or failure.
///
/// On success an informational event records the host, the authentication
/// mode, and the username in password mode; never the password or keytab
/// contents.
///
/// # Errors
///
/// - [`Error::Transport`] when the HTTP client cannot be built.
/// - [`Error::ConfigFile`] when the krb5 configuration cannot be opened.
/// - Keytab materialization errors, propagated as-is.
/// - [`Error::Connection`] when the directory client rejects the handshake.
pub async fn bootstrap(
    cfg: &ResolvedConfig,
    connector: &dyn DirectoryConnector,
) -> Result<DirectoryHandle> {
    let transport = build_http_client(cfg.insecure_skip_verify())?;

    let handle = if cfg.kerberos_enabled() {
        let krb5_conf = File::open(cfg.krb5_conf_path()).map_err(|err| Error::ConfigFile {
            path: cfg.krb5_conf_path().to_string(),
            reason: err.to_string(),
        })?;
        let keytab = keytab::materialize(cfg.keytab_path(), cfg.keytab_base64().expose_secret())?;

        let options = KerberosConnectOptions {
            krb5_conf,
            keytab,
            principal: cfg.kerberos_principal().to_string(),
            realm: cfg.kerberos_realm().to_string(),
        };
        connector
            .connect_kerberos(cfg.host(), transport, options)
            .await
            .map_err(Error::into_connection)?
    } else {
        connector
            .connect_password(cfg.host(), transport, cfg.username(), cfg.password())
            .await
            .map_err(Error::into_connection)?
    };

    if cfg.kerberos_enabled() {
        info!(
            host = cfg.host(),
            mode = %AuthMode::Kerberos,
            "connected to FreeIPA"
        );
    } else {
        info!(
            host = cfg.host(),
            username = cfg.username(),
            mode = %AuthMode::Password,
            "connected to FreeIPA"
        );
    }

    Ok(handle)
}

/// Owns the directory connector and the bootstrapped client handle.
///
/// [`Session::configure`] runs the full resolve, validate, connect flow;
/// [`Session::client`] exposes the handle to downstream directory-object
/// managers once a configure has completed successfully.
pub struct Session {
    connector: Box<dyn DirectoryConnector>,
    defaults: ConfigDefaults,
    handle: Option<DirectoryHandle>,
}

impl Session {
    /// Creates a session around the given connector, using the
    /// conventional system default paths.
    #[must_use]
    pub fn new(connector: Box<dyn DirectoryConnector>) -> Self {
        Self {
            connector,
            defaults: ConfigDefaults::new(),
            handle: None,
        }
    }

    /// Override the default paths injected into configuration resolution.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolves, validates, and connects; stores the handle on success.
    ///
    /// All missing-field violations are collected and surfaced together in
    /// a single [`Error::Validation`] before any I/O happens. Failures
    /// after validation are fatal to the attempt and reported
    /// individually; no partial connection state is ever stored.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] plus every error [`bootstrap`] can return.
    pub async fn configure(
        &mut self,
        raw: &RawConfig,
        env: &dyn EnvironmentReader,
    ) -> Result<()> {
        let cfg = resolve(raw, env, &self.defaults);
        validate(&cfg).into_result()?;

        let handle = bootstrap(&cfg, self.connector.as_ref()).await?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Bootstrapped client handle; `None` until a configure succeeds.
    #[must_use]
    pub fn client(&self) -> Option<&DirectoryHandle> {
        self.handle.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockDirectoryConnector;
    use crate::keytab::KeytabStream;
    use freeipa_core::config::StaticEnvironment;
    use std::io::Write;

    fn password_raw() -> RawConfig {
        RawConfig::new()
            .with_host("ipa.example.test")
            .with_username("admin")
            .with_password("hunter2")
    }

    #[tokio::test]
    async fn password_flow_hands_resolved_credentials_to_connector() {
        let mut connector = MockDirectoryConnector::new();
        connector
            .expect_connect_password()
            .times(1)
            .withf(|host, _transport, username, password| {
                host == "ipa.example.test"
                    && username == "admin"
                    && password.expose_secret() == "hunter2"
            })
            .returning(|host, transport, _, _| {
                Ok(DirectoryHandle::new(host, AuthMode::Password, transport))
            });

        let mut session = Session::new(Box::new(connector));
        session
            .configure(&password_raw(), &StaticEnvironment::new())
            .await
            .unwrap();

        let handle = session.client().unwrap();
        assert_eq!(handle.host(), "ipa.example.test");
        assert_eq!(handle.mode(), AuthMode::Password);
    }

    #[tokio::test]
    async fn validation_failure_aborts_before_any_connector_call() {
        // No expectations set; any connector call would panic.
        let connector = MockDirectoryConnector::new();
        let mut session = Session::new(Box::new(connector));

        let raw = RawConfig::new().with_username("admin");
        let err = session
            .configure(&raw, &StaticEnvironment::new())
            .await
            .unwrap_err();

        match err {
            Error::Validation(diagnostics) => {
                assert!(diagnostics.has_field("host"));
                assert!(diagnostics.has_field("password"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(session.client().is_none());
    }

    #[tokio::test]
    async fn kerberos_flow_hands_streams_and_identity_to_connector() {
        let mut krb5_conf = tempfile::NamedTempFile::new().unwrap();
        writeln!(krb5_conf, "[libdefaults]").unwrap();

        let mut connector = MockDirectoryConnector::new();
        connector
            .expect_connect_kerberos()
            .times(1)
            .withf(|host, _transport, options| {
                host == "ipa.example.test"
                    && options.principal == "host/ipa.example.test"
                    && options.realm == "EXAMPLE.TEST"
                    && matches!(options.keytab, KeytabStream::Inline(_))
            })
            .returning(|host, transport, _| {
                Ok(DirectoryHandle::new(host, AuthMode::Kerberos, transport))
            });

        let raw = RawConfig::new()
            .with_host("ipa.example.test")
            .with_kerberos_enabled(true)
            .with_kerberos_principal("host/ipa.example.test")
            .with_kerberos_realm("EXAMPLE.TEST")
            .with_krb5_conf_path(krb5_conf.path().to_str().unwrap())
            .with_keytab_base64("BQIAAABH");

        let mut session = Session::new(Box::new(connector));
        session
            .configure(&raw, &StaticEnvironment::new())
            .await
            .unwrap();

        assert_eq!(session.client().unwrap().mode(), AuthMode::Kerberos);
    }

    #[tokio::test]
    async fn unreadable_krb5_conf_fails_before_connector_call() {
        let connector = MockDirectoryConnector::new();

        let raw = RawConfig::new()
            .with_host("ipa.example.test")
            .with_kerberos_enabled(true)
            .with_kerberos_principal("host/ipa.example.test")
            .with_kerberos_realm("EXAMPLE.TEST")
            .with_krb5_conf_path("/nonexistent/krb5.conf")
            .with_keytab_base64("BQIAAABH");

        let mut session = Session::new(Box::new(connector));
        let err = session
            .configure(&raw, &StaticEnvironment::new())
            .await
            .unwrap_err();

        match err {
            Error::ConfigFile { path, reason } => {
                assert_eq!(path, "/nonexistent/krb5.conf");
                assert!(!reason.is_empty());
            }
            other => panic!("expected ConfigFile, got {other:?}"),
        }
        assert!(session.client().is_none());
    }

    #[tokio::test]
    async fn keytab_errors_propagate_unwrapped() {
        let mut krb5_conf = tempfile::NamedTempFile::new().unwrap();
        writeln!(krb5_conf, "[libdefaults]").unwrap();

        let connector = MockDirectoryConnector::new();

        let raw = RawConfig::new()
            .with_host("ipa.example.test")
            .with_kerberos_enabled(true)
            .with_kerberos_principal("host/ipa.example.test")
            .with_kerberos_realm("EXAMPLE.TEST")
            .with_krb5_conf_path(krb5_conf.path().to_str().unwrap())
            .with_keytab_base64("!!!!");

        let mut session = Session::new(Box::new(connector));
        let err = session
            .configure(&raw, &StaticEnvironment::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::KeytabDecode(_)));
    }

    #[tokio::test]
    async fn connector_failure_wraps_as_connection_and_leaves_client_unset() {
        let mut connector = MockDirectoryConnector::new();
        connector
            .expect_connect_password()
            .times(1)
            .returning(|_, _, _, _| Err(Error::Connection("handshake rejected".to_string())));

        let mut session = Session::new(Box::new(connector));
        let err = session
            .configure(&password_raw(), &StaticEnvironment::new())
            .await
            .unwrap_err();

        assert_eq!(err, Error::Connection("handshake rejected".to_string()));
        assert!(session.client().is_none());
    }
}
