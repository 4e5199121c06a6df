//! Configuration structures and resolution for FreeIPA clients.
//!
//! Configuration for one connection attempt is merged from three sources
//! with fixed precedence, highest first: an explicitly set [`RawConfig`]
//! value, the named environment variable, and an injected default. Fields
//! with no value from any source resolve to empty/false.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment variable providing the FreeIPA host.
pub const ENV_HOST: &str = "FREEIPA_HOST";
/// Environment variable providing the connection username.
pub const ENV_USERNAME: &str = "FREEIPA_USERNAME";
/// Environment variable providing the connection password.
pub const ENV_PASSWORD: &str = "FREEIPA_PASSWORD";
/// Environment variable enabling Kerberos authentication.
///
/// Only the exact text `true` enables Kerberos; any other value is false.
pub const ENV_KERBEROS_ENABLED: &str = "FREEIPA_KERBEROS_ENABLED";
/// Environment variable providing the Kerberos principal.
pub const ENV_KERBEROS_PRINCIPAL: &str = "FREEIPA_KERBEROS_PRINCIPAL";
/// Environment variable providing the Kerberos realm.
pub const ENV_KERBEROS_REALM: &str = "FREEIPA_KERBEROS_REALM";
/// Environment variable providing the krb5 configuration path.
pub const ENV_KRB5_CONF: &str = "FREEIPA_KRB5_CONF";
/// Environment variable providing the keytab file path.
pub const ENV_KEYTAB: &str = "FREEIPA_KEYTAB";
/// Environment variable providing inline base64 keytab content.
pub const ENV_KEYTAB_BASE64: &str = "FREEIPA_KEYTAB_BASE64";

/// Conventional system location of the krb5 configuration file.
pub const DEFAULT_KRB5_CONF_PATH: &str = "/etc/krb5.conf";
/// Conventional system location of the host keytab.
pub const DEFAULT_KEYTAB_PATH: &str = "/etc/krb5.keytab";

/// Caller-supplied configuration with tri-state fields.
///
/// Every field distinguishes "explicitly set" from "unset"; unset fields
/// fall through to the environment and then to defaults during
/// [`resolve`]. The password and inline keytab content are sensitive and
/// are never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// FreeIPA host to connect to.
    pub host: Option<String>,

    /// Username for password authentication.
    pub username: Option<String>,

    /// Password for password authentication.
    #[serde(skip_serializing)]
    pub password: Option<SecretString>,

    /// Disable TLS certificate verification when true.
    pub insecure: Option<bool>,

    /// Use Kerberos/keytab authentication instead of username/password.
    pub kerberos_enabled: Option<bool>,

    /// Kerberos principal to authenticate as.
    pub kerberos_principal: Option<String>,

    /// Kerberos realm the principal belongs to.
    pub kerberos_realm: Option<String>,

    /// Path to the krb5 configuration file.
    pub krb5_conf_path: Option<String>,

    /// Path to the keytab file.
    pub keytab_path: Option<String>,

    /// Base64 encoded keytab content. When set it takes precedence over
    /// `keytab_path`.
    #[serde(skip_serializing)]
    pub keytab_base64: Option<SecretString>,
}

impl RawConfig {
    /// Creates an empty configuration with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the FreeIPA host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the username for password authentication.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password for password authentication.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set whether TLS certificate verification is skipped.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Enable or disable Kerberos authentication.
    #[must_use]
    pub const fn with_kerberos_enabled(mut self, enabled: bool) -> Self {
        self.kerberos_enabled = Some(enabled);
        self
    }

    /// Set the Kerberos principal.
    #[must_use]
    pub fn with_kerberos_principal(mut self, principal: impl Into<String>) -> Self {
        self.kerberos_principal = Some(principal.into());
        self
    }

    /// Set the Kerberos realm.
    #[must_use]
    pub fn with_kerberos_realm(mut self, realm: impl Into<String>) -> Self {
        self.kerberos_realm = Some(realm.into());
        self
    }

    /// Set the krb5 configuration path.
    #[must_use]
    pub fn with_krb5_conf_path(mut self, path: impl Into<String>) -> Self {
        self.krb5_conf_path = Some(path.into());
        self
    }

    /// Set the keytab file path.
    #[must_use]
    pub fn with_keytab_path(mut self, path: impl Into<String>) -> Self {
        self.keytab_path = Some(path.into());
        self
    }

    /// Set inline base64 keytab content.
    #[must_use]
    pub fn with_keytab_base64(mut self, text: impl Into<String>) -> Self {
        self.keytab_base64 = Some(SecretString::from(text.into()));
        self
    }
}

/// Default filesystem locations injected into [`resolve`].
///
/// Passed in explicitly rather than read from global state so tests and
/// embedders can point the resolver at their own paths.
#[derive(Debug, Clone)]
pub struct ConfigDefaults {
    /// Default krb5 configuration path.
    pub krb5_conf_path: String,
    /// Default keytab path.
    pub keytab_path: String,
}

impl ConfigDefaults {
    /// Creates defaults pointing at the conventional system locations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            krb5_conf_path: DEFAULT_KRB5_CONF_PATH.to_string(),
            keytab_path: DEFAULT_KEYTAB_PATH.to_string(),
        }
    }

    /// Override the default krb5 configuration path.
    #[must_use]
    pub fn with_krb5_conf_path(mut self, path: impl Into<String>) -> Self {
        self.krb5_conf_path = path.into();
        self
    }

    /// Override the default keytab path.
    #[must_use]
    pub fn with_keytab_path(mut self, path: impl Into<String>) -> Self {
        self.keytab_path = path.into();
        self
    }
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of environment variable values for [`resolve`].
///
/// Abstracted so resolution stays a pure function of its inputs and
/// precedence tests never touch process state.
pub trait EnvironmentReader {
    /// Returns the value of `name`, or `None` when unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentReader for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed in-memory environment, primarily for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    /// Creates an environment with no variables set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvironmentReader for StaticEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Fully merged, immutable configuration snapshot.
///
/// Built once per connection attempt by [`resolve`] and never mutated
/// afterwards. Exactly one authentication mode is active, determined
/// solely by [`ResolvedConfig::kerberos_enabled`]; in password mode the
/// keytab fields may still hold values but are ignored by validation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    host: String,
    username: String,
    password: SecretString,
    insecure_skip_verify: bool,
    kerberos_enabled: bool,
    kerberos_principal: String,
    kerberos_realm: String,
    krb5_conf_path: String,
    keytab_path: String,
    keytab_base64: SecretString,
}

impl ResolvedConfig {
    /// FreeIPA host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Username for password authentication.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password for password authentication.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    /// Whether TLS certificate verification is skipped.
    #[must_use]
    pub const fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }

    /// Whether Kerberos authentication is selected.
    #[must_use]
    pub const fn kerberos_enabled(&self) -> bool {
        self.kerberos_enabled
    }

    /// Kerberos principal.
    #[must_use]
    pub fn kerberos_principal(&self) -> &str {
        &self.kerberos_principal
    }

    /// Kerberos realm.
    #[must_use]
    pub fn kerberos_realm(&self) -> &str {
        &self.kerberos_realm
    }

    /// Path to the krb5 configuration file.
    #[must_use]
    pub fn krb5_conf_path(&self) -> &str {
        &self.krb5_conf_path
    }

    /// Path to the keytab file.
    #[must_use]
    pub fn keytab_path(&self) -> &str {
        &self.keytab_path
    }

    /// Inline base64 keytab content; empty when not provided.
    #[must_use]
    pub const fn keytab_base64(&self) -> &SecretString {
        &self.keytab_base64
    }
}

/// Merges raw configuration, environment, and defaults into one snapshot.
///
/// Precedence per field, highest first: explicitly set raw value, named
/// environment variable, injected default, empty/false. Environment values
/// that are set but empty are treated as unset. The Kerberos flag read from
/// the environment is recognized only via exact comparison with the text
/// `true`; the insecure flag has no environment variable. No field is
/// trimmed or case-normalized here.
#[must_use]
pub fn resolve(
    raw: &RawConfig,
    env: &dyn EnvironmentReader,
    defaults: &ConfigDefaults,
) -> ResolvedConfig {
    let env_var = |name: &str| env.var(name).filter(|value| !value.is_empty());

    let host = raw
        .host
        .clone()
        .or_else(|| env_var(ENV_HOST))
        .unwrap_or_default();

    let username = raw
        .username
        .clone()
        .or_else(|| env_var(ENV_USERNAME))
        .unwrap_or_default();

    let password = raw
        .password
        .clone()
        .or_else(|| env_var(ENV_PASSWORD).map(SecretString::from))
        .unwrap_or_else(|| SecretString::from(String::new()));

    let insecure_skip_verify = raw.insecure.unwrap_or(false);

    let kerberos_enabled = raw
        .kerberos_enabled
        .unwrap_or_else(|| env_var(ENV_KERBEROS_ENABLED).as_deref() == Some("true"));

    let kerberos_principal = raw
        .kerberos_principal
        .clone()
        .or_else(|| env_var(ENV_KERBEROS_PRINCIPAL))
        .unwrap_or_default();

    let kerberos_realm = raw
        .kerberos_realm
        .clone()
        .or_else(|| env_var(ENV_KERBEROS_REALM))
        .unwrap_or_default();

    let krb5_conf_path = raw
        .krb5_conf_path
        .clone()
        .or_else(|| env_var(ENV_KRB5_CONF))
        .unwrap_or_else(|| defaults.krb5_conf_path.clone());

    let keytab_path = raw
        .keytab_path
        .clone()
        .or_else(|| env_var(ENV_KEYTAB))
        .unwrap_or_else(|| defaults.keytab_path.clone());

    let keytab_base64 = raw
        .keytab_base64
        .clone()
        .or_else(|| env_var(ENV_KEYTAB_BASE64).map(SecretString::from))
        .unwrap_or_else(|| SecretString::from(String::new()));

    ResolvedConfig {
        host,
        username,
        password,
        insecure_skip_verify,
        kerberos_enabled,
        kerberos_principal,
        kerberos_realm,
        krb5_conf_path,
        keytab_path,
        keytab_base64,
    }
}
