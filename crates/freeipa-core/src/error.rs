//! Error types for FreeIPA connection handling.
//!
//! All wrapping variants keep the underlying library or OS failure text
//! verbatim so operators can diagnose the exact base64/IO cause without
//! access to this crate's internals.

use crate::diagnostics::Diagnostics;
use thiserror::Error;

/// Main error type for FreeIPA configuration and connection handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// One or more required configuration fields are missing
    #[error("invalid FreeIPA configuration: {0}")]
    Validation(Diagnostics),

    /// Inline keytab base64 text could not be decoded
    #[error("failed to decode keytab_base64: {0}")]
    KeytabDecode(String),

    /// Keytab file could not be opened
    #[error("failed to open keytab {path}: {reason}")]
    KeytabNotFound {
        /// Path that was attempted
        path: String,
        /// OS-level failure reason
        reason: String,
    },

    /// Keytab path was empty when a path-based keytab was required
    #[error("keytab_path is empty")]
    EmptyKeytabPath,

    /// krb5 configuration file could not be opened
    #[error("failed to open krb5 configuration {path}: {reason}")]
    ConfigFile {
        /// Path that was attempted
        path: String,
        /// OS-level failure reason
        reason: String,
    },

    /// HTTP transport could not be constructed
    #[error("failed to build HTTP transport: {0}")]
    Transport(String),

    /// The directory client rejected the handshake or the network failed
    #[error("failed to connect to FreeIPA: {0}")]
    Connection(String),
}

/// Specialized result type for FreeIPA operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::KeytabDecode(_) => "KEYTAB_DECODE",
            Self::KeytabNotFound { .. } => "KEYTAB_NOT_FOUND",
            Self::EmptyKeytabPath => "KEYTAB_PATH_EMPTY",
            Self::ConfigFile { .. } => "CONFIG_FILE",
            Self::Transport(_) => "TRANSPORT",
            Self::Connection(_) => "CONNECTION",
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigFile { .. } | Self::Transport(_) | Self::Connection(_)
        )
    }

    /// Wraps a failure that crossed the directory client boundary.
    ///
    /// Errors that are already connection errors pass through unchanged so
    /// the underlying message is never wrapped twice.
    #[must_use]
    pub fn into_connection(self) -> Self {
        match self {
            connection @ Self::Connection(_) => connection,
            other => Self::Connection(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::Validation(Diagnostics::new()).error_code(),
            "VALIDATION"
        );
        assert_eq!(
            Error::KeytabDecode("bad".to_string()).error_code(),
            "KEYTAB_DECODE"
        );
        assert_eq!(
            Error::KeytabNotFound {
                path: "/tmp/missing".to_string(),
                reason: "gone".to_string()
            }
            .error_code(),
            "KEYTAB_NOT_FOUND"
        );
        assert_eq!(Error::EmptyKeytabPath.error_code(), "KEYTAB_PATH_EMPTY");
        assert_eq!(
            Error::ConfigFile {
                path: "/etc/krb5.conf".to_string(),
                reason: "gone".to_string()
            }
            .error_code(),
            "CONFIG_FILE"
        );
        assert_eq!(
            Error::Transport("tls".to_string()).error_code(),
            "TRANSPORT"
        );
        assert_eq!(
            Error::Connection("refused".to_string()).error_code(),
            "CONNECTION"
        );
    }

    #[test]
    fn test_error_display_preserves_reason() {
        let err = Error::KeytabNotFound {
            path: "/etc/krb5.keytab".to_string(),
            reason: "No such file or directory (os error 2)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to open keytab /etc/krb5.keytab: No such file or directory (os error 2)"
        );

        let err = Error::KeytabDecode("Invalid byte 33, offset 0.".to_string());
        assert!(err.to_string().contains("Invalid byte 33, offset 0."));
    }

    #[test]
    fn test_should_log() {
        assert!(Error::Connection("refused".to_string()).should_log());
        assert!(Error::Transport("tls".to_string()).should_log());
        assert!(Error::ConfigFile {
            path: "/etc/krb5.conf".to_string(),
            reason: "gone".to_string()
        }
        .should_log());

        assert!(!Error::Validation(Diagnostics::new()).should_log());
        assert!(!Error::EmptyKeytabPath.should_log());
    }

    #[test]
    fn test_into_connection_wraps_other_errors() {
        let err = Error::Transport("handshake".to_string()).into_connection();
        assert_eq!(
            err,
            Error::Connection("failed to build HTTP transport: handshake".to_string())
        );
    }

    #[test]
    fn test_into_connection_never_double_wraps() {
        let err = Error::Connection("refused".to_string()).into_connection();
        assert_eq!(err, Error::Connection("refused".to_string()));
    }
}
