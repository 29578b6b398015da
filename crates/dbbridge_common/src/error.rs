//! Error types shared across the workspace.
//!
//! Probe failures carry their context through `anyhow`; this enum covers the
//! failures the installer raises itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown extension '{0}' (expected sqlsrv, oci8 or mysql)")]
    UnknownExtension(String),

    #[error("no installation recipe for {extension} on {os}")]
    UnsupportedPlatform { extension: String, os: String },

    #[error("root privileges required, re-run with sudo")]
    RootRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = BridgeError::UnknownExtension("pgsql".to_string());
        assert!(err.to_string().contains("pgsql"));

        let err = BridgeError::UnsupportedPlatform {
            extension: "sqlsrv".to_string(),
            os: "linux_unknown".to_string(),
        };
        assert!(err.to_string().contains("sqlsrv"));
        assert!(err.to_string().contains("linux_unknown"));

        assert!(BridgeError::RootRequired.to_string().contains("sudo"));
    }
}
