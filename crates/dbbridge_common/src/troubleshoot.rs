//! Troubleshooting hints shown after failures.
//!
//! Static per-command and per-extension tip lists. The CLI prints them; the
//! installer only decides when they apply.

use crate::recipes::Extension;

const PECL_OCI8_HINTS: &[&str] = &[
    "Make sure PECL is installed: sudo apt-get install php-pear php-dev",
    "Check Oracle Instant Client path: ls -la /opt/oracle/",
    "Verify LD_LIBRARY_PATH: echo $LD_LIBRARY_PATH",
];

const UNZIP_HINTS: &[&str] = &[
    "Check if the zip file exists: ls -la /opt/oracle/",
    "Install unzip if missing: sudo apt-get install unzip",
];

const DOWNLOAD_HINTS: &[&str] = &[
    "Check internet connectivity",
    "Verify the URL is accessible",
    "Try downloading manually and uploading to the server",
];

const OCI8_EXTENSION_HINTS: &[&str] = &[
    "Check if the extension file exists: ls -la /usr/lib/php/*/oci8.so",
    "Verify Oracle client installation: ls -la /opt/oracle/instantclient_*",
    "Check PHP configuration: php --ini",
    "Ensure LD_LIBRARY_PATH is set: echo $LD_LIBRARY_PATH",
    "Check for any errors in PHP logs: tail -n 50 /var/log/php*",
    "Make sure the extension is enabled: sudo phpenmod oci8 && sudo service apache2 restart",
];

const SQLSRV_EXTENSION_HINTS: &[&str] = &[
    "Check if the extension files exist: ls -la /usr/lib/php/*/sqlsrv.so /usr/lib/php/*/pdo_sqlsrv.so",
    "Verify ODBC driver installation: odbcinst -q -d",
    "Check PHP configuration: php --ini",
    "Make sure the extensions are enabled: sudo phpenmod sqlsrv pdo_sqlsrv && sudo service apache2 restart",
];

/// Tips for a specific failed command, if we recognize it.
pub fn command_hints(command: &str) -> Option<(&'static str, &'static [&'static str])> {
    if command.contains("pecl install oci8") {
        return Some(("pecl install", PECL_OCI8_HINTS));
    }
    if command.contains("unzip") {
        return Some(("unzip", UNZIP_HINTS));
    }
    if command.contains("wget") || command.contains("curl -O") {
        return Some(("download", DOWNLOAD_HINTS));
    }

    None
}

/// Tips shown when an extension fails post-install verification.
pub fn extension_hints(extension: Extension) -> &'static [&'static str] {
    match extension {
        Extension::Oci8 => OCI8_EXTENSION_HINTS,
        Extension::Sqlsrv => SQLSRV_EXTENSION_HINTS,
        Extension::Mysql => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_hints_recognized() {
        assert!(command_hints("echo '\\n' | pecl install oci8").is_some());
        assert!(command_hints("cd /opt/oracle && unzip instantclient.zip").is_some());
        assert!(command_hints("wget https://example.com/x.zip").is_some());
        assert!(command_hints("apt-get update").is_none());
    }

    #[test]
    fn test_extension_hints() {
        assert!(!extension_hints(Extension::Oci8).is_empty());
        assert!(!extension_hints(Extension::Sqlsrv).is_empty());
        assert!(extension_hints(Extension::Mysql).is_empty());
    }
}
