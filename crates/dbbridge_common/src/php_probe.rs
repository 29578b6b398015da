//! PHP runtime inspection.
//!
//! All facts come from the `php` binary on PATH: version, loaded ini,
//! extension directory and the loaded extension list. Nothing here embeds
//! a PHP runtime.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::process::Command;

/// Database driver families and the PHP extensions backing them.
pub const DB_EXTENSION_FAMILIES: &[(&str, &[&str])] = &[
    ("mysql", &["mysqli", "pdo_mysql"]),
    ("sqlsrv", &["sqlsrv", "pdo_sqlsrv"]),
    ("oracle", &["oci8", "pdo_oci"]),
    ("pgsql", &["pgsql", "pdo_pgsql"]),
    ("sqlite", &["sqlite3", "pdo_sqlite"]),
];

/// Snapshot of the local PHP installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhpRuntime {
    pub version: String,
    /// Loaded php.ini, if one is configured.
    pub ini_path: Option<String>,
    pub extension_dir: Option<String>,
    /// Lowercased names from `php -m`.
    pub extensions: Vec<String>,
}

impl PhpRuntime {
    pub fn has_extension(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.extensions.iter().any(|e| *e == name)
    }
}

/// Per-family partition of installed and missing database extensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseExtensionStatus {
    pub installed: Vec<(String, Vec<String>)>,
    pub missing: Vec<(String, Vec<String>)>,
}

/// Inspect the local PHP installation.
pub fn inspect() -> Result<PhpRuntime> {
    let version = php_eval("echo PHP_VERSION;").context("failed to query PHP version")?;
    let extension_dir = php_eval("echo ini_get('extension_dir');")
        .ok()
        .filter(|s| !s.is_empty());
    let ini_path = loaded_ini_path()?;
    let extensions = loaded_extensions()?;

    Ok(PhpRuntime {
        version,
        ini_path,
        extension_dir,
        extensions,
    })
}

/// Check whether a PHP extension is currently loaded.
pub fn extension_loaded(name: &str) -> Result<bool> {
    let extensions = loaded_extensions()?;
    let name = name.to_lowercase();
    Ok(extensions.iter().any(|e| *e == name))
}

/// List loaded extensions via `php -m`.
pub fn loaded_extensions() -> Result<Vec<String>> {
    let output = Command::new("php")
        .arg("-m")
        .output()
        .context("failed to execute php -m (is php installed?)")?;

    if !output.status.success() {
        anyhow::bail!("php -m failed with {}", output.status);
    }

    Ok(parse_module_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `php -m` output: skip `[PHP Modules]` style section headers and
/// blank lines, lowercase the rest.
pub fn parse_module_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('['))
        .map(str::to_lowercase)
        .collect()
}

/// Partition the known driver families into installed and missing sets.
pub fn database_extensions(runtime: &PhpRuntime) -> DatabaseExtensionStatus {
    let mut status = DatabaseExtensionStatus::default();

    for (family, extensions) in DB_EXTENSION_FAMILIES {
        let mut installed = Vec::new();
        let mut missing = Vec::new();

        for ext in *extensions {
            if runtime.has_extension(ext) {
                installed.push(ext.to_string());
            } else {
                missing.push(ext.to_string());
            }
        }

        if !installed.is_empty() {
            status.installed.push((family.to_string(), installed));
        }
        if !missing.is_empty() {
            status.missing.push((family.to_string(), missing));
        }
    }

    status
}

/// Run a PHP one-liner and return its trimmed stdout.
fn php_eval(code: &str) -> Result<String> {
    let output = Command::new("php")
        .args(["-r", code])
        .output()
        .context("failed to execute php (is php installed?)")?;

    if !output.status.success() {
        anyhow::bail!("php -r failed with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Find the loaded php.ini from `php --ini`.
fn loaded_ini_path() -> Result<Option<String>> {
    let output = Command::new("php")
        .arg("--ini")
        .output()
        .context("failed to execute php --ini")?;

    if !output.status.success() {
        anyhow::bail!("php --ini failed with {}", output.status);
    }

    Ok(parse_loaded_ini(&String::from_utf8_lossy(&output.stdout)))
}

/// Extract the "Loaded Configuration File" value, `None` when unset.
pub fn parse_loaded_ini(output: &str) -> Option<String> {
    for line in output.lines() {
        if let Some(value) = line.strip_prefix("Loaded Configuration File:") {
            let value = value.trim();
            if value.is_empty() || value == "(none)" {
                return None;
            }
            return Some(value.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime_with(extensions: &[&str]) -> PhpRuntime {
        PhpRuntime {
            version: "8.2.12".to_string(),
            ini_path: Some("/etc/php/8.2/cli/php.ini".to_string()),
            extension_dir: Some("/usr/lib/php/20220829".to_string()),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    #[test]
    fn test_parse_module_list() {
        let output = "[PHP Modules]\nCore\ncurl\nmysqli\nPDO\npdo_mysql\n\n[Zend Modules]\nZend OPcache\n";
        let modules = parse_module_list(output);

        assert!(modules.contains(&"mysqli".to_string()));
        assert!(modules.contains(&"pdo_mysql".to_string()));
        assert!(modules.contains(&"pdo".to_string()));
        assert!(!modules.iter().any(|m| m.starts_with('[')));
        assert!(!modules.contains(&String::new()));
    }

    #[test]
    fn test_parse_loaded_ini() {
        let output = "Configuration File (php.ini) Path: /etc/php/8.2/cli\nLoaded Configuration File:         /etc/php/8.2/cli/php.ini\n";
        assert_eq!(
            parse_loaded_ini(output),
            Some("/etc/php/8.2/cli/php.ini".to_string())
        );
    }

    #[test]
    fn test_parse_loaded_ini_none() {
        let output = "Configuration File (php.ini) Path: /etc\nLoaded Configuration File:         (none)\n";
        assert_eq!(parse_loaded_ini(output), None);
        assert_eq!(parse_loaded_ini(""), None);
    }

    #[test]
    fn test_database_extensions_partition() {
        let runtime = runtime_with(&["mysqli", "pdo_mysql", "sqlite3", "pdo_sqlite", "sqlsrv"]);
        let status = database_extensions(&runtime);

        let installed_mysql = status
            .installed
            .iter()
            .find(|(family, _)| family == "mysql")
            .expect("mysql family should be installed");
        assert_eq!(installed_mysql.1, vec!["mysqli", "pdo_mysql"]);

        // sqlsrv is half-installed: sqlsrv loaded, pdo_sqlsrv missing
        assert!(status.installed.iter().any(|(f, _)| f == "sqlsrv"));
        let missing_sqlsrv = status
            .missing
            .iter()
            .find(|(family, _)| family == "sqlsrv")
            .expect("pdo_sqlsrv should be missing");
        assert_eq!(missing_sqlsrv.1, vec!["pdo_sqlsrv"]);

        // Oracle fully missing
        let missing_oracle = status
            .missing
            .iter()
            .find(|(family, _)| family == "oracle")
            .expect("oracle family should be missing");
        assert_eq!(missing_oracle.1, vec!["oci8", "pdo_oci"]);
        assert!(!status.installed.iter().any(|(f, _)| f == "oracle"));
    }

    #[test]
    fn test_has_extension_is_case_insensitive() {
        let runtime = runtime_with(&["mysqli", "PDO"]);
        assert!(runtime.has_extension("MySQLi"));
        assert!(runtime.has_extension("pdo"));
        assert!(!runtime.has_extension("oci8"));
    }
}
