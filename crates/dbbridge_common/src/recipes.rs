//! Install recipe table.
//!
//! Static configuration mapping (extension, OS class) to either a shell
//! command sequence, a set of numbered manual steps, or an unsupported
//! marker. This is data, not logic: the commands mirror the vendor-documented
//! install procedures for each driver.

use crate::os_probe::OsClass;
use serde::{Deserialize, Serialize};

/// Database driver extensions this tool can install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    Sqlsrv,
    Oci8,
    Mysql,
}

impl Extension {
    pub const ALL: [Extension; 3] = [Extension::Sqlsrv, Extension::Oci8, Extension::Mysql];

    pub fn id(&self) -> &'static str {
        match self {
            Extension::Sqlsrv => "sqlsrv",
            Extension::Oci8 => "oci8",
            Extension::Mysql => "mysql",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "sqlsrv" => Some(Extension::Sqlsrv),
            "oci8" => Some(Extension::Oci8),
            "mysql" => Some(Extension::Mysql),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Extension::Sqlsrv => "SQL Server",
            Extension::Oci8 => "Oracle",
            Extension::Mysql => "MySQL",
        }
    }

    /// Primary PHP extension, the one checked during verification.
    pub fn php_extension(&self) -> &'static str {
        match self {
            Extension::Sqlsrv => "sqlsrv",
            Extension::Oci8 => "oci8",
            Extension::Mysql => "mysqli",
        }
    }

    /// Companion PDO driver, where the recipe installs one.
    pub fn pdo_extension(&self) -> Option<&'static str> {
        match self {
            Extension::Sqlsrv => Some("pdo_sqlsrv"),
            Extension::Oci8 => None,
            Extension::Mysql => Some("pdo_mysql"),
        }
    }

    /// Official documentation fallback for unsupported platforms.
    pub fn docs_url(&self) -> &'static str {
        match self {
            Extension::Sqlsrv => {
                "https://docs.microsoft.com/en-us/sql/connect/php/microsoft-php-driver-for-sql-server"
            }
            Extension::Oci8 => "https://www.php.net/manual/en/oci8.installation.php",
            Extension::Mysql => "https://www.php.net/manual/en/mysqli.installation.php",
        }
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What the table holds for one (extension, OS class) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSet {
    /// Shell commands to run in order.
    Commands(&'static [&'static str]),
    /// Numbered manual steps, nothing to execute.
    Manual(&'static [&'static str]),
    /// No entry for this OS class; fall back to manual instructions.
    Unsupported,
}

const SQLSRV_DEBIAN: &[&str] = &[
    "curl https://packages.microsoft.com/keys/microsoft.asc | apt-key add -",
    "curl https://packages.microsoft.com/config/ubuntu/$(lsb_release -rs)/prod.list > /etc/apt/sources.list.d/mssql-release.list",
    "apt-get update",
    "ACCEPT_EULA=Y apt-get install -y msodbcsql17 unixodbc-dev",
    "pecl install sqlsrv pdo_sqlsrv",
    "echo \"extension=sqlsrv.so\" > /etc/php/$(php -r \"echo PHP_MAJOR_VERSION.\\\".\\\".PHP_MINOR_VERSION;\")/mods-available/sqlsrv.ini",
    "echo \"extension=pdo_sqlsrv.so\" > /etc/php/$(php -r \"echo PHP_MAJOR_VERSION.\\\".\\\".PHP_MINOR_VERSION;\")/mods-available/pdo_sqlsrv.ini",
    "phpenmod -v $(php -r \"echo PHP_MAJOR_VERSION.\\\".\\\".PHP_MINOR_VERSION;\") sqlsrv pdo_sqlsrv",
];

const SQLSRV_RHEL: &[&str] = &[
    "curl https://packages.microsoft.com/config/rhel/8/prod.repo > /etc/yum.repos.d/mssql-release.repo",
    "ACCEPT_EULA=Y yum install -y msodbcsql17 unixODBC-devel",
    "yum install -y php-pear php-devel",
    "pecl install sqlsrv pdo_sqlsrv",
    "echo \"extension=sqlsrv.so\" > /etc/php.d/30-sqlsrv.ini",
    "echo \"extension=pdo_sqlsrv.so\" > /etc/php.d/35-pdo_sqlsrv.ini",
];

const SQLSRV_MACOS: &[&str] = &[
    "brew tap microsoft/mssql-release https://github.com/Microsoft/homebrew-mssql-release",
    "brew update",
    "ACCEPT_EULA=Y brew install msodbcsql17 mssql-tools unixodbc",
    "pecl install sqlsrv pdo_sqlsrv",
    "echo \"extension=sqlsrv.so\" >> $(php --ini | grep \"Loaded Configuration\" | sed -e \"s|.*:\\s*||\")",
    "echo \"extension=pdo_sqlsrv.so\" >> $(php --ini | grep \"Loaded Configuration\" | sed -e \"s|.*:\\s*||\")",
];

const SQLSRV_WINDOWS_STEPS: &[&str] = &[
    "Download the SQLSRV drivers from the Microsoft GitHub repository",
    "Extract the appropriate DLL files to your PHP extensions directory",
    "Add extension=sqlsrv.dll and extension=pdo_sqlsrv.dll to your php.ini file",
    "Restart your web server",
];

const SQLSRV_WINDOWS_REQUIREMENTS: &[&str] = &[
    "Microsoft ODBC Driver for SQL Server",
    "Microsoft Visual C++ Redistributable",
];

const OCI8_DEBIAN: &[&str] = &[
    "apt-get update",
    "apt-get install -y libaio1",
    "mkdir -p /opt/oracle",
    "cd /opt/oracle && wget https://download.oracle.com/otn_software/linux/instantclient/instantclient-basiclite-linuxx64.zip",
    "cd /opt/oracle && unzip instantclient-basiclite-linuxx64.zip",
    "echo \"/opt/oracle/instantclient_*\" > /etc/ld.so.conf.d/oracle-instantclient.conf",
    "ldconfig",
    "export LD_LIBRARY_PATH=/opt/oracle/instantclient_*:$LD_LIBRARY_PATH",
    "pecl install oci8",
    "echo \"extension=oci8.so\" > /etc/php/$(php -r \"echo PHP_MAJOR_VERSION.\\\".\\\".PHP_MINOR_VERSION;\")/mods-available/oci8.ini",
    "phpenmod -v $(php -r \"echo PHP_MAJOR_VERSION.\\\".\\\".PHP_MINOR_VERSION;\") oci8",
];

const OCI8_RHEL: &[&str] = &[
    "yum install -y libaio",
    "mkdir -p /opt/oracle",
    "cd /opt/oracle && wget https://download.oracle.com/otn_software/linux/instantclient/instantclient-basiclite-linuxx64.zip",
    "cd /opt/oracle && unzip instantclient-basiclite-linuxx64.zip",
    "echo \"/opt/oracle/instantclient_*\" > /etc/ld.so.conf.d/oracle-instantclient.conf",
    "ldconfig",
    "export LD_LIBRARY_PATH=/opt/oracle/instantclient_*:$LD_LIBRARY_PATH",
    "pecl install oci8",
    "echo \"extension=oci8.so\" > /etc/php.d/20-oci8.ini",
];

const OCI8_MACOS: &[&str] = &[
    "mkdir -p /opt/oracle",
    "cd /opt/oracle && curl -O https://download.oracle.com/otn_software/mac/instantclient/instantclient-basiclite-macos.zip",
    "cd /opt/oracle && unzip instantclient-basiclite-macos.zip",
    "export DYLD_LIBRARY_PATH=/opt/oracle/instantclient_*:$DYLD_LIBRARY_PATH",
    "pecl install oci8",
    "echo \"extension=oci8.so\" >> $(php --ini | grep \"Loaded Configuration\" | sed -e \"s|.*:\\s*||\")",
];

const OCI8_WINDOWS_STEPS: &[&str] = &[
    "Download Oracle Instant Client from Oracle website",
    "Extract the files to a directory (e.g., C:\\oracle\\instantclient)",
    "Add the directory to your PATH environment variable",
    "Install the OCI8 extension using PECL or download pre-compiled DLL",
    "Add extension=oci8.dll to your php.ini file",
    "Restart your web server",
];

const MYSQL_DEBIAN: &[&str] = &[
    "apt-get update",
    "apt-get install -y php-mysql",
    "phpenmod -v $(php -r \"echo PHP_MAJOR_VERSION.\\\".\\\".PHP_MINOR_VERSION;\") mysqli pdo_mysql",
];

const MYSQL_RHEL: &[&str] = &["yum install -y php-mysql"];

const MYSQL_MACOS: &[&str] = &[
    "brew install php",
    "echo \"extension=mysqli.so\" >> $(php --ini | grep \"Loaded Configuration\" | sed -e \"s|.*:\\s*||\")",
    "echo \"extension=pdo_mysql.so\" >> $(php --ini | grep \"Loaded Configuration\" | sed -e \"s|.*:\\s*||\")",
];

const MYSQL_WINDOWS_STEPS: &[&str] = &[
    "MySQL extensions are typically included with PHP by default",
    "Ensure extension=mysqli and extension=pdo_mysql are uncommented in php.ini",
    "Restart your web server",
];

/// Resolve the command set for an extension on an OS class.
///
/// Total: every pair resolves. `LinuxUnknown` always resolves to
/// `Unsupported` so unknown distributions land on the manual path.
pub fn resolve(extension: Extension, class: OsClass) -> CommandSet {
    match (extension, class) {
        (Extension::Sqlsrv, OsClass::DebianBased) => CommandSet::Commands(SQLSRV_DEBIAN),
        (Extension::Sqlsrv, OsClass::RhelBased) => CommandSet::Commands(SQLSRV_RHEL),
        (Extension::Sqlsrv, OsClass::Macos) => CommandSet::Commands(SQLSRV_MACOS),
        (Extension::Sqlsrv, OsClass::Windows) => CommandSet::Manual(SQLSRV_WINDOWS_STEPS),

        (Extension::Oci8, OsClass::DebianBased) => CommandSet::Commands(OCI8_DEBIAN),
        (Extension::Oci8, OsClass::RhelBased) => CommandSet::Commands(OCI8_RHEL),
        (Extension::Oci8, OsClass::Macos) => CommandSet::Commands(OCI8_MACOS),
        (Extension::Oci8, OsClass::Windows) => CommandSet::Manual(OCI8_WINDOWS_STEPS),

        (Extension::Mysql, OsClass::DebianBased) => CommandSet::Commands(MYSQL_DEBIAN),
        (Extension::Mysql, OsClass::RhelBased) => CommandSet::Commands(MYSQL_RHEL),
        (Extension::Mysql, OsClass::Macos) => CommandSet::Commands(MYSQL_MACOS),
        (Extension::Mysql, OsClass::Windows) => CommandSet::Manual(MYSQL_WINDOWS_STEPS),

        (_, OsClass::LinuxUnknown) => CommandSet::Unsupported,
    }
}

/// Manual installation steps, where the table carries them.
pub fn manual_steps(extension: Extension, class: OsClass) -> Option<&'static [&'static str]> {
    match (extension, class) {
        (Extension::Sqlsrv, OsClass::Windows) => Some(SQLSRV_WINDOWS_STEPS),
        (Extension::Oci8, OsClass::Windows) => Some(OCI8_WINDOWS_STEPS),
        (Extension::Mysql, OsClass::Windows) => Some(MYSQL_WINDOWS_STEPS),
        _ => None,
    }
}

/// Extra prerequisites worth calling out before the steps.
pub fn requirements(extension: Extension, class: OsClass) -> &'static [&'static str] {
    match (extension, class) {
        (Extension::Sqlsrv, OsClass::Windows) => SQLSRV_WINDOWS_REQUIREMENTS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CLASSES: [OsClass; 5] = [
        OsClass::Windows,
        OsClass::Macos,
        OsClass::DebianBased,
        OsClass::RhelBased,
        OsClass::LinuxUnknown,
    ];

    #[test]
    fn test_resolution_is_total() {
        for ext in Extension::ALL {
            for class in ALL_CLASSES {
                // Must not panic; every pair resolves to something.
                let _ = resolve(ext, class);
            }
        }
    }

    #[test]
    fn test_linux_unknown_is_always_unsupported() {
        for ext in Extension::ALL {
            assert_eq!(resolve(ext, OsClass::LinuxUnknown), CommandSet::Unsupported);
        }
    }

    #[test]
    fn test_windows_is_always_manual() {
        for ext in Extension::ALL {
            assert!(matches!(
                resolve(ext, OsClass::Windows),
                CommandSet::Manual(_)
            ));
        }
    }

    #[test]
    fn test_debian_and_rhel_lists_differ() {
        for ext in Extension::ALL {
            let debian = resolve(ext, OsClass::DebianBased);
            let rhel = resolve(ext, OsClass::RhelBased);
            assert_ne!(debian, rhel, "{} should have distinct lists", ext.id());
        }
    }

    #[test]
    fn test_sqlsrv_debian_uses_apt_and_pecl() {
        let CommandSet::Commands(commands) = resolve(Extension::Sqlsrv, OsClass::DebianBased)
        else {
            panic!("expected commands");
        };

        assert!(commands.iter().any(|c| c.contains("apt-get install")));
        assert!(commands.iter().any(|c| c.contains("pecl install sqlsrv")));
        assert!(!commands.iter().any(|c| c.contains("yum")));
    }

    #[test]
    fn test_sqlsrv_rhel_uses_yum() {
        let CommandSet::Commands(commands) = resolve(Extension::Sqlsrv, OsClass::RhelBased) else {
            panic!("expected commands");
        };

        assert!(commands.iter().any(|c| c.contains("yum install")));
        assert!(!commands.iter().any(|c| c.contains("apt-get")));
    }

    #[test]
    fn test_macos_recipes_use_brew_or_instantclient() {
        let CommandSet::Commands(sqlsrv) = resolve(Extension::Sqlsrv, OsClass::Macos) else {
            panic!("expected commands");
        };
        assert!(sqlsrv.iter().any(|c| c.starts_with("brew ")));

        let CommandSet::Commands(oci8) = resolve(Extension::Oci8, OsClass::Macos) else {
            panic!("expected commands");
        };
        assert!(oci8.iter().any(|c| c.contains("instantclient-basiclite-macos.zip")));
    }

    #[test]
    fn test_extension_ids_round_trip() {
        for ext in Extension::ALL {
            assert_eq!(Extension::from_id(ext.id()), Some(ext));
        }
        assert_eq!(Extension::from_id("pgsql"), None);
    }

    #[test]
    fn test_docs_url_always_present() {
        for ext in Extension::ALL {
            assert!(ext.docs_url().starts_with("https://"));
        }
    }

    #[test]
    fn test_windows_requirements() {
        assert_eq!(requirements(Extension::Sqlsrv, OsClass::Windows).len(), 2);
        assert!(requirements(Extension::Mysql, OsClass::Windows).is_empty());
        assert!(requirements(Extension::Sqlsrv, OsClass::DebianBased).is_empty());
    }
}
