//! Host environment detection.
//!
//! Classifies the host into the dispatch key the recipe table is indexed by.
//! Linux detection prefers the `PRETTY_NAME` field of `/etc/os-release` and
//! falls back to `lsb_release -ds`; Debian/RHEL lineage is decided by
//! distribution-name fragments plus the classic marker files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Broad platform family, from the compile-time target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Windows,
    Linux,
    Macos,
    Unknown,
}

impl OsFamily {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => OsFamily::Windows,
            "linux" => OsFamily::Linux,
            "macos" => OsFamily::Macos,
            _ => OsFamily::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Windows => "Windows",
            OsFamily::Linux => "Linux",
            OsFamily::Macos => "Darwin",
            OsFamily::Unknown => "Unknown",
        }
    }
}

/// Recipe dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsClass {
    Windows,
    Macos,
    DebianBased,
    RhelBased,
    LinuxUnknown,
}

impl OsClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsClass::Windows => "windows",
            OsClass::Macos => "macos",
            OsClass::DebianBased => "debian_based",
            OsClass::RhelBased => "rhel_based",
            OsClass::LinuxUnknown => "linux_unknown",
        }
    }
}

impl std::fmt::Display for OsClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detected host environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsReport {
    pub family: OsFamily,
    pub class: OsClass,
    /// Human-readable description: distro pretty name, macOS version, etc.
    pub details: String,
}

/// Probe the live host.
pub fn detect() -> OsReport {
    let family = OsFamily::current();

    match family {
        OsFamily::Windows => OsReport {
            family,
            class: OsClass::Windows,
            details: format!("Windows ({})", std::env::consts::ARCH),
        },
        OsFamily::Linux => {
            let details = linux_distribution();
            let class = classify_linux(
                &details,
                Path::new("/etc/debian_version").exists(),
                Path::new("/etc/redhat-release").exists(),
            );
            OsReport {
                family,
                class,
                details,
            }
        }
        OsFamily::Macos => OsReport {
            family,
            class: OsClass::Macos,
            details: macos_version(),
        },
        OsFamily::Unknown => OsReport {
            family,
            class: OsClass::LinuxUnknown,
            details: format!("Unsupported platform ({})", std::env::consts::OS),
        },
    }
}

/// Classify a Linux host from its distribution description and marker files.
///
/// Total and deterministic: every input maps to exactly one class, and
/// Debian markers win over RHEL markers. Unknown distributions classify as
/// `LinuxUnknown`, which resolves to the manual-instructions path downstream.
pub fn classify_linux(details: &str, has_debian_marker: bool, has_redhat_marker: bool) -> OsClass {
    const DEBIAN_FRAGMENTS: &[&str] = &["Debian", "Ubuntu", "Mint"];
    const RHEL_FRAGMENTS: &[&str] = &["Red Hat", "CentOS", "Fedora"];

    if DEBIAN_FRAGMENTS.iter().any(|f| details.contains(f)) || has_debian_marker {
        return OsClass::DebianBased;
    }

    if RHEL_FRAGMENTS.iter().any(|f| details.contains(f)) || has_redhat_marker {
        return OsClass::RhelBased;
    }

    OsClass::LinuxUnknown
}

/// Get the Linux distribution name.
pub fn linux_distribution() -> String {
    if let Ok(os_release) = fs::read_to_string("/etc/os-release") {
        if let Some(name) = parse_pretty_name(&os_release) {
            return name;
        }
    }

    // Fall back to the lsb_release probe
    if let Ok(output) = Command::new("lsb_release").arg("-ds").output() {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    "Unknown Linux Distribution".to_string()
}

/// Get the macOS version.
pub fn macos_version() -> String {
    if let Ok(output) = Command::new("sw_vers").arg("-productVersion").output() {
        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !version.is_empty() {
                return format!("macOS {}", version);
            }
        }
    }

    "Unknown macOS Version".to_string()
}

/// Extract the PRETTY_NAME value from os-release content.
pub fn parse_pretty_name(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pretty_name() {
        let content = r#"
NAME="Ubuntu"
VERSION="22.04.3 LTS (Jammy Jellyfish)"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME="Ubuntu 22.04.3 LTS"
"#;

        assert_eq!(
            parse_pretty_name(content),
            Some("Ubuntu 22.04.3 LTS".to_string())
        );
    }

    #[test]
    fn test_parse_pretty_name_missing() {
        let content = "ID=arch\nNAME=\"Arch Linux\"\n";
        assert_eq!(parse_pretty_name(content), None);
    }

    #[test]
    fn test_parse_pretty_name_empty_value() {
        assert_eq!(parse_pretty_name("PRETTY_NAME=\"\"\n"), None);
    }

    #[test]
    fn test_classify_debian_fragments() {
        for details in [
            "Debian GNU/Linux 12 (bookworm)",
            "Ubuntu 22.04.3 LTS",
            "Linux Mint 21.2",
        ] {
            assert_eq!(
                classify_linux(details, false, false),
                OsClass::DebianBased,
                "{} should be debian_based",
                details
            );
        }
    }

    #[test]
    fn test_classify_rhel_fragments() {
        for details in [
            "Red Hat Enterprise Linux 9.2 (Plow)",
            "CentOS Stream 9",
            "Fedora Linux 39 (Workstation Edition)",
        ] {
            assert_eq!(
                classify_linux(details, false, false),
                OsClass::RhelBased,
                "{} should be rhel_based",
                details
            );
        }
    }

    #[test]
    fn test_classify_marker_files() {
        assert_eq!(
            classify_linux("Some Derivative", true, false),
            OsClass::DebianBased
        );
        assert_eq!(
            classify_linux("Some Derivative", false, true),
            OsClass::RhelBased
        );
    }

    #[test]
    fn test_classify_debian_marker_wins_over_rhel_marker() {
        assert_eq!(
            classify_linux("Some Derivative", true, true),
            OsClass::DebianBased
        );
    }

    #[test]
    fn test_classify_unknown_falls_through() {
        for details in ["Arch Linux", "openSUSE Tumbleweed", "Unknown Linux Distribution"] {
            assert_eq!(
                classify_linux(details, false, false),
                OsClass::LinuxUnknown,
                "{} should be linux_unknown",
                details
            );
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                classify_linux("Ubuntu 20.04", false, false),
                OsClass::DebianBased
            );
        }
    }

    #[test]
    fn test_os_class_labels() {
        assert_eq!(OsClass::DebianBased.as_str(), "debian_based");
        assert_eq!(OsClass::RhelBased.as_str(), "rhel_based");
        assert_eq!(OsClass::LinuxUnknown.as_str(), "linux_unknown");
    }
}
