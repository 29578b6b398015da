//! Extension installer.
//!
//! Resolves the recipe for the detected OS class and executes it serially
//! through the shell runner. Guided mode is driven from the CLI (one
//! confirmation per command); automatic mode runs unattended here and stops
//! at the first failed critical command. Verification asks the local PHP
//! whether the target extension actually loads.

use crate::error::BridgeError;
use crate::exec::{self, CommandResult, ShellRunner};
use crate::os_probe::OsReport;
use crate::php_probe;
use crate::recipes::{self, CommandSet, Extension};
use serde::{Deserialize, Serialize};

/// How an install run interacts with the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMethod {
    /// Per-command confirmation.
    Guided,
    /// Run every command unattended.
    Automatic,
    /// Print the steps, execute nothing.
    Manual,
}

impl InstallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallMethod::Guided => "guided",
            InstallMethod::Automatic => "automatic",
            InstallMethod::Manual => "manual",
        }
    }
}

/// Resolved recipe for one extension on the detected host.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub extension: Extension,
    pub set: CommandSet,
}

impl InstallPlan {
    pub fn commands(&self) -> Option<&'static [&'static str]> {
        match self.set {
            CommandSet::Commands(commands) => Some(commands),
            _ => None,
        }
    }
}

/// Record of an unattended run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallOutcome {
    pub extension: Extension,
    pub results: Vec<CommandResult>,
    /// Index of the critical command that stopped the run, if any.
    pub aborted_at: Option<usize>,
}

impl InstallOutcome {
    pub fn succeeded(&self) -> bool {
        self.aborted_at.is_none() && self.results.iter().all(|r| r.success())
    }
}

pub struct Installer {
    report: OsReport,
    runner: ShellRunner,
}

impl Installer {
    pub fn new(report: OsReport, runner: ShellRunner) -> Self {
        Self { report, runner }
    }

    pub fn report(&self) -> &OsReport {
        &self.report
    }

    pub fn runner(&self) -> &ShellRunner {
        &self.runner
    }

    /// Resolve the recipe for the detected OS class.
    pub fn plan(&self, extension: Extension) -> InstallPlan {
        InstallPlan {
            extension,
            set: recipes::resolve(extension, self.report.class),
        }
    }

    /// Run every recipe command unattended.
    ///
    /// A failed critical command (package install, pecl, ldconfig) stops the
    /// sequence; non-critical failures are recorded and execution continues.
    pub async fn run_automatic(&self, extension: Extension) -> Result<InstallOutcome, BridgeError> {
        let plan = self.plan(extension);
        let commands = plan.commands().ok_or_else(|| BridgeError::UnsupportedPlatform {
            extension: extension.id().to_string(),
            os: self.report.class.to_string(),
        })?;

        if !exec::running_as_root() {
            return Err(BridgeError::RootRequired);
        }

        let mut results = Vec::with_capacity(commands.len());
        let mut aborted_at = None;

        for (index, command) in commands.iter().enumerate() {
            tracing::info!(extension = extension.id(), %command, "running install command");
            let result = self.runner.run(command).await;
            let failed = !result.success();
            let critical = exec::is_critical(command);
            results.push(result);

            if failed {
                tracing::warn!(
                    extension = extension.id(),
                    %command,
                    critical,
                    "install command failed"
                );
                if critical {
                    aborted_at = Some(index);
                    break;
                }
            }
        }

        Ok(InstallOutcome {
            extension,
            results,
            aborted_at,
        })
    }

    /// Check whether the target PHP extension now loads.
    pub fn verify(&self, extension: Extension) -> anyhow::Result<bool> {
        php_probe::extension_loaded(extension.php_extension())
    }

    /// Remove leftovers from a failed install. Only oci8 leaves any.
    pub async fn cleanup_failed_install(&self, extension: Extension) -> Vec<CommandResult> {
        let commands: &[&str] = match extension {
            Extension::Oci8 => &[
                "rm -f /opt/oracle/instantclient-basiclite-linuxx64.zip",
                "rm -f /etc/php/*/mods-available/oci8.ini",
            ],
            _ => &[],
        };

        let mut results = Vec::new();
        for command in commands {
            results.push(self.runner.run(command).await);
        }
        results
    }

    /// Persist runtime environment variables across sessions.
    ///
    /// oci8 needs LD_LIBRARY_PATH pointing at the instant client in every
    /// shell, so the export line is appended to the system-wide profile
    /// files when not already present.
    pub async fn ensure_env_persistence(&self, extension: Extension) -> Vec<CommandResult> {
        if extension != Extension::Oci8 {
            return Vec::new();
        }

        const EXPORT_LINE: &str =
            "export LD_LIBRARY_PATH=/opt/oracle/instantclient_*:$LD_LIBRARY_PATH";
        const PROFILE_FILES: &[&str] = &["/etc/profile.d/oracle.sh", "/etc/environment"];

        let mut results = Vec::new();

        for file in PROFILE_FILES {
            let check = self
                .runner
                .run(&format!("grep -qxF '{}' {}", EXPORT_LINE, file))
                .await;
            if check.success() {
                continue;
            }

            let append = self
                .runner
                .run(&format!("echo '{}' | tee -a {}", EXPORT_LINE, file))
                .await;
            let appended = append.success();
            results.push(append);

            if appended && file.ends_with(".sh") {
                results.push(self.runner.run(&format!("chmod +x {}", file)).await);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os_probe::{OsClass, OsFamily};

    fn report(class: OsClass) -> OsReport {
        OsReport {
            family: OsFamily::Linux,
            class,
            details: "test".to_string(),
        }
    }

    #[test]
    fn test_plan_resolves_for_detected_class() {
        let installer = Installer::new(report(OsClass::DebianBased), ShellRunner::new());
        let plan = installer.plan(Extension::Mysql);

        let commands = plan.commands().expect("debian mysql has commands");
        assert!(commands.iter().any(|c| c.contains("php-mysql")));
    }

    #[test]
    fn test_plan_unknown_distro_has_no_commands() {
        let installer = Installer::new(report(OsClass::LinuxUnknown), ShellRunner::new());
        let plan = installer.plan(Extension::Sqlsrv);

        assert!(plan.commands().is_none());
        assert_eq!(plan.set, CommandSet::Unsupported);
    }

    #[tokio::test]
    async fn test_run_automatic_unsupported_platform() {
        let installer = Installer::new(report(OsClass::LinuxUnknown), ShellRunner::new());
        let err = installer
            .run_automatic(Extension::Oci8)
            .await
            .expect_err("linux_unknown must not execute anything");

        assert!(matches!(err, BridgeError::UnsupportedPlatform { .. }));
    }

    #[tokio::test]
    async fn test_cleanup_is_noop_for_non_oci8() {
        let installer = Installer::new(report(OsClass::DebianBased), ShellRunner::new());
        assert!(installer
            .cleanup_failed_install(Extension::Mysql)
            .await
            .is_empty());
        assert!(installer
            .cleanup_failed_install(Extension::Sqlsrv)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_env_persistence_is_noop_for_non_oci8() {
        let installer = Installer::new(report(OsClass::DebianBased), ShellRunner::new());
        assert!(installer
            .ensure_env_persistence(Extension::Mysql)
            .await
            .is_empty());
    }

    #[test]
    fn test_outcome_success_accounting() {
        let ok = CommandResult {
            command: "true".to_string(),
            exit_code: 0,
            stdout: String::new(),
            stdout_truncated: false,
            stderr: String::new(),
            stderr_truncated: false,
            duration_ms: 1,
            status: crate::exec::ExecStatus::Success,
        };
        let mut failed = ok.clone();
        failed.exit_code = 1;
        failed.status = crate::exec::ExecStatus::NonZeroExit;

        let outcome = InstallOutcome {
            extension: Extension::Mysql,
            results: vec![ok.clone()],
            aborted_at: None,
        };
        assert!(outcome.succeeded());

        let outcome = InstallOutcome {
            extension: Extension::Mysql,
            results: vec![ok, failed],
            aborted_at: None,
        };
        assert!(!outcome.succeeded());
    }
}
