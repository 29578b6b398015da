//! `dbbridgectl install` - install and configure database driver extensions.
//!
//! Mirrors one extension at a time through the selected method: manual
//! printing, guided per-command confirmation, or unattended execution.
//! After any executing run the extension is verified against `php -m`,
//! cleanup is offered on failure, and environment persistence is applied
//! where the driver needs it.

use crate::errors::{EXIT_NOTHING_SELECTED, EXIT_SUCCESS, EXIT_UNSUPPORTED_SELECTION};
use crate::ui;
use anyhow::Result;
use dbbridge_common::exec::{self, CommandResult};
use dbbridge_common::installer::{InstallMethod, Installer};
use dbbridge_common::os_probe::{OsFamily, OsReport};
use dbbridge_common::recipes::{self, CommandSet, Extension};
use dbbridge_common::troubleshoot;
use dbbridge_common::{BridgeError, ShellRunner};
use owo_colors::OwoColorize;

pub async fn install(
    report: &OsReport,
    extension: Option<String>,
    all: bool,
    method: InstallMethod,
) -> Result<i32> {
    ui::heading("DBBridge Extension Installer");

    // Echo the detected environment before doing anything
    ui::info(&format!(
        "Detected Operating System: {}",
        report.family.as_str()
    ));
    match report.family {
        OsFamily::Linux => ui::info(&format!("Linux Distribution: {}", report.details)),
        OsFamily::Macos => ui::info(&format!("macOS Version: {}", report.details)),
        _ => ui::info(&format!("OS Details: {}", report.details)),
    }
    println!();

    let extensions = match select_extensions(extension, all)? {
        Ok(extensions) => extensions,
        Err(exit_code) => return Ok(exit_code),
    };

    if extensions.is_empty() {
        ui::error("No extensions selected for installation.");
        return Ok(EXIT_NOTHING_SELECTED);
    }

    let installer = Installer::new(report.clone(), ShellRunner::new());

    for extension in extensions {
        install_extension(&installer, extension, method).await?;
    }

    println!();
    ui::info("Installation process completed.");
    ui::info(&format!(
        "Run {} to verify your installation.",
        "dbbridgectl check".bright_cyan()
    ));

    Ok(EXIT_SUCCESS)
}

/// Figure out which extensions to install from flags or interactively.
///
/// The outer error is an I/O failure; the inner `Err` carries an exit code
/// for a bad `--extension` value.
fn select_extensions(
    extension: Option<String>,
    all: bool,
) -> Result<std::result::Result<Vec<Extension>, i32>> {
    if let Some(id) = extension {
        return match Extension::from_id(&id) {
            Some(ext) => Ok(Ok(vec![ext])),
            None => {
                ui::error(&format!("{}", BridgeError::UnknownExtension(id)));
                Ok(Err(EXIT_UNSUPPORTED_SELECTION))
            }
        };
    }

    if all {
        return Ok(Ok(Extension::ALL.to_vec()));
    }

    // Interactive selection
    ui::info("Available database extensions:");
    for (index, ext) in Extension::ALL.iter().enumerate() {
        println!(
            "  {} {} ({})",
            format!("[{}]", index + 1).cyan(),
            ext.display_name(),
            ext.id().dimmed()
        );
    }
    println!();

    let selected = ui::ask("Which extensions would you like to install? (comma-separated numbers, e.g. 1,3)")?;
    if selected.is_empty() {
        return Ok(Ok(Vec::new()));
    }

    let mut extensions = Vec::new();
    for token in selected.split(',') {
        if let Ok(number) = token.trim().parse::<usize>() {
            if let Some(ext) = number
                .checked_sub(1)
                .and_then(|i| Extension::ALL.get(i).copied())
            {
                if !extensions.contains(&ext) {
                    extensions.push(ext);
                }
            }
        }
    }

    Ok(Ok(extensions))
}

async fn install_extension(
    installer: &Installer,
    extension: Extension,
    method: InstallMethod,
) -> Result<()> {
    println!();
    ui::info(&format!(
        "Installing {} extension...",
        extension.display_name().bold()
    ));

    if method == InstallMethod::Manual {
        show_manual_instructions(installer.report().class, extension);
        return Ok(());
    }

    let plan = installer.plan(extension);
    let commands = match plan.set {
        CommandSet::Commands(commands) => commands,
        CommandSet::Manual(_) | CommandSet::Unsupported => {
            ui::error(&format!(
                "No automated installation commands available for {} on {}.",
                extension.display_name(),
                installer.report().class
            ));
            show_manual_instructions(installer.report().class, extension);
            return Ok(());
        }
    };

    if !exec::running_as_root() {
        ui::error("This command requires root privileges. Please run with sudo.");
        return Ok(());
    }

    match method {
        InstallMethod::Guided => guided_installation(installer, commands).await?,
        InstallMethod::Automatic => automatic_installation(installer, extension).await?,
        InstallMethod::Manual => unreachable!("handled above"),
    }

    // Verify installation
    println!();
    ui::info(&format!(
        "Verifying {} installation...",
        extension.display_name()
    ));
    match installer.verify(extension) {
        Ok(true) => {
            ui::success(&format!(
                "{} extension is successfully installed and loaded.",
                extension.php_extension()
            ));
        }
        Ok(false) => {
            ui::error(&format!(
                "{} extension is not loaded.",
                extension.php_extension()
            ));
            show_extension_troubleshooting(extension);

            ui::warn(&format!(
                "The {} extension installation may not be complete.",
                extension.display_name()
            ));
            if ui::confirm("Would you like to clean up failed installation files?", true)? {
                ui::info("Cleaning up...");
                for result in installer.cleanup_failed_install(extension).await {
                    report_result(&result);
                }
                ui::info("Cleanup completed.");
            }
        }
        Err(e) => {
            ui::warn(&format!("Verification inconclusive: {:#}", e));
        }
    }

    // Persist environment variables where the driver needs them
    let persisted = installer.ensure_env_persistence(extension).await;
    if !persisted.is_empty() {
        ui::info("Environment variables have been configured to persist across sessions.");
        ui::info("You may need to log out and log back in for these changes to take effect.");
    }

    Ok(())
}

async fn guided_installation(installer: &Installer, commands: &[&str]) -> Result<()> {
    ui::info("Guided installation:");

    for (index, command) in commands.iter().enumerate() {
        println!();
        println!("{} Command: {}", format!("{}.", index + 1).cyan(), command);

        if !ui::confirm("Execute this command?", false)? {
            ui::warn("Command skipped.");
            continue;
        }

        let result = installer.runner().run(command).await;
        report_result(&result);

        if !result.success() {
            offer_troubleshooting(command);
        }
    }

    Ok(())
}

async fn automatic_installation(installer: &Installer, extension: Extension) -> Result<()> {
    ui::info("Automatic installation:");

    let outcome = installer.run_automatic(extension).await?;

    for result in &outcome.results {
        println!();
        ui::info(&format!("Executing: {}", result.command));
        report_result(result);
    }

    if let Some(index) = outcome.aborted_at {
        ui::error("Critical command failed. Installation may be incomplete.");
        offer_troubleshooting(&outcome.results[index].command);
    }

    Ok(())
}

/// Print a finished command's outcome: real output, no reinterpretation.
fn report_result(result: &CommandResult) {
    let stdout = result.stdout.trim();
    if !stdout.is_empty() {
        println!("{}", stdout);
        if result.stdout_truncated {
            println!("{}", "(output truncated)".dimmed());
        }
    }

    if result.success() {
        ui::success(&format!("done in {}ms", result.duration_ms));
    } else {
        let stderr = result.stderr.trim();
        let detail = if stderr.is_empty() {
            "Command execution failed."
        } else {
            stderr
        };
        ui::error(&format!(
            "{} ({}, exit code {})",
            detail,
            result.status.as_str(),
            result.exit_code
        ));
    }
}

fn offer_troubleshooting(command: &str) {
    if let Some((topic, hints)) = troubleshoot::command_hints(command) {
        println!();
        ui::info(&format!("Troubleshooting {}:", topic));
        for (index, hint) in hints.iter().enumerate() {
            ui::info(&format!("{}. {}", index + 1, hint));
        }
    }
}

fn show_manual_instructions(class: dbbridge_common::OsClass, extension: Extension) {
    ui::info(&format!(
        "Manual installation instructions for {}:",
        extension.display_name()
    ));

    let requirements = recipes::requirements(extension, class);
    if !requirements.is_empty() {
        ui::info("Requirements:");
        for requirement in requirements {
            ui::info(&format!("  - {}", requirement));
        }
    }

    match recipes::manual_steps(extension, class) {
        Some(steps) => {
            for (index, step) in steps.iter().enumerate() {
                ui::info(&format!("{}. {}", index + 1, step));
            }
        }
        None => {
            ui::info(
                "No specific instructions available for your OS. Please refer to the official documentation:",
            );
            ui::info(&format!(
                "  {}: {}",
                extension.display_name(),
                extension.docs_url().bright_cyan()
            ));
        }
    }
}

fn show_extension_troubleshooting(extension: Extension) {
    let hints = troubleshoot::extension_hints(extension);
    if hints.is_empty() {
        return;
    }

    ui::info(&format!(
        "Troubleshooting steps for {}:",
        extension.php_extension()
    ));
    for (index, hint) in hints.iter().enumerate() {
        ui::info(&format!("{}. {}", index + 1, hint));
    }
}
