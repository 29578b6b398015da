//! `dbbridgectl check` - environment report.

use crate::errors::{EXIT_PROBE_FAILURE, EXIT_SUCCESS};
use crate::ui;
use anyhow::Result;
use dbbridge_common::os_probe::{OsFamily, OsReport};
use dbbridge_common::php_probe;
use owo_colors::OwoColorize;

pub async fn check(report: &OsReport) -> Result<i32> {
    ui::heading("DBBridge Environment Check");

    let runtime = match php_probe::inspect() {
        Ok(runtime) => runtime,
        Err(e) => {
            ui::error(&format!("Could not inspect the PHP runtime: {:#}", e));
            ui::info("Make sure the php binary is on your PATH.");
            return Ok(EXIT_PROBE_FAILURE);
        }
    };

    ui::info(&format!("PHP Version: {}", runtime.version));
    ui::info(&format!("Operating System: {}", report.family.as_str()));
    match report.family {
        OsFamily::Linux => ui::info(&format!("Linux Distribution: {}", report.details)),
        OsFamily::Macos => ui::info(&format!("macOS Version: {}", report.details)),
        _ => ui::info(&format!("OS Details: {}", report.details)),
    }
    println!();

    ui::info("PHP Configuration:");
    ui::info(&format!(
        "Loaded php.ini: {}",
        runtime.ini_path.as_deref().unwrap_or("(none)")
    ));
    ui::info(&format!(
        "Extension directory: {}",
        runtime.extension_dir.as_deref().unwrap_or("(unknown)")
    ));
    println!();

    let status = php_probe::database_extensions(&runtime);

    ui::info("Installed Database Extensions:");
    if status.installed.is_empty() {
        ui::warn("No database extensions detected.");
    } else {
        for (family, extensions) in &status.installed {
            ui::success(&format!("{}: {}", capitalize(family), extensions.join(", ")));
        }
    }
    println!();

    if status.missing.is_empty() {
        ui::info("All common database extensions are installed!");
    } else {
        ui::info("Missing Database Extensions:");
        for (family, extensions) in &status.missing {
            println!(
                "{} {}: {}",
                "✗".red().bold(),
                capitalize(family),
                extensions.join(", ")
            );
        }
        println!();
        ui::info("You can install missing extensions using:");
        ui::info(&format!("  {}", "dbbridgectl install".bright_cyan()));
    }

    Ok(EXIT_SUCCESS)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
