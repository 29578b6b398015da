//! DBBridge Control - CLI for installing PHP database driver extensions.
//!
//! Detects the host OS and PHP runtime, then drives the system package
//! managers through the install recipes in `dbbridge_common`.

mod commands;
mod errors;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dbbridge_common::installer::InstallMethod;
use dbbridge_common::invocation_log::LogEntry;
use dbbridge_common::os_probe;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "dbbridgectl")]
#[command(about = "DBBridge - install and configure PHP database driver extensions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the PHP environment and installed database extensions
    Check,

    /// Install and configure database driver extensions
    Install {
        /// Specific extension to install (sqlsrv, oci8, mysql)
        #[arg(long)]
        extension: Option<String>,

        /// Install all available extensions
        #[arg(long)]
        all: bool,

        /// Installation method
        #[arg(long, value_enum, default_value = "guided")]
        method: MethodArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Guided,
    Automatic,
    Manual,
}

impl From<MethodArg> for InstallMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Guided => InstallMethod::Guided,
            MethodArg::Automatic => InstallMethod::Automatic,
            MethodArg::Manual => InstallMethod::Manual,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let report = os_probe::detect();
    tracing::debug!(os_class = report.class.as_str(), "environment detected");
    let start = Instant::now();

    let (name, args, outcome) = match cli.command {
        Commands::Check => ("check", Vec::new(), commands::check::check(&report).await),
        Commands::Install {
            extension,
            all,
            method,
        } => {
            let mut args = Vec::new();
            if let Some(ext) = &extension {
                args.push(format!("--extension={}", ext));
            }
            if all {
                args.push("--all".to_string());
            }
            args.push(format!("--method={:?}", method).to_lowercase());

            (
                "install",
                args,
                commands::install::install(&report, extension, all, method.into()).await,
            )
        }
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            errors::EXIT_GENERAL_ERROR
        }
    };

    let mut entry = LogEntry::new(name, args, report.class.as_str());
    entry.exit_code = exit_code;
    entry.ok = exit_code == errors::EXIT_SUCCESS;
    entry.duration_ms = start.elapsed().as_millis() as u64;
    entry.write();

    std::process::exit(exit_code);
}
