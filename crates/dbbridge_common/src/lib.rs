//! DBBridge common library.
//!
//! Environment probes, the static install recipe table, the shell execution
//! layer, and the installer that ties them together. The `dbbridgectl` binary
//! owns all user interaction; nothing in this crate prints to the terminal.

pub mod error;
pub mod exec;
pub mod installer;
pub mod invocation_log;
pub mod os_probe;
pub mod php_probe;
pub mod recipes;
pub mod troubleshoot;

pub use error::BridgeError;
pub use exec::{CommandResult, ExecStatus, ShellRunner};
pub use installer::{InstallMethod, InstallOutcome, InstallPlan, Installer};
pub use os_probe::{OsClass, OsFamily, OsReport};
pub use recipes::{CommandSet, Extension};
