//! Exit codes for dbbridgectl failure modes.

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when an unknown extension is requested
pub const EXIT_UNSUPPORTED_SELECTION: i32 = 64;

/// Exit code when no extension was selected for installation
pub const EXIT_NOTHING_SELECTED: i32 = 65;

/// Exit code when the environment probe fails (no php binary, etc.)
pub const EXIT_PROBE_FAILURE: i32 = 70;
