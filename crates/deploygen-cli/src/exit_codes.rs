//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.
//! Malformed command lines are rejected by clap itself with exit code 2.

/// Success - manifest written
pub const SUCCESS: u8 = 0;

/// General error - unspecified failure
pub const ERROR: u8 = 1;

/// Template error - template missing, rendering failed or output is not YAML
pub const TEMPLATE_ERROR: u8 = 3;

/// Certificate error - no recognized files in the certificates directory
pub const CERTIFICATE_ERROR: u8 = 4;

/// IO error - directory not found, permission denied, write failure
pub const IO_ERROR: u8 = 5;

/// Usage error - invalid option combination or value (sysexits.h EX_USAGE)
pub const USAGE_ERROR: u8 = 64;
