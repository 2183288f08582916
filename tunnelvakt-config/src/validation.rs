//! Custom validation functions for configuration.
//!
//! Shared validation logic used across configuration modules.

use std::path::Path;

use validator::ValidationError;

/// Validate that an audit log path names a writable-looking file location:
/// non-empty, has a file name component, and does not point at a directory.
pub fn validate_audit_path(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() || path.file_name().is_none() {
        return Err(ValidationError::new("empty_audit_path"));
    }
    if path.is_dir() {
        return Err(ValidationError::new("audit_path_is_directory"));
    }
    Ok(())
}

/// Validate that an inter-arrival interval is non-zero; a zero interval would
/// freeze the virtual clock and produce indistinguishable audit timestamps.
pub fn validate_interval(interval_ns: u64) -> Result<(), ValidationError> {
    if interval_ns == 0 {
        return Err(ValidationError::new("zero_interval"));
    }
    Ok(())
}
