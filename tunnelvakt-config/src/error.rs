//! Configuration load and validation errors.
//!
//! Everything that can fail between pointing tunnelvakt at a policy file and
//! holding a validated `TunnelvaktConfig`: the file is missing, figment cannot
//! parse or merge a provider, or the merged values violate a policy
//! constraint.

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Error loading or validating a tunnelvakt configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested policy file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The merged configuration violates a policy constraint (out-of-range
    /// detection threshold, empty profile list, zero interval). The engine
    /// refuses to start with an undefined policy.
    #[error("Invalid configuration:\n{}", format_field_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment could not read, parse, or merge a provider (YAML syntax,
    /// type mismatch, malformed environment override).
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),
}

/// Renders one line per offending field so a bad policy file is diagnosable
/// from the error message alone.
fn format_field_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, errors) in errors.field_errors() {
        let _ = writeln!(output, "Field '{}':", field);
        for error in errors {
            let message = match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
