//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (sizes > 0, retention >= 1, address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `logging.max_files`).
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("'{}' is not a socket address", config.server.bind_address),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs",
            message: "must be greater than 0".to_string(),
        });
    }
    if config.server.max_body_size == 0 {
        errors.push(ValidationError {
            field: "server.max_body_size",
            message: "must be greater than 0".to_string(),
        });
    }
    if config.logging.directory.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "logging.directory",
            message: "must not be empty".to_string(),
        });
    }
    if config.logging.max_file_size == 0 {
        errors.push(ValidationError {
            field: "logging.max_file_size",
            message: "must be greater than 0".to_string(),
        });
    }
    if config.logging.max_files == 0 {
        errors.push(ValidationError {
            field: "logging.max_files",
            message: "must keep at least one backup".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.server.bind_address = "not an address".to_string();
        config.logging.max_file_size = 0;
        config.logging.max_files = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["server.bind_address", "logging.max_file_size", "logging.max_files"]
        );
    }
}
