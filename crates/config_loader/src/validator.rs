//! Configuration validation
//!
//! Rules:
//! - field constraints declared on the config types (port, capacity, sizes)
//! - `log_folder` contains `%HOSTNAME%`
//! - bind address is not blank

use contracts::{CollectorConfig, ContractError, HOSTNAME_PLACEHOLDER};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a CollectorConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &CollectorConfig) -> Result<(), ContractError> {
    validate_constraints(config)?;
    validate_log_folder(config)?;
    validate_address(config)?;
    Ok(())
}

/// Declarative field constraints
fn validate_constraints(config: &CollectorConfig) -> Result<(), ContractError> {
    match config.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_violation(&errors, "")
                .unwrap_or_else(|| (String::from("<config>"), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// The template must route by hostname
fn validate_log_folder(config: &CollectorConfig) -> Result<(), ContractError> {
    if !config.log_folder.contains(HOSTNAME_PLACEHOLDER) {
        return Err(ContractError::config_validation(
            "log_folder",
            format!(
                "template '{}' does not contain {HOSTNAME_PLACEHOLDER}",
                config.log_folder
            ),
        ));
    }
    Ok(())
}

fn validate_address(config: &CollectorConfig) -> Result<(), ContractError> {
    if config.server.address.trim().is_empty() {
        return Err(ContractError::config_validation(
            "server.address",
            "bind address cannot be empty",
        ));
    }
    Ok(())
}

/// Walk nested validation errors in name order and report the first one
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (name, kind) in entries {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                if let Some(violation) = violations.first() {
                    let message = match violation.params.get("value") {
                        Some(value) => format!("failed '{}' check (got {value})", violation.code),
                        None => format!("failed '{}' check", violation.code),
                    };
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                if let Some(found) = first_violation(nested, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    if let Some(found) = first_violation(nested, &format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}
