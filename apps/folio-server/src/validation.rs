//! Input shape validation
//!
//! Runs after JSON decoding and before authentication, so a malformed request
//! never reveals anything about stored rows.

use crate::error::{AppError, Result};
use crate::patch::Field;

/// Field-level rules that serde cannot express
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn require_optional_non_empty(field: &str, value: Option<&String>) -> Result<()> {
    match value {
        Some(value) => require_non_empty(field, value),
        None => Ok(()),
    }
}

pub fn require_at_least(field: &str, value: i64, min: i64) -> Result<()> {
    if value < min {
        return Err(AppError::InvalidInput(format!(
            "{} must be at least {}",
            field, min
        )));
    }
    Ok(())
}

/// Reject an update that carries no patch fields
pub fn require_patch(is_empty: bool) -> Result<()> {
    if is_empty {
        return Err(AppError::InvalidInput(
            "At least one field to update must be provided".to_string(),
        ));
    }
    Ok(())
}

/// Validate the value of a patch field, if one was supplied
pub fn check_field<T, F>(field: &Field<T>, check: F) -> Result<()>
where
    F: FnOnce(&T) -> Result<()>,
{
    match field.value() {
        Some(value) => check(value),
        None => Ok(()),
    }
}
