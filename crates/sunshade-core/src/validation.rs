//! Required-field validation

use crate::error::{ErrorMetadata, LogLevel};
use crate::models::{FieldValues, FormDefinition};

/// Field validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field '{label}'")]
    MissingField { label: String, message: String },

    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "MISSING_FIELD",
            ValidationError::UnknownField(_) => "UNKNOWN_FIELD",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn client_message(&self) -> String {
        match self {
            ValidationError::MissingField { message, .. } => message.clone(),
            ValidationError::UnknownField(label) => format!("The form has no field \"{}\".", label),
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Check required fields in declared order and stop at the first empty one.
///
/// A value counts as empty when it is missing or only whitespace.
pub fn validate_required(
    definition: &FormDefinition,
    values: &FieldValues,
) -> Result<(), ValidationError> {
    for field in definition.fields.iter().filter(|f| f.required) {
        let filled = values
            .get(&field.label)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        if !filled {
            return Err(ValidationError::MissingField {
                label: field.label.clone(),
                message: field.missing_message(),
            });
        }
    }
    Ok(())
}
