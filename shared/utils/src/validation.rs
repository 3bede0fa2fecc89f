use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::config::AppConfig;
use crate::error::{FdiError, FdiResult};

/// Check a loaded configuration before any workbook is touched.
///
/// Every violation is reported in one error, joined by ", ".
pub fn validate_config(config: &AppConfig) -> FdiResult<()> {
    validate_model(config)
}

pub fn validate_model<T: Validate>(model: &T) -> FdiResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(FdiError::configuration(format_validation_errors(&errors))),
    }
}

/// One message per failed check, prefixed with the dotted path of the field.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages("", errors, &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        // Struct-level checks are reported under "__all__".
        let path = match (prefix.is_empty(), *field) {
            (false, "__all__") => prefix.to_string(),
            (true, _) => field.to_string(),
            (false, _) => format!("{}.{}", prefix, field),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                messages.extend(field_errors.iter().map(|error| describe(&path, error)));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(&format!("{}[{}]", path, index), nested, messages);
                }
            }
        }
    }
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("{}: {}", field, message);
    }
    match error.code.as_ref() {
        "length" => format!("Length validation failed for field '{}'", field),
        "range" => format!("Value out of range for field '{}'", field),
        "blank" => format!("Field '{}' must not be empty", field),
        code => format!("Validation failed for field '{}': {}", field, code),
    }
}
