//! Error taxonomy for board operations.
//!
//! # Responsibility
//! - Separate recoverable user-facing failures from fatal page errors.
//!
//! # Invariants
//! - `Validation` never coincides with a state mutation.
//! - `Ui` errors mean a broken page; callers do not retry them.
//! - A move to an unknown id is not an error; see `MoveOutcome::NotFound`.

use crate::config::ConfigError;
use crate::ui::surface::UiError;
use crate::validation::RuleViolation;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input field of the project form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    People,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::People => "people",
        }
    }
}

/// Why one field was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationReason {
    Rule(RuleViolation),
    NotANumber(String),
}

/// User input failed a declared constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: FormField,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn rule(field: FormField, violation: RuleViolation) -> Self {
        Self {
            field,
            reason: ValidationReason::Rule(violation),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            ValidationReason::Rule(violation) => {
                write!(f, "invalid {}: {violation}", self.field.as_str())
            }
            ValidationReason::NotANumber(raw) => {
                write!(f, "invalid {}: `{raw}` is not a whole number", self.field.as_str())
            }
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.reason {
            ValidationReason::Rule(violation) => Some(violation),
            ValidationReason::NotANumber(_) => None,
        }
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Umbrella error for board entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardError {
    Validation(ValidationError),
    Ui(UiError),
    Config(ConfigError),
}

impl BoardError {
    /// True for failures the user can fix by re-entering input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Ui(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Ui(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ValidationError> for BoardError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<UiError> for BoardError {
    fn from(value: UiError) -> Self {
        Self::Ui(value)
    }
}

impl From<ConfigError> for BoardError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardError, FormField, ValidationError, ValidationReason};
    use crate::ui::surface::UiError;
    use crate::validation::RuleViolation;

    #[test]
    fn only_validation_is_recoverable() {
        let validation = BoardError::from(ValidationError::rule(
            FormField::Title,
            RuleViolation::Required,
        ));
        assert!(validation.is_recoverable());

        let fatal = BoardError::from(UiError::HostNotFound("app".to_string()));
        assert!(!fatal.is_recoverable());
    }

    #[test]
    fn display_names_field() {
        let err = ValidationError {
            field: FormField::People,
            reason: ValidationReason::NotANumber("many".to_string()),
        };
        assert_eq!(err.to_string(), "invalid people: `many` is not a whole number");
    }
}
