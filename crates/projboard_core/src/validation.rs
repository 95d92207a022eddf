//! Declarative single-value validation.
//!
//! # Responsibility
//! - Check one scalar value against an optional set of constraints.
//! - Report which constraint failed so callers can surface it.
//!
//! # Invariants
//! - Absent constraints always pass.
//! - Length constraints only apply to text; range constraints only to numbers.
//! - All present constraints must hold; evaluation stops at the first failure.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Scalar value under validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn trimmed_text_len(&self) -> Option<usize> {
        match self {
            Self::Text(value) => Some(value.trim().chars().count()),
            Self::Number(_) => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            // A number always has a non-empty textual form, zero included.
            Self::Number(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A value plus the constraints it must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct Validatable {
    pub value: FieldValue,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validatable {
    /// Wraps a value with no constraints.
    pub fn new(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, value: usize) -> Self {
        self.min_length = Some(value);
        self
    }

    pub fn max_length(mut self, value: usize) -> Self {
        self.max_length = Some(value);
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min = Some(value);
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max = Some(value);
        self
    }
}

/// First constraint a value failed.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleViolation {
    Required,
    MinLength { min: usize, actual: usize },
    MaxLength { max: usize, actual: usize },
    Min { min: f64, actual: f64 },
    Max { max: f64, actual: f64 },
}

impl Display for RuleViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "value is required"),
            Self::MinLength { min, actual } => {
                write!(f, "length {actual} is shorter than {min}")
            }
            Self::MaxLength { max, actual } => {
                write!(f, "length {actual} is longer than {max}")
            }
            Self::Min { min, actual } => write!(f, "{actual} is less than {min}"),
            Self::Max { max, actual } => write!(f, "{actual} is greater than {max}"),
        }
    }
}

impl Error for RuleViolation {}

/// Returns `true` when every present constraint holds.
pub fn validate(rule: &Validatable) -> bool {
    check(rule).is_ok()
}

/// Like [`validate`], but reports the first failing constraint.
pub fn check(rule: &Validatable) -> Result<(), RuleViolation> {
    if rule.required && rule.value.is_blank() {
        return Err(RuleViolation::Required);
    }

    if let Some(actual) = rule.value.trimmed_text_len() {
        if let Some(min) = rule.min_length {
            if actual < min {
                return Err(RuleViolation::MinLength { min, actual });
            }
        }
        if let Some(max) = rule.max_length {
            if actual > max {
                return Err(RuleViolation::MaxLength { max, actual });
            }
        }
    }

    if let Some(actual) = rule.value.number() {
        if let Some(min) = rule.min {
            if actual < min {
                return Err(RuleViolation::Min { min, actual });
            }
        }
        if let Some(max) = rule.max {
            if actual > max {
                return Err(RuleViolation::Max { max, actual });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check, validate, RuleViolation, Validatable};

    #[test]
    fn required_number_respects_max_boundary() {
        assert!(validate(&Validatable::new(6_i64).required().max(6.0)));
        assert!(!validate(&Validatable::new(7_i64).required().max(6.0)));
    }

    #[test]
    fn required_rejects_empty_and_whitespace_text() {
        assert!(!validate(&Validatable::new("").required()));
        assert!(!validate(&Validatable::new("  ").required()));
        assert!(validate(&Validatable::new(" a ").required()));
    }

    #[test]
    fn required_allows_numeric_zero() {
        assert!(validate(&Validatable::new(0_i64).required()));
        assert_eq!(
            check(&Validatable::new(0_i64).required().min(1.0)),
            Err(RuleViolation::Min {
                min: 1.0,
                actual: 0.0
            })
        );
    }

    #[test]
    fn length_rules_ignore_numbers() {
        let rule = Validatable::new(123456_i64).min_length(10).max_length(2);
        assert!(validate(&rule));
    }

    #[test]
    fn range_rules_ignore_text() {
        let rule = Validatable::new("100").min(500.0).max(1.0);
        assert!(validate(&rule));
    }

    #[test]
    fn length_is_measured_after_trimming() {
        let rule = Validatable::new("  abc  ").min_length(3).max_length(3);
        assert!(validate(&rule));
        assert_eq!(
            check(&Validatable::new(" ab ").min_length(3)),
            Err(RuleViolation::MinLength { min: 3, actual: 2 })
        );
    }

    #[test]
    fn unconstrained_value_always_passes() {
        assert!(validate(&Validatable::new("")));
        assert!(validate(&Validatable::new(-4_i64)));
    }
}
