//! Field-level validation of create and update payloads.

use crate::error::{AppError, FieldViolation};
use crate::resource::Column;
use crate::sql::FieldValue;
use validator::ValidateEmail;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
}

/// Constraints checked on every non-null value of a column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRule {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub format: Option<Format>,
}

impl FieldRule {
    pub const NONE: FieldRule = FieldRule {
        min_length: None,
        max_length: None,
        minimum: None,
        maximum: None,
        exclusive_minimum: None,
        format: None,
    };

    pub const fn length(min: usize, max: usize) -> Self {
        FieldRule {
            min_length: Some(min),
            max_length: Some(max),
            ..FieldRule::NONE
        }
    }

    pub const fn range(min: f64, max: f64) -> Self {
        FieldRule {
            minimum: Some(min),
            maximum: Some(max),
            ..FieldRule::NONE
        }
    }

    pub const fn positive() -> Self {
        FieldRule {
            exclusive_minimum: Some(0.0),
            ..FieldRule::NONE
        }
    }

    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ValidationPolicy {
    pub strict_email: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy { strict_email: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every non-nullable column must be supplied.
    Create,
    /// Only supplied fields are checked.
    Update,
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check `fields` against the column rules, collecting every violation in column order.
    pub fn validate(
        columns: &[Column],
        fields: &[(&'static str, FieldValue)],
        mode: Mode,
        policy: &ValidationPolicy,
    ) -> Result<(), AppError> {
        let mut violations = Vec::new();
        for column in columns {
            match fields.iter().find(|(name, _)| *name == column.name) {
                None => {
                    if mode == Mode::Create && !column.nullable {
                        violations.push(FieldViolation::new(column.name, "is required"));
                    }
                }
                Some((_, FieldValue::Null)) => {
                    if !column.nullable {
                        violations.push(FieldViolation::new(column.name, "may not be null"));
                    }
                }
                Some((_, value)) => validate_field(column, value, policy, &mut violations),
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(violations))
        }
    }
}

fn validate_field(
    column: &Column,
    value: &FieldValue,
    policy: &ValidationPolicy,
    violations: &mut Vec<FieldViolation>,
) {
    let rule = &column.rule;
    let name = column.name;
    if let Some(s) = value.as_text() {
        let len = s.chars().count();
        if let Some(min) = rule.min_length {
            if len < min {
                violations.push(FieldViolation::new(
                    name,
                    format!("must be at least {} characters", min),
                ));
            }
        }
        if let Some(max) = rule.max_length {
            if len > max {
                violations.push(FieldViolation::new(
                    name,
                    format!("must be at most {} characters", max),
                ));
            }
        }
        if rule.format == Some(Format::Email) && policy.strict_email && !s.validate_email() {
            violations.push(FieldViolation::new(name, "must be a valid email address"));
        }
    }
    if let Some(n) = value.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                violations.push(FieldViolation::new(name, format!("must be at least {}", min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                violations.push(FieldViolation::new(name, format!("must be at most {}", max)));
            }
        }
        if let Some(min) = rule.exclusive_minimum {
            if n <= min {
                violations.push(FieldViolation::new(name, format!("must be greater than {}", min)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Employees, Resource, Users};
    use assert_matches::assert_matches;

    fn violations(result: Result<(), AppError>) -> Vec<FieldViolation> {
        match result {
            Err(AppError::Validation(v)) => v,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn valid_user_passes() {
        let fields = vec![
            ("name", text("A")),
            ("email", text("a@x.com")),
            ("age", FieldValue::Int(30)),
        ];
        assert_matches!(
            RequestValidator::validate(Users::COLUMNS, &fields, Mode::Create, &ValidationPolicy::default()),
            Ok(())
        );
    }

    #[test]
    fn create_reports_every_violation() {
        let fields = vec![
            ("name", text("")),
            ("email", text("not-an-email")),
            ("age", FieldValue::Int(151)),
        ];
        let got = violations(RequestValidator::validate(
            Users::COLUMNS,
            &fields,
            Mode::Create,
            &ValidationPolicy::default(),
        ));
        let names: Vec<_> = got.iter().map(|v| v.field).collect();
        assert_eq!(names, vec!["name", "email", "age"]);
    }

    #[test]
    fn missing_required_columns_on_create() {
        let fields = vec![("name", text("Bo"))];
        let got = violations(RequestValidator::validate(
            Employees::COLUMNS,
            &fields,
            Mode::Create,
            &ValidationPolicy::default(),
        ));
        assert!(got.contains(&FieldViolation::new("email", "is required")));
        assert!(got.contains(&FieldViolation::new("position", "is required")));
        assert!(got.contains(&FieldViolation::new("salary", "is required")));
    }

    #[test]
    fn update_only_checks_supplied_fields() {
        let fields = vec![("age", FieldValue::Int(31))];
        assert_matches!(
            RequestValidator::validate(Users::COLUMNS, &fields, Mode::Update, &ValidationPolicy::default()),
            Ok(())
        );
    }

    #[test]
    fn explicit_null_only_for_nullable_columns() {
        let nullable = vec![("age", FieldValue::Null)];
        assert_matches!(
            RequestValidator::validate(Users::COLUMNS, &nullable, Mode::Update, &ValidationPolicy::default()),
            Ok(())
        );
        let required = vec![("name", FieldValue::Null)];
        assert_eq!(
            violations(RequestValidator::validate(
                Users::COLUMNS,
                &required,
                Mode::Update,
                &ValidationPolicy::default()
            )),
            vec![FieldViolation::new("name", "may not be null")]
        );
    }

    #[test]
    fn salary_must_be_positive() {
        let fields = vec![("salary", FieldValue::Float(0.0))];
        assert_eq!(
            violations(RequestValidator::validate(
                Employees::COLUMNS,
                &fields,
                Mode::Update,
                &ValidationPolicy::default()
            )),
            vec![FieldViolation::new("salary", "must be greater than 0")]
        );
    }

    #[test]
    fn lax_policy_accepts_any_email_text() {
        let fields = vec![("email", text("whatever"))];
        let lax = ValidationPolicy { strict_email: false };
        assert_matches!(
            RequestValidator::validate(Users::COLUMNS, &fields, Mode::Update, &lax),
            Ok(())
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let fields = vec![("name", text(&"张".repeat(50)))];
        assert_matches!(
            RequestValidator::validate(Users::COLUMNS, &fields, Mode::Update, &ValidationPolicy::default()),
            Ok(())
        );
    }
}
