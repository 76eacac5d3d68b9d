use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::spec::field::FieldConfig;
use crate::spec::rule::{RuleKind, ValidationRule};
use crate::value::{FieldValue, FormData, value_of};

/// Outcome of validating one value or a whole step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidationResult {
    pub field_id: String,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Runs every configured rule in declaration order and collects all failures.
pub fn validate_field(value: &FieldValue, field: &FieldConfig) -> ValidationResult {
    validate_rules(value, &field.field_id, field.rules().iter())
}

pub(crate) fn validate_rules<'a>(
    value: &FieldValue,
    field_id: &str,
    rules: impl Iterator<Item = &'a ValidationRule>,
) -> ValidationResult {
    let mut errors = Vec::new();
    for rule in rules {
        let Some(evaluator) = rule.kind.evaluator() else {
            warn!(
                field = %field_id,
                rule = rule.kind.as_str(),
                "unknown validation rule type"
            );
            continue;
        };
        if let Some(error) = evaluator(value, rule) {
            errors.push(error);
        }
    }

    debug!(field = %field_id, errors = errors.len(), "validated field");
    ValidationResult::from_errors(errors)
}

pub fn validate_fields(values: &FormData, fields: &[FieldConfig]) -> Vec<FieldValidationResult> {
    fields
        .iter()
        .map(|field| {
            let result = validate_field(value_of(values, &field.field_id), field);
            FieldValidationResult {
                field_id: field.field_id.clone(),
                is_valid: result.is_valid,
                errors: result.errors,
            }
        })
        .collect()
}

/// Flattens every field's errors, field order first, then rule order.
pub fn validate_step(step_data: &FormData, fields: &[FieldConfig]) -> ValidationResult {
    let errors = fields
        .iter()
        .flat_map(|field| validate_field(value_of(step_data, &field.field_id), field).errors)
        .collect();
    ValidationResult::from_errors(errors)
}

pub fn is_field_valid(value: &FieldValue, field: &FieldConfig) -> bool {
    validate_field(value, field).is_valid
}

pub fn get_field_error(value: &FieldValue, field: &FieldConfig) -> Option<String> {
    validate_field(value, field).errors.into_iter().next()
}

/// Static requiredness: the `required` flag or a `required` rule.
///
/// Conditional requiredness lives in [`crate::conditions::is_field_required`].
pub fn is_field_required(field: &FieldConfig) -> bool {
    field.required || field.has_rule(&RuleKind::Required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::field::FieldType;
    use crate::spec::rule::ValidationRule;

    fn username() -> FieldConfig {
        FieldConfig::new("username", FieldType::Text, "Username").with_rules(vec![
            ValidationRule::new(RuleKind::Required).with_message("Username is required"),
            ValidationRule::new(RuleKind::MinLength)
                .with_value(3.0)
                .with_message("Too short"),
            ValidationRule::new(RuleKind::Pattern)
                .with_value("^[a-z]+$")
                .with_message("Lowercase only"),
        ])
    }

    #[test]
    fn field_without_rules_is_valid() {
        let field = FieldConfig::new("notes", FieldType::Textarea, "Notes");
        for value in [FieldValue::Null, "x".into(), 3.0.into()] {
            assert_eq!(validate_field(&value, &field), ValidationResult::valid());
        }
    }

    #[test]
    fn collects_every_failure_in_rule_order() {
        let result = validate_field(&"A1".into(), &username());
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Too short", "Lowercase only"]);
    }

    #[test]
    fn empty_value_reports_required_only() {
        let result = validate_field(&FieldValue::Null, &username());
        assert_eq!(result.errors, vec!["Username is required"]);
    }

    #[test]
    fn unknown_rules_are_skipped() {
        let field = FieldConfig::new("code", FieldType::Text, "Code").with_rules(vec![
            ValidationRule::new(RuleKind::Unknown("custom".into())),
            ValidationRule::new(RuleKind::MaxLength).with_value(2.0),
        ]);
        let result = validate_field(&"abc".into(), &field);
        assert_eq!(result.errors, vec!["Must be no more than 2 characters"]);
    }

    #[test]
    fn step_errors_keep_field_order() {
        let email = FieldConfig::new("email", FieldType::Email, "Email").with_rules(vec![
            ValidationRule::new(RuleKind::Email).with_message("Bad email"),
        ]);
        let fields = vec![username(), email];
        let data = FormData::from([
            ("username".to_string(), FieldValue::from("AB")),
            ("email".to_string(), FieldValue::from("nope")),
        ]);

        let step = validate_step(&data, &fields);
        assert!(!step.is_valid);
        assert_eq!(step.errors, vec!["Too short", "Lowercase only", "Bad email"]);

        let per_field = validate_fields(&data, &fields);
        assert_eq!(per_field.len(), 2);
        assert_eq!(per_field[0].field_id, "username");
        assert_eq!(per_field[1].errors, vec!["Bad email"]);
    }

    #[test]
    fn first_error_helper() {
        assert_eq!(get_field_error(&"A1".into(), &username()).as_deref(), Some("Too short"));
        assert!(is_field_valid(&"ada".into(), &username()));
    }

    #[test]
    fn static_requiredness() {
        let mut flagged = FieldConfig::new("a", FieldType::Text, "A");
        assert!(!is_field_required(&flagged));
        flagged.required = true;
        assert!(is_field_required(&flagged));
        assert!(is_field_required(&username()));
    }
}
