use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conditions;
use crate::permissions::get_field_access_mode;
use crate::rules::required_rule;
use crate::spec::field::FieldConfig;
use crate::spec::form::FormSchema;
use crate::spec::permission::{AccessMode, UserPermissions};
use crate::spec::rule::{RuleKind, ValidationRule};
use crate::spec::step::{StepConfig, StepId};
use crate::validate::{self, ValidationResult};
use crate::value::{FormData, value_of};

/// Everything a renderer needs to know about one field for the current data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEvaluation {
    pub field_id: String,
    pub visible: bool,
    pub required: bool,
    pub disabled: bool,
    pub access_mode: AccessMode,
    pub validation: ValidationResult,
}

/// A failure attributed to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvaluation {
    pub step_id: StepId,
    pub is_valid: bool,
    pub fields: Vec<FieldEvaluation>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidationResult {
    pub is_valid: bool,
    pub step_errors: BTreeMap<StepId, Vec<FieldError>>,
    pub all_errors: Vec<FieldError>,
}

pub fn evaluate_field(
    field: &FieldConfig,
    data: &FormData,
    user: &UserPermissions,
) -> FieldEvaluation {
    let access_mode = get_field_access_mode(field.permissions.as_ref(), user);
    let visible = conditions::is_field_visible(field.conditional_visibility.as_ref(), data)
        && access_mode != AccessMode::Hidden;
    let required = conditions::is_field_required(
        validate::is_field_required(field),
        field.conditional_required.as_ref(),
        data,
    );
    let disabled = conditions::is_field_disabled(
        field.disabled,
        field.conditional_disabled.as_ref(),
        data,
    ) || access_mode == AccessMode::View;

    let validation = if visible {
        validate_visible_field(field, data, required)
    } else {
        ValidationResult::valid()
    };

    FieldEvaluation {
        field_id: field.field_id.clone(),
        visible,
        required,
        disabled,
        access_mode,
        validation,
    }
}

// Effective requiredness wins over the field's own `required` rule in both
// directions.
fn validate_visible_field(field: &FieldConfig, data: &FormData, required: bool) -> ValidationResult {
    let value = value_of(data, &field.field_id);
    let rules = field
        .rules()
        .iter()
        .filter(|rule| required || rule.kind != RuleKind::Required);
    let mut result = validate::validate_rules(value, &field.field_id, rules);
    if required
        && !field.has_rule(&RuleKind::Required)
        && let Some(error) = required_rule(value, &ValidationRule::new(RuleKind::Required))
    {
        result.errors.insert(0, error);
        result.is_valid = false;
    }
    result
}

pub fn evaluate_step(step: &StepConfig, data: &FormData, user: &UserPermissions) -> StepEvaluation {
    let fields: Vec<FieldEvaluation> = step
        .fields
        .iter()
        .map(|field| evaluate_field(field, data, user))
        .collect();
    let errors: Vec<FieldError> = fields
        .iter()
        .flat_map(|evaluation| {
            evaluation.validation.errors.iter().map(move |message| FieldError {
                field: evaluation.field_id.clone(),
                message: message.clone(),
            })
        })
        .collect();

    debug!(step = step.step_id, errors = errors.len(), "evaluated step");
    StepEvaluation {
        step_id: step.step_id,
        is_valid: errors.is_empty(),
        fields,
        errors,
    }
}

/// Evaluates every step; only steps with errors appear in `step_errors`.
pub fn validate_form(
    schema: &FormSchema,
    data: &FormData,
    user: &UserPermissions,
) -> FormValidationResult {
    let mut step_errors = BTreeMap::new();
    let mut all_errors = Vec::new();

    for step in &schema.steps {
        let evaluation = evaluate_step(step, data, user);
        if !evaluation.errors.is_empty() {
            all_errors.extend(evaluation.errors.iter().cloned());
            step_errors.insert(step.step_id, evaluation.errors);
        }
    }

    FormValidationResult {
        is_valid: all_errors.is_empty(),
        step_errors,
        all_errors,
    }
}
