//! Conditional logic: field visibility, requiredness and disabled state
//! derived from other fields' current values.

use std::collections::BTreeMap;

use crate::spec::condition::{ConditionAction, ConditionalRule, FieldDependency, LogicType, Operator};
use crate::spec::step::StepConfig;
use crate::value::{FieldValue, FormData, value_of};

pub type VisibilityMap = BTreeMap<String, bool>;

/// Applies a dependency's operator to the referenced field's value.
pub fn evaluate_dependency(dependency: &FieldDependency, field_value: &FieldValue) -> bool {
    let expected = dependency.operand();
    match &dependency.operator {
        Operator::Equals => field_value == expected,
        Operator::NotEquals => field_value != expected,
        // A dependency without a value never matches.
        Operator::Contains if dependency.value.is_none() => false,
        Operator::Contains => match field_value.as_list() {
            Some(items) => items.contains(expected),
            None => field_value.to_text().contains(&expected.to_text()),
        },
        Operator::GreaterThan => field_value.to_number() > expected.to_number(),
        Operator::LessThan => field_value.to_number() < expected.to_number(),
        Operator::IsEmpty => is_empty(field_value),
        Operator::IsNotEmpty => is_not_empty(field_value),
        Operator::Unknown(_) => false,
    }
}

fn is_empty(value: &FieldValue) -> bool {
    !value.is_truthy()
        || matches!(value, FieldValue::Text(text) if text.is_empty())
        || matches!(value, FieldValue::List(items) if items.is_empty())
}

fn is_not_empty(value: &FieldValue) -> bool {
    let non_empty_text = !matches!(value, FieldValue::Text(text) if text.is_empty());
    let non_empty_list = value.as_list().is_none_or(|items| !items.is_empty());
    value.is_truthy() && non_empty_text && non_empty_list
}

/// Combines dependencies with the logic type of the first one.
///
/// An empty list holds vacuously. Per-dependency logic types after the first
/// are ignored.
pub fn evaluate_dependencies(dependencies: &[FieldDependency], data: &FormData) -> bool {
    let Some(first) = dependencies.first() else {
        return true;
    };
    let holds = |dependency: &FieldDependency| {
        evaluate_dependency(dependency, value_of(data, &dependency.field_id))
    };
    match first.logic_type.unwrap_or_default() {
        LogicType::Or => dependencies.iter().any(holds),
        LogicType::And => dependencies.iter().all(holds),
    }
}

pub fn evaluate_conditional_rule(rule: Option<&ConditionalRule>, data: &FormData) -> bool {
    match rule {
        Some(rule) => evaluate_dependencies(&rule.dependencies, data),
        None => true,
    }
}

pub fn is_field_visible(rule: Option<&ConditionalRule>, data: &FormData) -> bool {
    let Some(rule) = rule else {
        return true;
    };
    let condition_met = evaluate_conditional_rule(Some(rule), data);
    if rule.action == ConditionAction::Show {
        condition_met
    } else {
        !condition_met
    }
}

pub fn is_field_required(base: bool, rule: Option<&ConditionalRule>, data: &FormData) -> bool {
    let Some(rule) = rule else {
        return base;
    };
    match rule.action {
        ConditionAction::Require => evaluate_conditional_rule(Some(rule), data),
        ConditionAction::Optional => !evaluate_conditional_rule(Some(rule), data),
        _ => base,
    }
}

pub fn is_field_disabled(base: bool, rule: Option<&ConditionalRule>, data: &FormData) -> bool {
    let Some(rule) = rule else {
        return base;
    };
    match rule.action {
        ConditionAction::Disable => evaluate_conditional_rule(Some(rule), data),
        ConditionAction::Enable => !evaluate_conditional_rule(Some(rule), data),
        _ => base,
    }
}

/// Field ids a rule reads, in declaration order.
pub fn get_dependent_field_ids(rule: Option<&ConditionalRule>) -> Vec<String> {
    rule.map(|rule| {
        rule.dependencies
            .iter()
            .map(|dependency| dependency.field_id.clone())
            .collect()
    })
    .unwrap_or_default()
}

/// True when any of the three conditional slots carries a dependency.
pub fn has_dependencies(
    visibility: Option<&ConditionalRule>,
    required: Option<&ConditionalRule>,
    disabled: Option<&ConditionalRule>,
) -> bool {
    [visibility, required, disabled]
        .into_iter()
        .flatten()
        .any(|rule| !rule.dependencies.is_empty())
}

/// Visibility of every field of a step, keyed by field id.
pub fn resolve_visibility(step: &StepConfig, data: &FormData) -> VisibilityMap {
    step.fields
        .iter()
        .map(|field| {
            (
                field.field_id.clone(),
                is_field_visible(field.conditional_visibility.as_ref(), data),
            )
        })
        .collect()
}
