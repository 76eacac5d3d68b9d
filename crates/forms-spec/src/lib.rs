#![allow(missing_docs)]

pub mod conditions;
pub mod evaluate;
pub mod graph;
pub mod navigation;
pub mod parse;
pub mod permissions;
pub mod presets;
pub mod rules;
pub mod spec;
pub mod validate;
pub mod value;

use serde_json::Value;

pub use conditions::{
    VisibilityMap, evaluate_conditional_rule, evaluate_dependencies, evaluate_dependency,
    get_dependent_field_ids, has_dependencies, is_field_disabled, is_field_required,
    is_field_visible, resolve_visibility,
};
pub use evaluate::{
    FieldError, FieldEvaluation, FormValidationResult, StepEvaluation, evaluate_field,
    evaluate_step, validate_form,
};
pub use graph::DependencyGraph;
pub use navigation::{NavigationState, navigation_state, next_step_id, previous_step_id};
pub use parse::{
    FieldRuleSet, FormMetadata, ParsedSchema, SchemaError, get_field_config, get_step_fields,
    parse_form_schema, validate_schema,
};
pub use permissions::{
    can_edit_form, get_field_access_mode, has_required_permissions, has_required_roles,
    is_field_accessible, is_field_read_only,
};
pub use spec::{
    AccessMode, ConditionAction, ConditionalRule, FieldConfig, FieldDependency, FieldPermissions,
    FieldType, FormSchema, LogicType, Operator, RuleKind, StepConfig, StepId, SubmitStrategy,
    UserPermissions, ValidationRule,
};
pub use validate::{
    FieldValidationResult, ValidationResult, validate_field, validate_fields, validate_step,
};
pub use value::{FieldValue, FormData, form_data_from_json, value_of};

/// JSON Schema describing the form schema document, for authoring tools.
pub fn schema_document() -> Value {
    schemars::schema_for!(FormSchema).to_value()
}
