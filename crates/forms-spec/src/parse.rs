use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::spec::field::FieldConfig;
use crate::spec::form::{FormSchema, SubmitStrategy};
use crate::spec::rule::FieldValidation;
use crate::spec::step::{StepConfig, StepId};

const REQUIRED_KEYS: [&str; 4] = ["formId", "formTitle", "totalSteps", "steps"];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("form schema must be an object with formId, formTitle, totalSteps and a non-empty steps array")]
    Malformed,
    #[error("failed to decode form schema: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Form-level settings lifted out of the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMetadata {
    pub form_id: String,
    pub form_title: String,
    pub total_steps: u32,
    pub submit_strategy: SubmitStrategy,
    pub auto_save_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_save_interval: Option<u64>,
}

/// Requiredness and rule list of one field, as indexed by [`build_validation_rules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRuleSet {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSchema {
    pub metadata: FormMetadata,
    pub steps: Vec<StepConfig>,
    pub validation_rules: BTreeMap<String, FieldRuleSet>,
}

impl FormSchema {
    /// Runs the structural check, then decodes.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        if !validate_schema(value) {
            return Err(SchemaError::Malformed);
        }
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }
}

pub fn extract_metadata(schema: &FormSchema) -> FormMetadata {
    FormMetadata {
        form_id: schema.form_id.clone(),
        form_title: schema.form_title.clone(),
        total_steps: schema.total_steps,
        submit_strategy: schema.submit_strategy,
        auto_save_enabled: schema.auto_save_enabled,
        auto_save_interval: schema.auto_save_interval,
    }
}

/// Copies a step. `required`/`disabled` already default to `false` on decode.
pub fn parse_step(step: &StepConfig) -> StepConfig {
    StepConfig {
        step_id: step.step_id,
        step_title: step.step_title.clone(),
        fields: step.fields.clone(),
        repeatable_sections: step.repeatable_sections.clone(),
    }
}

/// Key under which a field's rules are indexed.
pub fn rule_key(step_id: StepId, field_id: &str) -> String {
    format!("step{}.{}", step_id, field_id)
}

pub fn build_validation_rules(schema: &FormSchema) -> BTreeMap<String, FieldRuleSet> {
    let mut rules = BTreeMap::new();
    for step in &schema.steps {
        for field in &step.fields {
            rules.insert(
                rule_key(step.step_id, &field.field_id),
                FieldRuleSet {
                    required: field.required,
                    validation: field.validation.clone(),
                },
            );
        }
    }
    rules
}

pub fn parse_form_schema(schema: &FormSchema) -> ParsedSchema {
    ParsedSchema {
        metadata: extract_metadata(schema),
        steps: schema.steps.iter().map(parse_step).collect(),
        validation_rules: build_validation_rules(schema),
    }
}

/// Presence check on an undecoded candidate. Does not inspect steps or fields.
pub fn validate_schema(candidate: &Value) -> bool {
    let Some(object) = candidate.as_object() else {
        return false;
    };
    if !REQUIRED_KEYS.iter().all(|key| object.contains_key(*key)) {
        return false;
    }
    object
        .get("steps")
        .and_then(Value::as_array)
        .is_some_and(|steps| !steps.is_empty())
}

pub fn get_field_config<'a>(
    schema: &'a FormSchema,
    step_id: StepId,
    field_id: &str,
) -> Option<&'a FieldConfig> {
    schema.step(step_id)?.field(field_id)
}

pub fn get_step_fields(schema: &FormSchema, step_id: StepId) -> &[FieldConfig] {
    schema
        .step(step_id)
        .map(|step| step.fields.as_slice())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structural_check_requires_keys_and_steps() {
        assert!(!validate_schema(&json!(null)));
        assert!(!validate_schema(&json!("form")));
        assert!(!validate_schema(&json!({ "formId": "f", "formTitle": "F", "steps": [{}] })));
        assert!(!validate_schema(
            &json!({ "formId": "f", "formTitle": "F", "totalSteps": 1, "steps": [] })
        ));
        assert!(!validate_schema(
            &json!({ "formId": "f", "formTitle": "F", "totalSteps": 1, "steps": {} })
        ));
        assert!(validate_schema(
            &json!({ "formId": "f", "formTitle": "F", "totalSteps": 1, "steps": [{}] })
        ));
    }

    #[test]
    fn from_value_reports_malformed_before_decoding() {
        let err = FormSchema::from_value(&json!({ "formId": "f" })).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed));

        let err = FormSchema::from_value(
            &json!({ "formId": "f", "formTitle": "F", "totalSteps": 1, "steps": [{}] }),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Decode(_)));
    }

    #[test]
    fn rule_key_uses_step_prefix() {
        assert_eq!(rule_key(3, "email"), "step3.email");
    }
}
