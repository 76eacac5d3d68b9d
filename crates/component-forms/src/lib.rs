use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use forms_spec::{
    DependencyGraph, FormData, FormSchema, SchemaError, StepId, UserPermissions,
    form_data_from_json, get_field_config, navigation_state, parse_form_schema, schema_document,
    validate_schema,
};

const DEFAULT_SCHEMA: &str =
    include_str!("../../forms-spec/tests/fixtures/registration_form.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("invalid form schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("form '{0}' is not available")]
    FormUnavailable(String),
    #[error("step {0} is not defined")]
    StepUnavailable(StepId),
    #[error("field '{field}' is not defined in step {step}")]
    FieldUnavailable { step: StepId, field: String },
    #[error("failed to parse user permissions: {0}")]
    UserParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    form_schema_json: Option<String>,
}

fn load_form_schema(config_json: &str) -> Result<FormSchema, ComponentError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)?
    };

    let schema_json = config.form_schema_json.as_deref().unwrap_or(DEFAULT_SCHEMA);
    Ok(FormSchema::from_json_str(schema_json)?)
}

fn ensure_form(form_id: &str, config_json: &str) -> Result<FormSchema, ComponentError> {
    let schema = load_form_schema(config_json)?;
    if schema.form_id != form_id {
        Err(ComponentError::FormUnavailable(form_id.to_string()))
    } else {
        Ok(schema)
    }
}

fn parse_data(data_json: &str) -> FormData {
    let value = serde_json::from_str(data_json).unwrap_or(Value::Null);
    form_data_from_json(&value)
}

fn parse_user(user_json: &str) -> Result<UserPermissions, ComponentError> {
    if user_json.trim().is_empty() {
        return Ok(UserPermissions::default());
    }
    serde_json::from_str(user_json).map_err(ComponentError::UserParse)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ComponentError> {
    serde_json::to_value(value).map_err(ComponentError::JsonEncode)
}

pub fn describe(form_id: &str, config_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|schema| encode(&schema)))
}

/// Structural check of a raw schema document, without decoding it.
pub fn check_schema(schema_json: &str) -> String {
    let candidate = serde_json::from_str(schema_json).unwrap_or(Value::Null);
    json!({ "valid": validate_schema(&candidate) }).to_string()
}

pub fn parse_schema(form_id: &str, config_json: &str) -> String {
    respond(
        ensure_form(form_id, config_json).and_then(|schema| encode(&parse_form_schema(&schema))),
    )
}

pub fn json_schema() -> String {
    respond(Ok(schema_document()))
}

pub fn evaluate_field(
    form_id: &str,
    config_json: &str,
    step_id: StepId,
    field_id: &str,
    data_json: &str,
    user_json: &str,
) -> String {
    respond(ensure_form(form_id, config_json).and_then(|schema| {
        let field = get_field_config(&schema, step_id, field_id).ok_or_else(|| {
            ComponentError::FieldUnavailable {
                step: step_id,
                field: field_id.to_string(),
            }
        })?;
        let user = parse_user(user_json)?;
        let data = parse_data(data_json);
        encode(&forms_spec::evaluate_field(field, &data, &user))
    }))
}

/// Field states, step validity and navigation for one step.
pub fn evaluate_step(
    form_id: &str,
    config_json: &str,
    step_id: StepId,
    data_json: &str,
    user_json: &str,
) -> String {
    respond(ensure_form(form_id, config_json).and_then(|schema| {
        let step = schema
            .step(step_id)
            .ok_or(ComponentError::StepUnavailable(step_id))?;
        let user = parse_user(user_json)?;
        let data = parse_data(data_json);
        let evaluation = forms_spec::evaluate_step(step, &data, &user);
        let navigation = navigation_state(&schema, step_id, evaluation.is_valid);
        debug!(form = form_id, step = step_id, valid = evaluation.is_valid, "step evaluated");
        Ok(json!({
            "step": encode(&evaluation)?,
            "navigation": encode(&navigation)?,
        }))
    }))
}

pub fn validate_form(form_id: &str, config_json: &str, data_json: &str, user_json: &str) -> String {
    respond(ensure_form(form_id, config_json).and_then(|schema| {
        let user = parse_user(user_json)?;
        let data = parse_data(data_json);
        encode(&forms_spec::validate_form(&schema, &data, &user))
    }))
}

/// Fields whose state must be recomputed after `field_id` changes.
pub fn dependents(form_id: &str, config_json: &str, field_id: &str) -> String {
    respond(ensure_form(form_id, config_json).map(|schema| {
        let graph = DependencyGraph::from_schema(&schema);
        json!({
            "fieldId": field_id,
            "dependents": graph.dependents_of(field_id),
        })
    }))
}
