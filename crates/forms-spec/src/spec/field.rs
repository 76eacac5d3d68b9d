use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::condition::ConditionalRule;
use crate::spec::permission::FieldPermissions;
use crate::spec::rule::{FieldValidation, RuleKind, ValidationRule};
use crate::value::FieldValue;

pub const DEFAULT_ASYNC_VALIDATION_DEBOUNCE_MS: u64 = 300;

/// Supported input widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Select,
    Date,
    Number,
    Textarea,
    Tel,
    File,
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

/// Server-side validation endpoint. Executed by the host, never by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsyncValidationConfig {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AsyncValidationConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(
            self.debounce_ms
                .unwrap_or(DEFAULT_ASYNC_VALIDATION_DEBOUNCE_MS),
        )
    }
}

/// Options fetched by the host from an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicOptionsConfig {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    /// Maximum size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_endpoint: Option<String>,
}

/// Definition of a single input inside a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub field_id: String,
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_visibility: Option<ConditionalRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_required: Option<ConditionalRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_disabled: Option<ConditionalRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<FieldPermissions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub async_validation: Option<AsyncValidationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_options: Option<DynamicOptionsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<FileUploadConfig>,
}

impl FieldConfig {
    pub fn new(field_id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            field_type,
            label: label.into(),
            required: false,
            disabled: false,
            validation: None,
            options: Vec::new(),
            placeholder: None,
            helper_text: None,
            default_value: None,
            conditional_visibility: None,
            conditional_required: None,
            conditional_disabled: None,
            permissions: None,
            async_validation: None,
            dynamic_options: None,
            file_upload: None,
        }
    }

    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation = Some(FieldValidation { rules });
        self
    }

    /// Configured rules in declaration order.
    pub fn rules(&self) -> &[ValidationRule] {
        self.validation
            .as_ref()
            .map(|validation| validation.rules.as_slice())
            .unwrap_or_default()
    }

    pub fn has_rule(&self, kind: &RuleKind) -> bool {
        self.rules().iter().any(|rule| &rule.kind == kind)
    }
}
