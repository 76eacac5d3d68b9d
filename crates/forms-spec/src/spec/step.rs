use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FieldConfig;

pub type StepId = u32;

/// Field group template that the host may repeat. Never expanded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepeatableSection {
    pub section_id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_button_text: Option<String>,
}

/// An ordered group of fields presented together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    pub step_id: StepId,
    pub step_title: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeatable_sections: Option<Vec<RepeatableSection>>,
}

impl StepConfig {
    pub fn field(&self, field_id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|field| field.field_id == field_id)
    }
}
