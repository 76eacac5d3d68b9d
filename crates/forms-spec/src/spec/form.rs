use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::step::{StepConfig, StepId};

pub const DEFAULT_AUTO_SAVE_INTERVAL_MS: u64 = 5000;

/// When the host submits collected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitStrategy {
    #[default]
    FinalOnly,
    PerStep,
}

impl SubmitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitStrategy::FinalOnly => "final-only",
            SubmitStrategy::PerStep => "per-step",
        }
    }
}

/// Top-level multi-step form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_id: String,
    pub form_title: String,
    pub total_steps: u32,
    #[serde(default)]
    pub submit_strategy: SubmitStrategy,
    #[serde(default)]
    pub auto_save_enabled: bool,
    /// Milliseconds between autosaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_save_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permissions: Option<Vec<String>>,
    pub steps: Vec<StepConfig>,
}

impl FormSchema {
    pub fn auto_save_interval(&self) -> Duration {
        Duration::from_millis(
            self.auto_save_interval
                .unwrap_or(DEFAULT_AUTO_SAVE_INTERVAL_MS),
        )
    }

    pub fn step(&self, step_id: StepId) -> Option<&StepConfig> {
        self.steps.iter().find(|step| step.step_id == step_id)
    }

    pub(crate) fn step_position(&self, step_id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.step_id == step_id)
    }
}
