use serde::{Deserialize, Serialize};

use crate::spec::form::{FormSchema, SubmitStrategy};
use crate::spec::step::StepId;

/// Button state for the step currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub can_submit: bool,
    pub current_step: StepId,
    pub total_steps: u32,
    pub is_first_step: bool,
    pub is_last_step: bool,
}

/// Navigation for `current_step`; `None` when the schema has no such step.
///
/// Position is taken from the order of `steps`, not from step ids.
pub fn navigation_state(
    schema: &FormSchema,
    current_step: StepId,
    step_valid: bool,
) -> Option<NavigationState> {
    let position = schema.step_position(current_step)?;
    let is_first_step = position == 0;
    let is_last_step = position + 1 == schema.steps.len();
    let can_submit = step_valid
        && (is_last_step || schema.submit_strategy == SubmitStrategy::PerStep);

    Some(NavigationState {
        can_go_next: step_valid && !is_last_step,
        can_go_previous: !is_first_step,
        can_submit,
        current_step,
        total_steps: schema.total_steps,
        is_first_step,
        is_last_step,
    })
}

pub fn next_step_id(schema: &FormSchema, current_step: StepId) -> Option<StepId> {
    let position = schema.step_position(current_step)?;
    schema.steps.get(position + 1).map(|step| step.step_id)
}

pub fn previous_step_id(schema: &FormSchema, current_step: StepId) -> Option<StepId> {
    let position = schema.step_position(current_step)?;
    position
        .checked_sub(1)
        .and_then(|previous| schema.steps.get(previous))
        .map(|step| step.step_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_steps(strategy: &str) -> FormSchema {
        serde_json::from_value(json!({
            "formId": "nav",
            "formTitle": "Navigation",
            "totalSteps": 3,
            "submitStrategy": strategy,
            "steps": [
                { "stepId": 10, "stepTitle": "A" },
                { "stepId": 20, "stepTitle": "B" },
                { "stepId": 30, "stepTitle": "C" }
            ]
        }))
        .expect("schema")
    }

    #[test]
    fn first_step_cannot_go_back() {
        let state = navigation_state(&three_steps("final-only"), 10, true).expect("step");
        assert!(state.is_first_step);
        assert!(!state.can_go_previous);
        assert!(state.can_go_next);
        assert!(!state.can_submit);
        assert_eq!(state.total_steps, 3);
    }

    #[test]
    fn invalid_step_blocks_progress() {
        let state = navigation_state(&three_steps("final-only"), 20, false).expect("step");
        assert!(!state.can_go_next);
        assert!(state.can_go_previous);
        assert!(!state.can_submit);
    }

    #[test]
    fn submit_depends_on_strategy() {
        let final_only = three_steps("final-only");
        assert!(navigation_state(&final_only, 30, true).expect("step").can_submit);
        assert!(!navigation_state(&final_only, 20, true).expect("step").can_submit);

        let per_step = three_steps("per-step");
        assert!(navigation_state(&per_step, 20, true).expect("step").can_submit);
    }

    #[test]
    fn unknown_step_has_no_state() {
        assert!(navigation_state(&three_steps("per-step"), 99, true).is_none());
    }

    #[test]
    fn neighbours_follow_declaration_order() {
        let schema = three_steps("final-only");
        assert_eq!(next_step_id(&schema, 10), Some(20));
        assert_eq!(next_step_id(&schema, 30), None);
        assert_eq!(previous_step_id(&schema, 20), Some(10));
        assert_eq!(previous_step_id(&schema, 10), None);
        assert_eq!(previous_step_id(&schema, 42), None);
    }
}
