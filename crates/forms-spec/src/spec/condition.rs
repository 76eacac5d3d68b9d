use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Comparison applied by a dependency to the referenced field's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::Unknown(tag) => tag,
        }
    }
}

impl From<String> for Operator {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "equals" => Operator::Equals,
            "notEquals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "greaterThan" => Operator::GreaterThan,
            "lessThan" => Operator::LessThan,
            "isEmpty" => Operator::IsEmpty,
            "isNotEmpty" => Operator::IsNotEmpty,
            _ => Operator::Unknown(tag),
        }
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.as_str().to_string()
    }
}

/// How the dependencies of one rule combine. Anything but `OR` reads as `AND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum LogicType {
    #[default]
    And,
    Or,
}

impl From<String> for LogicType {
    fn from(tag: String) -> Self {
        if tag == "OR" {
            LogicType::Or
        } else {
            LogicType::And
        }
    }
}

impl From<LogicType> for String {
    fn from(logic: LogicType) -> Self {
        match logic {
            LogicType::And => "AND".into(),
            LogicType::Or => "OR".into(),
        }
    }
}

/// Effect a satisfied condition has on the owning field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionAction {
    Show,
    Hide,
    Enable,
    Disable,
    Require,
    Optional,
    Unknown(String),
}

impl ConditionAction {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionAction::Show => "show",
            ConditionAction::Hide => "hide",
            ConditionAction::Enable => "enable",
            ConditionAction::Disable => "disable",
            ConditionAction::Require => "require",
            ConditionAction::Optional => "optional",
            ConditionAction::Unknown(tag) => tag,
        }
    }
}

impl From<String> for ConditionAction {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "show" => ConditionAction::Show,
            "hide" => ConditionAction::Hide,
            "enable" => ConditionAction::Enable,
            "disable" => ConditionAction::Disable,
            "require" => ConditionAction::Require,
            "optional" => ConditionAction::Optional,
            _ => ConditionAction::Unknown(tag),
        }
    }
}

impl From<ConditionAction> for String {
    fn from(action: ConditionAction) -> Self {
        action.as_str().to_string()
    }
}

/// Predicate over another field's current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDependency {
    pub field_id: String,
    #[schemars(with = "String")]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub logic_type: Option<LogicType>,
}

impl FieldDependency {
    pub fn new(field_id: impl Into<String>, operator: Operator) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value: None,
            logic_type: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_logic(mut self, logic: LogicType) -> Self {
        self.logic_type = Some(logic);
        self
    }

    pub fn operand(&self) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.value.as_ref().unwrap_or(&NULL)
    }
}

/// Dependencies plus the action applied when they hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionalRule {
    #[serde(default)]
    pub dependencies: Vec<FieldDependency>,
    #[schemars(with = "String")]
    pub action: ConditionAction,
}

impl ConditionalRule {
    pub fn new(dependencies: Vec<FieldDependency>, action: ConditionAction) -> Self {
        Self {
            dependencies,
            action,
        }
    }
}
