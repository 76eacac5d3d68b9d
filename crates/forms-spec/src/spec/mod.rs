pub mod condition;
pub mod field;
pub mod form;
pub mod permission;
pub mod rule;
pub mod step;

pub use condition::{ConditionAction, ConditionalRule, FieldDependency, LogicType, Operator};
pub use field::{
    AsyncValidationConfig, DEFAULT_ASYNC_VALIDATION_DEBOUNCE_MS, DynamicOptionsConfig,
    FieldConfig, FieldType, FileUploadConfig, HttpMethod, SelectOption,
};
pub use form::{DEFAULT_AUTO_SAVE_INTERVAL_MS, FormSchema, SubmitStrategy};
pub use permission::{AccessMode, FieldPermissions, UserPermissions};
pub use rule::{FieldValidation, RuleKind, ValidationRule};
pub use step::{RepeatableSection, StepConfig, StepId};
