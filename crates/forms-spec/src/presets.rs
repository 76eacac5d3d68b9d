//! Ready-made validators for common inputs.

use crate::spec::field::{FieldConfig, FieldType};
use crate::spec::rule::{RuleKind, ValidationRule};
use crate::validate::{ValidationResult, validate_field};
use crate::value::FieldValue;

pub const PHONE_PATTERN: &str = r"^[0-9]{10}$|^\([0-9]{3}\) [0-9]{3}-[0-9]{4}$";

pub fn validate_email_field(email: &str) -> ValidationResult {
    let config = FieldConfig::new("email", FieldType::Email, "Email").with_rules(vec![
        ValidationRule::new(RuleKind::Required).with_message("Email is required"),
        ValidationRule::new(RuleKind::Email).with_message("Please enter a valid email"),
    ]);
    validate_field(&email.into(), &config)
}

/// Ten digits, or `(555) 123-4567`.
pub fn validate_phone_field(phone: &str) -> ValidationResult {
    let config = FieldConfig::new("phone", FieldType::Tel, "Phone").with_rules(vec![
        ValidationRule::new(RuleKind::Pattern)
            .with_value(PHONE_PATTERN)
            .with_message("Please enter a valid phone number"),
    ]);
    validate_field(&phone.into(), &config)
}

pub fn validate_password_field(password: &str) -> ValidationResult {
    let config = FieldConfig::new("password", FieldType::Text, "Password").with_rules(vec![
        ValidationRule::new(RuleKind::Required).with_message("Password is required"),
        ValidationRule::new(RuleKind::MinLength)
            .with_value(8.0)
            .with_message("Password must be at least 8 characters"),
    ]);
    validate_field(&password.into(), &config)
}

pub fn validate_number_range(value: f64, min: f64, max: f64) -> ValidationResult {
    let min_text = FieldValue::Number(min).to_text();
    let max_text = FieldValue::Number(max).to_text();
    let config = FieldConfig::new("number", FieldType::Number, "Number").with_rules(vec![
        ValidationRule::new(RuleKind::Min)
            .with_value(min)
            .with_message(format!("Must be at least {}", min_text)),
        ValidationRule::new(RuleKind::Max)
            .with_value(max)
            .with_message(format!("Must be no more than {}", max_text)),
    ]);
    validate_field(&value.into(), &config)
}

pub fn validate_required_text(text: &str, field_name: &str) -> ValidationResult {
    let config = FieldConfig::new("text", FieldType::Text, field_name).with_rules(vec![
        ValidationRule::new(RuleKind::Required).with_message(format!("{} is required", field_name)),
    ]);
    validate_field(&text.into(), &config)
}
