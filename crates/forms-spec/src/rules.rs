//! Primitive validation rules.
//!
//! Each evaluator returns the failure message or `None`. Only `required`
//! reports empty values; every other rule passes them through so a blank
//! field yields a single "required" error at most.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::spec::rule::{RuleKind, ValidationRule};
use crate::value::FieldValue;

pub const INVALID_NUMBER_MESSAGE: &str = "Please enter a valid number";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub type RuleEvaluator = fn(&FieldValue, &ValidationRule) -> Option<String>;

impl RuleKind {
    /// Evaluator for a known rule kind; `None` for unknown tags.
    pub fn evaluator(&self) -> Option<RuleEvaluator> {
        match self {
            RuleKind::Required => Some(required_rule),
            RuleKind::MinLength => Some(min_length_rule),
            RuleKind::MaxLength => Some(max_length_rule),
            RuleKind::Email => Some(email_rule),
            RuleKind::Pattern => Some(pattern_rule),
            RuleKind::Min => Some(min_rule),
            RuleKind::Max => Some(max_rule),
            RuleKind::Unknown(_) => None,
        }
    }
}

// An empty custom message falls back to the built-in text.
fn message_or(rule: &ValidationRule, default: impl FnOnce() -> String) -> String {
    rule.message
        .clone()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(default)
}

pub fn required_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    value
        .is_empty()
        .then(|| message_or(rule, || "This field is required".into()))
}

pub fn min_length_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    if value.is_blank() {
        return None;
    }
    let length = value.to_text().chars().count() as f64;
    let min_length = rule.operand().to_number();
    (length < min_length).then(|| {
        message_or(rule, || {
            format!(
                "Must be at least {} characters",
                FieldValue::Number(min_length).to_text()
            )
        })
    })
}

pub fn max_length_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    if value.is_blank() {
        return None;
    }
    let length = value.to_text().chars().count() as f64;
    let max_length = rule.operand().to_number();
    (length > max_length).then(|| {
        message_or(rule, || {
            format!(
                "Must be no more than {} characters",
                FieldValue::Number(max_length).to_text()
            )
        })
    })
}

pub fn email_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    if value.is_blank() {
        return None;
    }
    (!EMAIL_REGEX.is_match(&value.to_text()))
        .then(|| message_or(rule, || "Please enter a valid email address".into()))
}

pub fn pattern_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    if value.is_blank() {
        return None;
    }
    let source = rule.operand().to_text();
    let pattern = match Regex::new(&source) {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!(pattern = %source, error = %err, "skipping pattern rule with invalid expression");
            return None;
        }
    };
    (!pattern.is_match(&value.to_text())).then(|| message_or(rule, || "Invalid format".into()))
}

pub fn min_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let number = value.to_number();
    if number.is_nan() {
        return Some(INVALID_NUMBER_MESSAGE.into());
    }
    let min = rule.operand().to_number();
    (number < min).then(|| {
        message_or(rule, || {
            format!("Must be at least {}", FieldValue::Number(min).to_text())
        })
    })
}

pub fn max_rule(value: &FieldValue, rule: &ValidationRule) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let number = value.to_number();
    if number.is_nan() {
        return Some(INVALID_NUMBER_MESSAGE.into());
    }
    let max = rule.operand().to_number();
    (number > max).then(|| {
        message_or(rule, || {
            format!("Must be no more than {}", FieldValue::Number(max).to_text())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: RuleKind) -> ValidationRule {
        ValidationRule::new(kind)
    }

    fn empties() -> Vec<FieldValue> {
        vec![
            FieldValue::Null,
            FieldValue::from(""),
            FieldValue::List(vec![]),
        ]
    }

    #[test]
    fn required_fires_only_for_empty_values() {
        let required = rule(RuleKind::Required);
        for value in empties() {
            assert_eq!(
                required_rule(&value, &required).as_deref(),
                Some("This field is required")
            );
        }
        for value in [
            FieldValue::Number(0.0),
            FieldValue::Bool(false),
            FieldValue::from(" "),
            FieldValue::List(vec![FieldValue::Null]),
        ] {
            assert_eq!(required_rule(&value, &required), None, "{value:?}");
        }
    }

    #[test]
    fn other_rules_ignore_empty_values() {
        let others = [
            rule(RuleKind::MinLength).with_value(3.0),
            rule(RuleKind::MaxLength).with_value(0.0),
            rule(RuleKind::Email),
            rule(RuleKind::Pattern).with_value("^x$"),
            rule(RuleKind::Min).with_value(5.0),
            rule(RuleKind::Max).with_value(-5.0),
        ];
        for value in empties() {
            for other in &others {
                let evaluator = other.kind.evaluator().expect("known rule");
                assert_eq!(evaluator(&value, other), None, "{:?} on {value:?}", other.kind);
            }
        }
    }

    #[test]
    fn length_rules_count_characters() {
        let min = rule(RuleKind::MinLength).with_value(3.0);
        assert_eq!(
            min_length_rule(&"ab".into(), &min).as_deref(),
            Some("Must be at least 3 characters")
        );
        assert_eq!(min_length_rule(&"héé".into(), &min), None);

        let max = rule(RuleKind::MaxLength)
            .with_value("2")
            .with_message("Too long");
        assert_eq!(max_length_rule(&12345.0.into(), &max).as_deref(), Some("Too long"));
        assert_eq!(max_length_rule(&"ab".into(), &max), None);
    }

    #[test]
    fn length_rule_without_bound_never_fires() {
        let min = rule(RuleKind::MinLength);
        assert_eq!(min_length_rule(&"a".into(), &min), None);
    }

    #[test]
    fn email_requires_at_and_dot() {
        let email = rule(RuleKind::Email);
        assert_eq!(email_rule(&"ada@example.com".into(), &email), None);
        assert_eq!(
            email_rule(&"ada@example".into(), &email).as_deref(),
            Some("Please enter a valid email address")
        );
        assert!(email_rule(&"a da@example.com".into(), &email).is_some());
    }

    #[test]
    fn pattern_tests_coerced_text() {
        let digits = rule(RuleKind::Pattern)
            .with_value("^[0-9]+$")
            .with_message("Digits only");
        assert_eq!(pattern_rule(&"123".into(), &digits), None);
        assert_eq!(pattern_rule(&42.0.into(), &digits), None);
        assert_eq!(pattern_rule(&"12a".into(), &digits).as_deref(), Some("Digits only"));
    }

    #[test]
    fn invalid_pattern_is_skipped() {
        let broken = rule(RuleKind::Pattern).with_value("([a-z");
        assert_eq!(pattern_rule(&"abc".into(), &broken), None);
    }

    #[test]
    fn numeric_bounds() {
        let min = rule(RuleKind::Min).with_value(18.0);
        assert_eq!(min_rule(&"17".into(), &min).as_deref(), Some("Must be at least 18"));
        assert_eq!(min_rule(&18.0.into(), &min), None);
        assert_eq!(min_rule(&0.0.into(), &min).as_deref(), Some("Must be at least 18"));

        let max = rule(RuleKind::Max).with_value(1.5);
        assert_eq!(max_rule(&2.0.into(), &max).as_deref(), Some("Must be no more than 1.5"));
        assert_eq!(max_rule(&"1.5".into(), &max), None);
    }

    #[test]
    fn non_numeric_input_ignores_rule_message() {
        let min = rule(RuleKind::Min).with_value(1.0).with_message("Too small");
        assert_eq!(min_rule(&"abc".into(), &min).as_deref(), Some(INVALID_NUMBER_MESSAGE));
        let max = rule(RuleKind::Max).with_value(1.0).with_message("Too big");
        assert_eq!(
            max_rule(&FieldValue::List(vec![1.0.into(), 2.0.into()]), &max).as_deref(),
            Some(INVALID_NUMBER_MESSAGE)
        );
    }

    #[test]
    fn empty_message_uses_default_text() {
        let min = rule(RuleKind::Min).with_value(18.0).with_message("");
        assert_eq!(min_rule(&15.0.into(), &min).as_deref(), Some("Must be at least 18"));
        let required = rule(RuleKind::Required).with_message("");
        assert_eq!(
            required_rule(&FieldValue::Null, &required).as_deref(),
            Some("This field is required")
        );
    }

    #[test]
    fn unknown_kind_has_no_evaluator() {
        assert!(RuleKind::Unknown("custom".into()).evaluator().is_none());
    }
}
