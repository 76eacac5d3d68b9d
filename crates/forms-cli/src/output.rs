use forms_spec::ParsedSchema;
use serde_json::Value;

/// Validity plus `(field, message)` pairs extracted from a component response.
pub struct Report {
    pub valid: bool,
    pub errors: Vec<(String, String)>,
}

impl Report {
    pub fn from_step(step: &Value) -> Self {
        Self {
            valid: step["isValid"].as_bool().unwrap_or(false),
            errors: collect_errors(&step["errors"]),
        }
    }

    pub fn from_form(form: &Value) -> Self {
        Self {
            valid: form["isValid"].as_bool().unwrap_or(false),
            errors: collect_errors(&form["allErrors"]),
        }
    }
}

fn collect_errors(errors: &Value) -> Vec<(String, String)> {
    errors
        .as_array()
        .map(|array| {
            array
                .iter()
                .map(|error| {
                    (
                        error["field"].as_str().unwrap_or("<unknown>").to_string(),
                        error["message"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn print_report(report: &Report) {
    println!(
        "Validation result: {}",
        if report.valid { "valid" } else { "invalid" }
    );
    if !report.errors.is_empty() {
        println!("Errors:");
        for (field, message) in &report.errors {
            println!("  {} - {}", field, message);
        }
    }
}

pub fn print_metadata(parsed: &ParsedSchema) {
    let metadata = &parsed.metadata;
    println!("Form: {} ({})", metadata.form_title, metadata.form_id);
    println!(
        "Steps: {} declared, {} defined",
        metadata.total_steps,
        parsed.steps.len()
    );
    println!("Submit strategy: {}", metadata.submit_strategy.as_str());
    if metadata.auto_save_enabled {
        println!(
            "Autosave: every {} ms",
            metadata
                .auto_save_interval
                .unwrap_or(forms_spec::spec::DEFAULT_AUTO_SAVE_INTERVAL_MS)
        );
    }
    for step in &parsed.steps {
        println!("  [{}] {} ({} fields)", step.step_id, step.step_title, step.fields.len());
    }
    println!("Indexed rule sets: {}", parsed.validation_rules.len());
}

/// One line per field: id, flags, access mode and errors.
pub fn print_step_report(response: &Value) {
    let step = &response["step"];
    println!(
        "Step {}: {}",
        step["stepId"],
        if step["isValid"].as_bool().unwrap_or(false) {
            "valid"
        } else {
            "invalid"
        }
    );

    for field in step["fields"].as_array().into_iter().flatten() {
        let mut flags = Vec::new();
        if field["visible"].as_bool() != Some(true) {
            flags.push("hidden");
        }
        if field["required"].as_bool() == Some(true) {
            flags.push("required");
        }
        if field["disabled"].as_bool() == Some(true) {
            flags.push("disabled");
        }
        println!(
            "  {} [{}] access={}",
            field["fieldId"].as_str().unwrap_or("<unknown>"),
            flags.join(","),
            field["accessMode"].as_str().unwrap_or("edit"),
        );
        for error in field["validation"]["errors"].as_array().into_iter().flatten() {
            println!("    - {}", error.as_str().unwrap_or_default());
        }
    }

    let navigation = &response["navigation"];
    if navigation.is_object() {
        println!(
            "Navigation: next={} previous={} submit={}",
            navigation["canGoNext"], navigation["canGoPrevious"], navigation["canSubmit"]
        );
    }
}
