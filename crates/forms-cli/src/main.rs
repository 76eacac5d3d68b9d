mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use component_forms::{dependents as form_dependents, evaluate_step, json_schema, validate_form};
use forms_spec::{FormSchema, StepId, UserPermissions, parse_form_schema};
use serde_json::{Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use output::{Report, print_report, print_metadata, print_step_report};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "DYNAMIC_FORMS_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Schema-driven form checker",
    long_about = "Checks form schemas and evaluates form data against their validation, conditional and permission rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Identity the form is evaluated for.
#[derive(Args, Debug)]
struct UserArgs {
    /// Comma separated roles held by the user.
    #[arg(long, value_delimiter = ',')]
    roles: Vec<String>,
    /// Comma separated permissions granted to the user.
    #[arg(long, value_delimiter = ',')]
    permissions: Vec<String>,
    /// JSON file with `roles`, `permissions` and `userId`; overrides the flags.
    #[arg(long, value_name = "USER")]
    user: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the structural check on a schema and print its metadata.
    Check {
        /// Path to the form schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
    },
    /// Validate form data for one step or the whole form.
    Validate {
        /// Path to the form schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the form data JSON (field id to value).
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
        /// Only validate this step.
        #[arg(long, value_name = "STEP")]
        step: Option<StepId>,
        #[command(flatten)]
        user: UserArgs,
        /// Print the raw JSON result instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Print visibility, requiredness, access and errors for each field of a step.
    Evaluate {
        /// Path to the form schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the form data JSON (field id to value).
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
        #[arg(long, value_name = "STEP")]
        step: StepId,
        #[command(flatten)]
        user: UserArgs,
    },
    /// List the fields to recompute when a field changes.
    Dependents {
        /// Path to the form schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        #[arg(long, value_name = "FIELD")]
        field: String,
    },
    /// Print the JSON Schema of the form schema format.
    JsonSchema,
}

fn main() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Check { schema } => run_check(&schema),
        Command::Validate {
            schema,
            data,
            step,
            user,
            json,
        } => run_validate(&schema, &data, step, &user, json),
        Command::Evaluate {
            schema,
            data,
            step,
            user,
        } => run_evaluate(&schema, &data, step, &user),
        Command::Dependents { schema, field } => run_dependents(&schema, &field),
        Command::JsonSchema => {
            println!("{}", json_schema());
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Schema source plus the component config that embeds it.
struct LoadedSchema {
    schema: FormSchema,
    config_json: String,
}

fn load_schema(path: &Path) -> CliResult<LoadedSchema> {
    let raw = fs::read_to_string(path)?;
    let schema = FormSchema::from_json_str(&raw)?;
    debug!(form = %schema.form_id, steps = schema.steps.len(), "loaded schema");
    let config_json = json!({ "form_schema_json": raw }).to_string();
    Ok(LoadedSchema {
        schema,
        config_json,
    })
}

fn read_json(path: &Path) -> CliResult<String> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    Ok(value.to_string())
}

fn resolve_user(args: &UserArgs) -> CliResult<String> {
    if let Some(path) = &args.user {
        let raw = fs::read_to_string(path)?;
        let user: UserPermissions = serde_json::from_str(&raw)?;
        return Ok(serde_json::to_string(&user)?);
    }
    let mut user = UserPermissions::with_roles(args.roles.iter().cloned());
    for permission in &args.permissions {
        user = user.grant(permission.clone());
    }
    Ok(serde_json::to_string(&user)?)
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(error.to_string().into());
    }
    Ok(value)
}

fn run_check(schema_path: &Path) -> CliResult<()> {
    let loaded = load_schema(schema_path)?;
    let parsed = parse_form_schema(&loaded.schema);
    print_metadata(&parsed);
    Ok(())
}

fn run_validate(
    schema_path: &Path,
    data_path: &Path,
    step: Option<StepId>,
    user: &UserArgs,
    raw_json: bool,
) -> CliResult<()> {
    let loaded = load_schema(schema_path)?;
    let data_json = read_json(data_path)?;
    let user_json = resolve_user(user)?;
    let form_id = &loaded.schema.form_id;

    let report = match step {
        Some(step_id) => {
            let response =
                evaluate_step(form_id, &loaded.config_json, step_id, &data_json, &user_json);
            let value = parse_component_result(&response)?;
            if raw_json {
                println!("{}", serde_json::to_string_pretty(&value["step"])?);
            }
            Report::from_step(&value["step"])
        }
        None => {
            let response = validate_form(form_id, &loaded.config_json, &data_json, &user_json);
            let value = parse_component_result(&response)?;
            if raw_json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            Report::from_form(&value)
        }
    };

    if !raw_json {
        print_report(&report);
    }

    if report.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn run_evaluate(
    schema_path: &Path,
    data_path: &Path,
    step_id: StepId,
    user: &UserArgs,
) -> CliResult<()> {
    let loaded = load_schema(schema_path)?;
    let data_json = read_json(data_path)?;
    let user_json = resolve_user(user)?;
    let response = evaluate_step(
        &loaded.schema.form_id,
        &loaded.config_json,
        step_id,
        &data_json,
        &user_json,
    );
    let value = parse_component_result(&response)?;
    print_step_report(&value);
    Ok(())
}

fn run_dependents(schema_path: &Path, field_id: &str) -> CliResult<()> {
    let loaded = load_schema(schema_path)?;
    let response = form_dependents(&loaded.schema.form_id, &loaded.config_json, field_id);
    let value = parse_component_result(&response)?;
    let names = value["dependents"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    if names.is_empty() {
        println!("No fields depend on {}", field_id);
    } else {
        println!("Dependents of {}: {}", field_id, names);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = include_str!("../../forms-spec/tests/fixtures/registration_form.json");

    fn stdout_of(output: &std::process::Output) -> String {
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    #[test]
    fn user_flags_build_permissions() -> CliResult<()> {
        let args = UserArgs {
            roles: vec!["staff".into()],
            permissions: vec!["forms.edit".into()],
            user: None,
        };
        let user: UserPermissions = serde_json::from_str(&resolve_user(&args)?)?;
        assert!(user.roles.contains("staff"));
        assert_eq!(user.permissions.get("forms.edit"), Some(&true));
        Ok(())
    }

    #[test]
    fn user_file_overrides_flags() -> CliResult<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"roles":["applicant"],"userId":"u-1"}}"#)?;
        let args = UserArgs {
            roles: vec!["staff".into()],
            permissions: Vec::new(),
            user: Some(file.path().to_path_buf()),
        };
        let user: UserPermissions = serde_json::from_str(&resolve_user(&args)?)?;
        assert!(user.roles.contains("applicant"));
        assert!(!user.roles.contains("staff"));
        Ok(())
    }

    #[test]
    fn component_errors_become_cli_errors() {
        let error = parse_component_result(r#"{"error":"step 7 is not defined"}"#)
            .expect_err("error response");
        assert_eq!(error.to_string(), "step 7 is not defined");
    }

    #[test]
    fn report_reads_form_errors() {
        let report = Report::from_form(&json!({
            "isValid": false,
            "allErrors": [{ "field": "email", "message": "Please enter a valid email" }]
        }));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![("email".to_string(), "Please enter a valid email".to_string())]
        );
    }

    #[test]
    fn check_prints_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let schema = workspace.child("registration.json");
        schema.write_str(FIXTURE)?;

        let output = Command::cargo_bin("dynamic-forms")?
            .arg("check")
            .arg("--schema")
            .arg(schema.path())
            .output()?;
        assert!(output.status.success());
        let stdout = stdout_of(&output);
        assert!(stdout.contains("Form: Account registration (registration)"));
        assert!(stdout.contains("Submit strategy: final-only"));
        assert!(stdout.contains("Autosave: every 5000 ms"));
        Ok(())
    }

    #[test]
    fn check_rejects_malformed_schema() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let schema = workspace.child("broken.json");
        schema.write_str(r#"{"formId":"broken","steps":"nope"}"#)?;

        Command::cargo_bin("dynamic-forms")?
            .arg("check")
            .arg("--schema")
            .arg(schema.path())
            .assert()
            .failure();
        Ok(())
    }

    #[test]
    fn validate_step_reports_rule_messages() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let schema = workspace.child("registration.json");
        schema.write_str(FIXTURE)?;
        let data = workspace.child("data.json");
        data.write_str(r#"{"email":"nope","age":30,"country":"CA"}"#)?;

        let output = Command::cargo_bin("dynamic-forms")?
            .arg("validate")
            .arg("--schema")
            .arg(schema.path())
            .arg("--data")
            .arg(data.path())
            .arg("--step")
            .arg("1")
            .output()?;
        assert!(!output.status.success());
        let stdout = stdout_of(&output);
        assert!(stdout.contains("Validation result: invalid"));
        assert!(stdout.contains("email - Please enter a valid email"));
        Ok(())
    }

    #[test]
    fn validate_form_depends_on_roles() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let schema = workspace.child("registration.json");
        schema.write_str(FIXTURE)?;
        let data = workspace.child("data.json");
        data.write_str(
            r#"{"email":"ada@example.com","age":30,"country":"CA","referral":"ABC-123"}"#,
        )?;

        Command::cargo_bin("dynamic-forms")?
            .arg("validate")
            .arg("--schema")
            .arg(schema.path())
            .arg("--data")
            .arg(data.path())
            .arg("--roles")
            .arg("applicant")
            .assert()
            .success();

        let output = Command::cargo_bin("dynamic-forms")?
            .arg("validate")
            .arg("--schema")
            .arg(schema.path())
            .arg("--data")
            .arg(data.path())
            .arg("--roles")
            .arg("staff")
            .arg("--json")
            .output()?;
        assert!(!output.status.success());
        let result: Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(result["isValid"], false);
        assert_eq!(result["stepErrors"]["2"][0]["field"], "internalNotes");
        Ok(())
    }

    #[test]
    fn evaluate_prints_field_states() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let schema = workspace.child("registration.json");
        schema.write_str(FIXTURE)?;
        let data = workspace.child("data.json");
        data.write_str(r#"{"country":"US"}"#)?;

        let output = Command::cargo_bin("dynamic-forms")?
            .arg("evaluate")
            .arg("--schema")
            .arg(schema.path())
            .arg("--data")
            .arg(data.path())
            .arg("--step")
            .arg("1")
            .output()?;
        assert!(output.status.success());
        let stdout = stdout_of(&output);
        assert!(stdout.contains("state [required] access=edit"));
        assert!(stdout.contains("- This field is required"));
        assert!(stdout.contains("Navigation: next=false"));
        Ok(())
    }

    #[test]
    fn dependents_lists_reactive_fields() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(FIXTURE.as_bytes())?;

        let output = Command::cargo_bin("dynamic-forms")?
            .arg("dependents")
            .arg("--schema")
            .arg(file.path())
            .arg("--field")
            .arg("country")
            .output()?;
        assert!(output.status.success());
        assert_eq!(stdout_of(&output).trim(), "Dependents of country: state");
        Ok(())
    }

    #[test]
    fn json_schema_prints_document() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("dynamic-forms")?
            .arg("json-schema")
            .output()?;
        assert!(output.status.success());
        let document: Value = serde_json::from_slice(&output.stdout)?;
        assert!(document["properties"]["formId"].is_object());
        Ok(())
    }
}
