use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info_span};

use rde_cli::exit::refuse_archive;
use rde_cli::summary::{kinds_plain, kinds_table, report_footer, report_table, rules_table};
use rde_model::FilesSchema;
use rde_schema::load_schema_or_default;
use rde_validate::{BatchPolicy, BatchReport, Validator, ValidatorOptions, rule_catalogue};

use crate::cli::{KindsArgs, ValidateArgs};

pub fn load_files_schema(path: Option<&Path>) -> Result<FilesSchema> {
    let schema = load_schema_or_default(path)?;
    debug!(kinds = schema.len(), "files-schema ready");
    Ok(schema)
}

pub fn run_validate(args: &ValidateArgs, schema_path: Option<&Path>) -> Result<BatchReport> {
    refuse_archive(args.archive)?;
    let schema = load_files_schema(schema_path)?;
    let policy = if args.keep_going {
        BatchPolicy::Continue
    } else {
        BatchPolicy::FailFast
    };
    let options = ValidatorOptions::default()
        .with_delimiter(args.delimiter)
        .with_default_kind(args.default_kind.clone())
        .with_policy(policy);
    let validator = Validator::new(schema, options);
    let _span = info_span!("validate", files = args.file_specs.len()).entered();
    Ok(validator.validate_all(&args.file_specs))
}

/// Failures go to stderr; the table (or JSON) to stdout.
pub fn print_report(report: &BatchReport, json: bool) -> Result<()> {
    for (_, error) in report.failures() {
        eprintln!("error: {error}");
    }
    if json {
        let text = serde_json::to_string_pretty(&report.records()).context("serialize report")?;
        println!("{text}");
    } else {
        println!("{}", report_table(report));
        println!("{}", report_footer(report));
    }
    Ok(())
}

pub fn run_kinds(args: &KindsArgs, schema_path: Option<&Path>) -> Result<()> {
    let schema = load_files_schema(schema_path)?;
    if args.plain {
        println!("{}", kinds_plain(&schema));
    } else {
        println!("{}", kinds_table(&schema));
    }
    Ok(())
}

pub fn run_rules() {
    println!("{}", rules_table(&rule_catalogue()));
}
