//! `intake validate` command - Validate records and steps from files

use clap::ValueEnum;
use console::style;
use miette::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::cli::helpers::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::input::{collect_inputs, load_file, LoadError};
use crate::schema::validator::{
    validate_record, validate_step1, validate_step2, validate_step3, FieldError, StepError,
};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate (`-` reads standard input)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// What each file holds: a single step or a whole record
    #[arg(long, short = 's', value_enum, default_value = "record")]
    pub step: StepScope,

    /// Continue validation after the first failing file
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Schema a file is validated against
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepScope {
    /// Step 1: reception
    #[value(name = "1", alias = "reception")]
    Reception,
    /// Step 2: investigating officer
    #[value(name = "2", alias = "officer")]
    Officer,
    /// Step 3: seals
    #[value(name = "3", alias = "seals")]
    Seals,
    /// All three steps
    #[default]
    Record,
}

impl StepScope {
    fn validate(self, value: &Value) -> Result<(), StepError> {
        match self {
            StepScope::Reception => validate_step1(value).map(drop),
            StepScope::Officer => validate_step2(value).map(drop),
            StepScope::Seals => validate_step3(value).map(drop),
            StepScope::Record => validate_record(value).map(drop),
        }
    }
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
}

/// Outcome of one file, as reported in JSON and YAML output
#[derive(Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

enum Outcome {
    Passed,
    Invalid(StepError),
    Unreadable(LoadError),
}

impl Outcome {
    fn error_count(&self) -> usize {
        match self {
            Outcome::Passed => 0,
            Outcome::Invalid(e) => e.field_errors().len().max(1),
            Outcome::Unreadable(_) => 1,
        }
    }

    fn into_report(self, path: &Path) -> FileReport {
        let path = path.display().to_string();
        match self {
            Outcome::Passed => FileReport {
                path,
                valid: true,
                errors: Vec::new(),
                failure: None,
            },
            Outcome::Invalid(StepError::Invalid(report)) => FileReport {
                path,
                valid: false,
                errors: report.into_errors(),
                failure: None,
            },
            Outcome::Invalid(e) => FileReport {
                path,
                valid: false,
                errors: Vec::new(),
                failure: Some(e.to_string()),
            },
            Outcome::Unreadable(e) => FileReport {
                path,
                valid: false,
                errors: Vec::new(),
                failure: Some(e.to_string()),
            },
        }
    }
}

fn check_file(path: &Path, scope: StepScope) -> Outcome {
    let value = match load_file(path) {
        Ok(v) => v,
        Err(e) => return Outcome::Unreadable(e),
    };
    match scope.validate(&value) {
        Ok(()) => Outcome::Passed,
        Err(e) => Outcome::Invalid(e),
    }
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.resolved_format(&config);
    let text = format == OutputFormat::Text;

    let files = collect_inputs(&args.paths);
    if files.is_empty() {
        return Err(miette::miette!("No JSON or YAML files found to validate"));
    }
    tracing::debug!(files = files.len(), scope = ?args.step, "validating");

    let mut stats = ValidationStats::default();
    let mut reports = Vec::new();

    if text && !global.quiet {
        println!(
            "{} Validating {} file(s)...\n",
            style("→").blue(),
            files.len()
        );
    }

    for path in &files {
        stats.files_checked += 1;
        let outcome = check_file(path, args.step);
        let failed = !matches!(outcome, Outcome::Passed);

        if failed {
            stats.files_failed += 1;
            stats.total_errors += outcome.error_count();
        } else {
            stats.files_passed += 1;
        }

        if !text {
            reports.push(outcome.into_report(path));
        } else if !args.summary {
            print_outcome(path, outcome, global.quiet);
        }

        if failed && !args.keep_going {
            break;
        }
    }

    if text {
        if !global.quiet {
            print_summary(&stats);
        }
    } else {
        print_structured(&reports, format)?;
    }

    match stats.files_failed {
        0 => {
            if text && !global.quiet {
                println!("{} All files passed validation!", style("✓").green().bold());
            }
            Ok(())
        }
        1 => Err(miette::miette!("Validation failed: 1 file has errors")),
        n => Err(miette::miette!("Validation failed: {} files have errors", n)),
    }
}

fn print_outcome(path: &Path, outcome: Outcome, quiet: bool) {
    let count = outcome.error_count();
    match outcome {
        Outcome::Passed => {
            if !quiet {
                println!("{} {}", style("✓").green(), path.display());
            }
        }
        Outcome::Invalid(e) => {
            println!(
                "{} {} - {} error(s)",
                style("✗").red(),
                path.display(),
                count
            );
            println!("{:?}", miette::Report::new(e));
        }
        Outcome::Unreadable(e) => {
            println!("{} {}", style("✗").red(), path.display());
            println!("{:?}", miette::Report::new(e));
        }
    }
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_selects_schema() {
        let officer = json!({"nameOpj": "Lt. Diallo"});
        assert!(StepScope::Officer.validate(&officer).is_ok());
        assert!(StepScope::Reception.validate(&officer).is_err());
        assert!(StepScope::Record.validate(&officer).is_err());
    }

    #[test]
    fn test_report_for_invalid_step() {
        let err = StepScope::Seals.validate(&json!({"seals": []})).unwrap_err();
        let report = Outcome::Invalid(err).into_report(Path::new("seals.json"));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "seals");
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_report_for_malformed_input() {
        let err = StepScope::Reception.validate(&json!("2024-03-01")).unwrap_err();
        let outcome = Outcome::Invalid(err);
        assert_eq!(outcome.error_count(), 1);
        let report = outcome.into_report(Path::new("step1.yaml"));
        assert!(report.errors.is_empty());
        assert!(report.failure.unwrap().contains("must be an object"));
    }
}
