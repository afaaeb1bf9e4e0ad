//! `intake wizard` command - Enter a new record interactively

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{print_structured, to_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::input::InputFormat;
use crate::schema::IntakeWizard;

#[derive(clap::Args, Debug)]
pub struct WizardArgs {
    /// Write the record to this file (.json, .yaml or .yml) instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: WizardArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let options = config.toast_options();
    tracing::debug!(
        duration_ms = options.duration.as_millis() as u64,
        position = %options.position,
        "starting wizard"
    );

    let record = IntakeWizard::new(options).run()?;

    let Some(path) = args.output else {
        let format = match global.resolved_format(&config) {
            OutputFormat::Yaml => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        };
        return print_structured(&record, format);
    };

    let format = match InputFormat::from_path(&path) {
        Some(InputFormat::Yaml) => OutputFormat::Yaml,
        _ => OutputFormat::Json,
    };
    let mut contents = to_structured(&record, format)?;
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    fs::write(&path, contents).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Wrote record to {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }
    Ok(())
}
