//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    classify::ClassifyArgs, completions::CompletionsArgs, config::ConfigCommands,
    slots::SlotsArgs, validate::ValidateArgs, wizard::WizardArgs,
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "intake")]
#[command(author, version, about = "Forensic evidence intake validation")]
#[command(long_about = "Validates evidence intake records (reception, investigating officer, seals and samples) and walks new records through an interactive three-step wizard.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalOpts {
    /// The format to use, falling back to the configured default for `auto`
    pub fn resolved_format(&self, config: &Config) -> OutputFormat {
        if self.format != OutputFormat::Auto {
            return self.format;
        }
        config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Text)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate records or single steps stored as JSON or YAML
    Validate(ValidateArgs),

    /// Enter a new record step by step
    Wizard(WizardArgs),

    /// List the selectable 15-minute time slots
    Slots(SlotsArgs),

    /// Show the display category and size of attachment files
    Classify(ClassifyArgs),

    /// Show configuration values and file locations
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default, otherwise text
    #[default]
    Auto,
    /// Human-readable output
    Text,
    /// JSON (for programs)
    Json,
    /// YAML
    Yaml,
}
