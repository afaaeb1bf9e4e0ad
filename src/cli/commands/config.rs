//! `intake config` command - Inspect configuration

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::helpers::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::notify::ToastPosition;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration after merging all sources
    Show,

    /// Show paths to configuration files
    Path,
}

/// Effective settings, defaults filled in
#[derive(Serialize)]
struct Effective {
    toast_duration_ms: u64,
    toast_position: ToastPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_format: Option<String>,
}

#[derive(Serialize)]
struct ConfigPaths {
    global: Option<PathBuf>,
    local: Option<PathBuf>,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.resolved_format(&config);
    match cmd {
        ConfigCommands::Show => run_show(&config, format),
        ConfigCommands::Path => run_path(format),
    }
}

fn run_show(config: &Config, format: OutputFormat) -> Result<()> {
    let options = config.toast_options();
    let effective = Effective {
        toast_duration_ms: u64::try_from(options.duration.as_millis()).unwrap_or(u64::MAX),
        toast_position: options.position,
        default_format: config.default_format.clone(),
    };

    if format != OutputFormat::Text {
        return print_structured(&effective, format);
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    print_value("toast_duration_ms", &effective.toast_duration_ms.to_string(), config.toast_duration_ms.is_none());
    print_value("toast_position", effective.toast_position.as_str(), config.toast_position.is_none());
    match &effective.default_format {
        Some(f) => print_value("default_format", f, false),
        None => println!("  {:<20} {}", style("default_format").cyan(), style("(not set)").dim()),
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (INTAKE_TOAST_DURATION_MS, INTAKE_TOAST_POSITION, INTAKE_FORMAT)");
    println!("  2. Local config (.intake/config.yaml, nearest parent directory)");
    println!("  3. Global config (~/.config/intake/config.yaml)");
    Ok(())
}

fn print_value(key: &str, value: &str, is_default: bool) {
    if is_default {
        println!("  {:<20} {} {}", style(key).cyan(), value, style("(default)").dim());
    } else {
        println!("  {:<20} {}", style(key).cyan(), value);
    }
}

fn run_path(format: OutputFormat) -> Result<()> {
    let paths = ConfigPaths {
        global: Config::global_config_path(),
        local: std::env::current_dir()
            .ok()
            .and_then(|cwd| Config::local_config_path(&cwd)),
    };

    if format != OutputFormat::Text {
        return print_structured(&paths, format);
    }

    println!("{}", style("Configuration file paths:").bold());
    println!();
    match &paths.global {
        Some(path) => print_path("Global:", path),
        None => println!("  {} {}", style("Global:").cyan(), style("(no home directory)").dim()),
    }
    match &paths.local {
        Some(path) => print_path("Local:", path),
        None => println!("  {} {}", style("Local:").cyan(), style("(none found)").dim()),
    }
    Ok(())
}

fn print_path(label: &str, path: &Path) {
    let state = if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("  {} {} {}", style(label).cyan(), path.display(), state);
}
