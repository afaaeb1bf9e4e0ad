//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Truncate a string to `max_chars` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render a value as JSON or YAML
///
/// Text and auto fall back to pretty JSON; callers handle their own text
/// layout before getting here.
pub fn to_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic(),
        _ => serde_json::to_string_pretty(value).into_diagnostic(),
    }
}

/// Print a value as JSON or YAML on stdout
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let out = to_structured(value, format)?;
    println!("{}", out.trim_end());
    Ok(())
}
