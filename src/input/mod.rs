//! Loading candidate records from JSON and YAML files
//!
//! Both formats are read into a [`serde_json::Value`], the shape the
//! validators work on. Syntax errors keep the source text so they can be
//! reported with a pointer into the file.

pub mod diagnostics;

pub use diagnostics::SyntaxError;

use miette::Diagnostic;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Path standing for standard input
pub const STDIN: &str = "-";

/// Serialization format of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(InputFormat::Json),
            "yaml" | "yml" => Some(InputFormat::Yaml),
            _ => None,
        }
    }

    /// Guess from content: documents opening with a bracket are JSON
    pub fn sniff(source: &str) -> Self {
        match source.trim_start().chars().next() {
            Some('{') | Some('[') => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Json => "json",
            InputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to turn a file into a JSON value
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Cannot read {}", path.display())]
    #[diagnostic(code(intake::input::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Parse a document; `name` is used in diagnostics
pub fn parse(source: &str, format: InputFormat, name: &str) -> Result<Value, LoadError> {
    let value = match format {
        InputFormat::Json => serde_json::from_str(source)
            .map_err(|e| SyntaxError::from_json(&e, source, name))?,
        InputFormat::Yaml => serde_yml::from_str(source)
            .map_err(|e| SyntaxError::from_yaml(&e, source, name))?,
    };
    Ok(value)
}

/// Read and parse one file, or standard input for `-`
pub fn load_file(path: &Path) -> Result<Value, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let source = if path.as_os_str() == STDIN {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(io_error)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(io_error)?
    };

    let format = InputFormat::from_path(path).unwrap_or_else(|| InputFormat::sniff(&source));
    tracing::debug!(path = %path.display(), %format, bytes = source.len(), "loading input");

    let name = if path.as_os_str() == STDIN {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    };
    parse(&source, format, &name)
}

/// Expand the given paths into the list of files to load
///
/// Directories are walked recursively for `.json`, `.yaml` and `.yml`
/// files, skipping hidden entries. Files named explicitly are kept whatever
/// their extension, so a missing file is reported instead of dropped.
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let before = files.len();
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if InputFormat::from_path(entry.path()).is_some() {
                files.push(entry.path().to_path_buf());
            }
        }
        tracing::debug!(dir = %path.display(), found = files.len() - before, "expanded directory");
    }

    files
}
