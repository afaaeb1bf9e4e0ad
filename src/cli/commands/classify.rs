//! `intake classify` command - Display category and size of attachments

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{print_structured, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::files::{format_file_size, FileCategory};
use crate::core::Config;
use crate::entities::ImageFile;

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Files to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Use this MIME type instead of guessing it from the extension
    #[arg(long)]
    pub mime: Option<String>,
}

#[derive(Serialize)]
struct Classified {
    #[serde(flatten)]
    file: ImageFile,
    category: FileCategory,
    display_size: String,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let format = global.resolved_format(&Config::load());

    let mut rows = Vec::new();
    let mut failures = 0;
    for path in &args.files {
        match ImageFile::from_path(path) {
            Ok(mut file) => {
                if let Some(mime) = &args.mime {
                    file.mime = mime.clone();
                }
                rows.push(Classified {
                    category: file.category(),
                    display_size: format_file_size(file.size),
                    file,
                });
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot classify");
                eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
                failures += 1;
            }
        }
    }

    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(&rows, format)?,
        _ if !rows.is_empty() => {
            let mut builder = Builder::default();
            builder.push_record(["File", "Type", "Category", "Size"]);
            for row in &rows {
                builder.push_record([
                    truncate_str(&row.file.name, 40),
                    row.file.mime.clone(),
                    row.category.to_string(),
                    row.display_size.clone(),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
        _ => {}
    }

    if failures > 0 {
        return Err(miette::miette!("{} file(s) could not be read", failures));
    }
    Ok(())
}
