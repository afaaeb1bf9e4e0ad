//! File classification and human-readable sizes for attachment listings
//!
//! Pure helpers used wherever an attached file is shown to the user. The
//! category only depends on the declared name and MIME type, never on the
//! file's bytes.

use serde::Serialize;
use std::fmt;

/// Display category of an attached file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Image,
    Spreadsheet,
    WordDocument,
    Pdf,
    Generic,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::WordDocument => "word-document",
            FileCategory::Pdf => "pdf",
            FileCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file by MIME type first, then by extension
pub fn classify(name: &str, mime: &str) -> FileCategory {
    if mime.starts_with("image/") {
        return FileCategory::Image;
    }

    match extension(name).as_str() {
        "xls" | "xlsx" | "csv" => FileCategory::Spreadsheet,
        "doc" | "docx" => FileCategory::WordDocument,
        "pdf" => FileCategory::Pdf,
        _ => FileCategory::Generic,
    }
}

/// Lowercased text after the last dot (the whole name when there is none)
fn extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase()
}

const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

/// Format a byte count using base-1024 units with two decimals
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit < UNITS.len() - 1 && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    format!("{:.2} {}", bytes as f64 / divisor as f64, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime_wins_over_extension() {
        assert_eq!(classify("scan.pdf", "image/png"), FileCategory::Image);
        assert_eq!(classify("seal", "image/jpeg"), FileCategory::Image);
    }

    #[test]
    fn test_extension_table() {
        assert_eq!(classify("report.xlsx", ""), FileCategory::Spreadsheet);
        assert_eq!(classify("data.CSV", "text/csv"), FileCategory::Spreadsheet);
        assert_eq!(classify("old.xls", ""), FileCategory::Spreadsheet);
        assert_eq!(classify("letter.docx", ""), FileCategory::WordDocument);
        assert_eq!(classify("letter.doc", ""), FileCategory::WordDocument);
        assert_eq!(classify("pv.pdf", "application/pdf"), FileCategory::Pdf);
        assert_eq!(classify("notes.txt", "text/plain"), FileCategory::Generic);
        assert_eq!(classify("archive.tar.gz", ""), FileCategory::Generic);
    }

    #[test]
    fn test_name_without_dot_is_its_own_extension() {
        assert_eq!(classify("pdf", ""), FileCategory::Pdf);
        assert_eq!(classify("README", ""), FileCategory::Generic);
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_sizes() {
        assert_eq!(format_file_size(1), "1.00 Bytes");
        assert_eq!(format_file_size(1023), "1023.00 Bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_stays_in_megabytes() {
        assert_eq!(format_file_size(2 * 1024 * 1024 * 1024), "2048.00 MB");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(FileCategory::WordDocument.to_string(), "word-document");
    }
}
