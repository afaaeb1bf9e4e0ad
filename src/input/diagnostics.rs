//! Syntax diagnostics pointing into the offending input file

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// JSON or YAML syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{format} syntax error: {message}")]
#[diagnostic(code(intake::input::syntax))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    format: &'static str,

    message: String,
}

impl SyntaxError {
    pub fn from_yaml(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        Self::at(err.to_string(), "YAML", source, filename, line, column)
    }

    pub fn from_json(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at(err.to_string(), "JSON", source, filename, err.line(), err.column())
    }

    fn at(
        message: String,
        format: &'static str,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = offset_of(source, line, column);
        let help = suggest(&message);
        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help,
            format,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset the error points at
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Byte offset of a 1-based line and column, clamped to the source
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let rest = &source[line_start.min(source.len())..];
    let text = rest.lines().next().unwrap_or("");
    let within = text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(text.len(), |(i, _)| i);
    (line_start + within).min(source.len())
}

fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("trailing comma") {
        return Some("Remove the comma after the last element".to_string());
    }
    if msg.contains("eof while parsing") {
        return Some("The document ends early, check for an unclosed '{' or '['".to_string());
    }
    if msg.contains("key must be a string") {
        return Some("Object keys must be double-quoted: \"dateReceived\"".to_string());
    }
    if msg.contains("tab") {
        return Some("Indent YAML with spaces, not tabs".to_string());
    }
    if msg.contains("duplicate") {
        return Some("Each field may only appear once".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("Quote values that contain ':', such as times: \"09:15:00\"".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let source = "ab\ncdé\nf";
        assert_eq!(offset_of(source, 1, 1), 0);
        assert_eq!(offset_of(source, 2, 1), 3);
        assert_eq!(offset_of(source, 2, 3), 5);
        assert_eq!(offset_of(source, 3, 1), 8);
        assert_eq!(offset_of(source, 9, 9), source.len());
        assert_eq!(offset_of("", 1, 1), 0);
    }

    #[test]
    fn test_json_error_location() {
        let source = "{\n  \"seals\": [1,]\n}";
        let err = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
        let syntax = SyntaxError::from_json(&err, source, "record.json");
        assert!(syntax.offset() > source.find('[').unwrap());
        assert!(syntax.offset() < source.rfind('}').unwrap());
        assert!(syntax.to_string().starts_with("JSON syntax error"));
    }

    #[test]
    fn test_suggestions() {
        assert!(suggest("trailing comma at line 2 column 16").is_some());
        assert!(suggest("EOF while parsing an object").is_some());
        assert!(suggest("invalid type: string").is_none());
    }
}
