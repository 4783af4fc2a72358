//! Shared error utilities

use miette::{NamedSource, SourceSpan};
use std::path::Path;

/// Format a file path for error display, relative to the working directory
/// when possible.
pub fn format_error_path(path: &Path) -> String {
    let display_path = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf());
    display_path.display().to_string()
}

/// Create a NamedSource with proper formatting for error display
pub fn create_named_source(path: &Path, content: String) -> NamedSource<String> {
    NamedSource::new(format_error_path(path), content)
}

/// Byte offset of the start of a zero-based line.
pub fn line_to_offset(source: &str, line: usize) -> usize {
    source
        .split_inclusive('\n')
        .take(line)
        .map(str::len)
        .sum()
}

/// Span for a one-based line and column as reported by serde_json.
pub fn span_at(source: &str, line: usize, column: usize) -> SourceSpan {
    let offset = line_to_offset(source, line.saturating_sub(1)) + column.saturating_sub(1);
    SourceSpan::from(offset.min(source.len()))
}
