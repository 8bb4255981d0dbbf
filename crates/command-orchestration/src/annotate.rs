//! Output markup turning file positions into links
//!
//! Compiler and tool output usually starts with a location such as
//! `main.go:42:7` or `./pkg/util.go:3`. The first of the first two fields
//! that looks like a file (contains `.` or `/`) is replaced by an anchor
//! pointing at the absolute path plus optional line and column.

use std::path::{Path, PathBuf};

/// A file position found in an output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLink {
    /// Absolute (or base-relative when no base is known) path
    pub path: PathBuf,
    /// 1-based line, when present
    pub line: Option<u32>,
    /// 1-based column, when present
    pub column: Option<u32>,
    /// Original text of the field
    pub text: String,
}

impl FileLink {
    /// Link target, e.g. `file:///src/main.go#L42C7`
    pub fn href(&self) -> String {
        let path = self.path.to_string_lossy();
        let sep = if path.starts_with('/') { "" } else { "/" };
        match (self.line, self.column) {
            (Some(line), Some(col)) => format!("file://{}{}#L{}C{}", sep, path, line, col),
            (Some(line), None) => format!("file://{}{}#L{}", sep, path, line),
            _ => format!("file://{}{}", sep, path),
        }
    }

    /// Anchor markup wrapping the original text
    pub fn to_markup(&self) -> String {
        format!(r#"<a href="{}">{}</a>"#, self.href(), self.text)
    }
}

/// Parse `field` as `path[:line[:column]]`, resolving relative paths against `base_dir`
pub fn detect_link(field: &str, base_dir: Option<&Path>) -> Option<FileLink> {
    if !(field.contains('.') || field.contains('/')) {
        return None;
    }

    let mut parts = field.split(':');
    let file = parts.next().filter(|f| !f.is_empty())?;
    let line = parts.next().and_then(|p| p.parse().ok());
    let column = line.and(parts.next().and_then(|p| p.parse().ok()));

    let relative = Path::new(file);
    let path = match base_dir {
        Some(base) if !relative.is_absolute() => {
            base.join(file.strip_prefix("./").unwrap_or(file))
        }
        _ => relative.to_path_buf(),
    };

    Some(FileLink {
        path,
        line,
        column,
        text: field.to_string(),
    })
}

/// Rewrite the first file-like field among the first two fields of `line`
///
/// All other text, including whitespace, is kept as is.
pub fn markup_line(line: &str, base_dir: Option<&Path>) -> String {
    for (start, field) in fields(line).take(2) {
        if let Some(link) = detect_link(field, base_dir) {
            let end = start + field.len();
            return format!("{}{}{}", &line[..start], link.to_markup(), &line[end..]);
        }
    }
    line.to_string()
}

/// Whitespace separated fields with their byte offsets
fn fields(line: &str) -> impl Iterator<Item = (usize, &str)> {
    line.split_whitespace()
        .map(move |field| (field.as_ptr() as usize - line.as_ptr() as usize, field))
}
