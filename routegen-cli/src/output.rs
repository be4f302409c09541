//! Diagnostics and output writing.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use routegen::RouteGenError;
use tempfile::NamedTempFile;

/// `error[PatternError]: <message>` followed by the location.
pub fn render_error(error: &RouteGenError) -> String {
    format!(
        "error[{}]: {}\n  --> {}\n",
        error.kind, error.message, error.location
    )
}

/// Write `contents` to a uniquely named sibling temp file, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temp file in {}", dir.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", file.path().display()))?;
    file.persist(path)
        .with_context(|| format!("failed to move output into {}", path.display()))?;
    Ok(())
}
