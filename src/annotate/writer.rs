use crate::annotate::document::AssetDocument;
use crate::error::{AnnotateError, Result};
use crate::types::WriteMode;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Serializes an asset document and writes it over a file
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentWriter {
    pretty: bool,
    mode: WriteMode,
}

impl DocumentWriter {
    pub fn new(pretty: bool, mode: WriteMode) -> Self {
        DocumentWriter { pretty, mode }
    }

    /// Render the document as JSON text
    pub fn render(&self, document: &AssetDocument) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        rendered.map_err(AnnotateError::Serialize)
    }

    /// Render the document and replace the contents of `path` with it
    pub fn write<P: AsRef<Path>>(&self, path: P, document: &AssetDocument) -> Result<()> {
        let contents = self.render(document)?;
        self.write_str(path.as_ref(), &contents)
    }

    pub fn write_str(&self, path: &Path, contents: &str) -> Result<()> {
        debug!(path = %path.display(), bytes = contents.len(), mode = ?self.mode, "writing asset file");

        let result = match self.mode {
            WriteMode::Direct => std::fs::write(path, contents),
            WriteMode::Atomic => write_atomic(path, contents),
        };

        result.map_err(|source| AnnotateError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Write to a temp file next to `path`, then rename it into place
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;

    // The temp file is created owner-only; keep the destination's mode
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
