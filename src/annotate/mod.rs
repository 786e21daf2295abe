//! Asset id annotation - number attributes, categories and lots
//!
//! The pipeline is strictly sequential: load, parse, shape check, annotate,
//! serialize, write. Nothing is written unless every earlier stage succeeds.

pub mod document;
pub mod writer;

pub use document::{AssetDocument, Attribute, Category, Identified, Lot, Lots};
pub use writer::DocumentWriter;

use crate::error::{AnnotateError, Result};
use crate::types::{AnnotateConfig, AnnotationReport, IdMismatch};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read the raw bytes of an asset file
pub fn load(path: &Path) -> Result<Vec<u8>> {
    debug!(path = %path.display(), "loading asset file");
    std::fs::read(path).map_err(|source| AnnotateError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse raw bytes into a typed document; `path` is only used for diagnostics
pub fn parse(path: &Path, bytes: &[u8]) -> Result<AssetDocument> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| AnnotateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let document = AssetDocument::from_value(value).map_err(|source| AnnotateError::Shape {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        attributes = document.attributes.len(),
        categories = document.categories.len(),
        "parsed asset document"
    );
    Ok(document)
}

/// Run the pipeline over in-memory JSON text and return the annotated text
pub fn annotate_str(input: &str, pretty: bool) -> Result<(String, AnnotationReport)> {
    let mut document = parse(Path::new("<input>"), input.as_bytes())?;
    let report = document.annotate();
    let output = DocumentWriter::new(pretty, Default::default()).render(&document)?;
    Ok((output, report))
}

/// Annotate the configured file without writing anything back
pub fn preview(config: &AnnotateConfig) -> Result<(String, AnnotationReport)> {
    let bytes = load(&config.input)?;
    let mut document = parse(&config.input, &bytes)?;
    let report = document.annotate();
    let output = DocumentWriter::new(config.pretty, config.write_mode).render(&document)?;
    Ok((output, report))
}

/// Annotate the configured file and write the result to its output path
pub fn annotate_file(config: &AnnotateConfig) -> Result<AnnotationReport> {
    let (output, report) = preview(config)?;

    if report.reassigned > 0 {
        warn!(
            reassigned = report.reassigned,
            "replaced existing ids that did not match their position"
        );
    }

    let destination = config.output_path();
    DocumentWriter::new(config.pretty, config.write_mode).write_str(destination, &output)?;

    info!(
        path = %destination.display(),
        attributes = report.attributes,
        categories = report.categories,
        lots = report.lots,
        "annotated asset file"
    );
    Ok(report)
}

/// Verify the ids in a file without modifying it
pub fn check_file(path: &Path) -> Result<Vec<IdMismatch>> {
    let bytes = load(path)?;
    let document = parse(path, &bytes)?;
    Ok(document.verify())
}
