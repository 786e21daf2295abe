//! # Asset Annotate - sequential ids for the core asset file
//!
//! Numbers the entries of a game asset document so the loader can refer to
//! them by id: every attribute, every category, and every lot nested inside
//! a category gets an integer `id` matching its position.
//!
//! ## Modules
//!
//! - **annotate**: typed document model, the annotation pass, and the writer
//!
//! ## Quick Start
//!
//! ```rust
//! use asset_annotate::annotate_str;
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = r#"{"attributes":[{"name":"a"}],"categories":[{"lots":[{"x":1}]},{}]}"#;
//! let (output, report) = annotate_str(input, false)?;
//!
//! assert_eq!(report.lots, 1);
//! assert!(output.contains(r#"{"x":1,"id":0}"#));
//! # Ok(())
//! # }
//! ```
//!
//! Lot ids come from one counter shared by all categories, so they are
//! unique across the whole document rather than per category.

pub mod annotate;
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use annotate::{
    annotate_file, annotate_str, check_file, preview, AssetDocument, Attribute, Category,
    DocumentWriter, Identified, Lot, Lots,
};
pub use error::AnnotateError;
pub use types::{
    AnnotateConfig, AnnotationReport, IdMismatch, WriteMode, DEFAULT_ASSET_PATH, ID_FIELD,
};
