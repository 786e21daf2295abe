use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the annotation pipeline, one variant per stage
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("failed to read asset file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is valid but `attributes`, `categories` or `lots` are missing or mis-shaped
    #[error("unexpected asset document shape in {}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize asset document")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write asset file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnnotateError>;
