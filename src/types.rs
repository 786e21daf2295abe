use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// File the game loads its core assets from
pub const DEFAULT_ASSET_PATH: &str = "core.asset.json";

/// Key injected into every attribute, category and lot
pub const ID_FIELD: &str = "id";

/// How the annotated document reaches the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate the destination and write in place
    #[default]
    Direct,
    /// Write a sibling temp file, then rename it over the destination
    Atomic,
}

/// Configuration for one annotation run
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    /// Asset file to read
    pub input: PathBuf,

    /// Destination, if different from the input
    pub output: Option<PathBuf>,

    /// Pretty-print instead of compact output
    pub pretty: bool,

    pub write_mode: WriteMode,
}

impl AnnotateConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        AnnotateConfig {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Where the annotated document is written
    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        AnnotateConfig {
            input: PathBuf::from(DEFAULT_ASSET_PATH),
            output: None,
            pretty: false,
            write_mode: WriteMode::Direct,
        }
    }
}

/// Counts produced by one annotation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    pub attributes: usize,
    pub categories: usize,
    pub lots: usize,

    /// Entries that already carried an `id` different from the one assigned
    pub reassigned: usize,
}

impl AnnotationReport {
    pub fn total(&self) -> usize {
        self.attributes + self.categories + self.lots
    }
}

/// An entry whose `id` does not match its position
#[derive(Debug, Clone, PartialEq)]
pub struct IdMismatch {
    /// JSON pointer to the entry, e.g. `/categories/1/lots/0`
    pub path: String,
    pub expected: u64,
    pub found: Option<Value>,
}

impl fmt::Display for IdMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(found) => write!(f, "{}: expected id {}, found {}", self.path, self.expected, found),
            None => write!(f, "{}: expected id {}, found none", self.path, self.expected),
        }
    }
}
