#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::csv::ColumnTypes;

pub const MANIFEST_SCHEMA: &str = "btap-standards.manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Logical name the file is looked up by, e.g. `motors`.
    pub role: String,
    pub path: String,
    pub sha256: String,
    pub kind: FileKind,
    #[serde(flatten)]
    pub columns: ColumnTypes,
    #[serde(default)]
    pub notes: Option<String>,
}
