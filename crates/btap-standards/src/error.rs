#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("duplicate role in manifest: {role}")]
    DuplicateRole { role: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("unexpected file present under standards/: {path}")]
    UnexpectedFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("malformed table {table} at line {line}, column {column}: '{value}' {message}")]
    MalformedTable {
        table: String,
        line: u64,
        column: String,
        value: String,
        message: String,
    },

    #[error("unknown reference table: {table}")]
    UnknownTable { table: String },

    #[error("unknown standards document: {document}")]
    UnknownDocument { document: String },

    #[error("empty search criteria for table {table}")]
    EmptyCriteria { table: String },

    #[error("no row in {table} matches {criteria}")]
    NoMatch { table: String, criteria: String },

    #[error("column {column} is missing or null in the {table} row matching {criteria}")]
    MissingColumn {
        table: String,
        column: String,
        criteria: String,
    },

    #[error("standard variant already registered: {name}")]
    DuplicateName { name: String },

    #[error("parent {parent} of standard variant {name} is not registered")]
    UnknownParent { name: String, parent: String },

    #[error("unknown standard: {name}")]
    UnknownStandard { name: String },

    #[error("rule {rule} is not defined for {variant} (searched {chain})")]
    UnresolvedRule {
        variant: String,
        rule: String,
        chain: String,
    },

    #[error("rule {rule} of {variant} needs argument {argument}")]
    MissingArgument {
        variant: String,
        rule: String,
        argument: String,
    },

    #[error("rule {rule} of {variant} needs qualifier {qualifier}")]
    MissingQualifier {
        variant: String,
        rule: String,
        qualifier: &'static str,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
