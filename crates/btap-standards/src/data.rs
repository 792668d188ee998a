#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use btap_model::ReferenceTable;
use tracing::{debug, info};

use crate::csv::parse_table;
use crate::error::{Result, StandardsError};
use crate::hash::sha256_hex;
use crate::manifest::{
    FileKind, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile,
};

#[derive(Debug, Clone, serde::Serialize)]
pub struct TableSummary {
    pub role: String,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub file_count: usize,
    pub tables: Vec<TableSummary>,
    pub documents: Vec<String>,
}

/// Every reference table and JSON document of one standards directory.
///
/// Loaded eagerly and never mutated afterwards, so one instance can be
/// shared read-only by any number of rule evaluations and audits.
#[derive(Debug, Clone, Default)]
pub struct StandardsData {
    tables: BTreeMap<String, ReferenceTable>,
    documents: BTreeMap<String, serde_json::Value>,
}

impl StandardsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under its own name, replacing any previous one.
    #[must_use]
    pub fn with_table(mut self, table: ReferenceTable) -> Self {
        self.tables.insert(table.name().to_string(), table);
        self
    }

    #[must_use]
    pub fn with_document(mut self, name: impl Into<String>, document: serde_json::Value) -> Self {
        self.documents.insert(name.into(), document);
        self
    }

    pub fn table(&self, name: &str) -> Result<&ReferenceTable> {
        self.tables
            .get(name)
            .ok_or_else(|| StandardsError::UnknownTable {
                table: name.to_string(),
            })
    }

    pub fn document(&self, name: &str) -> Result<&serde_json::Value> {
        self.documents
            .get(name)
            .ok_or_else(|| StandardsError::UnknownDocument {
                document: name.to_string(),
            })
    }

    pub fn tables(&self) -> impl Iterator<Item = &ReferenceTable> {
        self.tables.values()
    }

    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Verify `manifest.toml` and every pinned file, then load them.
    pub fn verify_and_load(standards_dir: &Path) -> Result<(Self, VerifySummary)> {
        let manifest = load_manifest(&standards_dir.join("manifest.toml"))?;
        validate_manifest(&manifest, standards_dir)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut data = Self::new();
        for file in &files {
            let bytes = verify_file(standards_dir, file)?;
            let full_path = standards_dir.join(&file.path);
            match file.kind {
                FileKind::Csv => {
                    let table = parse_table(&bytes, &file.role, &file.columns, &full_path)?;
                    debug!(role = %file.role, rows = table.len(), "loaded reference table");
                    data.tables.insert(file.role.clone(), table);
                }
                FileKind::Json => {
                    let document = serde_json::from_slice(&bytes).map_err(|e| {
                        StandardsError::Json {
                            path: full_path.clone(),
                            source: e,
                        }
                    })?;
                    debug!(role = %file.role, "loaded standards document");
                    data.documents.insert(file.role.clone(), document);
                }
            }
        }

        let summary = VerifySummary {
            standards_dir: standards_dir.to_path_buf(),
            file_count: files.len(),
            tables: data
                .tables
                .iter()
                .map(|(role, t)| TableSummary {
                    role: role.clone(),
                    rows: t.len(),
                    columns: t.columns().len(),
                })
                .collect(),
            documents: data.documents.keys().cloned().collect(),
        };
        info!(
            dir = %standards_dir.display(),
            files = summary.file_count,
            "standards verified"
        );
        Ok((data, summary))
    }
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest, standards_dir: &Path) -> Result<()> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    let mut manifest_paths: BTreeSet<PathBuf> = BTreeSet::new();

    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(StandardsError::DuplicateRole {
                role: file.role.clone(),
            });
        }
        if file.kind == FileKind::Json
            && !(file.columns.numeric.is_empty() && file.columns.dates.is_empty())
        {
            return Err(StandardsError::InvalidManifest {
                message: format!("typed columns declared for JSON file {}", file.path),
            });
        }

        validate_sha(&file.sha256, &file.path)?;
        manifest_paths.insert(normalize_path(&validate_path(&file.path)?));
    }

    for path in list_files_under(standards_dir)? {
        if path == Path::new("manifest.toml") {
            continue;
        }
        if !manifest_paths.contains(&normalize_path(&path)) {
            return Err(StandardsError::UnexpectedFile {
                path: standards_dir.join(path),
            });
        }
    }

    Ok(())
}

fn verify_file(standards_dir: &Path, file: &ManifestFile) -> Result<Vec<u8>> {
    let full_path = standards_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            StandardsError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(bytes)
}

fn validate_sha(sha: &str, path: &str) -> Result<()> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf> {
    if path.contains('\\') {
        return Err(StandardsError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }

    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }

    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must not traverse out of standards/".to_string(),
        });
    }

    Ok(p)
}

fn list_files_under(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = BTreeSet::new();

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| StandardsError::io(&dir, e))? {
            let entry = entry.map_err(|e| StandardsError::io(&dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| StandardsError::InvalidPath {
                        path: path.clone(),
                        message: format!("failed to relativize path: {e}"),
                    })?
                    .to_path_buf();
                files.insert(rel);
            }
        }
    }

    Ok(files)
}

fn normalize_path(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in p.components() {
        match c {
            Component::CurDir => {}
            _ => out.push(c.as_os_str()),
        }
    }
    out
}
