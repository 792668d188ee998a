#![deny(unsafe_code)]

use std::collections::BTreeMap;

use crate::data::{TableSummary, VerifySummary};
use crate::registry::StandardRegistry;

/// Machine-readable health report of a standards directory and registry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub tables: Vec<TableSummary>,
    pub documents: Vec<String>,
    pub counts: DoctorCounts,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorCounts {
    pub files: usize,
    pub tables: usize,
    pub rows: usize,
    pub documents: usize,
    pub variants: usize,
    /// Variants per family root.
    pub families: BTreeMap<String, usize>,
}

impl DoctorReport {
    pub fn from_verify_summary(summary: &VerifySummary, registry: &StandardRegistry) -> Self {
        let mut families = BTreeMap::new();
        for variant in registry.iter() {
            *families.entry(variant.root().name().to_string()).or_insert(0) += 1;
        }
        Self {
            schema: "btap-standards.doctor".to_string(),
            schema_version: 1,
            tables: summary.tables.clone(),
            documents: summary.documents.clone(),
            counts: DoctorCounts {
                files: summary.file_count,
                tables: summary.tables.len(),
                rows: summary.tables.iter().map(|t| t.rows).sum(),
                documents: summary.documents.len(),
                variants: registry.len(),
                families,
            },
        }
    }
}
