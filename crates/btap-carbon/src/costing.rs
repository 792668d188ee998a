#![deny(unsafe_code)]

use std::collections::BTreeMap;

use btap_model::ReferenceTable;
use btap_standards::{StandardsData, StandardsError};

use crate::error::Result;

/// Standards table with one row per glazing material.
pub const COSTING_GLAZING_TABLE: &str = "costing_glazing";

/// Costing data the carbon audit needs.
pub trait CostingDatabase {
    /// Number of panes of the glazing material `material_id`.
    fn glazing_pane_count(&self, material_id: &str) -> Option<u32>;
}

impl CostingDatabase for BTreeMap<String, u32> {
    fn glazing_pane_count(&self, material_id: &str) -> Option<u32> {
        self.get(material_id).copied()
    }
}

/// Pane counts read from the `costing_glazing` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostingTable {
    panes: BTreeMap<String, u32>,
}

impl CostingTable {
    pub fn from_table(table: &ReferenceTable) -> Result<Self> {
        let mut panes = BTreeMap::new();
        for (index, row) in table.iter().enumerate() {
            let Some(id) = row.text("materials_glazing_id") else {
                continue;
            };
            let malformed = |message: &str| StandardsError::MalformedTable {
                table: table.name().to_string(),
                // Header is line 1.
                line: index as u64 + 2,
                column: "panes".to_string(),
                value: row.get("panes").map(ToString::to_string).unwrap_or_default(),
                message: message.to_string(),
            };
            let count = row
                .number("panes")
                .ok_or_else(|| malformed("is not a number"))?;
            if count < 1.0 || count.fract() != 0.0 || count > f64::from(u32::MAX) {
                return Err(malformed("is not a positive whole pane count").into());
            }
            panes.insert(id.to_string(), count as u32);
        }
        Ok(Self { panes })
    }

    pub fn from_standards(data: &StandardsData) -> Result<Self> {
        Self::from_table(data.table(COSTING_GLAZING_TABLE)?)
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }
}

impl FromIterator<(String, u32)> for CostingTable {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        Self {
            panes: iter.into_iter().collect(),
        }
    }
}

impl CostingDatabase for CostingTable {
    fn glazing_pane_count(&self, material_id: &str) -> Option<u32> {
        self.panes.get(material_id).copied()
    }
}
