//! Embodied-carbon material tables.

#![deny(unsafe_code)]

use std::fmt;
use std::path::Path;

use btap_model::{MatchCriteria, ReferenceTable, Value};
use btap_standards::StandardsData;
use btap_standards::csv::{ColumnTypes, load_table};
use btap_standards::matcher;
use serde::{Deserialize, Serialize};

use crate::error::{CarbonError, Result};

pub const OPAQUE_TABLE: &str = "materials_opaque";
pub const GLAZING_TABLE: &str = "materials_glazing";
pub const FRAME_TABLE: &str = "materials_frame";

/// Which life-cycle stages a carbon value covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbonScope {
    /// Product through end of life (A–C).
    #[default]
    AToC,
    /// Product and construction stages (A1–A5).
    A1ToA5,
}

impl CarbonScope {
    pub fn column(&self) -> &'static str {
        match self {
            CarbonScope::AToC => "embodied_carbon_a_c",
            CarbonScope::A1ToA5 => "embodied_carbon_a1_a5",
        }
    }
}

impl fmt::Display for CarbonScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarbonScope::AToC => f.write_str("A-C"),
            CarbonScope::A1ToA5 => f.write_str("A1-A5"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Opaque,
    Glazing,
    Frame,
}

impl MaterialKind {
    /// Column holding the material id. Frames share the glazing id space.
    pub fn id_column(&self) -> &'static str {
        match self {
            MaterialKind::Opaque => "materials_opaque_id",
            MaterialKind::Glazing | MaterialKind::Frame => "materials_glazing_id",
        }
    }

    pub fn table_role(&self) -> &'static str {
        match self {
            MaterialKind::Opaque => OPAQUE_TABLE,
            MaterialKind::Glazing => GLAZING_TABLE,
            MaterialKind::Frame => FRAME_TABLE,
        }
    }
}

/// Numeric columns of every material table.
pub fn material_columns() -> ColumnTypes {
    ColumnTypes::numeric([CarbonScope::A1ToA5.column(), CarbonScope::AToC.column()])
}

/// Opaque, glazing and frame material tables.
#[derive(Debug, Clone)]
pub struct CarbonDatabase {
    opaque: ReferenceTable,
    glazing: ReferenceTable,
    frame: ReferenceTable,
}

impl CarbonDatabase {
    pub fn new(opaque: ReferenceTable, glazing: ReferenceTable, frame: ReferenceTable) -> Self {
        Self {
            opaque,
            glazing,
            frame,
        }
    }

    /// Copy the three material tables out of loaded standards data.
    pub fn from_standards(data: &StandardsData) -> Result<Self> {
        Ok(Self::new(
            data.table(OPAQUE_TABLE)?.clone(),
            data.table(GLAZING_TABLE)?.clone(),
            data.table(FRAME_TABLE)?.clone(),
        ))
    }

    /// Load the three material tables from CSV files.
    pub fn load(opaque: &Path, glazing: &Path, frame: &Path) -> Result<Self> {
        let columns = material_columns();
        Ok(Self::new(
            load_table(opaque, OPAQUE_TABLE, &columns)?,
            load_table(glazing, GLAZING_TABLE, &columns)?,
            load_table(frame, FRAME_TABLE, &columns)?,
        ))
    }

    pub fn table(&self, kind: MaterialKind) -> &ReferenceTable {
        match kind {
            MaterialKind::Opaque => &self.opaque,
            MaterialKind::Glazing => &self.glazing,
            MaterialKind::Frame => &self.frame,
        }
    }

    /// Embodied carbon per square metre of material `id`.
    pub fn carbon_per_area(&self, kind: MaterialKind, id: &str, scope: CarbonScope) -> Result<f64> {
        let table = self.table(kind);
        let not_found = || CarbonError::MaterialNotFound {
            id: id.to_string(),
            table: table.name().to_string(),
        };
        // Without the id column every criterion would be ignored.
        if !table.has_column(kind.id_column()) {
            return Err(not_found());
        }
        let criteria = MatchCriteria::new().with(kind.id_column(), id);
        let row = matcher::find(table, &criteria)?.ok_or_else(not_found)?;
        row.get(scope.column())
            .and_then(Value::as_f64)
            .ok_or_else(|| CarbonError::MissingCarbonValue {
                id: id.to_string(),
                table: table.name().to_string(),
                column: scope.column().to_string(),
            })
    }
}
