//! Shared data types for BTAP standards and embodied-carbon audits.
//!
//! - [`value`] / [`table`]: typed rows of reference tables loaded from CSV
//! - [`criteria`]: equality and range criteria used to select table rows
//! - [`building`]: the read-only building-model boundary consumed by audits
//! - [`report`]: the per-surface-type carbon report

pub mod building;
pub mod criteria;
pub mod report;
pub mod table;
pub mod value;

pub use building::{
    BuildingModel, BuildingSnapshot, Construction, ConstructionType, Space, Surface, SurfaceType,
    Vertex,
};
pub use criteria::{MatchCriteria, RangeCriterion};
pub use report::{CarbonReport, SurfaceCarbon};
pub use table::{ReferenceTable, Row};
pub use value::Value;
