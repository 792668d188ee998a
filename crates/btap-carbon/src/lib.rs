//! Embodied-carbon audit of building envelopes.
//!
//! Build a [`CarbonDatabase`], a [`FrameConversionTable`] and a
//! [`CostingDatabase`] once, then run [`BtapCarbon::audit`] for any number of
//! building models.

#![deny(unsafe_code)]

pub mod costing;
pub mod database;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use crate::costing::{COSTING_GLAZING_TABLE, CostingDatabase, CostingTable};
pub use crate::database::{CarbonDatabase, CarbonScope, MaterialKind};
pub use crate::error::{CarbonError, Result};
pub use crate::frame::{FRAME_CONVERSION_DOCUMENT, FrameConversionTable, FrameMaterial};
pub use crate::pipeline::{AuditOptions, BtapCarbon};
