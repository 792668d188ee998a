//! Energy-code standards for BTAP: reference tables, criteria matching and
//! the registry of inheriting standard variants.
//!
//! A standards directory holds a pinned `manifest.toml` plus CSV tables and
//! JSON documents. [`StandardsData::verify_and_load`] checks every pin and
//! loads the lot; [`StandardRegistry::builtin`] builds the variant tree;
//! rules are then evaluated against the data with
//! [`StandardVariant::evaluate`].

#![deny(unsafe_code)]

pub mod catalog;
pub mod csv;
pub mod data;
pub mod doctor;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod matcher;
pub mod paths;
pub mod registry;
pub mod rules;
pub mod variant;

pub use crate::data::{StandardsData, TableSummary, VerifySummary};
pub use crate::doctor::DoctorReport;
pub use crate::error::{Result, StandardsError};
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::registry::{StandardRegistry, VariantSpec};
pub use crate::variant::{Qualifiers, Rule, RuleArgs, RuleContext, RuleSet, StandardVariant};
