//! Window frame materials and the frame-length conversion table.

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use btap_standards::StandardsData;
use serde::{Deserialize, Serialize};

use crate::error::{CarbonError, Result};

/// Standards document holding the conversion factors.
pub const FRAME_CONVERSION_DOCUMENT: &str = "glazing_frame_m_to_kg";

/// Frame material family of a glazed assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameMaterial {
    #[serde(rename = "vinyl-wood")]
    VinylWood,
    #[serde(rename = "plastic")]
    Plastic,
    #[serde(rename = "aluminum")]
    Aluminum,
}

impl FrameMaterial {
    /// Inference order; earlier entries win.
    pub const PRIORITY: [FrameMaterial; 3] = [
        FrameMaterial::VinylWood,
        FrameMaterial::Plastic,
        FrameMaterial::Aluminum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameMaterial::VinylWood => "vinyl-wood",
            FrameMaterial::Plastic => "plastic",
            FrameMaterial::Aluminum => "aluminum",
        }
    }

    /// First family, in [`Self::PRIORITY`] order, whose name appears
    /// (case-insensitively) in any of `texts`.
    pub fn infer<'a, I>(texts: I) -> Option<FrameMaterial>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let folded: Vec<String> = texts.into_iter().map(str::to_lowercase).collect();
        Self::PRIORITY
            .into_iter()
            .find(|frame| folded.iter().any(|text| text.contains(frame.as_str())))
    }
}

impl fmt::Display for FrameMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `frame material -> fenestration type -> pane count -> factor`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameConversionTable {
    factors: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>,
}

impl FrameConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(
        mut self,
        frame: FrameMaterial,
        fenestration_type: impl Into<String>,
        panes: u32,
        factor: f64,
    ) -> Self {
        self.factors
            .entry(frame.as_str().to_string())
            .or_default()
            .entry(fenestration_type.into())
            .or_default()
            .insert(panes.to_string(), factor);
        self
    }

    pub fn from_document(document: &serde_json::Value) -> Result<Self> {
        Self::deserialize(document).map_err(|source| CarbonError::InvalidFrameTable { source })
    }

    pub fn from_standards(data: &StandardsData) -> Result<Self> {
        Self::from_document(data.document(FRAME_CONVERSION_DOCUMENT)?)
    }

    pub fn factor(&self, frame: FrameMaterial, fenestration_type: &str, panes: u32) -> Option<f64> {
        self.factors
            .get(frame.as_str())?
            .get(fenestration_type)?
            .get(&panes.to_string())
            .copied()
    }
}
