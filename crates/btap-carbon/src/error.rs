#![deny(unsafe_code)]

use btap_standards::StandardsError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CarbonError {
    #[error("material {id} not found in table {table}")]
    MaterialNotFound { id: String, table: String },

    #[error("material {id} in table {table} has no numeric {column}")]
    MissingCarbonValue {
        id: String,
        table: String,
        column: String,
    },

    #[error(
        "no frame material (vinyl-wood, plastic or aluminum) named in construction {construction}"
    )]
    FrameMaterialNotFound { construction: String },

    #[error("no pane count for glazing material {id}")]
    PaneCountNotFound { id: String },

    #[error("no frame conversion factor for {frame} / {fenestration_type} / {panes} panes")]
    FrameConversionNotFound {
        frame: String,
        fenestration_type: String,
        panes: u32,
    },

    #[error("invalid frame conversion table: {source}")]
    InvalidFrameTable {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Standards(#[from] StandardsError),
}

pub type Result<T> = std::result::Result<T, CarbonError>;
