//! The embodied-carbon audit of a building envelope.
//!
//! [`BtapCarbon`] walks every surface of a [`BuildingModel`], looks up the
//! embodied carbon of each layer of its construction and accumulates the
//! results per surface type. Glazing layers of fixed and operable windows
//! also carry the carbon of their frame, which is derived from the window
//! perimeter and a frame-length conversion factor.

#![deny(unsafe_code)]

use btap_model::{BuildingModel, CarbonReport, Construction, ConstructionType, Surface};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::costing::CostingDatabase;
use crate::database::{CarbonDatabase, CarbonScope, MaterialKind};
use crate::error::{CarbonError, Result};
use crate::frame::{FrameConversionTable, FrameMaterial};

/// Fenestration types whose glazing layers are counted.
pub const FRAMED_FENESTRATION_TYPES: [&str; 2] = ["FixedWindow", "OperableWindow"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    pub scope: CarbonScope,
}

/// Carbon audit of one building model against one material database.
///
/// All collaborators are borrowed; the audit itself holds no state, so
/// [`BtapCarbon::audit`] can be called repeatedly and from several threads.
#[derive(Debug)]
pub struct BtapCarbon<'a, M: ?Sized, C: ?Sized> {
    model: &'a M,
    database: &'a CarbonDatabase,
    costing: &'a C,
    frames: &'a FrameConversionTable,
    options: AuditOptions,
}

impl<'a, M, C> BtapCarbon<'a, M, C>
where
    M: BuildingModel + ?Sized,
    C: CostingDatabase + ?Sized,
{
    pub fn new(
        model: &'a M,
        database: &'a CarbonDatabase,
        costing: &'a C,
        frames: &'a FrameConversionTable,
    ) -> Self {
        Self {
            model,
            database,
            costing,
            frames,
            options: AuditOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AuditOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> AuditOptions {
        self.options
    }

    /// Accumulate area and carbon for every surface of the model.
    ///
    /// The first lookup failure aborts the audit; no partial report is
    /// returned.
    pub fn audit(&self) -> Result<CarbonReport> {
        let span = info_span!("carbon_audit", scope = %self.options.scope);
        let _guard = span.enter();

        let surface_types = self.model.surface_types();
        let mut report = CarbonReport::new(surface_types);
        let mut surfaces = 0usize;

        for space in self.model.spaces() {
            for &surface_type in surface_types {
                for surface in space.surfaces_of(surface_type) {
                    let area = surface.area_m2();
                    report.add_area(surface_type, area);

                    let carbon = match &surface.construction {
                        Some(construction) => {
                            self.carbon_emissions(construction, surface, area)?
                        }
                        None => 0.0,
                    };
                    debug!(
                        space = %space.name,
                        surface = %surface.name,
                        %surface_type,
                        area_m2 = area,
                        carbon,
                        "surface audited"
                    );
                    report.add_carbon(surface_type, carbon);
                    surfaces += 1;
                }
            }
        }

        report.finalize();
        info!(surfaces, total = report.total, "carbon audit complete");
        Ok(report)
    }

    /// Embodied carbon of `construction` applied to `surface` over `surface_area` m².
    pub fn carbon_emissions(
        &self,
        construction: &Construction,
        surface: &Surface,
        surface_area: f64,
    ) -> Result<f64> {
        let scope = self.options.scope;
        let kind = match construction.construction_type {
            ConstructionType::Opaque => MaterialKind::Opaque,
            ConstructionType::Glazing => MaterialKind::Glazing,
        };

        let mut total = 0.0;
        for material_id in construction.material_ids() {
            let per_area = self.database.carbon_per_area(kind, material_id, scope)?;

            if kind == MaterialKind::Glazing {
                let fenestration_type = construction.fenestration_type.as_deref();
                let Some(fenestration_type) =
                    fenestration_type.filter(|t| FRAMED_FENESTRATION_TYPES.contains(t))
                else {
                    // The whole layer is left out, not just its frame.
                    info!(
                        construction = %construction.name,
                        material_id,
                        fenestration_type = fenestration_type.unwrap_or(""),
                        "skipping glazing layer of a non-window fenestration"
                    );
                    continue;
                };
                total += self.frame_emissions(construction, surface, material_id, fenestration_type)?;
            }

            total += per_area * surface_area;
        }
        Ok(total)
    }

    fn frame_emissions(
        &self,
        construction: &Construction,
        surface: &Surface,
        material_id: &str,
        fenestration_type: &str,
    ) -> Result<f64> {
        let frame_per_area =
            self.database
                .carbon_per_area(MaterialKind::Frame, material_id, self.options.scope)?;
        let panes = self
            .costing
            .glazing_pane_count(material_id)
            .ok_or_else(|| CarbonError::PaneCountNotFound {
                id: material_id.to_string(),
            })?;
        let frame = FrameMaterial::infer(construction.free_text()).ok_or_else(|| {
            CarbonError::FrameMaterialNotFound {
                construction: construction.name.clone(),
            }
        })?;
        let perimeter = surface.perimeter_m();
        let factor = self
            .frames
            .factor(frame, fenestration_type, panes)
            .ok_or_else(|| CarbonError::FrameConversionNotFound {
                frame: frame.to_string(),
                fenestration_type: fenestration_type.to_string(),
                panes,
            })?;

        let carbon = frame_per_area * perimeter * factor;
        debug!(
            material_id,
            %frame,
            panes,
            perimeter_m = perimeter,
            factor,
            carbon,
            "frame carbon"
        );
        Ok(carbon)
    }
}
