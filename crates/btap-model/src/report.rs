use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::building::SurfaceType;

/// Accumulated area and embodied carbon for one surface type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceCarbon {
    pub area_m2: f64,
    pub carbon: f64,
}

/// Result of one carbon audit.
///
/// `total` is only meaningful after [`CarbonReport::finalize`], which the
/// audit calls once every surface has been accumulated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CarbonReport {
    pub surfaces: BTreeMap<SurfaceType, SurfaceCarbon>,
    pub total: f64,
}

impl CarbonReport {
    /// Empty report with a zeroed entry for every surface type.
    pub fn new(surface_types: &[SurfaceType]) -> Self {
        Self {
            surfaces: surface_types
                .iter()
                .map(|t| (*t, SurfaceCarbon::default()))
                .collect(),
            total: 0.0,
        }
    }

    pub fn add_area(&mut self, surface_type: SurfaceType, area_m2: f64) {
        self.surfaces.entry(surface_type).or_default().area_m2 += area_m2;
    }

    pub fn add_carbon(&mut self, surface_type: SurfaceType, carbon: f64) {
        self.surfaces.entry(surface_type).or_default().carbon += carbon;
    }

    pub fn get(&self, surface_type: SurfaceType) -> Option<&SurfaceCarbon> {
        self.surfaces.get(&surface_type)
    }

    /// Sum of the per-surface-type carbon values.
    pub fn carbon_sum(&self) -> f64 {
        self.surfaces.values().map(|s| s.carbon).sum()
    }

    pub fn finalize(&mut self) {
        self.total = self.carbon_sum();
    }
}
