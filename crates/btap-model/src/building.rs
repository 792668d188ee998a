//! Building-model boundary types.
//!
//! The carbon audit only needs a read-only view of a building: its spaces,
//! the surfaces in each space bucketed by [`SurfaceType`], and per surface the
//! net area, zone multiplier, polygon and construction. [`BuildingModel`] is
//! that view; [`BuildingSnapshot`] is a serde-backed implementation used when
//! the model is exported from another tool as JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category used to bucket a surface for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    ExteriorWall,
    ExteriorRoof,
    ExteriorFloor,
    ExteriorFixedWindow,
    ExteriorOperableWindow,
    ExteriorSkylight,
    ExteriorTubularDaylightDiffuser,
    ExteriorTubularDaylightDome,
    ExteriorDoor,
    ExteriorGlassDoor,
    ExteriorOverheadDoor,
    GroundContactWall,
    GroundContactRoof,
    GroundContactFloor,
}

impl SurfaceType {
    pub const ALL: [SurfaceType; 14] = [
        SurfaceType::ExteriorWall,
        SurfaceType::ExteriorRoof,
        SurfaceType::ExteriorFloor,
        SurfaceType::ExteriorFixedWindow,
        SurfaceType::ExteriorOperableWindow,
        SurfaceType::ExteriorSkylight,
        SurfaceType::ExteriorTubularDaylightDiffuser,
        SurfaceType::ExteriorTubularDaylightDome,
        SurfaceType::ExteriorDoor,
        SurfaceType::ExteriorGlassDoor,
        SurfaceType::ExteriorOverheadDoor,
        SurfaceType::GroundContactWall,
        SurfaceType::GroundContactRoof,
        SurfaceType::GroundContactFloor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceType::ExteriorWall => "ExteriorWall",
            SurfaceType::ExteriorRoof => "ExteriorRoof",
            SurfaceType::ExteriorFloor => "ExteriorFloor",
            SurfaceType::ExteriorFixedWindow => "ExteriorFixedWindow",
            SurfaceType::ExteriorOperableWindow => "ExteriorOperableWindow",
            SurfaceType::ExteriorSkylight => "ExteriorSkylight",
            SurfaceType::ExteriorTubularDaylightDiffuser => "ExteriorTubularDaylightDiffuser",
            SurfaceType::ExteriorTubularDaylightDome => "ExteriorTubularDaylightDome",
            SurfaceType::ExteriorDoor => "ExteriorDoor",
            SurfaceType::ExteriorGlassDoor => "ExteriorGlassDoor",
            SurfaceType::ExteriorOverheadDoor => "ExteriorOverheadDoor",
            SurfaceType::GroundContactWall => "GroundContactWall",
            SurfaceType::GroundContactRoof => "GroundContactRoof",
            SurfaceType::GroundContactFloor => "GroundContactFloor",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceType {
    type Err = String;

    /// Accepts both the display form (`ExteriorWall`) and the snake_case
    /// report key (`exterior_wall`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        SurfaceType::ALL
            .into_iter()
            .find(|t| t.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| format!("unknown surface type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructionType {
    Opaque,
    Glazing,
}

impl ConstructionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionType::Opaque => "opaque",
            ConstructionType::Glazing => "glazing",
        }
    }
}

impl fmt::Display for ConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layered construction assigned to a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construction {
    pub name: String,
    #[serde(rename = "type")]
    pub construction_type: ConstructionType,
    /// Comma-delimited material ids, outermost layer first.
    pub layers: String,
    #[serde(default)]
    pub fenestration_type: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Construction {
    /// Layer material ids in order; empty entries are dropped.
    pub fn material_ids(&self) -> impl Iterator<Item = &str> {
        self.layers
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Free-text fields searched when inferring a frame material.
    pub fn free_text(&self) -> impl Iterator<Item = &str> {
        [self.component.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Vertex) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

fn default_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub surface_type: SurfaceType,
    pub net_area_m2: f64,
    /// Multiplier of the thermal zone owning the surface.
    #[serde(default = "default_multiplier")]
    pub zone_multiplier: f64,
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub construction: Option<Construction>,
}

impl Surface {
    /// Net area scaled by the zone multiplier.
    pub fn area_m2(&self) -> f64 {
        self.net_area_m2 * self.zone_multiplier
    }

    /// Perimeter of the closed vertex polygon; zero for fewer than three vertices.
    pub fn perimeter_m(&self) -> f64 {
        let (Some(first), Some(last)) = (self.vertices.first(), self.vertices.last()) else {
            return 0.0;
        };
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let open: f64 = self
            .vertices
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();
        open + last.distance_to(first)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Space {
    pub name: String,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
}

impl Space {
    pub fn surfaces_of(&self, surface_type: SurfaceType) -> impl Iterator<Item = &Surface> {
        self.surfaces
            .iter()
            .filter(move |s| s.surface_type == surface_type)
    }
}

/// Read-only view of a building used by the carbon audit.
pub trait BuildingModel {
    /// Surface-type keys reported on, in report order.
    fn surface_types(&self) -> &[SurfaceType] {
        &SurfaceType::ALL
    }

    fn spaces(&self) -> &[Space];
}

/// Serializable building model, e.g. exported from an energy-model tool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spaces: Vec<Space>,
}

impl BuildingModel for BuildingSnapshot {
    fn spaces(&self) -> &[Space] {
        &self.spaces
    }
}
