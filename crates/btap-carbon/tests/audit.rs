use std::collections::BTreeMap;

use btap_carbon::{
    AuditOptions, BtapCarbon, CarbonDatabase, CarbonError, CarbonScope, CostingTable,
    FrameConversionTable, FrameMaterial,
};
use btap_model::{
    BuildingSnapshot, Construction, ConstructionType, ReferenceTable, Row, Space, Surface,
    SurfaceType, Vertex,
};
use proptest::prelude::*;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn materials(name: &str, id_column: &str, rows: &[(&str, f64, f64)]) -> ReferenceTable {
    ReferenceTable::new(
        name,
        vec![
            id_column.to_string(),
            "description".to_string(),
            "embodied_carbon_a1_a5".to_string(),
            "embodied_carbon_a_c".to_string(),
        ],
        rows.iter()
            .map(|(id, a1_a5, a_c)| {
                Row::new()
                    .with(id_column, *id)
                    .with("description", format!("material {id}"))
                    .with("embodied_carbon_a1_a5", *a1_a5)
                    .with("embodied_carbon_a_c", *a_c)
            })
            .collect(),
    )
}

fn database() -> CarbonDatabase {
    CarbonDatabase::new(
        materials(
            "materials_opaque",
            "materials_opaque_id",
            &[("OP-1", 10.0, 12.5), ("OP-2", 2.0, 3.0)],
        ),
        materials(
            "materials_glazing",
            "materials_glazing_id",
            &[("GL-9", 18.0, 20.0), ("GL-SKY", 30.0, 35.0)],
        ),
        materials("materials_frame", "materials_glazing_id", &[("GL-9", 3.0, 4.0)]),
    )
}

fn costing() -> CostingTable {
    [("GL-9".to_string(), 2), ("GL-SKY".to_string(), 2)]
        .into_iter()
        .collect()
}

fn frames() -> FrameConversionTable {
    FrameConversionTable::new()
        .with(FrameMaterial::VinylWood, "FixedWindow", 2, 1.2)
        .with(FrameMaterial::Aluminum, "OperableWindow", 2, 0.8)
}

fn opaque(layers: &str) -> Construction {
    Construction {
        name: format!("wall {layers}"),
        construction_type: ConstructionType::Opaque,
        layers: layers.to_string(),
        fenestration_type: None,
        component: None,
        description: None,
    }
}

fn glazing(layers: &str, fenestration_type: &str, component: &str) -> Construction {
    Construction {
        name: format!("glazing {layers}"),
        construction_type: ConstructionType::Glazing,
        layers: layers.to_string(),
        fenestration_type: Some(fenestration_type.to_string()),
        component: Some(component.to_string()),
        description: None,
    }
}

fn surface(surface_type: SurfaceType, area: f64, construction: Option<Construction>) -> Surface {
    Surface {
        name: format!("{surface_type} {area}"),
        surface_type,
        net_area_m2: area,
        zone_multiplier: 1.0,
        vertices: Vec::new(),
        construction,
    }
}

/// A 3 m by 1 m window: 3 m² and an 8 m perimeter.
fn window(construction: Construction) -> Surface {
    Surface {
        vertices: vec![
            Vertex::new(0.0, 0.0, 1.0),
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(3.0, 0.0, 0.0),
            Vertex::new(3.0, 0.0, 1.0),
        ],
        ..surface(SurfaceType::ExteriorFixedWindow, 3.0, Some(construction))
    }
}

fn building(surfaces: Vec<Surface>) -> BuildingSnapshot {
    BuildingSnapshot {
        name: Some("test".to_string()),
        spaces: vec![Space {
            name: "Core".to_string(),
            surfaces,
        }],
    }
}

#[test]
fn opaque_layer_contributes_carbon_times_area() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![surface(
        SurfaceType::ExteriorWall,
        10.0,
        Some(opaque("OP-1")),
    )]);

    let report = BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap();
    let wall = report.get(SurfaceType::ExteriorWall).unwrap();
    assert_close(wall.area_m2, 10.0);
    assert_close(wall.carbon, 125.0);
    assert_close(report.total, 125.0);
    assert_eq!(report.surfaces.len(), SurfaceType::ALL.len());
}

#[test]
fn zone_multiplier_scales_area() {
    let (db, costing, frames) = (database(), costing(), frames());
    let mut wall = surface(SurfaceType::ExteriorWall, 10.0, Some(opaque("OP-1, OP-2,")));
    wall.zone_multiplier = 3.0;
    let model = building(vec![wall]);

    let report = BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap();
    let wall = report.get(SurfaceType::ExteriorWall).unwrap();
    assert_close(wall.area_m2, 30.0);
    assert_close(wall.carbon, (12.5 + 3.0) * 30.0);
}

#[test]
fn fixed_window_adds_frame_carbon() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![window(glazing("GL-9", "FixedWindow", "Vinyl-Wood Frame"))]);

    let report = BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap();
    let windows = report.get(SurfaceType::ExteriorFixedWindow).unwrap();
    let frame = 4.0 * 8.0 * 1.2;
    assert_close(frame, 38.4);
    assert_close(windows.carbon, frame + 20.0 * 3.0);
    assert_close(windows.area_m2, 3.0);
}

#[test]
fn scope_selects_the_carbon_column() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![
        surface(SurfaceType::ExteriorWall, 10.0, Some(opaque("OP-1"))),
        window(glazing("GL-9", "FixedWindow", "Vinyl-Wood Frame")),
    ]);

    let report = BtapCarbon::new(&model, &db, &costing, &frames)
        .with_options(AuditOptions {
            scope: CarbonScope::A1ToA5,
        })
        .audit()
        .unwrap();
    assert_close(report.get(SurfaceType::ExteriorWall).unwrap().carbon, 100.0);
    assert_close(
        report.get(SurfaceType::ExteriorFixedWindow).unwrap().carbon,
        3.0 * 8.0 * 1.2 + 18.0 * 3.0,
    );
}

#[test]
fn skylight_glazing_is_skipped_entirely() {
    let (db, costing, frames) = (database(), costing(), frames());
    // GL-SKY has no frame row, so any frame lookup would fail the audit.
    let mut skylight = window(glazing("GL-SKY", "Skylight", "Aluminum curb"));
    skylight.surface_type = SurfaceType::ExteriorSkylight;
    let model = building(vec![skylight]);

    let report = BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap();
    let skylights = report.get(SurfaceType::ExteriorSkylight).unwrap();
    assert_close(skylights.area_m2, 3.0);
    assert_close(skylights.carbon, 0.0);
    assert_close(report.total, 0.0);
}

#[test]
fn surface_without_construction_only_adds_area() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![surface(SurfaceType::ExteriorRoof, 50.0, None)]);

    let report = BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap();
    let roof = report.get(SurfaceType::ExteriorRoof).unwrap();
    assert_close(roof.area_m2, 50.0);
    assert_close(roof.carbon, 0.0);
}

#[test]
fn missing_material_names_id_and_table() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![
        surface(SurfaceType::ExteriorWall, 10.0, Some(opaque("OP-1"))),
        surface(SurfaceType::ExteriorFloor, 10.0, Some(opaque("OP-404"))),
    ]);

    let err = BtapCarbon::new(&model, &db, &costing, &frames)
        .audit()
        .unwrap_err();
    match err {
        CarbonError::MaterialNotFound { id, table } => {
            assert_eq!(id, "OP-404");
            assert_eq!(table, "materials_opaque");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn skylight_with_unknown_glazing_still_fails() {
    let (db, costing, frames) = (database(), costing(), frames());
    let mut skylight = window(glazing("GL-404", "Skylight", "Aluminum curb"));
    skylight.surface_type = SurfaceType::ExteriorSkylight;
    let model = building(vec![skylight]);

    let err = BtapCarbon::new(&model, &db, &costing, &frames)
        .audit()
        .unwrap_err();
    match err {
        CarbonError::MaterialNotFound { id, table } => {
            assert_eq!(id, "GL-404");
            assert_eq!(table, "materials_glazing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn window_without_frame_row_fails() {
    let (db, costing, frames) = (database(), costing(), frames());
    // GL-SKY is a known glazing with a pane count but no frame row.
    let model = building(vec![window(glazing("GL-SKY", "FixedWindow", "Vinyl-Wood Frame"))]);

    let err = BtapCarbon::new(&model, &db, &costing, &frames)
        .audit()
        .unwrap_err();
    match err {
        CarbonError::MaterialNotFound { id, table } => {
            assert_eq!(id, "GL-SKY");
            assert_eq!(table, "materials_frame");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unrecognized_frame_material_fails() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![window(glazing("GL-9", "FixedWindow", "Steel frame"))]);

    let err = BtapCarbon::new(&model, &db, &costing, &frames)
        .audit()
        .unwrap_err();
    assert!(
        matches!(err, CarbonError::FrameMaterialNotFound { ref construction } if construction == "glazing GL-9"),
        "{err}"
    );
}

#[test]
fn missing_pane_count_and_factor_are_reported() {
    let (db, frames) = (database(), frames());
    let model = building(vec![window(glazing("GL-9", "FixedWindow", "Vinyl-Wood Frame"))]);

    let no_panes: BTreeMap<String, u32> = BTreeMap::new();
    let err = BtapCarbon::new(&model, &db, &no_panes, &frames)
        .audit()
        .unwrap_err();
    assert!(matches!(err, CarbonError::PaneCountNotFound { .. }), "{err}");

    let triple: BTreeMap<String, u32> = [("GL-9".to_string(), 3)].into_iter().collect();
    let err = BtapCarbon::new(&model, &db, &triple, &frames)
        .audit()
        .unwrap_err();
    assert!(
        matches!(err, CarbonError::FrameConversionNotFound { panes: 3, .. }),
        "{err}"
    );
}

#[test]
fn audit_is_repeatable() {
    let (db, costing, frames) = (database(), costing(), frames());
    let model = building(vec![
        surface(SurfaceType::ExteriorWall, 12.0, Some(opaque("OP-1,OP-2"))),
        window(glazing("GL-9", "FixedWindow", "Vinyl-Wood Frame")),
    ]);
    let audit = BtapCarbon::new(&model, &db, &costing, &frames);
    assert_eq!(audit.audit().unwrap(), audit.audit().unwrap());
}

fn arb_surface() -> impl Strategy<Value = Surface> {
    let types = prop::sample::select(SurfaceType::ALL.to_vec());
    let layers = prop::sample::select(vec!["OP-1", "OP-2", "OP-1,OP-2", ""]);
    (types, 0.0..500.0f64, 1.0..5.0f64, layers, any::<bool>()).prop_map(
        |(surface_type, area, multiplier, layers, constructed)| Surface {
            zone_multiplier: multiplier.floor(),
            ..surface(
                surface_type,
                area,
                constructed.then(|| opaque(layers)),
            )
        },
    )
}

proptest! {
    #[test]
    fn total_is_the_sum_of_surface_carbon(surfaces in prop::collection::vec(arb_surface(), 0..40)) {
        let (db, costing, frames) = (database(), costing(), frames());
        let model = building(surfaces);
        let report = BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap();
        let sum: f64 = report.surfaces.values().map(|s| s.carbon).sum();
        prop_assert_eq!(report.total, sum);
        prop_assert_eq!(report, BtapCarbon::new(&model, &db, &costing, &frames).audit().unwrap());
    }
}
