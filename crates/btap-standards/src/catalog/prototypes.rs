//! Building archetypes and the HVAC systems modeled for each.

/// DOE prototype buildings, shared by the ASHRAE 90.1 and NECB families.
pub const PROTOTYPE_BUILDINGS: &[&str] = &[
    "FullServiceRestaurant",
    "Hospital",
    "HighriseApartment",
    "LargeHotel",
    "LargeOffice",
    "MediumOffice",
    "MidriseApartment",
    "Outpatient",
    "PrimarySchool",
    "QuickServiceRestaurant",
    "RetailStandalone",
    "SecondarySchool",
    "SmallHotel",
    "SmallOffice",
    "RetailStripmall",
    "Warehouse",
    "SuperMarket",
];

const PACKAGED: &[&str] = &["DXEH", "DXGF", "DXHP", "NCEH", "NCGF"];
const PACKAGED_VAV: &[&str] = &[
    "DXEH", "DXGF", "DXHP", "NCEH", "NCGF", "PVVE", "PVVG", "SVVE", "SVVG",
];
const PACKAGED_VAV_WLHP: &[&str] = &[
    "DXEH", "DXGF", "DXHP", "NCEH", "NCGF", "PVVE", "PVVG", "SVVE", "SVVG", "WLHP",
];

/// DEER building types paired with their valid HVAC systems, in DEER
/// building-type order. Types without a modeled system are absent.
pub const DEER_BUILDING_HVAC: &[(&str, &[&str])] = &[
    ("Asm", PACKAGED),
    ("ECC", PACKAGED_VAV_WLHP),
    ("EPr", &["DXEH", "DXGF", "DXHP", "NCEH", "NCGF", "WLHP"]),
    ("ERC", PACKAGED),
    ("ESe", PACKAGED_VAV_WLHP),
    ("EUn", PACKAGED_VAV),
    ("Gro", PACKAGED),
    ("Hsp", PACKAGED_VAV),
    (
        "Nrs",
        &[
            "DXEH", "DXGF", "DXHP", "FPFC", "NCEH", "NCGF", "PVVE", "PVVG", "SVVE", "SVVG",
        ],
    ),
    ("Htl", PACKAGED_VAV_WLHP),
    ("Mtl", PACKAGED),
    ("MBT", PACKAGED_VAV_WLHP),
    ("MLI", PACKAGED),
    ("OfL", PACKAGED_VAV_WLHP),
    ("OfS", PACKAGED_VAV_WLHP),
    ("RFF", PACKAGED),
    ("RSD", PACKAGED),
    ("Rt3", PACKAGED_VAV_WLHP),
    ("RtL", PACKAGED),
    ("RtS", PACKAGED),
    ("SCn", PACKAGED),
    ("SUn", &["Unc"]),
    ("WRf", &["DXGF"]),
    ("MFm", &["DXGF", "DXHP", "NCEH", "NCGF"]),
];

pub fn deer_hvac_systems(building_type: &str) -> &'static [&'static str] {
    DEER_BUILDING_HVAC
        .iter()
        .find(|(bt, _)| *bt == building_type)
        .map(|(_, systems)| *systems)
        .unwrap_or_default()
}
