//! Declarative catalog of the built-in standard variants.
//!
//! The catalog enumerates every code family, year revision, building
//! archetype and (for DEER) HVAC-system combination as [`VariantSpec`]s,
//! parents before children. Names are composite keys such as
//! `90.1-2013_SmallOffice` or `DEER 2017_Asm_DXGF`.

#![deny(unsafe_code)]

mod editions;
mod prototypes;

pub use editions::{
    ASHRAE_90_1, ASHRAE_EDITIONS, DEER, DEER_EDITIONS, Edition, NECB, NECB_EDITIONS,
};
pub use prototypes::{DEER_BUILDING_HVAC, PROTOTYPE_BUILDINGS, deer_hvac_systems};

use crate::registry::VariantSpec;
use crate::variant::Qualifiers;

/// Family roots in registration order.
pub const FAMILIES: &[&str] = &[ASHRAE_90_1, DEER, NECB];

/// Every built-in variant, parent-first.
pub fn builtin_variants() -> Vec<VariantSpec> {
    let mut catalog = Catalog::default();

    for family in FAMILIES {
        catalog.push(VariantSpec::root(*family).rules(editions::family_rules(family)));
    }

    for edition in ASHRAE_EDITIONS {
        catalog.push_edition(ASHRAE_90_1, edition);
        for building_type in PROTOTYPE_BUILDINGS {
            catalog.push_building(edition.name, building_type);
        }
    }

    for edition in NECB_EDITIONS {
        catalog.push_edition(NECB, edition);
        for building_type in PROTOTYPE_BUILDINGS {
            catalog.push_building(edition.name, building_type);
        }
    }

    for edition in DEER_EDITIONS {
        catalog.push_edition(DEER, edition);
        for (building_type, systems) in DEER_BUILDING_HVAC {
            let parent = catalog.push_building(edition.name, building_type);
            for system in *systems {
                catalog.push(
                    VariantSpec::child(format!("{parent}_{system}"), parent.as_str())
                        .qualifiers(Qualifiers::default().hvac_system(*system)),
                );
            }
        }
    }

    catalog.specs
}

#[derive(Default)]
struct Catalog {
    specs: Vec<VariantSpec>,
}

impl Catalog {
    fn push(&mut self, spec: VariantSpec) {
        self.specs.push(spec);
    }

    fn push_edition(&mut self, family: &str, edition: &Edition) {
        let parent = edition.parent.unwrap_or(family);
        self.push(
            VariantSpec::child(edition.name, parent)
                .qualifiers(Qualifiers::default().template(edition.name))
                .rules(editions::edition_rules(edition)),
        );
    }

    fn push_building(&mut self, template: &str, building_type: &str) -> String {
        let name = format!("{template}_{building_type}");
        self.push(
            VariantSpec::child(name.clone(), template)
                .qualifiers(Qualifiers::default().building_type(building_type)),
        );
        name
    }
}
