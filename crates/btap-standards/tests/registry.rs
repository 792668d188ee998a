use std::collections::BTreeSet;

use btap_model::Value;
use btap_standards::catalog::{self, ASHRAE_90_1, DEER, NECB};
use btap_standards::rules;
use btap_standards::{
    Rule, RuleArgs, RuleSet, StandardRegistry, StandardsData, StandardsError, VariantSpec,
};
use proptest::prelude::*;

#[test]
fn duplicate_name_is_rejected() {
    let mut registry = StandardRegistry::new();
    registry.register("90.1-2013", None, RuleSet::new()).unwrap();
    let err = registry
        .register("90.1-2013", None, RuleSet::new())
        .unwrap_err();
    assert!(matches!(err, StandardsError::DuplicateName { ref name } if name == "90.1-2013"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn parent_must_already_be_registered() {
    let mut registry = StandardRegistry::new();
    let err = registry
        .register("90.1-2013_SmallOffice", Some("90.1-2013"), RuleSet::new())
        .unwrap_err();
    match err {
        StandardsError::UnknownParent { name, parent } => {
            assert_eq!(name, "90.1-2013_SmallOffice");
            assert_eq!(parent, "90.1-2013");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(registry.is_empty());
}

#[test]
fn resolve_unknown_standard_fails() {
    let registry = StandardRegistry::new();
    assert!(matches!(
        registry.resolve("NECB2020"),
        Err(StandardsError::UnknownStandard { .. })
    ));
}

#[test]
fn child_override_shadows_parent_rule() {
    let registry = StandardRegistry::from_specs([
        VariantSpec::root("base")
            .rule("threshold", Rule::constant(0.15))
            .rule("name", Rule::new(|ctx| Ok(ctx.variant.name().into()))),
        VariantSpec::child("edition", "base").rule("threshold", Rule::constant(0.05)),
        VariantSpec::child("archetype", "edition"),
    ])
    .unwrap();
    let data = StandardsData::new();
    let args = RuleArgs::new();

    let archetype = registry.resolve("archetype").unwrap();
    assert_eq!(
        archetype.evaluate("threshold", &data, &args).unwrap(),
        Value::Number(0.05)
    );
    // Inherited rules see the variant they were requested on.
    assert_eq!(
        archetype.evaluate("name", &data, &args).unwrap(),
        Value::from("archetype")
    );
    assert_eq!(
        registry
            .resolve("base")
            .unwrap()
            .evaluate("threshold", &data, &args)
            .unwrap(),
        Value::Number(0.15)
    );
    assert!(matches!(
        archetype.rule("missing"),
        Err(StandardsError::UnresolvedRule { .. })
    ));
}

#[test]
fn builtin_catalog_registers_every_family() {
    let registry = StandardRegistry::builtin().unwrap();

    for name in [
        ASHRAE_90_1,
        DEER,
        NECB,
        "90.1-2013",
        "90.1-2013_SmallOffice",
        "NREL ZNE Ready 2017_Warehouse",
        "NECB2017_Hospital",
        "DEER 2017_Asm",
        "DEER 2017_Asm_DXGF",
        "DEER Pre-1975_Nrs_FPFC",
    ] {
        assert!(registry.contains(name), "missing {name}");
    }
    assert!(!registry.contains("DEER 2017_GHs"));
    assert!(!registry.contains("DEER 2017_Asm_WLHP"));

    let names: Vec<&str> = registry.names().collect();
    let unique: BTreeSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), unique.len());

    assert_eq!(
        registry.family(NECB).count(),
        1 + catalog::NECB_EDITIONS.len() * (1 + catalog::PROTOTYPE_BUILDINGS.len())
    );
}

#[test]
fn deer_hvac_variant_chain() {
    let registry = StandardRegistry::builtin().unwrap();
    let variant = registry.resolve("DEER 2017_Asm_DXGF").unwrap();
    let chain: Vec<&str> = variant.ancestors().map(|v| v.name()).collect();
    insta::assert_snapshot!(chain.join("\n"), @r"
    DEER 2017_Asm_DXGF
    DEER 2017_Asm
    DEER 2017
    DEER
    ");

    assert_eq!(variant.template(), Some("DEER 2017"));
    assert_eq!(variant.building_type(), Some("Asm"));
    assert_eq!(variant.hvac_system(), Some("DXGF"));
    assert_eq!(
        variant.qualifiers().composite_key().as_deref(),
        Some("DEER 2017_Asm_DXGF")
    );
}

#[test]
fn necb_revisions_chain_through_earlier_editions() {
    let registry = StandardRegistry::builtin().unwrap();
    let variant = registry.resolve("NECB2017_LargeOffice").unwrap();
    assert_eq!(
        variant.chain(),
        "NECB2017_LargeOffice -> NECB2017 -> NECB2015 -> NECB2011 -> NECB"
    );
    assert_eq!(variant.template(), Some("NECB2017"));
}

#[test]
fn edition_overrides_are_found_through_the_chain() {
    let registry = StandardRegistry::builtin().unwrap();
    let office = registry.resolve("90.1-2013_SmallOffice").unwrap();
    assert_eq!(
        office
            .defining_variant(rules::INTEGRATED_ECONOMIZER_REQUIRED)
            .map(|v| v.name()),
        Some("90.1-2013")
    );
    assert_eq!(
        office.defining_variant(rules::UNOCCUPIED_THRESHOLD).map(|v| v.name()),
        Some(ASHRAE_90_1)
    );
    assert!(office.rule_names().contains(rules::MOTOR_EFFICIENCY));
}

proptest! {
    #[test]
    fn registering_any_name_sequence_keeps_names_unique(
        names in prop::collection::vec("[a-d]{1,2}", 1..30)
    ) {
        let mut registry = StandardRegistry::new();
        let mut seen = BTreeSet::new();
        for name in &names {
            let result = registry.register(name, None, RuleSet::new());
            if seen.insert(name.clone()) {
                prop_assert!(result.is_ok());
            } else {
                let is_duplicate = matches!(result, Err(StandardsError::DuplicateName { .. }));
                prop_assert!(is_duplicate);
            }
        }
        prop_assert_eq!(registry.len(), seen.len());
        let listed: BTreeSet<String> = registry.names().map(str::to_string).collect();
        prop_assert_eq!(listed, seen);
    }

    #[test]
    fn rule_resolves_to_the_nearest_definition(
        defines in prop::collection::vec(any::<bool>(), 1..8)
    ) {
        // A linear chain v0 <- v1 <- ... where v<i> defines "r" when defines[i].
        let mut registry = StandardRegistry::new();
        for (i, defines_rule) in defines.iter().enumerate() {
            let parent = (i > 0).then(|| format!("v{}", i - 1));
            let mut rules = RuleSet::new();
            if *defines_rule {
                rules.insert("r", Rule::constant(i32::try_from(i).unwrap()));
            }
            registry.register(&format!("v{i}"), parent.as_deref(), rules).unwrap();
        }

        let leaf = registry.resolve(&format!("v{}", defines.len() - 1)).unwrap();
        let result = leaf.evaluate("r", &StandardsData::new(), &RuleArgs::new());
        match defines.iter().rposition(|d| *d) {
            Some(nearest) => prop_assert_eq!(result.unwrap(), Value::from(i32::try_from(nearest).unwrap())),
            None => {
                let unresolved = matches!(result, Err(StandardsError::UnresolvedRule { .. }));
                prop_assert!(unresolved);
            }
        }
    }
}
