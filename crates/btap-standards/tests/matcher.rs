use btap_model::{MatchCriteria, RangeCriterion, ReferenceTable, Row, Value};
use btap_standards::StandardsError;
use btap_standards::matcher::{find, find_all, find_required, lookup};
use chrono::NaiveDate;
use proptest::prelude::*;

fn motors() -> ReferenceTable {
    let columns = [
        "template",
        "number_of_poles",
        "type",
        "minimum_capacity",
        "maximum_capacity",
        "nominal_full_load_efficiency",
    ]
    .map(String::from)
    .to_vec();
    let row = |template: &str, min: f64, max: f64, eff: f64| {
        Row::new()
            .with("template", template)
            .with("number_of_poles", 4.0)
            .with("type", "Enclosed")
            .with("minimum_capacity", min)
            .with("maximum_capacity", max)
            .with("nominal_full_load_efficiency", eff)
    };
    ReferenceTable::new(
        "motors",
        columns,
        vec![
            row("90.1-2010", 1.0, 1.5, 0.85),
            row("90.1-2013", 1.0, 1.5, 0.855),
            row("90.1-2013", 1.5, 2.0, 0.865),
            row("90.1-2013", 2.0, 3.0, 0.895),
        ],
    )
}

fn motor_criteria(template: &str, horsepower: Option<f64>) -> MatchCriteria {
    MatchCriteria::new()
        .with("template", template)
        .with("number_of_poles", 4.0)
        .with("type", "Enclosed")
        .with_range(
            RangeCriterion::new("horsepower", horsepower.map(Value::from))
                .columns("minimum_capacity", "maximum_capacity"),
        )
}

#[test]
fn range_selects_half_open_bracket() {
    let table = motors();

    let row = find(&table, &motor_criteria("90.1-2013", Some(1.75))).unwrap().unwrap();
    assert_eq!(row.number("nominal_full_load_efficiency"), Some(0.865));

    // Lower bound inclusive, upper bound exclusive.
    let row = find(&table, &motor_criteria("90.1-2013", Some(2.0))).unwrap().unwrap();
    assert_eq!(row.number("nominal_full_load_efficiency"), Some(0.895));

    assert!(find(&table, &motor_criteria("90.1-2013", Some(3.0))).unwrap().is_none());
}

#[test]
fn absent_range_value_matches_on_equality_only() {
    let table = motors();
    let rows = find_all(&table, &motor_criteria("90.1-2013", None)).unwrap();
    assert_eq!(rows.len(), 3);

    // Ties go to the first row in table order.
    let row = find(&table, &motor_criteria("90.1-2013", None)).unwrap().unwrap();
    assert_eq!(row.number("nominal_full_load_efficiency"), Some(0.855));
}

#[test]
fn equality_is_case_sensitive() {
    let table = motors();
    let criteria = MatchCriteria::new().with("type", "enclosed");
    assert!(find(&table, &criteria).unwrap().is_none());
}

#[test]
fn criteria_on_missing_columns_are_ignored() {
    let table = motors();
    let criteria = motor_criteria("90.1-2010", Some(1.2)).with("climate_zone", "ASHRAE 169-2013-4A");
    let row = find_required(&table, &criteria).unwrap();
    assert_eq!(row.number("nominal_full_load_efficiency"), Some(0.85));
}

#[test]
fn empty_criteria_is_a_caller_error() {
    let table = motors();
    let err = find(&table, &MatchCriteria::new()).unwrap_err();
    assert!(matches!(err, StandardsError::EmptyCriteria { ref table } if table == "motors"));

    let inert = MatchCriteria::new().with_range(RangeCriterion::new("capacity", None));
    assert!(matches!(
        find_all(&table, &inert),
        Err(StandardsError::EmptyCriteria { .. })
    ));
}

#[test]
fn no_match_is_distinct_from_errors() {
    let table = motors();
    let criteria = motor_criteria("90.1-2016", None);
    assert!(find(&table, &criteria).unwrap().is_none());

    let err = find_required(&table, &criteria).unwrap_err();
    match err {
        StandardsError::NoMatch { table, criteria } => {
            assert_eq!(table, "motors");
            assert!(criteria.contains("90.1-2016"), "{criteria}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lookup_reports_null_cells() {
    let table = ReferenceTable::new(
        "economizers",
        vec!["template".into(), "fixed_dry_bulb_high_limit_shutoff_temp".into()],
        vec![
            Row::new()
                .with("template", "DEER 2017")
                .with("fixed_dry_bulb_high_limit_shutoff_temp", Value::Null),
        ],
    );
    let criteria = MatchCriteria::new().with("template", "DEER 2017");
    let err = lookup(&table, &criteria, "fixed_dry_bulb_high_limit_shutoff_temp").unwrap_err();
    assert!(matches!(err, StandardsError::MissingColumn { .. }), "{err}");
}

#[test]
fn date_ranges_compare_chronologically() {
    let date = |y, m, d| Value::from(NaiveDate::from_ymd_opt(y, m, d).unwrap());
    let table = ReferenceTable::new(
        "unitary_acs",
        vec![
            "template".into(),
            "start_date".into(),
            "end_date".into(),
            "cool_cap_ft".into(),
        ],
        vec![
            Row::new()
                .with("template", "90.1-2013")
                .with("start_date", date(1920, 1, 1))
                .with("end_date", date(2016, 1, 1))
                .with("cool_cap_ft", "old curve"),
            Row::new()
                .with("template", "90.1-2013")
                .with("start_date", date(2016, 1, 1))
                .with("end_date", date(2999, 9, 9))
                .with("cool_cap_ft", "new curve"),
        ],
    );
    let criteria = MatchCriteria::new().with("template", "90.1-2013").with_range(
        RangeCriterion::new("date", Some(date(2017, 6, 1))).columns("start_date", "end_date"),
    );
    assert_eq!(
        lookup(&table, &criteria, "cool_cap_ft").unwrap(),
        &Value::from("new curve")
    );
}

#[test]
fn rows_without_bounds_fail_an_active_range() {
    let table = ReferenceTable::new(
        "boilers",
        vec!["fuel_type".into(), "min_capacity".into(), "max_capacity".into()],
        vec![Row::new().with("fuel_type", "Gas")],
    );
    let criteria = MatchCriteria::new()
        .with("fuel_type", "Gas")
        .with_range(RangeCriterion::new("capacity", Some(Value::from(10.0))));
    assert!(find(&table, &criteria).unwrap().is_none());
}

fn arb_table() -> impl Strategy<Value = ReferenceTable> {
    let row = (0..4u8, 0..3u8, 0.0..100.0f64, 0.1..50.0f64).prop_map(|(t, c, min, width)| {
        Row::new()
            .with("template", format!("T{t}"))
            .with("climate_zone", format!("CZ{c}"))
            .with("min_capacity", min)
            .with("max_capacity", min + width)
    });
    prop::collection::vec(row, 1..20).prop_map(|rows| {
        ReferenceTable::new(
            "generated",
            vec![
                "template".into(),
                "climate_zone".into(),
                "min_capacity".into(),
                "max_capacity".into(),
            ],
            rows,
        )
    })
}

proptest! {
    #[test]
    fn criteria_built_from_a_row_find_an_equal_row(
        (table, index, fraction) in arb_table()
            .prop_flat_map(|t| {
                let len = t.len();
                (Just(t), 0..len, 0.0..1.0f64)
            })
    ) {
        let source = &table.rows()[index];
        let min = source.number("min_capacity").unwrap();
        let max = source.number("max_capacity").unwrap();
        let inside = min + (max - min) * fraction;
        prop_assume!(inside >= min && inside < max);

        let criteria = MatchCriteria::new()
            .with("template", source.get("template").cloned().unwrap_or_default())
            .with("climate_zone", source.get("climate_zone").cloned().unwrap_or_default())
            .with_range(RangeCriterion::new("capacity", Some(Value::from(inside))));

        let found = find(&table, &criteria).unwrap();
        prop_assert!(found.is_some());
        let found = found.unwrap();
        prop_assert_eq!(found.get("template"), source.get("template"));
        prop_assert_eq!(found.get("climate_zone"), source.get("climate_zone"));
    }

    #[test]
    fn find_returns_the_first_of_find_all(table in arb_table(), t in 0..4u8) {
        let criteria = MatchCriteria::new().with("template", format!("T{t}"));
        let all = find_all(&table, &criteria).unwrap();
        let first = find(&table, &criteria).unwrap();
        prop_assert_eq!(first, all.first().copied());
    }
}
