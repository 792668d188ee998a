//! Built-in rules and the builder for table-backed rules.
//!
//! Rules are plain closures over a [`RuleContext`]. Most of them select a row
//! from a reference table with criteria made of the variant's qualifiers and
//! the caller's arguments, so [`TableRule`] describes that shape as data.

#![deny(unsafe_code)]

use btap_model::{MatchCriteria, RangeCriterion, Value};

use crate::error::Result;
use crate::matcher;
use crate::variant::{Rule, RuleContext, RuleSet};

pub const EDITION_PREFIX: &str = "edition_prefix";
pub const LOOKUP_BUILDING_TYPE: &str = "lookup_building_type";
pub const GEOMETRY_FILE: &str = "geometry_file";
pub const HVAC_MAP_FILE: &str = "hvac_map_file";
pub const MOTOR_EFFICIENCY: &str = "motor_efficiency";
pub const BOILER_EFFICIENCY: &str = "boiler_efficiency";
pub const DX_COOLING_CURVE: &str = "dx_cooling_curve";
pub const ECONOMIZER_DRYBULB_LIMIT: &str = "economizer_drybulb_limit_f";
pub const ECONOMIZER_ENTHALPY_LIMIT: &str = "economizer_enthalpy_limit_btu_per_lb";
pub const ECONOMIZER_DEWPOINT_LIMIT: &str = "economizer_dewpoint_limit_f";
pub const INTEGRATED_ECONOMIZER_REQUIRED: &str = "integrated_economizer_required";
pub const UNOCCUPIED_FAN_SHUTOFF_REQUIRED: &str = "unoccupied_fan_shutoff_required";
pub const UNOCCUPIED_THRESHOLD: &str = "unoccupied_threshold";
pub const MODIFY_OA_CONTROLLER: &str = "modify_oa_controller";
pub const UPDATE_FAN_EFFICIENCY: &str = "update_fan_efficiency";

pub const PROTOTYPE_INPUTS_TABLE: &str = "prototype_inputs";

/// 65,000 Btu/h in watts.
const INTEGRATED_ECONOMIZER_MIN_CAPACITY_W: f64 = 19_049.5;

/// Where a criteria value comes from when a [`TableRule`] runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Template,
    BuildingType,
    /// The result of the `lookup_building_type` rule.
    LookupBuildingType,
    HvacSystem,
    /// A required rule argument.
    Arg(&'static str),
    Const(Value),
}

#[derive(Debug, Clone)]
struct RangeSource {
    field: &'static str,
    arg: &'static str,
    min_column: &'static str,
    max_column: &'static str,
}

/// A rule that returns one column of the row matching its criteria.
#[derive(Debug, Clone)]
pub struct TableRule {
    table: &'static str,
    column: &'static str,
    fields: Vec<(&'static str, Source)>,
    ranges: Vec<RangeSource>,
}

impl TableRule {
    pub fn new(table: &'static str, column: &'static str) -> Self {
        Self {
            table,
            column,
            fields: Vec::new(),
            ranges: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, source: Source) -> Self {
        self.fields.push((name, source));
        self
    }

    /// Bound the argument `arg` by the row's `min_column`/`max_column`.
    /// When the caller does not pass `arg` the range is not applied.
    #[must_use]
    pub fn range(
        mut self,
        arg: &'static str,
        min_column: &'static str,
        max_column: &'static str,
    ) -> Self {
        self.ranges.push(RangeSource {
            field: arg,
            arg,
            min_column,
            max_column,
        });
        self
    }

    pub fn criteria(&self, ctx: &RuleContext<'_>) -> Result<MatchCriteria> {
        let mut criteria = MatchCriteria::new();
        for (name, source) in &self.fields {
            let value = match source {
                Source::Template => Value::from(ctx.template()?),
                Source::BuildingType => Value::from(ctx.building_type()?),
                Source::LookupBuildingType => ctx.evaluate(LOOKUP_BUILDING_TYPE)?,
                Source::HvacSystem => Value::from(ctx.variant.hvac_system()),
                Source::Arg(arg) => ctx.arg(arg)?.clone(),
                Source::Const(value) => value.clone(),
            };
            // An unset HVAC qualifier constrains nothing.
            if !value.is_null() {
                criteria.set(*name, value);
            }
        }
        for range in &self.ranges {
            criteria = criteria.with_range(
                RangeCriterion::new(range.field, ctx.args.get(range.arg).cloned())
                    .columns(range.min_column, range.max_column),
            );
        }
        Ok(criteria)
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Value> {
        let table = ctx.data.table(self.table)?;
        let criteria = self.criteria(ctx)?;
        matcher::lookup(table, &criteria, self.column).cloned()
    }

    pub fn into_rule(self) -> Rule {
        Rule::new(move |ctx| self.evaluate(ctx))
    }
}

/// Rules every family root starts from.
pub fn base_rules() -> RuleSet {
    RuleSet::new()
        .with(EDITION_PREFIX, Rule::new(edition_prefix))
        .with(LOOKUP_BUILDING_TYPE, Rule::new(|ctx| Ok(ctx.building_type()?.into())))
        .with(GEOMETRY_FILE, Rule::new(|ctx| class_file(ctx, "osm")))
        .with(HVAC_MAP_FILE, Rule::new(|ctx| class_file(ctx, "hvac_map.json")))
        .with(MOTOR_EFFICIENCY, motor_efficiency().into_rule())
        .with(BOILER_EFFICIENCY, boiler_efficiency().into_rule())
        .with(DX_COOLING_CURVE, dx_cooling_curve().into_rule())
        .with(ECONOMIZER_DRYBULB_LIMIT, Rule::new(economizer_drybulb_limit))
        .with(ECONOMIZER_ENTHALPY_LIMIT, Rule::new(economizer_enthalpy_limit))
        .with(ECONOMIZER_DEWPOINT_LIMIT, Rule::new(economizer_dewpoint_limit))
        .with(INTEGRATED_ECONOMIZER_REQUIRED, Rule::new(integrated_economizer_required))
        .with(UNOCCUPIED_FAN_SHUTOFF_REQUIRED, Rule::new(unoccupied_fan_shutoff_required))
        .with(UNOCCUPIED_THRESHOLD, Rule::constant(0.15))
        // Does nothing unless a standard implements it.
        .with(MODIFY_OA_CONTROLLER, Rule::constant(Value::Null))
        .with(UPDATE_FAN_EFFICIENCY, Rule::constant(Value::Null))
}

/// Overrides for the ASHRAE 90.1 and NECB families, which share building
/// lookup names across office and retail prototypes.
pub fn prototype_lookup_rules() -> RuleSet {
    RuleSet::new().with(
        LOOKUP_BUILDING_TYPE,
        Rule::new(|ctx| Ok(lookup_name(ctx.building_type()?).into())),
    )
}

/// Overrides for the NECB family root.
pub fn necb_rules() -> RuleSet {
    prototype_lookup_rules().with(HVAC_MAP_FILE, Rule::constant(Value::Null))
}

/// Overrides for the DEER family root.
pub fn deer_rules() -> RuleSet {
    RuleSet::new()
        .with(
            GEOMETRY_FILE,
            Rule::new(|ctx| prototype_file(ctx, "geometry_osm")),
        )
        .with(
            HVAC_MAP_FILE,
            Rule::new(|ctx| prototype_file(ctx, "hvac_json")),
        )
        .with(ECONOMIZER_DRYBULB_LIMIT, Rule::new(deer_economizer_drybulb_limit))
        .with(ECONOMIZER_ENTHALPY_LIMIT, Rule::new(deer_economizer_enthalpy_limit))
        .with(ECONOMIZER_DEWPOINT_LIMIT, Rule::constant(Value::Null))
        .with(UNOCCUPIED_FAN_SHUTOFF_REQUIRED, Rule::constant(false))
}

/// Office and retail prototypes share lookup names in the standards tables.
pub fn lookup_name(building_type: &str) -> &str {
    match building_type {
        "SmallOffice" | "MediumOffice" | "LargeOffice" | "LargeOfficeDetail" => "Office",
        "RetailStandalone" => "Retail",
        "RetailStripmall" => "StripMall",
        other => other,
    }
}

pub fn motor_efficiency() -> TableRule {
    TableRule::new("motors", "nominal_full_load_efficiency")
        .field("template", Source::Template)
        .field("number_of_poles", Source::Arg("number_of_poles"))
        .field("type", Source::Arg("type"))
        .range("horsepower", "minimum_capacity", "maximum_capacity")
}

pub fn boiler_efficiency() -> TableRule {
    TableRule::new("boilers", "minimum_thermal_efficiency")
        .field("template", Source::Template)
        .field("fuel_type", Source::Arg("fuel_type"))
        .field("fluid_type", Source::Arg("fluid_type"))
        .range("capacity_btu_per_hr", "minimum_capacity", "maximum_capacity")
}

pub fn dx_cooling_curve() -> TableRule {
    TableRule::new("unitary_acs", "cool_cap_ft")
        .field("template", Source::Template)
        .field("cooling_type", Source::Arg("cooling_type"))
        .field("heating_type", Source::Arg("heating_type"))
        .range("capacity_btu_per_hr", "minimum_capacity", "maximum_capacity")
}

fn edition_prefix(ctx: &RuleContext<'_>) -> Result<Value> {
    let prefix: String = ctx
        .template()?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    Ok(prefix.into())
}

fn class_file(ctx: &RuleContext<'_>, extension: &str) -> Result<Value> {
    let prefix = ctx.evaluate(EDITION_PREFIX)?;
    let building_type = ctx.building_type()?;
    Ok(format!("geometry/{prefix}{building_type}.{extension}").into())
}

fn prototype_file(ctx: &RuleContext<'_>, column: &'static str) -> Result<Value> {
    let file = TableRule::new(PROTOTYPE_INPUTS_TABLE, column)
        .field("template", Source::Template)
        .field("building_type", Source::BuildingType)
        .field("hvac_system", Source::HvacSystem)
        .evaluate(ctx)?;
    Ok(format!("geometry/{file}").into())
}

/// The zone part of an ASHRAE 169 climate zone, e.g. `4A` for
/// `ASHRAE 169-2013-4A`.
fn climate_zone_code(climate_zone: &str) -> Option<&str> {
    climate_zone
        .strip_prefix("ASHRAE 169-2006-")
        .or_else(|| climate_zone.strip_prefix("ASHRAE 169-2013-"))
}

fn economizer_drybulb_limit(ctx: &RuleContext<'_>) -> Result<Value> {
    let limit = match ctx.text_arg("economizer_type")? {
        "FixedDryBulb" => {
            let zone = climate_zone_code(ctx.text_arg("climate_zone")?);
            match zone {
                Some(
                    "1B" | "2B" | "3B" | "3C" | "4B" | "4C" | "5B" | "5C" | "6B" | "7B" | "8A"
                    | "8B",
                ) => Some(75.0),
                Some("5A" | "6A" | "7A") => Some(70.0),
                Some("1A" | "2A" | "3A" | "4A") => Some(65.0),
                _ => None,
            }
        }
        "FixedDewPointAndDryBulb" => Some(75.0),
        _ => None,
    };
    Ok(limit.into())
}

fn economizer_enthalpy_limit(ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(match ctx.text_arg("economizer_type")? {
        "FixedEnthalpy" => Value::from(28.0),
        _ => Value::Null,
    })
}

fn economizer_dewpoint_limit(ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(match ctx.text_arg("economizer_type")? {
        "FixedDewPointAndDryBulb" => Value::from(55.0),
        _ => Value::Null,
    })
}

fn deer_economizer_drybulb_limit(ctx: &RuleContext<'_>) -> Result<Value> {
    match ctx.text_arg("economizer_type")? {
        "FixedDryBulb" => TableRule::new("economizers", "fixed_dry_bulb_high_limit_shutoff_temp")
            .field("template", Source::Template)
            .field("climate_zone", Source::Arg("climate_zone"))
            .evaluate(ctx),
        _ => Ok(Value::Null),
    }
}

fn deer_economizer_enthalpy_limit(ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(match ctx.text_arg("economizer_type")? {
        "FixedDryBulb" => Value::from(28.0),
        _ => Value::Null,
    })
}

fn integrated_economizer_required(ctx: &RuleContext<'_>) -> Result<Value> {
    // DX VAV systems serving several zones.
    if ctx.flag_arg("is_vav") && ctx.number_arg("zone_count")? > 1.0 {
        return Ok(false.into());
    }
    if ctx.number_arg("cooling_capacity_w")? < INTEGRATED_ECONOMIZER_MIN_CAPACITY_W {
        return Ok(false.into());
    }
    let required = match climate_zone_code(ctx.text_arg("climate_zone")?) {
        Some(
            "1A" | "1B" | "2A" | "2B" | "3A" | "4A" | "5A" | "5B" | "6A" | "6B" | "7A" | "7B"
            | "8A" | "8B",
        ) => Some(false),
        Some("3B" | "3C" | "4B" | "4C" | "5C") => Some(true),
        _ => None,
    };
    Ok(required.into())
}

fn unoccupied_fan_shutoff_required(ctx: &RuleContext<'_>) -> Result<Value> {
    // Data centers run around the clock.
    let data_center_area = ctx
        .args
        .get("data_center_area_m2")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    Ok((data_center_area <= 0.0).into())
}
