//! Command implementations shared by the `btap` binary and its tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use btap_carbon::{
    AuditOptions, BtapCarbon, CarbonDatabase, CarbonScope, CostingTable, FrameConversionTable,
};
use btap_model::{BuildingSnapshot, CarbonReport, Value};
use btap_standards::{
    DoctorReport, RuleArgs, StandardRegistry, StandardVariant, StandardsData, VerifySummary,
    standards_root,
};
use chrono::NaiveDate;
use tracing::{info, info_span};

/// One line of `btap standards list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantListing {
    pub name: String,
    pub parent: Option<String>,
    pub family: String,
    pub depth: usize,
    pub own_rules: usize,
}

/// Explicit directory, else `$BTAP_STANDARDS_DIR`, else the bundled one.
pub fn resolve_standards_dir(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(standards_root, Path::to_path_buf)
}

pub fn load_standards(standards_dir: &Path) -> Result<(StandardsData, VerifySummary)> {
    StandardsData::verify_and_load(standards_dir)
        .with_context(|| format!("load standards from {}", standards_dir.display()))
}

pub fn run_verify(standards_dir: &Path) -> Result<DoctorReport> {
    let (_, summary) = load_standards(standards_dir)?;
    let registry = StandardRegistry::builtin().context("build standard registry")?;
    Ok(DoctorReport::from_verify_summary(&summary, &registry))
}

pub fn run_list(family: Option<&str>) -> Result<Vec<VariantListing>> {
    let registry = StandardRegistry::builtin().context("build standard registry")?;
    let variants: Vec<&StandardVariant> = match family {
        Some(family) => {
            if !registry
                .get(family)
                .is_some_and(|root| root.parent().is_none())
            {
                return Err(anyhow!("unknown standard family: {family}"));
            }
            registry.family(family).collect()
        }
        None => registry.iter().collect(),
    };
    let listings = variants
        .into_iter()
        .map(|variant| VariantListing {
            name: variant.name().to_string(),
            parent: variant.parent().map(|p| p.name().to_string()),
            family: variant.root().name().to_string(),
            depth: variant.depth(),
            own_rules: variant.overrides().len(),
        })
        .collect();
    Ok(listings)
}

pub fn run_rule(
    standards_dir: &Path,
    variant: &str,
    rule: &str,
    raw_args: &[String],
) -> Result<Value> {
    let mut args = RuleArgs::new();
    for raw in raw_args {
        let (name, value) = parse_rule_arg(raw)?;
        args.insert(name, value);
    }
    let registry = StandardRegistry::builtin().context("build standard registry")?;
    let variant = registry.resolve(variant)?;
    let (data, _) = load_standards(standards_dir)?;
    let value = variant
        .evaluate(rule, &data, &args)
        .with_context(|| format!("evaluate {rule} for {}", variant.name()))?;
    info!(variant = %variant.name(), rule, %value, "rule evaluated");
    Ok(value)
}

/// Split `NAME=VALUE`; the value becomes a number, then a `YYYY-MM-DD` date,
/// then a boolean, then text.
pub fn parse_rule_arg(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("rule argument must be NAME=VALUE: {raw}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("rule argument has an empty name: {raw}"));
    }
    let value = value.trim();
    let value = if let Ok(number) = value.parse::<f64>()
        && number.is_finite()
    {
        Value::Number(number)
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Value::Date(date)
    } else {
        match value {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "" => Value::Null,
            text => Value::Text(text.to_string()),
        }
    };
    Ok((name.to_string(), value))
}

pub fn run_carbon(
    standards_dir: &Path,
    model_path: &Path,
    scope: CarbonScope,
) -> Result<CarbonReport> {
    let span = info_span!("carbon", model = %model_path.display());
    let _guard = span.enter();

    let contents = std::fs::read_to_string(model_path)
        .with_context(|| format!("read model {}", model_path.display()))?;
    let model: BuildingSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("parse model {}", model_path.display()))?;

    let (data, _) = load_standards(standards_dir)?;
    let database = CarbonDatabase::from_standards(&data).context("load material tables")?;
    let costing = CostingTable::from_standards(&data).context("load glazing pane counts")?;
    let frames = FrameConversionTable::from_standards(&data).context("load frame conversions")?;

    let report = BtapCarbon::new(&model, &database, &costing, &frames)
        .with_options(AuditOptions { scope })
        .audit()
        .with_context(|| format!("audit {}", model_path.display()))?;
    Ok(report)
}
