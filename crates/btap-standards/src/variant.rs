//! Standard variants and their rule overrides.
//!
//! A variant is a named bundle of rules that specializes its parent: a code
//! edition refines its family root, a building archetype refines an edition,
//! an HVAC-system combination refines an archetype. A variant only stores the
//! rules it overrides; everything else is found by walking the parent chain
//! towards the root. Rules are evaluated with the *requesting* variant in
//! their context, so an inherited rule still sees the most specific
//! qualifiers and overrides.

#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use btap_model::Value;
use serde::Serialize;

use crate::data::StandardsData;
use crate::error::{Result, StandardsError};

type RuleFn = dyn Fn(&RuleContext<'_>) -> Result<Value> + Send + Sync;

/// A rule implementation. Cheap to clone; shared between variants.
#[derive(Clone)]
pub struct Rule {
    inner: Arc<RuleFn>,
}

impl Rule {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// A rule that always yields `value`.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(move |_| Ok(value.clone()))
    }

    pub fn call(&self, ctx: &RuleContext<'_>) -> Result<Value> {
        (self.inner)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule(..)")
    }
}

/// Rules defined directly on one variant, keyed by rule name.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) {
        self.rules.insert(name.into(), rule);
    }

    /// Add every rule of `other`, replacing rules of the same name.
    #[must_use]
    pub fn merge(mut self, other: RuleSet) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Template, building type and HVAC system a variant is specialized for.
///
/// Unset qualifiers are inherited from the parent at registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Qualifiers {
    pub template: Option<String>,
    pub building_type: Option<String>,
    pub hvac_system: Option<String>,
}

impl Qualifiers {
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn building_type(mut self, building_type: impl Into<String>) -> Self {
        self.building_type = Some(building_type.into());
        self
    }

    #[must_use]
    pub fn hvac_system(mut self, hvac_system: impl Into<String>) -> Self {
        self.hvac_system = Some(hvac_system.into());
        self
    }

    pub(crate) fn inherit(self, parent: &Qualifiers) -> Self {
        Self {
            template: self.template.or_else(|| parent.template.clone()),
            building_type: self.building_type.or_else(|| parent.building_type.clone()),
            hvac_system: self.hvac_system.or_else(|| parent.hvac_system.clone()),
        }
    }

    /// `<template>_<building_type>[_<hvac_system>]`, when both leading parts are set.
    pub fn composite_key(&self) -> Option<String> {
        let template = self.template.as_deref()?;
        let building_type = self.building_type.as_deref()?;
        Some(match self.hvac_system.as_deref() {
            Some(hvac) => format!("{template}_{building_type}_{hvac}"),
            None => format!("{template}_{building_type}"),
        })
    }
}

/// Named arguments passed to a rule evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleArgs {
    values: BTreeMap<String, Value>,
}

impl RuleArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// The argument, treating an explicit null as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Everything a rule can see while it runs.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The variant the rule was requested on (not necessarily the one defining it).
    pub variant: &'a StandardVariant,
    pub rule: &'a str,
    pub data: &'a StandardsData,
    pub args: &'a RuleArgs,
}

impl<'a> RuleContext<'a> {
    pub fn arg(&self, name: &str) -> Result<&'a Value> {
        self.args
            .get(name)
            .ok_or_else(|| StandardsError::MissingArgument {
                variant: self.variant.name().to_string(),
                rule: self.rule.to_string(),
                argument: name.to_string(),
            })
    }

    pub fn text_arg(&self, name: &str) -> Result<&'a str> {
        let value = self.arg(name)?;
        value.as_str().ok_or_else(|| StandardsError::MissingArgument {
            variant: self.variant.name().to_string(),
            rule: self.rule.to_string(),
            argument: format!("{name} (text, got {})", value.kind()),
        })
    }

    pub fn number_arg(&self, name: &str) -> Result<f64> {
        let value = self.arg(name)?;
        value.as_f64().ok_or_else(|| StandardsError::MissingArgument {
            variant: self.variant.name().to_string(),
            rule: self.rule.to_string(),
            argument: format!("{name} (number, got {})", value.kind()),
        })
    }

    /// A yes/no argument; absent means `false`.
    pub fn flag_arg(&self, name: &str) -> bool {
        self.args
            .get(name)
            .is_some_and(|v| v.as_bool().unwrap_or(false))
    }

    pub fn template(&self) -> Result<&'a str> {
        self.variant
            .template()
            .ok_or_else(|| self.missing_qualifier("template"))
    }

    /// The building-type qualifier, falling back to a `building_type` argument.
    pub fn building_type(&self) -> Result<&'a str> {
        if let Some(building_type) = self.variant.building_type() {
            return Ok(building_type);
        }
        self.args
            .get("building_type")
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing_qualifier("building_type"))
    }

    /// Evaluate another rule on the same variant with the same data and arguments.
    pub fn evaluate(&self, rule: &str) -> Result<Value> {
        self.variant.evaluate(rule, self.data, self.args)
    }

    fn missing_qualifier(&self, qualifier: &'static str) -> StandardsError {
        StandardsError::MissingQualifier {
            variant: self.variant.name().to_string(),
            rule: self.rule.to_string(),
            qualifier,
        }
    }
}

/// One registered standard variant. Immutable once registered.
#[derive(Debug)]
pub struct StandardVariant {
    name: String,
    parent: Option<Arc<StandardVariant>>,
    qualifiers: Qualifiers,
    overrides: RuleSet,
}

impl StandardVariant {
    pub(crate) fn new(
        name: String,
        parent: Option<Arc<StandardVariant>>,
        qualifiers: Qualifiers,
        overrides: RuleSet,
    ) -> Self {
        let qualifiers = match &parent {
            Some(p) => qualifiers.inherit(&p.qualifiers),
            None => qualifiers,
        };
        Self {
            name,
            parent,
            qualifiers,
            overrides,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&StandardVariant> {
        self.parent.as_deref()
    }

    pub fn qualifiers(&self) -> &Qualifiers {
        &self.qualifiers
    }

    pub fn template(&self) -> Option<&str> {
        self.qualifiers.template.as_deref()
    }

    pub fn building_type(&self) -> Option<&str> {
        self.qualifiers.building_type.as_deref()
    }

    pub fn hvac_system(&self) -> Option<&str> {
        self.qualifiers.hvac_system.as_deref()
    }

    pub fn overrides(&self) -> &RuleSet {
        &self.overrides
    }

    /// This variant followed by each ancestor up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &StandardVariant> {
        std::iter::successors(Some(self), |v: &&StandardVariant| v.parent())
    }

    pub fn root(&self) -> &StandardVariant {
        self.ancestors().last().unwrap_or(self)
    }

    /// Number of ancestors; roots have depth zero.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// The nearest variant on the chain that defines `rule`.
    pub fn defining_variant(&self, rule: &str) -> Option<&StandardVariant> {
        self.ancestors().find(|v| v.overrides.contains(rule))
    }

    /// Resolve `rule` by walking from this variant to the root.
    pub fn rule(&self, rule: &str) -> Result<&Rule> {
        self.ancestors()
            .find_map(|v| v.overrides.get(rule))
            .ok_or_else(|| StandardsError::UnresolvedRule {
                variant: self.name.clone(),
                rule: rule.to_string(),
                chain: self.chain(),
            })
    }

    /// Every rule name resolvable from this variant.
    pub fn rule_names(&self) -> BTreeSet<&str> {
        self.ancestors()
            .flat_map(|v| v.overrides.names())
            .collect()
    }

    pub fn evaluate(&self, rule: &str, data: &StandardsData, args: &RuleArgs) -> Result<Value> {
        let implementation = self.rule(rule)?;
        let ctx = RuleContext {
            variant: self,
            rule,
            data,
            args,
        };
        implementation.call(&ctx)
    }

    /// `self -> parent -> ... -> root`, for diagnostics.
    pub fn chain(&self) -> String {
        self.ancestors()
            .map(StandardVariant::name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
