//! Name-keyed registry of standard variants.

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::catalog;
use crate::error::{Result, StandardsError};
use crate::variant::{Qualifiers, Rule, RuleSet, StandardVariant};

/// Declarative description of one variant, consumed by
/// [`StandardRegistry::register_spec`].
#[derive(Debug, Clone)]
pub struct VariantSpec {
    pub name: String,
    pub parent: Option<String>,
    pub qualifiers: Qualifiers,
    pub overrides: RuleSet,
}

impl VariantSpec {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            qualifiers: Qualifiers::default(),
            overrides: RuleSet::new(),
        }
    }

    pub fn child(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::root(name)
        }
    }

    #[must_use]
    pub fn qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.overrides.insert(name, rule);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.overrides = rules;
        self
    }
}

/// Populate-once, read-many mapping from variant name to variant.
///
/// Parents must be registered before their children, so every chain is
/// finite and ends at a root. Once populated the registry can be shared
/// behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct StandardRegistry {
    variants: BTreeMap<String, Arc<StandardVariant>>,
    order: Vec<String>,
}

impl StandardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in code edition, building archetype and HVAC combination.
    pub fn builtin() -> Result<Self> {
        Self::from_specs(catalog::builtin_variants())
    }

    /// Register `specs` in order.
    pub fn from_specs<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = VariantSpec>,
    {
        let mut registry = Self::new();
        for spec in specs {
            registry.register_spec(spec)?;
        }
        debug!(variants = registry.len(), "standard registry populated");
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: &str,
        parent: Option<&str>,
        overrides: RuleSet,
    ) -> Result<Arc<StandardVariant>> {
        self.register_spec(VariantSpec {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            qualifiers: Qualifiers::default(),
            overrides,
        })
    }

    pub fn register_spec(&mut self, spec: VariantSpec) -> Result<Arc<StandardVariant>> {
        if self.variants.contains_key(&spec.name) {
            return Err(StandardsError::DuplicateName { name: spec.name });
        }
        let parent = match &spec.parent {
            Some(parent) => Some(Arc::clone(self.variants.get(parent).ok_or_else(|| {
                StandardsError::UnknownParent {
                    name: spec.name.clone(),
                    parent: parent.clone(),
                }
            })?)),
            None => None,
        };

        let variant = Arc::new(StandardVariant::new(
            spec.name.clone(),
            parent,
            spec.qualifiers,
            spec.overrides,
        ));
        self.order.push(spec.name.clone());
        self.variants.insert(spec.name, Arc::clone(&variant));
        Ok(variant)
    }

    pub fn resolve(&self, name: &str) -> Result<&Arc<StandardVariant>> {
        self.variants
            .get(name)
            .ok_or_else(|| StandardsError::UnknownStandard {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&StandardVariant> {
        self.variants.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Variants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StandardVariant> {
        self.order
            .iter()
            .filter_map(|name| self.variants.get(name).map(Arc::as_ref))
    }

    /// Variants whose chain ends at the root named `family`.
    pub fn family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a StandardVariant> {
        self.iter().filter(move |v| v.root().name() == family)
    }
}
