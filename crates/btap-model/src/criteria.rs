//! Search criteria for selecting rows out of a reference table.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// A numeric (or date) value compared against a pair of bound columns.
///
/// A row qualifies when `row[min_column] <= value < row[max_column]`.
/// With no value supplied the criterion is inert and only equality fields
/// decide the match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeCriterion {
    pub field: String,
    pub value: Option<Value>,
    pub min_column: String,
    pub max_column: String,
}

impl RangeCriterion {
    /// Criterion over the conventional `min_<field>` / `max_<field>` columns.
    pub fn new(field: impl Into<String>, value: Option<Value>) -> Self {
        let field = field.into();
        Self {
            min_column: format!("min_{field}"),
            max_column: format!("max_{field}"),
            field,
            value,
        }
    }

    /// Use explicitly named bound columns instead of the `min_`/`max_` pair.
    #[must_use]
    pub fn columns(mut self, min_column: impl Into<String>, max_column: impl Into<String>) -> Self {
        self.min_column = min_column.into();
        self.max_column = max_column.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// Equality fields plus optional range fields.
///
/// Equality fields keep insertion order so diagnostics read the way the
/// caller wrote them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatchCriteria {
    fields: Vec<(String, Value)>,
    ranges: Vec<RangeCriterion>,
}

impl MatchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`. A repeated field replaces the earlier value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeCriterion) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn ranges(&self) -> &[RangeCriterion] {
        &self.ranges
    }

    /// True when nothing would constrain a search.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && !self.ranges.iter().any(RangeCriterion::is_active)
    }
}

impl fmt::Display for MatchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut first = true;
        for (field, value) in &self.fields {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{field}={value:?}")?;
        }
        for range in self.ranges.iter().filter(|r| r.is_active()) {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            let value = range.value.clone().unwrap_or_default();
            write!(
                f,
                "{}={} in [{}, {})",
                range.field, value, range.min_column, range.max_column
            )?;
        }
        f.write_str("}")
    }
}
