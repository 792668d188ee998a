//! Criteria matching against reference tables.
//!
//! Every rule that pulls a parameter out of the standards data (an
//! efficiency, a curve name, an economizer limit, an embodied-carbon value)
//! goes through [`find`]: equality fields select candidate rows, range fields
//! narrow them to the rows whose `[min, max)` bounds contain the supplied
//! value, and the first remaining row in table order wins.

#![deny(unsafe_code)]

use std::cmp::Ordering;

use btap_model::{MatchCriteria, RangeCriterion, ReferenceTable, Row, Value};
use tracing::warn;

use crate::error::{Result, StandardsError};

/// Every row satisfying `criteria`, in table order.
///
/// Fails with [`StandardsError::EmptyCriteria`] when the criteria would not
/// constrain the search at all.
pub fn find_all<'t>(table: &'t ReferenceTable, criteria: &MatchCriteria) -> Result<Vec<&'t Row>> {
    if criteria.is_empty() {
        return Err(StandardsError::EmptyCriteria {
            table: table.name().to_string(),
        });
    }
    Ok(table
        .iter()
        .filter(|row| matches_fields(table, row, criteria) && matches_ranges(row, criteria))
        .collect())
}

/// The first row satisfying `criteria`, or `Ok(None)` when no row does.
///
/// When several rows qualify the first one in table order is returned and a
/// warning is logged.
pub fn find<'t>(table: &'t ReferenceTable, criteria: &MatchCriteria) -> Result<Option<&'t Row>> {
    let matches = find_all(table, criteria)?;
    if matches.len() > 1 {
        warn!(
            table = table.name(),
            %criteria,
            count = matches.len(),
            "search criteria matched several rows, using the first"
        );
    }
    Ok(matches.into_iter().next())
}

/// Like [`find`], but a missing row is an error naming the table and criteria.
pub fn find_required<'t>(table: &'t ReferenceTable, criteria: &MatchCriteria) -> Result<&'t Row> {
    find(table, criteria)?.ok_or_else(|| StandardsError::NoMatch {
        table: table.name().to_string(),
        criteria: criteria.to_string(),
    })
}

/// Value of `column` in the row selected by [`find_required`].
///
/// A null cell is reported as [`StandardsError::MissingColumn`].
pub fn lookup<'t>(
    table: &'t ReferenceTable,
    criteria: &MatchCriteria,
    column: &str,
) -> Result<&'t Value> {
    let row = find_required(table, criteria)?;
    row.get(column)
        .filter(|v| !v.is_null())
        .ok_or_else(|| StandardsError::MissingColumn {
            table: table.name().to_string(),
            column: column.to_string(),
            criteria: criteria.to_string(),
        })
}

// Criteria fields naming a column the table lacks are ignored. A null cell
// never equals anything.
fn matches_fields(table: &ReferenceTable, row: &Row, criteria: &MatchCriteria) -> bool {
    criteria.fields().iter().all(|(field, expected)| {
        if !table.has_column(field) {
            return true;
        }
        match row.get(field) {
            Some(actual) if !actual.is_null() => actual == expected,
            _ => false,
        }
    })
}

fn matches_ranges(row: &Row, criteria: &MatchCriteria) -> bool {
    criteria
        .ranges()
        .iter()
        .filter(|r| r.is_active())
        .all(|range| within_bounds(row, range))
}

fn within_bounds(row: &Row, range: &RangeCriterion) -> bool {
    let Some(value) = range.value.as_ref() else {
        return true;
    };
    let (Some(min), Some(max)) = (row.get(&range.min_column), row.get(&range.max_column)) else {
        return false;
    };
    let lower_ok = matches!(
        value.compare(min),
        Some(Ordering::Greater | Ordering::Equal)
    );
    let upper_ok = matches!(value.compare(max), Some(Ordering::Less));
    lower_ok && upper_ok
}
