//! Projection-shape and membership-compatibility rules for subqueries
//! used in `IN`/`NOT IN` and `EXISTS` predicates.

use crate::ast::{ProjectionSource, QueryExpr};
use typegraph_schema::ValueType;

/// The number of output columns a composable query projects: the
/// selective-field count when present, else the explicit projection count.
#[must_use]
pub fn column_count(query: &QueryExpr) -> usize {
    let shape = query.shape_query();
    shape
        .selective_fields
        .as_ref()
        .map_or(shape.projection.fields.len(), Vec::len)
}

/// The normalized value type of a single-column projection, or `None`
/// when the type is unresolved.
///
/// Aggregate columns map `count | sum | avg → number` and `min | max` to
/// the aggregated field's type; `unknown` normalizes to unresolved.
#[must_use]
pub fn single_column_value_type(query: &QueryExpr) -> Option<ValueType> {
    let shape = query.shape_query();
    if shape.selective_fields.is_some() {
        // Selective fields carry no schema classification.
        return None;
    }
    let [field] = shape.projection.fields.as_slice() else {
        return None;
    };
    let value_type = match &field.source {
        ProjectionSource::Field(field_ref) => field_ref.value_type,
        ProjectionSource::Aggregate(aggregate) => {
            aggregate.function.output_type(&aggregate.field)
        }
    };

    value_type.filter(|vt| *vt != ValueType::Unknown)
}

/// Whether two (possibly unresolved) column types may face each other in
/// an `IN` membership test. Unresolved absorbs; otherwise equality.
#[must_use]
pub const fn in_subquery_compatible(left: Option<ValueType>, right: Option<ValueType>) -> bool {
    match (normalize(left), normalize(right)) {
        (None, _) | (_, None) => true,
        (Some(a), Some(b)) => a as u8 == b as u8,
    }
}

/// Structural value types are never comparable with `IN`.
#[must_use]
pub const fn is_unsupported_in_subquery_type(value_type: ValueType) -> bool {
    !value_type.is_in_subquery_comparable()
}

const fn normalize(value_type: Option<ValueType>) -> Option<ValueType> {
    match value_type {
        Some(ValueType::Unknown) | None => None,
        other => other,
    }
}
