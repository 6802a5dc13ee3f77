//! Fluent, immutable construction of predicate expressions. Used by both
//! query predicates and index WHERE clauses.
//!
//! Every combinator builds a new value; originals are never touched.
//! `and`/`or` always produce a binary node with exactly two children in
//! the given order, and `not` wraps a single child: no flattening and no
//! double-negation elimination. Literal coercion happens here and only
//! here, so later passes can assume well-typed literals.

mod field;
#[cfg(test)]
mod tests;

pub use field::{
    AggregateField, ArrayField, BooleanField, DateField, EmbeddingField, NearestNeighbors,
    NumberField, ObjectField, StringField,
};

use crate::ast::{FieldRef, Predicate, QueryExpr};

///
/// Expr
///
/// Immutable wrapper around a built predicate with the fluent
/// combinators.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    predicate: Predicate,
}

impl Expr {
    #[must_use]
    pub const fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    /// Binary conjunction, children in given order.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        Self::new(Predicate::And(vec![
            self.predicate.clone(),
            other.predicate.clone(),
        ]))
    }

    /// Binary disjunction, children in given order.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        Self::new(Predicate::Or(vec![
            self.predicate.clone(),
            other.predicate.clone(),
        ]))
    }

    /// Single-child negation; double negation is preserved structurally.
    #[must_use]
    pub fn not(&self) -> Self {
        Self::new(Predicate::Not(Box::new(self.predicate.clone())))
    }

    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    #[must_use]
    pub fn into_predicate(self) -> Predicate {
        self.predicate
    }
}

impl From<Expr> for Predicate {
    fn from(expr: Expr) -> Self {
        expr.predicate
    }
}

/// An EXISTS test over a composable subquery.
#[must_use]
pub fn exists(subquery: impl Into<QueryExpr>) -> Expr {
    Expr::new(Predicate::Exists {
        subquery: Box::new(subquery.into()),
        negated: false,
    })
}

/// A NOT EXISTS test over a composable subquery.
#[must_use]
pub fn not_exists(subquery: impl Into<QueryExpr>) -> Expr {
    Expr::new(Predicate::Exists {
        subquery: Box::new(subquery.into()),
        negated: true,
    })
}

/// Membership of a field in a single-column subquery.
#[must_use]
pub fn in_subquery(field: FieldRef, subquery: impl Into<QueryExpr>) -> Expr {
    Expr::new(Predicate::InSubquery {
        field,
        subquery: Box::new(subquery.into()),
        negated: false,
    })
}

/// Negated membership of a field in a single-column subquery.
#[must_use]
pub fn not_in_subquery(field: FieldRef, subquery: impl Into<QueryExpr>) -> Expr {
    Expr::new(Predicate::InSubquery {
        field,
        subquery: Box::new(subquery.into()),
        negated: true,
    })
}
