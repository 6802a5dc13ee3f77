use crate::ast::query::{OrderKey, QueryAst};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// SetOperator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        };
        write!(f, "{label}")
    }
}

///
/// QueryExpr
///
/// A composable query: either a single query AST or a set operation over
/// two composable queries. The recursion lets set operands nest
/// arbitrarily.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum QueryExpr {
    Query(QueryAst),
    SetOp(Box<SetOperation>),
}

impl QueryExpr {
    /// The projection-bearing query that determines this expression's
    /// output shape (the leftmost leaf).
    #[must_use]
    pub fn shape_query(&self) -> &QueryAst {
        match self {
            Self::Query(query) => query,
            Self::SetOp(set_op) => set_op.left.shape_query(),
        }
    }
}

impl From<QueryAst> for QueryExpr {
    fn from(query: QueryAst) -> Self {
        Self::Query(query)
    }
}

impl From<SetOperation> for QueryExpr {
    fn from(set_op: SetOperation) -> Self {
        Self::SetOp(Box::new(set_op))
    }
}

///
/// SetOperation
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SetOperation {
    pub operator: SetOperator,
    pub left: QueryExpr,
    pub right: QueryExpr,
    pub order_by: Vec<OrderKey>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SetOperation {
    #[must_use]
    pub fn new(
        operator: SetOperator,
        left: impl Into<QueryExpr>,
        right: impl Into<QueryExpr>,
    ) -> Self {
        Self {
            operator,
            left: left.into(),
            right: right.into(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}
