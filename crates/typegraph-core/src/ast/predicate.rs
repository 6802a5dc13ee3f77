use crate::ast::{
    field::FieldRef,
    literal::{Literal, Parameter},
    set_op::QueryExpr,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use typegraph_schema::{JsonPointer, ValueType};

///
/// Predicate AST
///
/// Pure, dialect-agnostic representation of query predicates. This layer
/// carries no validation and no SQL; interpretation happens in later
/// passes (semantic validation, lowering, expression compilation). Every
/// consumer matches exhaustively on the closed sum.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
}

impl CompareOp {
    /// Whether the right-hand side must be a literal list.
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

///
/// StringMatchOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMatchOp {
    Contains,
    StartsWith,
    EndsWith,
    Like,
    Ilike,
}

///
/// NullCheckOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullCheckOp {
    IsNull,
    IsNotNull,
}

///
/// ArrayMatchOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayMatchOp {
    Contains,
    ContainsAll,
    ContainsAny,
    IsEmpty,
    IsNotEmpty,
    LengthEq,
    LengthGt,
    LengthGte,
    LengthLt,
    LengthLte,
}

impl ArrayMatchOp {
    #[must_use]
    pub const fn takes_length(self) -> bool {
        matches!(
            self,
            Self::LengthEq | Self::LengthGt | Self::LengthGte | Self::LengthLt | Self::LengthLte
        )
    }
}

///
/// ObjectMatchOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectMatchOp {
    HasKey,
    HasPath,
    PathEquals,
    PathContains,
    PathIsNull,
    PathIsNotNull,
}

///
/// VectorMetric
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorMetric {
    #[display("cosine")]
    Cosine,
    #[display("l2")]
    L2,
    #[display("inner_product")]
    InnerProduct,
}

///
/// AggregateFunction
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    /// The value type of the aggregate's output column.
    #[must_use]
    pub fn output_type(self, field: &FieldRef) -> Option<ValueType> {
        match self {
            Self::Count | Self::Sum | Self::Avg => Some(ValueType::Number),
            Self::Min | Self::Max => field.value_type,
        }
    }
}

///
/// AggregateExpr
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AggregateExpr {
    pub function: AggregateFunction,
    pub field: FieldRef,
}

///
/// ComparisonRhs
///
/// Right-hand side of a comparison. The list form is constructible only
/// through the builder's `in`/`not in` operators.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ComparisonRhs {
    Scalar(Literal),
    List(Vec<Literal>),
    Param(Parameter),
}

///
/// VectorPredicate
///
/// Nearest-neighbor constraint: distance metric, query embedding, top-k
/// limit, optional similarity floor.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct VectorPredicate {
    pub field: FieldRef,
    pub query_embedding: Vec<f64>,
    pub metric: VectorMetric,
    pub limit: u64,
    pub min_score: Option<f64>,
}

///
/// Predicate
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Predicate {
    Comparison {
        field: FieldRef,
        op: CompareOp,
        rhs: ComparisonRhs,
    },
    StringMatch {
        field: FieldRef,
        op: StringMatchOp,
        pattern: Literal,
    },
    NullCheck {
        field: FieldRef,
        op: NullCheckOp,
    },
    Between {
        field: FieldRef,
        lower: Literal,
        upper: Literal,
    },
    ArrayMatch {
        field: FieldRef,
        op: ArrayMatchOp,
        values: Vec<Literal>,
        length: Option<u64>,
    },
    ObjectMatch {
        field: FieldRef,
        op: ObjectMatchOp,
        pointer: JsonPointer,
        value: Option<Literal>,
        value_type: Option<ValueType>,
        element_type: Option<ValueType>,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    AggregateCompare {
        aggregate: AggregateExpr,
        op: CompareOp,
        value: Literal,
    },
    Exists {
        subquery: Box<QueryExpr>,
        negated: bool,
    },
    InSubquery {
        field: FieldRef,
        subquery: Box<QueryExpr>,
        negated: bool,
    },
    VectorSimilarity(VectorPredicate),
}
