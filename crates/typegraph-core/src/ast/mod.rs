//! The closed query AST: predicates, traversals, projections, and
//! composable queries. Everything here is immutable once built and free of
//! dialect or schema knowledge.

pub mod field;
pub mod literal;
pub mod predicate;
pub mod query;
pub mod set_op;
pub mod traversal;

pub use field::FieldRef;
pub use literal::{Literal, LiteralInput, Parameter, coerce};
pub use predicate::{
    AggregateExpr, AggregateFunction, ArrayMatchOp, CompareOp, ComparisonRhs, NullCheckOp,
    ObjectMatchOp, Predicate, StringMatchOp, VectorMetric, VectorPredicate,
};
pub use query::{
    OrderKey, PredicateTarget, Projection, ProjectionField, ProjectionSource, QueryAst,
    SortDirection, StartNode, TargetType, TemporalMode, TemporalSpec,
};
pub use set_op::{QueryExpr, SetOperation, SetOperator};
pub use traversal::{CyclePolicy, Direction, EdgeEndpoint, Traversal, VariableLengthSpec};
