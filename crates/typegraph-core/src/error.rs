use crate::ast::predicate::VectorMetric;
use thiserror::Error as ThisError;
use typegraph_schema::{PointerError, SchemaResolutionError, ValueType};

///
/// Error model
///
/// Every failure in the compilation pipeline belongs to exactly one of the
/// stable categories below. All errors are fatal to the current
/// compilation; none are retried or logged here. Messages name the
/// offending kind, field, pointer, or operator.
///

///
/// CompileError
///
/// Top-level sum over the stable error categories.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum CompileError {
    #[error(transparent)]
    Schema(#[from] SchemaResolutionError),

    #[error(transparent)]
    UnsupportedPredicate(#[from] UnsupportedPredicateError),

    #[error(transparent)]
    UnsupportedLiteral(#[from] UnsupportedLiteralError),

    #[error(transparent)]
    Invariant(#[from] CompilerInvariantError),

    #[error(transparent)]
    IndexDefinition(#[from] IndexDefinitionError),

    #[error(transparent)]
    DialectCapability(#[from] DialectCapabilityError),
}

///
/// UnsupportedPredicateError
///
/// A semantically valid predicate the target dialect cannot fulfil.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum UnsupportedPredicateError {
    #[error("dialect {dialect:?} does not support vector predicates")]
    VectorsUnsupported { dialect: String },

    #[error("dialect {dialect:?} cannot serve subquery predicates without a renderer")]
    SubqueryRendererMissing { dialect: String },
}

///
/// UnsupportedLiteralError
///
/// Raised at predicate construction; downstream passes assume well-typed
/// literals.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum UnsupportedLiteralError {
    #[error("null is not a literal; use an is-null predicate")]
    NullLiteral,

    #[error("number literal must be finite")]
    NonFiniteNumber,

    #[error("embedding component {index} is not finite")]
    NonFiniteEmbedding { index: usize },

    #[error("{text:?} cannot be coerced to a number literal")]
    NotANumber { text: String },

    #[error("{text:?} cannot be coerced to a boolean literal")]
    NotABoolean { text: String },

    #[error("{found} input cannot be used as a {expected} literal")]
    UnsupportedInput { found: String, expected: ValueType },
}

///
/// CompilerInvariantError
///
/// Violation of a structural invariant detected after AST construction.
/// Indicates caller misuse, not a dialect limitation.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum CompilerInvariantError {
    #[error("vector predicates may not appear under or/not")]
    VectorUnderOrNot,

    #[error("query contains {count} vector predicates; at most one is allowed")]
    MultipleVectorPredicates { count: usize },

    #[error("vector predicate limit must be positive")]
    InvalidVectorLimit,

    #[error("min score {min_score} is not valid for metric {metric}")]
    InvalidMinScore { metric: VectorMetric, min_score: f64 },

    #[error("recursive queries require exactly one traversal; found {count}")]
    RecursiveTraversalCount { count: usize },

    #[error("recursive queries require the traversal to carry a variable-length spec")]
    MissingVariableLength,

    #[error("variable-length traversals may not be mixed with other traversals")]
    MixedVariableLength,

    #[error("temporal mode as_of requires a reference timestamp")]
    MissingAsOf,

    #[error("index key pointer {pointer:?} of type {value_type} reached expression compilation")]
    UnindexableKeyCompiled {
        pointer: String,
        value_type: ValueType,
    },

    #[error("subquery must project exactly one column; found {count}")]
    SubqueryColumnCount { count: usize },

    #[error("subquery column type {inner} is not comparable with outer field type {outer}")]
    SubqueryTypeMismatch { inner: ValueType, outer: ValueType },

    #[error("{value_type} columns are not comparable with IN")]
    SubqueryUnsupportedType { value_type: ValueType },

    #[error("plan invariant violated: {detail}")]
    PlanShape { detail: String },
}

///
/// IndexDefinitionError
///
/// Normalization or validation failure for a declared index. User-facing;
/// locates the problem input precisely.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum IndexDefinitionError {
    #[error("index on {kind:?} declares no key fields")]
    EmptyFields { kind: String },

    #[error("index field {input:?} on {kind:?} is not a valid pointer: {source}")]
    InvalidFieldPointer {
        kind: String,
        input: String,
        source: PointerError,
    },

    #[error(transparent)]
    Schema(#[from] SchemaResolutionError),

    #[error(
        "field {pointer:?} on {kind:?} has type {value_type}; {advice}"
    )]
    UnindexableField {
        kind: String,
        pointer: String,
        value_type: ValueType,
        advice: &'static str,
    },

    #[error("field {pointer:?} appears more than once in the {list} list")]
    DuplicateField { pointer: String, list: &'static str },

    #[error("covering field {pointer:?} overlaps a key field")]
    CoveringOverlapsKey { pointer: String },

    #[error("where-clause key {key:?} is not a field or system column of {kind:?}")]
    UnknownWhereKey { kind: String, key: String },

    #[error("index where-clauses may only reference the indexed table")]
    WhereNotSelfContained,
}

///
/// DialectCapabilityError
///
/// The dialect recognizes the request but lacks the specific capability.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DialectCapabilityError {
    #[error("dialect {dialect:?} does not support vector metric {metric}")]
    MetricUnsupported {
        dialect: String,
        metric: VectorMetric,
    },
}
