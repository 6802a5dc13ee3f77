//! Core compiler for TypeGraph: the query AST, the predicate builder,
//! dialect adapters, the multi-pass compiler, logical-plan lowering, and
//! the index-definition subsystem.
//!
//! Compilation is a pure transformation: inputs in, SQL fragments and
//! plan objects out. There is no I/O, no logging, and no shared mutable
//! state; adapters and introspectors are freely shareable across
//! threads.

pub mod ast;
pub mod builder;
pub mod compile;
pub mod dialect;
pub mod error;
pub mod index;
pub mod ontology;
pub mod plan;
pub mod subquery;

///
/// Prelude
///
/// Domain vocabulary only; no errors, compilers, or helpers.
///

pub mod prelude {
    pub use crate::{
        ast::{
            FieldRef, Literal, Parameter, Predicate, QueryAst, QueryExpr, SetOperation,
            SetOperator, Traversal, VectorMetric,
        },
        dialect::{Dialect, Postgres, Sqlite},
        index::{IndexDefinition, IndexScope, IndexSpec, IndexTarget},
    };
    pub use typegraph_schema::{JsonPointer, SchemaIntrospector, ValueType};
}
