//! Dialect adapters: concrete expression constructors and capability
//! flags per backend. Adapters are immutable process-scoped values;
//! compilations share them freely across threads.
//!
//! Path compilation emits identical text for identical pointers so the
//! database can match expressions across GROUP BY clauses and expression
//! indexes. Path segments originate from schema identifiers and render
//! raw; literal values always bind.

pub mod expr;
mod postgres;
mod sqlite;
#[cfg(test)]
mod tests;

pub use expr::{BindArg, PlaceholderStyle, SqlExpr, SqlFragment};
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use crate::{
    ast::{Literal, VectorMetric},
    error::{CompileError, UnsupportedLiteralError},
};
use std::fmt;
use typegraph_schema::JsonPointer;

///
/// DialectName
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DialectName {
    Postgres,
    Sqlite,
}

impl fmt::Display for DialectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        };
        write!(f, "{label}")
    }
}

///
/// VectorPredicateStrategy
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VectorPredicateStrategy {
    Native,
    Unsupported,
}

///
/// DialectCapabilities
///

#[derive(Clone, Debug)]
pub struct DialectCapabilities {
    pub vector_predicate_strategy: VectorPredicateStrategy,
    pub vector_metrics: &'static [VectorMetric],
    pub supports_ilike: bool,
}

///
/// Dialect
///
/// The seam between logical expressions and backend SQL. One method per
/// logical operation; implementations differ in expression shape and in
/// which capabilities exist at all.
///

pub trait Dialect: Send + Sync {
    fn name(&self) -> DialectName;

    fn capabilities(&self) -> &DialectCapabilities;

    fn placeholder_style(&self) -> PlaceholderStyle;

    // ------------------------------------------------------------------
    // Identifiers and values
    // ------------------------------------------------------------------

    fn quote_identifier(&self, ident: &str) -> String;

    /// A deferred bind for a literal value.
    fn bind_value(&self, literal: Literal) -> SqlExpr {
        SqlExpr::bind(literal)
    }

    fn boolean_literal(&self, value: bool) -> SqlExpr;

    /// Boolean rendering inside JSON/text contexts.
    fn boolean_literal_text(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    fn current_timestamp(&self) -> SqlExpr;

    // ------------------------------------------------------------------
    // JSON extraction
    // ------------------------------------------------------------------

    /// Stable textual path encoding for a pointer. Identical pointers
    /// yield byte-identical text.
    fn compile_path(&self, pointer: &JsonPointer) -> String;

    fn json_extract(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_extract_text(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_extract_number(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_extract_boolean(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_extract_date(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    // ------------------------------------------------------------------
    // Array and object predicates
    // ------------------------------------------------------------------

    fn json_array_length(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_array_contains(&self, col: &str, pointer: &JsonPointer, value: &Literal) -> SqlExpr;

    fn json_array_contains_all(
        &self,
        col: &str,
        pointer: &JsonPointer,
        values: &[Literal],
    ) -> SqlExpr;

    fn json_array_contains_any(
        &self,
        col: &str,
        pointer: &JsonPointer,
        values: &[Literal],
    ) -> SqlExpr;

    /// Structural equality of the JSON value at a path, for payloads with
    /// no scalar classification.
    fn json_path_equals(&self, col: &str, pointer: &JsonPointer, value: &Literal) -> SqlExpr;

    fn json_has_key(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_has_path(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_path_is_null(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    fn json_path_is_not_null(&self, col: &str, pointer: &JsonPointer) -> SqlExpr;

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Case-insensitive LIKE; dialects without a native operator lower
    /// both sides.
    fn ilike(&self, col: &str, pattern: Literal) -> SqlExpr;

    // ------------------------------------------------------------------
    // Recursive path accumulation
    // ------------------------------------------------------------------

    fn initialize_path(&self, id: &str) -> SqlExpr;

    fn extend_path(&self, path: &str, id: &str) -> SqlExpr;

    /// Condition asserting `id` has not been visited in `path`.
    fn cycle_check(&self, id: &str, path: &str) -> SqlExpr;

    // ------------------------------------------------------------------
    // Vectors
    // ------------------------------------------------------------------

    fn supports_vectors(&self) -> bool;

    /// Textual embedding rendering; validates finiteness before any SQL
    /// emission.
    fn format_embedding(&self, embedding: &[f64]) -> Result<String, UnsupportedLiteralError> {
        for (index, component) in embedding.iter().enumerate() {
            if !component.is_finite() {
                return Err(UnsupportedLiteralError::NonFiniteEmbedding { index });
            }
        }

        let rendered: Vec<String> = embedding.iter().map(ToString::to_string).collect();
        Ok(format!("[{}]", rendered.join(",")))
    }

    /// Orderable distance expression where smaller means more similar.
    fn vector_distance(
        &self,
        col: &str,
        embedding: &[f64],
        metric: VectorMetric,
    ) -> Result<SqlExpr, CompileError>;
}

pub(crate) fn embedding_literal(text: String) -> Literal {
    Literal {
        value: serde_json::Value::String(text),
        value_type: typegraph_schema::ValueType::Embedding,
    }
}
