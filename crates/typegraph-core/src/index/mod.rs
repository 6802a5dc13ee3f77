//! The index-definition subsystem: normalization of declared indexes,
//! schema-checked validation, partial-index WHERE construction, key
//! compilation through the dialect adapters, and deterministic naming.

pub mod columns;
pub mod compile;
pub mod definition;
pub mod name;
pub mod where_clause;

pub use columns::{
    EDGE_SYSTEM_COLUMNS, EdgeIndexDirection, IndexScope, NODE_SYSTEM_COLUMNS, SystemColumn,
    edge_system_column, node_system_column,
};
pub use compile::{compile_index_keys, compile_index_where};
pub use definition::{FieldInput, IndexDefinition, IndexSpec, IndexTarget, normalize_index};
pub use name::{derive_index_name, derive_vector_index_name, sanitize_component};
pub use where_clause::{IndexWhereBuilder, WhereField};
