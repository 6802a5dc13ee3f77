//! Umbrella crate for TypeGraph: re-exports the schema surface and the
//! core compiler under one roof.

pub use typegraph_core::{ast, builder, compile, dialect, error, index, ontology, plan, subquery};
pub use typegraph_schema as schema;

pub mod prelude {
    pub use typegraph_core::prelude::*;
}
