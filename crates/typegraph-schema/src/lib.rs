//! Schema surface for TypeGraph: value-type classification, the bounded
//! JSON-pointer engine, and per-compilation schema introspection.

pub mod introspect;
pub mod pointer;
pub mod shape;
pub mod types;

pub use introspect::{KindSpace, SchemaIntrospector, SchemaResolutionError};
pub use pointer::{JsonPointer, MAX_POINTER_DEPTH, PointerError, PointerInput};
pub use shape::{KindSchema, TypeShape};
pub use types::{FieldTypeInfo, ValueType};
