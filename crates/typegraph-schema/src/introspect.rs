use crate::{
    pointer::{JsonPointer, is_array_index},
    shape::{KindSchema, TypeShape},
    types::FieldTypeInfo,
};
use derive_more::Display;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// SchemaResolutionError
///
/// Raised when a kind, field, or pointer segment cannot be resolved against
/// the frozen schema universe. Messages locate the offending input exactly.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaResolutionError {
    #[error("unknown {space} kind {kind:?}")]
    UnknownKind { space: KindSpace, kind: String },

    #[error("kind {kind:?} has no field {field:?}")]
    UnknownField { kind: String, field: String },

    #[error("pointer {pointer:?} does not resolve within kind {kind:?}")]
    UnresolvedPointer { kind: String, pointer: String },
}

///
/// KindSpace
///
/// Whether a kind names a node class or an edge class.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum KindSpace {
    #[display("node")]
    Node,
    #[display("edge")]
    Edge,
}

///
/// SchemaIntrospector
///
/// Per-compilation view over the frozen `kind → schema` maps. The caller
/// freezes the universe of kinds before constructing one; the introspector
/// never mutates it and compilations never share mutable state.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaIntrospector {
    nodes: BTreeMap<String, KindSchema>,
    edges: BTreeMap<String, KindSchema>,
}

impl SchemaIntrospector {
    #[must_use]
    pub const fn new(
        nodes: BTreeMap<String, KindSchema>,
        edges: BTreeMap<String, KindSchema>,
    ) -> Self {
        Self { nodes, edges }
    }

    /// Classify a top-level field of a node kind.
    #[must_use]
    pub fn field_type_info(&self, kind: &str, field: &str) -> Option<FieldTypeInfo> {
        self.top_shape(KindSpace::Node, kind, field)
            .map(TypeShape::field_type_info)
    }

    /// Classify a top-level field of an edge kind.
    #[must_use]
    pub fn edge_field_type_info(&self, kind: &str, field: &str) -> Option<FieldTypeInfo> {
        self.top_shape(KindSpace::Edge, kind, field)
            .map(TypeShape::field_type_info)
    }

    /// Descend a shape along a pointer, returning the innermost
    /// classification, or `None` when any segment is unknown.
    #[must_use]
    pub fn resolve_at_pointer(root: &TypeShape, pointer: &JsonPointer) -> Option<FieldTypeInfo> {
        let mut shape = root;
        for segment in pointer.segments() {
            shape = match shape {
                TypeShape::Object(fields) => fields.get(segment)?,
                TypeShape::Array(element) if is_array_index(segment) => element,
                _ => return None,
            };
        }

        Some(shape.field_type_info())
    }

    /// Resolve a full props pointer for a kind, with located errors.
    ///
    /// The first segment names the top-level field; the remainder descends
    /// the field's shape.
    pub fn resolve_pointer(
        &self,
        space: KindSpace,
        kind: &str,
        pointer: &JsonPointer,
    ) -> Result<FieldTypeInfo, SchemaResolutionError> {
        let schema = self.kind_schema(space, kind)?;
        let Some(top) = pointer.segments().first() else {
            return Err(SchemaResolutionError::UnresolvedPointer {
                kind: kind.to_string(),
                pointer: pointer.encoded(),
            });
        };
        let root = schema
            .field(top)
            .ok_or_else(|| SchemaResolutionError::UnknownField {
                kind: kind.to_string(),
                field: top.clone(),
            })?;

        let rest = JsonPointer::from_segments(pointer.segments()[1..].iter().cloned())
            .expect("suffix of a valid pointer is valid");
        Self::resolve_at_pointer(root, &rest).ok_or_else(|| {
            SchemaResolutionError::UnresolvedPointer {
                kind: kind.to_string(),
                pointer: pointer.encoded(),
            }
        })
    }

    /// All top-level field names of a kind, for builder surfaces.
    pub fn top_fields(
        &self,
        space: KindSpace,
        kind: &str,
    ) -> Result<impl Iterator<Item = (&str, FieldTypeInfo)>, SchemaResolutionError> {
        let schema = self.kind_schema(space, kind)?;

        Ok(schema
            .fields
            .iter()
            .map(|(name, shape)| (name.as_str(), shape.field_type_info())))
    }

    fn kind_schema(
        &self,
        space: KindSpace,
        kind: &str,
    ) -> Result<&KindSchema, SchemaResolutionError> {
        let map = match space {
            KindSpace::Node => &self.nodes,
            KindSpace::Edge => &self.edges,
        };
        map.get(kind).ok_or_else(|| SchemaResolutionError::UnknownKind {
            space,
            kind: kind.to_string(),
        })
    }

    fn top_shape(&self, space: KindSpace, kind: &str, field: &str) -> Option<&TypeShape> {
        let map = match space {
            KindSpace::Node => &self.nodes,
            KindSpace::Edge => &self.edges,
        };
        map.get(kind)?.field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::{KindSpace, SchemaIntrospector, SchemaResolutionError};
    use crate::{
        pointer::JsonPointer,
        shape::{KindSchema, TypeShape},
        types::ValueType,
    };
    use std::collections::BTreeMap;

    fn person_introspector() -> SchemaIntrospector {
        let person = KindSchema::new([
            ("name", TypeShape::String),
            ("age", TypeShape::Number),
            (
                "profile",
                TypeShape::object([
                    ("bio", TypeShape::String),
                    ("tags", TypeShape::Array(Box::new(TypeShape::String))),
                ]),
            ),
            ("embedding", TypeShape::Vector { dimensions: Some(3) }),
        ]);
        let knows = KindSchema::new([("since", TypeShape::Timestamp)]);

        let mut nodes = BTreeMap::new();
        nodes.insert("Person".to_string(), person);
        let mut edges = BTreeMap::new();
        edges.insert("knows".to_string(), knows);

        SchemaIntrospector::new(nodes, edges)
    }

    #[test]
    fn classifies_top_level_fields() {
        let intro = person_introspector();

        assert_eq!(
            intro.field_type_info("Person", "name").unwrap().value_type,
            ValueType::String
        );
        assert_eq!(
            intro
                .field_type_info("Person", "embedding")
                .unwrap()
                .value_type,
            ValueType::Embedding
        );
        assert_eq!(
            intro.edge_field_type_info("knows", "since").unwrap().value_type,
            ValueType::Date
        );
        assert!(intro.field_type_info("Person", "missing").is_none());
    }

    #[test]
    fn resolves_nested_pointer_with_array_element() {
        let intro = person_introspector();
        let ptr = JsonPointer::parse("/profile/tags/0").unwrap();
        let info = intro
            .resolve_pointer(KindSpace::Node, "Person", &ptr)
            .unwrap();

        assert_eq!(info.value_type, ValueType::String);
    }

    #[test]
    fn reports_array_element_type() {
        let intro = person_introspector();
        let ptr = JsonPointer::parse("/profile/tags").unwrap();
        let info = intro
            .resolve_pointer(KindSpace::Node, "Person", &ptr)
            .unwrap();

        assert_eq!(info.value_type, ValueType::Array);
        assert_eq!(info.element_type, Some(ValueType::String));
    }

    #[test]
    fn unknown_root_field_names_kind_and_field() {
        let intro = person_introspector();
        let ptr = JsonPointer::parse("/salary").unwrap();

        assert_eq!(
            intro.resolve_pointer(KindSpace::Node, "Person", &ptr),
            Err(SchemaResolutionError::UnknownField {
                kind: "Person".to_string(),
                field: "salary".to_string(),
            })
        );
    }

    #[test]
    fn unknown_intermediate_segment_names_pointer() {
        let intro = person_introspector();
        let ptr = JsonPointer::parse("/profile/website").unwrap();

        assert_eq!(
            intro.resolve_pointer(KindSpace::Node, "Person", &ptr),
            Err(SchemaResolutionError::UnresolvedPointer {
                kind: "Person".to_string(),
                pointer: "/profile/website".to_string(),
            })
        );
    }

    #[test]
    fn unknown_kind_is_spaced() {
        let intro = person_introspector();
        let ptr = JsonPointer::parse("/name").unwrap();

        assert_eq!(
            intro.resolve_pointer(KindSpace::Edge, "Person", &ptr),
            Err(SchemaResolutionError::UnknownKind {
                space: KindSpace::Edge,
                kind: "Person".to_string(),
            })
        );
    }
}
