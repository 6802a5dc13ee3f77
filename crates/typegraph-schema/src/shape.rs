use crate::types::{FieldTypeInfo, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// TypeShape
///
/// Introspectable schema tree for one field. This is the frozen view the
/// compiler receives from the schema-definition facility; it carries enough
/// structure to resolve JSON pointers and classify values, nothing more.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum TypeShape {
    Array(Box<TypeShape>),
    Boolean,
    Number,
    Object(BTreeMap<String, TypeShape>),
    /// A construct the introspector cannot classify.
    Opaque,
    String,
    Timestamp,
    /// A typed vector of numbers.
    Vector { dimensions: Option<usize> },
}

impl TypeShape {
    /// Conservative classification into the closed value-type tag.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Array(_) => ValueType::Array,
            Self::Boolean => ValueType::Boolean,
            Self::Number => ValueType::Number,
            Self::Object(_) => ValueType::Object,
            Self::Opaque => ValueType::Unknown,
            Self::String => ValueType::String,
            Self::Timestamp => ValueType::Date,
            Self::Vector { .. } => ValueType::Embedding,
        }
    }

    /// Classification carrying the array element type when present.
    #[must_use]
    pub fn field_type_info(&self) -> FieldTypeInfo {
        match self {
            Self::Array(element) => FieldTypeInfo::array_of(element.value_type()),
            other => FieldTypeInfo::new(other.value_type()),
        }
    }

    /// Shorthand for an object shape from field pairs.
    #[must_use]
    pub fn object<const N: usize>(fields: [(&str, Self); N]) -> Self {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, shape)| (name.to_string(), shape))
                .collect(),
        )
    }
}

///
/// KindSchema
///
/// The introspectable schema of one node or edge kind: its top-level
/// `props` fields by name.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KindSchema {
    pub fields: BTreeMap<String, TypeShape>,
}

impl KindSchema {
    #[must_use]
    pub fn new<const N: usize>(fields: [(&str, TypeShape); N]) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, shape)| (name.to_string(), shape))
                .collect(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&TypeShape> {
        self.fields.get(name)
    }
}
