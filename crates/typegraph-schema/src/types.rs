use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ValueType
///
/// Closed classification of schema field values.
///
/// This is the only type vocabulary shared between schema introspection,
/// literal coercion, index validation, and dialect compilation. Absence of
/// a better classification is always `Unknown`, never a guess.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum ValueType {
    Array,
    Boolean,
    Date,
    Embedding,
    Number,
    Object,
    String,
    Unknown,
}

impl ValueType {
    /// Whether a field of this type may serve as a btree index key or
    /// covering column.
    ///
    /// Embeddings require vector indexes; arrays and objects require
    /// GIN/JSON strategies. Those are handled by other subsystems.
    #[must_use]
    pub const fn is_indexable(self) -> bool {
        !matches!(self, Self::Array | Self::Embedding | Self::Object)
    }

    /// Whether a column of this type can appear on either side of an
    /// `IN (subquery)` membership test.
    #[must_use]
    pub const fn is_in_subquery_comparable(self) -> bool {
        !matches!(self, Self::Array | Self::Embedding | Self::Object)
    }

    /// Whether equality and ordering comparisons are scalar for this type.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Date | Self::Number | Self::String
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Embedding => "embedding",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

///
/// FieldTypeInfo
///
/// Introspection result for one schema field or pointer target.
/// `element_type` is populated for arrays only.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldTypeInfo {
    pub value_type: ValueType,
    pub element_type: Option<ValueType>,
}

impl FieldTypeInfo {
    #[must_use]
    pub const fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            element_type: None,
        }
    }

    #[must_use]
    pub const fn array_of(element_type: ValueType) -> Self {
        Self {
            value_type: ValueType::Array,
            element_type: Some(element_type),
        }
    }
}
