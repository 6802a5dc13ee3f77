use serde::{Deserialize, Serialize};
use typegraph_schema::{FieldTypeInfo, JsonPointer, ValueType};

///
/// FieldRef
///
/// A resolved reference to a column of an aliased table. `path` is the
/// logical column path (`["id"]`, `["props", "name"]`); `json_pointer`
/// addresses into the `props` document when applicable. Type annotations
/// are carried when schema introspection resolved them.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldRef {
    pub alias: String,
    pub path: Vec<String>,
    pub json_pointer: Option<JsonPointer>,
    pub value_type: Option<ValueType>,
    pub element_type: Option<ValueType>,
}

impl FieldRef {
    /// A plain (non-props) column reference.
    #[must_use]
    pub fn column(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            path: vec![name.into()],
            json_pointer: None,
            value_type: None,
            element_type: None,
        }
    }

    /// A typed plain column reference.
    #[must_use]
    pub fn typed_column(
        alias: impl Into<String>,
        name: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            value_type: Some(value_type),
            ..Self::column(alias, name)
        }
    }

    /// A reference into the `props` document.
    #[must_use]
    pub fn props(alias: impl Into<String>, pointer: JsonPointer) -> Self {
        Self {
            alias: alias.into(),
            path: vec!["props".to_string()],
            json_pointer: Some(pointer),
            value_type: None,
            element_type: None,
        }
    }

    /// A props reference annotated with introspected type information.
    #[must_use]
    pub fn typed_props(
        alias: impl Into<String>,
        pointer: JsonPointer,
        info: FieldTypeInfo,
    ) -> Self {
        Self {
            value_type: Some(info.value_type),
            element_type: info.element_type,
            ..Self::props(alias, pointer)
        }
    }

    /// The physical column this reference reads (`props` for document
    /// fields).
    #[must_use]
    pub fn column_name(&self) -> &str {
        self.path.first().map_or("props", String::as_str)
    }

    /// The effective classification, `Unknown` when unresolved.
    #[must_use]
    pub fn effective_type(&self) -> ValueType {
        self.value_type.unwrap_or(ValueType::Unknown)
    }
}
