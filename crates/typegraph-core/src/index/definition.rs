use crate::{
    ast::Predicate,
    error::IndexDefinitionError,
    index::{
        columns::{EdgeIndexDirection, IndexScope},
        name::derive_index_name,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use typegraph_schema::{
    FieldTypeInfo, JsonPointer, KindSpace, SchemaIntrospector, ValueType,
};

///
/// Index definitions
///
/// Users declare an `IndexSpec`; normalization resolves every field input
/// to a pointer, classifies it through schema introspection, validates
/// indexability and overlap, and derives the default name. The resulting
/// `IndexDefinition` is immutable and stored declaratively.
///

///
/// IndexTarget
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexTarget {
    Node,
    Edge,
}

impl IndexTarget {
    #[must_use]
    pub const fn kind_space(self) -> KindSpace {
        match self {
            Self::Node => KindSpace::Node,
            Self::Edge => KindSpace::Edge,
        }
    }
}

///
/// FieldInput
///
/// A user-facing field reference: a dotted top name (`"profile.name"`),
/// an encoded pointer string (`"/profile/name"`), or a segment list.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FieldInput {
    Name(String),
    Segments(Vec<String>),
}

impl From<&str> for FieldInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

impl FieldInput {
    fn display(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Segments(segments) => format!("[{}]", segments.join(", ")),
        }
    }
}

///
/// IndexSpec
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IndexSpec {
    pub target: IndexTarget,
    pub kind_name: String,
    pub fields: Vec<FieldInput>,
    pub covering_fields: Vec<FieldInput>,
    pub unique: bool,
    pub scope: IndexScope,
    pub direction: EdgeIndexDirection,
    pub where_clause: Option<Predicate>,
    pub name: Option<String>,
}

impl IndexSpec {
    #[must_use]
    pub fn node(kind_name: impl Into<String>) -> Self {
        Self {
            target: IndexTarget::Node,
            kind_name: kind_name.into(),
            fields: Vec::new(),
            covering_fields: Vec::new(),
            unique: false,
            scope: IndexScope::default(),
            direction: EdgeIndexDirection::None,
            where_clause: None,
            name: None,
        }
    }

    #[must_use]
    pub fn edge(kind_name: impl Into<String>) -> Self {
        Self {
            target: IndexTarget::Edge,
            ..Self::node(kind_name)
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<FieldInput>) -> Self {
        self.fields.push(field.into());
        self
    }

    #[must_use]
    pub fn with_covering_field(mut self, field: impl Into<FieldInput>) -> Self {
        self.covering_fields.push(field.into());
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn with_scope(mut self, scope: IndexScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn with_direction(mut self, direction: EdgeIndexDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_where(mut self, where_clause: Predicate) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

///
/// IndexDefinition
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IndexDefinition {
    pub target: IndexTarget,
    pub kind_name: String,
    pub fields: Vec<JsonPointer>,
    pub field_value_types: Vec<FieldTypeInfo>,
    pub covering_fields: Vec<JsonPointer>,
    pub covering_field_value_types: Vec<FieldTypeInfo>,
    pub unique: bool,
    pub scope: IndexScope,
    pub direction: EdgeIndexDirection,
    pub where_clause: Option<Predicate>,
    pub name: String,
}

/// Normalize and validate a declared index against the schema universe.
pub fn normalize_index(
    spec: &IndexSpec,
    introspector: &SchemaIntrospector,
) -> Result<IndexDefinition, IndexDefinitionError> {
    if spec.fields.is_empty() {
        return Err(IndexDefinitionError::EmptyFields {
            kind: spec.kind_name.clone(),
        });
    }

    let fields = normalize_field_list(spec, &spec.fields)?;
    let covering_fields = normalize_field_list(spec, &spec.covering_fields)?;

    let field_value_types = resolve_and_validate(spec, introspector, &fields)?;
    let covering_field_value_types = resolve_and_validate(spec, introspector, &covering_fields)?;

    ensure_unique(&fields, "key")?;
    ensure_unique(&covering_fields, "covering")?;
    let keys: BTreeSet<String> = fields.iter().map(JsonPointer::encoded).collect();
    for pointer in &covering_fields {
        if keys.contains(&pointer.encoded()) {
            return Err(IndexDefinitionError::CoveringOverlapsKey {
                pointer: pointer.encoded(),
            });
        }
    }

    if let Some(where_clause) = &spec.where_clause {
        ensure_self_contained(where_clause)?;
    }

    let direction = match spec.target {
        IndexTarget::Node => EdgeIndexDirection::None,
        IndexTarget::Edge => spec.direction,
    };
    let name = spec.name.clone().unwrap_or_else(|| {
        derive_index_name(
            spec.target,
            &spec.kind_name,
            &fields,
            &covering_fields,
            spec.unique,
            spec.scope,
            direction,
        )
    });

    Ok(IndexDefinition {
        target: spec.target,
        kind_name: spec.kind_name.clone(),
        fields,
        field_value_types,
        covering_fields,
        covering_field_value_types,
        unique: spec.unique,
        scope: spec.scope,
        direction,
        where_clause: spec.where_clause.clone(),
        name,
    })
}

fn normalize_field_list(
    spec: &IndexSpec,
    inputs: &[FieldInput],
) -> Result<Vec<JsonPointer>, IndexDefinitionError> {
    inputs
        .iter()
        .map(|input| normalize_field_input(spec, input))
        .collect()
}

fn normalize_field_input(
    spec: &IndexSpec,
    input: &FieldInput,
) -> Result<JsonPointer, IndexDefinitionError> {
    let result = match input {
        FieldInput::Name(name) if name.starts_with('/') => JsonPointer::parse(name),
        FieldInput::Name(name) => JsonPointer::from_segments(name.split('.')),
        FieldInput::Segments(segments) => JsonPointer::from_segments(segments.iter().cloned()),
    };

    result.map_err(|source| IndexDefinitionError::InvalidFieldPointer {
        kind: spec.kind_name.clone(),
        input: input.display(),
        source,
    })
}

fn resolve_and_validate(
    spec: &IndexSpec,
    introspector: &SchemaIntrospector,
    pointers: &[JsonPointer],
) -> Result<Vec<FieldTypeInfo>, IndexDefinitionError> {
    pointers
        .iter()
        .map(|pointer| {
            let info = introspector.resolve_pointer(
                spec.target.kind_space(),
                &spec.kind_name,
                pointer,
            )?;
            ensure_indexable(spec, pointer, info.value_type)?;
            Ok(info)
        })
        .collect()
}

fn ensure_indexable(
    spec: &IndexSpec,
    pointer: &JsonPointer,
    value_type: ValueType,
) -> Result<(), IndexDefinitionError> {
    if value_type.is_indexable() {
        return Ok(());
    }
    let advice = match value_type {
        ValueType::Embedding => "declare a vector index instead",
        _ => "use a GIN or JSON index strategy instead",
    };

    Err(IndexDefinitionError::UnindexableField {
        kind: spec.kind_name.clone(),
        pointer: pointer.encoded(),
        value_type,
        advice,
    })
}

fn ensure_unique(
    pointers: &[JsonPointer],
    list: &'static str,
) -> Result<(), IndexDefinitionError> {
    let mut seen = BTreeSet::new();
    for pointer in pointers {
        if !seen.insert(pointer.encoded()) {
            return Err(IndexDefinitionError::DuplicateField {
                pointer: pointer.encoded(),
                list,
            });
        }
    }

    Ok(())
}

/// Where-clauses reference the indexed table only: no subqueries, no
/// vector constraints, no aggregates.
fn ensure_self_contained(predicate: &Predicate) -> Result<(), IndexDefinitionError> {
    match predicate {
        Predicate::Exists { .. }
        | Predicate::InSubquery { .. }
        | Predicate::VectorSimilarity(_)
        | Predicate::AggregateCompare { .. } => Err(IndexDefinitionError::WhereNotSelfContained),
        Predicate::And(children) | Predicate::Or(children) => {
            children.iter().try_for_each(ensure_self_contained)
        }
        Predicate::Not(inner) => ensure_self_contained(inner),
        _ => Ok(()),
    }
}
