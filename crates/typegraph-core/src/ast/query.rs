use crate::ast::{
    field::FieldRef,
    predicate::{AggregateExpr, Predicate},
    traversal::Traversal,
};
use serde::{Deserialize, Serialize};

///
/// Query AST
///
/// The immutable root of one composable query. Construction is
/// declarative; no validation happens here. The compiler never mutates a
/// built AST; passes communicate through separate state.
///

///
/// StartNode
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StartNode {
    pub alias: String,
    pub kinds: Vec<String>,
    pub include_sub_classes: bool,
}

///
/// TargetType
///
/// Disambiguates whether a predicate target alias names a node or an edge
/// table when the alias alone is ambiguous.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Node,
    Edge,
}

///
/// PredicateTarget
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PredicateTarget {
    pub target_alias: String,
    pub target_type: Option<TargetType>,
    pub expression: Predicate,
}

///
/// ProjectionSource
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ProjectionSource {
    Field(FieldRef),
    Aggregate(AggregateExpr),
}

///
/// ProjectionField
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProjectionField {
    pub output_name: String,
    pub source: ProjectionSource,
    pub cte_alias: Option<String>,
}

///
/// Projection
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Projection {
    pub fields: Vec<ProjectionField>,
}

///
/// TemporalMode
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalMode {
    /// Rows valid at the shared reference timestamp (now).
    #[default]
    Current,
    /// Rows valid at an explicit timestamp.
    AsOf,
    /// No temporal filtering.
    All,
}

///
/// TemporalSpec
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TemporalSpec {
    pub mode: TemporalMode,
    /// ISO-8601 reference timestamp, required when `mode` is `AsOf`.
    pub as_of: Option<String>,
}

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

///
/// OrderKey
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderKey {
    pub field: FieldRef,
    pub direction: SortDirection,
}

///
/// QueryAst
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct QueryAst {
    pub graph_id: Option<String>,
    pub start: StartNode,
    pub traversals: Vec<Traversal>,
    pub predicates: Vec<PredicateTarget>,
    pub projection: Projection,
    pub temporal: TemporalSpec,
    pub order_by: Vec<OrderKey>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub group_by: Vec<FieldRef>,
    pub having: Option<Predicate>,
    /// Narrow column list overriding the projection when present.
    pub selective_fields: Option<Vec<String>>,
}

impl QueryAst {
    /// Minimal query over one start alias; everything else attaches via
    /// struct update or the fluent helpers.
    #[must_use]
    pub fn new(alias: impl Into<String>, kinds: Vec<String>) -> Self {
        Self {
            graph_id: None,
            start: StartNode {
                alias: alias.into(),
                kinds,
                include_sub_classes: false,
            },
            traversals: Vec::new(),
            predicates: Vec::new(),
            projection: Projection::default(),
            temporal: TemporalSpec::default(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            group_by: Vec::new(),
            having: None,
            selective_fields: None,
        }
    }

    #[must_use]
    pub fn with_predicate(mut self, target_alias: impl Into<String>, expression: Predicate) -> Self {
        self.predicates.push(PredicateTarget {
            target_alias: target_alias.into(),
            target_type: None,
            expression,
        });
        self
    }

    #[must_use]
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversals.push(traversal);
        self
    }

    #[must_use]
    pub fn with_projection_field(
        mut self,
        output_name: impl Into<String>,
        source: ProjectionSource,
    ) -> Self {
        self.projection.fields.push(ProjectionField {
            output_name: output_name.into(),
            source,
            cte_alias: None,
        });
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Predicate expressions targeting the given alias.
    pub fn predicates_for(&self, alias: &str) -> impl Iterator<Item = &Predicate> {
        self.predicates
            .iter()
            .filter(move |target| target.target_alias == alias)
            .map(|target| &target.expression)
    }
}
