use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Direction
///
/// Which way an edge is walked relative to the joined-from node.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Out,
    In,
}

///
/// EdgeEndpoint
///
/// The edge column the join-from alias equates against.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeEndpoint {
    FromId,
    ToId,
}

impl EdgeEndpoint {
    /// Physical column name on the edge table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::FromId => "from_id",
            Self::ToId => "to_id",
        }
    }

    /// The opposite endpoint, where the target node attaches.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::FromId => Self::ToId,
            Self::ToId => Self::FromId,
        }
    }
}

impl fmt::Display for EdgeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

///
/// CyclePolicy
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    Prevent,
    Allow,
}

///
/// VariableLengthSpec
///
/// Min/max hop bounds for a recursive expansion, plus optional aliases for
/// the accumulated path and depth columns.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VariableLengthSpec {
    pub min_depth: u32,
    pub max_depth: u32,
    pub cycle_policy: CyclePolicy,
    pub path_alias: Option<String>,
    pub depth_alias: Option<String>,
}

///
/// Traversal
///
/// One hop from `join_from_alias` across `edge_kinds` to `node_alias`.
/// `inverse_edge_kinds` holds symmetric/inverse expansion results supplied
/// by the caller; the compiler consumes already-expanded kind lists.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Traversal {
    pub edge_alias: String,
    pub edge_kinds: Vec<String>,
    pub inverse_edge_kinds: Vec<String>,
    pub direction: Direction,
    pub node_alias: String,
    pub node_kinds: Vec<String>,
    pub join_from_alias: String,
    pub join_edge_field: EdgeEndpoint,
    pub optional: bool,
    pub variable_length: Option<VariableLengthSpec>,
}

impl Traversal {
    /// A required out-traversal with the conventional join shape.
    #[must_use]
    pub fn out(
        join_from_alias: impl Into<String>,
        edge_alias: impl Into<String>,
        edge_kinds: Vec<String>,
        node_alias: impl Into<String>,
        node_kinds: Vec<String>,
    ) -> Self {
        Self {
            edge_alias: edge_alias.into(),
            edge_kinds,
            inverse_edge_kinds: Vec::new(),
            direction: Direction::Out,
            node_alias: node_alias.into(),
            node_kinds,
            join_from_alias: join_from_alias.into(),
            join_edge_field: EdgeEndpoint::FromId,
            optional: false,
            variable_length: None,
        }
    }

    #[must_use]
    pub fn with_variable_length(mut self, spec: VariableLengthSpec) -> Self {
        self.variable_length = Some(spec);
        self
    }

    #[must_use]
    pub const fn is_variable_length(&self) -> bool {
        self.variable_length.is_some()
    }
}
