use serde::{Deserialize, Serialize};
use typegraph_schema::ValueType;

///
/// System columns
///
/// The row-table columns recognized outside the `props` document, by
/// their logical (builder-facing) and physical (snake_case) names.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SystemColumn {
    pub logical: &'static str,
    pub physical: &'static str,
    pub value_type: ValueType,
}

const fn col(logical: &'static str, physical: &'static str, value_type: ValueType) -> SystemColumn {
    SystemColumn {
        logical,
        physical,
        value_type,
    }
}

const SHARED_COLUMNS: [SystemColumn; 8] = [
    col("graphId", "graph_id", ValueType::String),
    col("kind", "kind", ValueType::String),
    col("id", "id", ValueType::String),
    col("createdAt", "created_at", ValueType::Date),
    col("updatedAt", "updated_at", ValueType::Date),
    col("deletedAt", "deleted_at", ValueType::Date),
    col("validFrom", "valid_from", ValueType::Date),
    col("validTo", "valid_to", ValueType::Date),
];

pub const NODE_SYSTEM_COLUMNS: [SystemColumn; 9] = [
    SHARED_COLUMNS[0],
    SHARED_COLUMNS[1],
    SHARED_COLUMNS[2],
    SHARED_COLUMNS[3],
    SHARED_COLUMNS[4],
    SHARED_COLUMNS[5],
    SHARED_COLUMNS[6],
    SHARED_COLUMNS[7],
    col("version", "version", ValueType::Number),
];

pub const EDGE_SYSTEM_COLUMNS: [SystemColumn; 12] = [
    SHARED_COLUMNS[0],
    SHARED_COLUMNS[1],
    SHARED_COLUMNS[2],
    col("fromKind", "from_kind", ValueType::String),
    col("fromId", "from_id", ValueType::String),
    col("toKind", "to_kind", ValueType::String),
    col("toId", "to_id", ValueType::String),
    SHARED_COLUMNS[3],
    SHARED_COLUMNS[4],
    SHARED_COLUMNS[5],
    SHARED_COLUMNS[6],
    SHARED_COLUMNS[7],
];

#[must_use]
pub fn node_system_column(logical: &str) -> Option<&'static SystemColumn> {
    NODE_SYSTEM_COLUMNS.iter().find(|c| c.logical == logical)
}

#[must_use]
pub fn edge_system_column(logical: &str) -> Option<&'static SystemColumn> {
    EDGE_SYSTEM_COLUMNS.iter().find(|c| c.logical == logical)
}

///
/// IndexScope
///
/// Which leading system columns an index keys on.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexScope {
    #[default]
    GraphAndKind,
    Graph,
    None,
}

impl IndexScope {
    /// The leading physical key columns, in fixed order.
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::GraphAndKind => &["graph_id", "kind"],
            Self::Graph => &["graph_id"],
            Self::None => &[],
        }
    }
}

///
/// EdgeIndexDirection
///
/// Which endpoint column an edge index appends after the scope columns.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeIndexDirection {
    Out,
    In,
    #[default]
    None,
}

impl EdgeIndexDirection {
    #[must_use]
    pub const fn column(self) -> Option<&'static str> {
        match self {
            Self::Out => Some("from_id"),
            Self::In => Some("to_id"),
            Self::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeIndexDirection, IndexScope, edge_system_column, node_system_column};
    use typegraph_schema::ValueType;

    #[test]
    fn node_columns_include_version_but_edges_do_not() {
        assert_eq!(
            node_system_column("version").unwrap().value_type,
            ValueType::Number
        );
        assert!(edge_system_column("version").is_none());
    }

    #[test]
    fn edge_endpoint_columns_are_strings() {
        for logical in ["fromKind", "fromId", "toKind", "toId"] {
            assert_eq!(
                edge_system_column(logical).unwrap().value_type,
                ValueType::String
            );
        }
    }

    #[test]
    fn meta_keys_map_to_snake_case_dates() {
        let column = node_system_column("validFrom").unwrap();

        assert_eq!(column.physical, "valid_from");
        assert_eq!(column.value_type, ValueType::Date);
    }

    #[test]
    fn scope_column_order_is_fixed() {
        assert_eq!(IndexScope::GraphAndKind.columns(), ["graph_id", "kind"]);
        assert_eq!(IndexScope::Graph.columns(), ["graph_id"]);
        assert!(IndexScope::None.columns().is_empty());
    }

    #[test]
    fn direction_appends_one_endpoint() {
        assert_eq!(EdgeIndexDirection::Out.column(), Some("from_id"));
        assert_eq!(EdgeIndexDirection::In.column(), Some("to_id"));
        assert_eq!(EdgeIndexDirection::None.column(), None);
    }
}
