use crate::{
    ast::{Literal, VectorMetric},
    dialect::{
        Dialect, DialectCapabilities, DialectName, PlaceholderStyle, SqlExpr,
        VectorPredicateStrategy, embedding_literal,
    },
    error::CompileError,
};
use serde_json::Value as Json;
use typegraph_schema::JsonPointer;

///
/// Postgres
///
/// PostgreSQL adapter: `jsonb` extraction via `#>`/`#>>` with a stable
/// `'{"a","b"}'` path encoding, typed casts, `@>` containment, native
/// ILIKE, array-typed path accumulation, and pgvector distance operators.
///

#[derive(Clone, Debug)]
pub struct Postgres {
    capabilities: DialectCapabilities,
}

impl Default for Postgres {
    fn default() -> Self {
        Self::new()
    }
}

impl Postgres {
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: DialectCapabilities {
                vector_predicate_strategy: VectorPredicateStrategy::Native,
                vector_metrics: &[
                    VectorMetric::Cosine,
                    VectorMetric::L2,
                    VectorMetric::InnerProduct,
                ],
                supports_ilike: true,
            },
        }
    }

    fn extract(&self, col: &str, pointer: &JsonPointer, as_text: bool) -> String {
        let op = if as_text { "#>>" } else { "#>" };
        format!("({col} {op} {})", self.compile_path(pointer))
    }

    fn casted(&self, col: &str, pointer: &JsonPointer, cast: &str) -> SqlExpr {
        SqlExpr::raw(format!("{}::{cast}", self.extract(col, pointer, true)))
    }

    fn quote_string(text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }
}

impl Dialect for Postgres {
    fn name(&self) -> DialectName {
        DialectName::Postgres
    }

    fn capabilities(&self) -> &DialectCapabilities {
        &self.capabilities
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Numbered
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn boolean_literal(&self, value: bool) -> SqlExpr {
        SqlExpr::raw(if value { "TRUE" } else { "FALSE" })
    }

    fn current_timestamp(&self) -> SqlExpr {
        SqlExpr::raw("CURRENT_TIMESTAMP")
    }

    fn compile_path(&self, pointer: &JsonPointer) -> String {
        let segments: Vec<String> = pointer
            .segments()
            .iter()
            .map(|segment| {
                format!(
                    "\"{}\"",
                    segment.replace('\\', "\\\\").replace('"', "\\\"")
                )
            })
            .collect();
        format!("'{{{}}}'", segments.join(","))
    }

    fn json_extract(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(self.extract(col, pointer, false))
    }

    fn json_extract_text(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(self.extract(col, pointer, true))
    }

    fn json_extract_number(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        self.casted(col, pointer, "numeric")
    }

    fn json_extract_boolean(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        self.casted(col, pointer, "boolean")
    }

    fn json_extract_date(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        self.casted(col, pointer, "timestamptz")
    }

    fn json_array_length(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!(
            "jsonb_array_length({})",
            self.extract(col, pointer, false)
        ))
    }

    fn json_array_contains(&self, col: &str, pointer: &JsonPointer, value: &Literal) -> SqlExpr {
        self.json_array_contains_all(col, pointer, std::slice::from_ref(value))
    }

    fn json_array_contains_all(
        &self,
        col: &str,
        pointer: &JsonPointer,
        values: &[Literal],
    ) -> SqlExpr {
        let payload = Json::Array(values.iter().map(|v| v.value.clone()).collect());

        SqlExpr::seq([
            SqlExpr::raw(format!("{} @> ", self.extract(col, pointer, false))),
            SqlExpr::bind(Literal::json(payload)),
            SqlExpr::raw("::jsonb"),
        ])
    }

    fn json_array_contains_any(
        &self,
        col: &str,
        pointer: &JsonPointer,
        values: &[Literal],
    ) -> SqlExpr {
        let payload = Json::Array(values.iter().map(|v| v.value.clone()).collect());

        SqlExpr::seq([
            SqlExpr::raw(format!(
                "EXISTS (SELECT 1 FROM jsonb_array_elements({}) AS elem(value) \
                 WHERE elem.value IN (SELECT jsonb_array_elements(",
                self.extract(col, pointer, false)
            )),
            SqlExpr::bind(Literal::json(payload)),
            SqlExpr::raw("::jsonb)))"),
        ])
    }

    fn json_path_equals(&self, col: &str, pointer: &JsonPointer, value: &Literal) -> SqlExpr {
        SqlExpr::seq([
            SqlExpr::raw(format!("{} = ", self.extract(col, pointer, false))),
            SqlExpr::bind(Literal::json(value.value.clone())),
            SqlExpr::raw("::jsonb"),
        ])
    }

    fn json_has_key(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        match pointer.last_segment() {
            Some(key) => SqlExpr::raw(format!(
                "{} ? {}",
                self.extract(col, &pointer.parent(), false),
                Self::quote_string(key)
            )),
            None => self.json_has_path(col, pointer),
        }
    }

    fn json_has_path(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!("{} IS NOT NULL", self.extract(col, pointer, false)))
    }

    fn json_path_is_null(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!(
            "{} = 'null'::jsonb",
            self.extract(col, pointer, false)
        ))
    }

    fn json_path_is_not_null(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        let extracted = self.extract(col, pointer, false);

        SqlExpr::raw(format!(
            "({extracted} IS NOT NULL AND {extracted} <> 'null'::jsonb)"
        ))
    }

    fn ilike(&self, col: &str, pattern: Literal) -> SqlExpr {
        SqlExpr::seq([
            SqlExpr::raw(format!("{col} ILIKE ")),
            SqlExpr::bind(pattern),
        ])
    }

    fn initialize_path(&self, id: &str) -> SqlExpr {
        SqlExpr::raw(format!("ARRAY[{id}]"))
    }

    fn extend_path(&self, path: &str, id: &str) -> SqlExpr {
        SqlExpr::raw(format!("{path} || {id}"))
    }

    fn cycle_check(&self, id: &str, path: &str) -> SqlExpr {
        SqlExpr::raw(format!("NOT ({id} = ANY({path}))"))
    }

    fn supports_vectors(&self) -> bool {
        true
    }

    fn vector_distance(
        &self,
        col: &str,
        embedding: &[f64],
        metric: VectorMetric,
    ) -> Result<SqlExpr, CompileError> {
        let operator = match metric {
            VectorMetric::Cosine => "<=>",
            VectorMetric::L2 => "<->",
            // pgvector's `<#>` is negative inner product, so smaller is
            // still more similar.
            VectorMetric::InnerProduct => "<#>",
        };
        let formatted = self.format_embedding(embedding)?;

        Ok(SqlExpr::seq([
            SqlExpr::raw(format!("{col} {operator} ")),
            SqlExpr::bind(embedding_literal(formatted)),
            SqlExpr::raw("::vector"),
        ]))
    }
}
