use crate::{
    ast::{Literal, VectorMetric},
    dialect::{
        Dialect, DialectCapabilities, DialectName, PlaceholderStyle, SqlExpr,
        VectorPredicateStrategy, embedding_literal,
    },
    error::{CompileError, DialectCapabilityError},
};
use typegraph_schema::{JsonPointer, pointer::is_array_index};

///
/// Sqlite
///
/// SQLite adapter targeting the JSON1 functions plus the `sqlite-vec`
/// extension: `json_extract` with a stable `'$."a"."b"'` path encoding,
/// `json_each` containment scans, lower-cased LIKE in place of ILIKE,
/// JSON-array path accumulation, and `vec_distance_*` functions.
///

#[derive(Clone, Debug)]
pub struct Sqlite {
    capabilities: DialectCapabilities,
}

impl Default for Sqlite {
    fn default() -> Self {
        Self::new()
    }
}

impl Sqlite {
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: DialectCapabilities {
                vector_predicate_strategy: VectorPredicateStrategy::Native,
                vector_metrics: &[VectorMetric::Cosine, VectorMetric::L2],
                supports_ilike: false,
            },
        }
    }

    fn extract(&self, col: &str, pointer: &JsonPointer) -> String {
        format!("json_extract({col}, {})", self.compile_path(pointer))
    }

    fn json_type(&self, col: &str, pointer: &JsonPointer) -> String {
        format!("json_type({col}, {})", self.compile_path(pointer))
    }
}

impl Dialect for Sqlite {
    fn name(&self) -> DialectName {
        DialectName::Sqlite
    }

    fn capabilities(&self) -> &DialectCapabilities {
        &self.capabilities
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Positional
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn boolean_literal(&self, value: bool) -> SqlExpr {
        SqlExpr::raw(if value { "1" } else { "0" })
    }

    fn current_timestamp(&self) -> SqlExpr {
        SqlExpr::raw("CURRENT_TIMESTAMP")
    }

    fn compile_path(&self, pointer: &JsonPointer) -> String {
        let mut path = String::from("$");
        for segment in pointer.segments() {
            if is_array_index(segment) {
                path.push('[');
                path.push_str(segment);
                path.push(']');
            } else {
                path.push_str(".\"");
                path.push_str(segment);
                path.push('"');
            }
        }
        format!("'{}'", path.replace('\'', "''"))
    }

    fn json_extract(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(self.extract(col, pointer))
    }

    fn json_extract_text(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        // JSON1 extracts strings as bare TEXT already.
        SqlExpr::raw(self.extract(col, pointer))
    }

    fn json_extract_number(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!("CAST({} AS REAL)", self.extract(col, pointer)))
    }

    fn json_extract_boolean(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        // JSON booleans surface as 0/1.
        SqlExpr::raw(self.extract(col, pointer))
    }

    fn json_extract_date(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!("datetime({})", self.extract(col, pointer)))
    }

    fn json_array_length(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!(
            "json_array_length({col}, {})",
            self.compile_path(pointer)
        ))
    }

    fn json_array_contains(&self, col: &str, pointer: &JsonPointer, value: &Literal) -> SqlExpr {
        SqlExpr::seq([
            SqlExpr::raw(format!(
                "EXISTS (SELECT 1 FROM json_each({col}, {}) WHERE json_each.value = ",
                self.compile_path(pointer)
            )),
            SqlExpr::bind(value.clone()),
            SqlExpr::raw(")"),
        ])
    }

    fn json_array_contains_all(
        &self,
        col: &str,
        pointer: &JsonPointer,
        values: &[Literal],
    ) -> SqlExpr {
        SqlExpr::join(
            values
                .iter()
                .map(|value| self.json_array_contains(col, pointer, value)),
            " AND ",
        )
        .grouped()
    }

    fn json_array_contains_any(
        &self,
        col: &str,
        pointer: &JsonPointer,
        values: &[Literal],
    ) -> SqlExpr {
        let placeholders =
            SqlExpr::join(values.iter().map(|value| SqlExpr::bind(value.clone())), ", ");

        SqlExpr::seq([
            SqlExpr::raw(format!(
                "EXISTS (SELECT 1 FROM json_each({col}, {}) WHERE json_each.value IN (",
                self.compile_path(pointer)
            )),
            placeholders,
            SqlExpr::raw("))"),
        ])
    }

    fn json_path_equals(&self, col: &str, pointer: &JsonPointer, value: &Literal) -> SqlExpr {
        // `json(?)` minifies the bound payload so both sides compare in
        // the extractor's canonical text form.
        SqlExpr::seq([
            SqlExpr::raw(format!("{} = json(", self.extract(col, pointer))),
            SqlExpr::bind(Literal::json(value.value.clone())),
            SqlExpr::raw(")"),
        ])
    }

    fn json_has_key(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        self.json_has_path(col, pointer)
    }

    fn json_has_path(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!("{} IS NOT NULL", self.json_type(col, pointer)))
    }

    fn json_path_is_null(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        SqlExpr::raw(format!("{} = 'null'", self.json_type(col, pointer)))
    }

    fn json_path_is_not_null(&self, col: &str, pointer: &JsonPointer) -> SqlExpr {
        let probe = self.json_type(col, pointer);

        SqlExpr::raw(format!("({probe} IS NOT NULL AND {probe} <> 'null')"))
    }

    fn ilike(&self, col: &str, pattern: Literal) -> SqlExpr {
        SqlExpr::seq([
            SqlExpr::raw(format!("lower({col}) LIKE lower(")),
            SqlExpr::bind(pattern),
            SqlExpr::raw(")"),
        ])
    }

    fn initialize_path(&self, id: &str) -> SqlExpr {
        SqlExpr::raw(format!("json_array({id})"))
    }

    fn extend_path(&self, path: &str, id: &str) -> SqlExpr {
        SqlExpr::raw(format!("json_insert({path}, '$[#]', {id})"))
    }

    fn cycle_check(&self, id: &str, path: &str) -> SqlExpr {
        SqlExpr::raw(format!(
            "NOT EXISTS (SELECT 1 FROM json_each({path}) WHERE json_each.value = {id})"
        ))
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
        let function = match metric {
            VectorMetric::Cosine => "vec_distance_cosine",
            VectorMetric::L2 => "vec_distance_l2",
            VectorMetric::InnerProduct => {
                return Err(DialectCapabilityError::MetricUnsupported {
                    dialect: self.name().to_string(),
                    metric,
                }
                .into());
            }
        };
        let formatted = self.format_embedding(embedding)?;

        Ok(SqlExpr::seq([
            SqlExpr::raw(format!("{function}({col}, ")),
            SqlExpr::bind(embedding_literal(formatted)),
            SqlExpr::raw(")"),
        ]))
    }
}
