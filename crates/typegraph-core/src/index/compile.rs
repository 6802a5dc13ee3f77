use crate::{
    compile::ExpressionCompiler,
    dialect::{Dialect, SqlExpr},
    error::{CompileError, CompilerInvariantError},
    index::definition::{IndexDefinition, IndexTarget},
};
use typegraph_schema::{JsonPointer, ValueType};

///
/// Index-key compilation
///
/// Emits the physical key expression list for an index: the
/// scope-determined system columns first in fixed order, then every key
/// pointer, then every covering pointer, each through the dialect's
/// typed JSON extractor. The extractor selection matches query-time
/// field compilation exactly, which is what lets the planner match
/// physical indexes against query expressions.
///

pub fn compile_index_keys(
    definition: &IndexDefinition,
    dialect: &dyn Dialect,
) -> Result<Vec<SqlExpr>, CompileError> {
    let mut expressions = Vec::new();
    for column in definition.scope.columns() {
        expressions.push(SqlExpr::raw(dialect.quote_identifier(column)));
    }
    if definition.target == IndexTarget::Edge {
        if let Some(column) = definition.direction.column() {
            expressions.push(SqlExpr::raw(dialect.quote_identifier(column)));
        }
    }

    let props = dialect.quote_identifier("props");
    let entries = definition
        .fields
        .iter()
        .zip(&definition.field_value_types)
        .chain(
            definition
                .covering_fields
                .iter()
                .zip(&definition.covering_field_value_types),
        );
    for (pointer, info) in entries {
        expressions.push(key_extractor(dialect, &props, pointer, info.value_type)?);
    }

    Ok(expressions)
}

/// Compile the optional partial-index predicate.
pub fn compile_index_where(
    definition: &IndexDefinition,
    dialect: &dyn Dialect,
) -> Result<Option<SqlExpr>, CompileError> {
    let Some(where_clause) = &definition.where_clause else {
        return Ok(None);
    };
    let compiler = ExpressionCompiler::new(dialect);

    Ok(Some(compiler.compile_predicate(where_clause)?))
}

fn key_extractor(
    dialect: &dyn Dialect,
    props: &str,
    pointer: &JsonPointer,
    value_type: ValueType,
) -> Result<SqlExpr, CompileError> {
    match value_type {
        ValueType::Number => Ok(dialect.json_extract_number(props, pointer)),
        ValueType::Boolean => Ok(dialect.json_extract_boolean(props, pointer)),
        ValueType::Date => Ok(dialect.json_extract_date(props, pointer)),
        ValueType::String | ValueType::Unknown => Ok(dialect.json_extract_text(props, pointer)),
        // Validation rejects these up front; reaching here is a compiler
        // defect, not a silent fallback.
        ValueType::Array | ValueType::Object | ValueType::Embedding => {
            Err(CompilerInvariantError::UnindexableKeyCompiled {
                pointer: pointer.encoded(),
                value_type,
            }
            .into())
        }
    }
}
