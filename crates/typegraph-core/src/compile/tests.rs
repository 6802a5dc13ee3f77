use crate::{
    ast::{
        FieldRef, Predicate, ProjectionSource, QueryAst, QueryExpr, TemporalMode, VectorMetric,
    },
    builder::{ArrayField, EmbeddingField, NumberField, ObjectField, StringField, in_subquery},
    compile::{
        CompileState, ExpressionCompiler, LimitPass, SubqueryRenderer, TemporalPass, VectorPass,
        run,
    },
    dialect::{PlaceholderStyle, Postgres, Sqlite, SqlExpr},
    error::{CompileError, CompilerInvariantError, DialectCapabilityError},
};
use typegraph_schema::{FieldTypeInfo, JsonPointer, ValueType};

fn props_field(alias: &str, name: &str, value_type: ValueType) -> FieldRef {
    FieldRef::typed_props(
        alias,
        JsonPointer::from_segments([name]).unwrap(),
        FieldTypeInfo::new(value_type),
    )
}

fn name_field() -> StringField {
    StringField::new(props_field("p", "name", ValueType::String))
}

fn age_field() -> NumberField {
    NumberField::new(props_field("p", "age", ValueType::Number))
}

fn tags_field() -> ArrayField {
    ArrayField::new(FieldRef::typed_props(
        "p",
        JsonPointer::from_segments(["tags"]).unwrap(),
        FieldTypeInfo::array_of(ValueType::String),
    ))
}

fn nearest(limit: u64) -> Predicate {
    EmbeddingField::new(props_field("p", "embedding", ValueType::Embedding))
        .nearest(vec![0.1, 0.2], VectorMetric::Cosine, limit)
        .build()
        .into()
}

fn query_with(predicate: Predicate) -> QueryAst {
    QueryAst::new("p", vec!["Person".to_string()]).with_predicate("p", predicate)
}

// ----------------------------------------------------------------------
// Vector pass
// ----------------------------------------------------------------------

#[test]
fn vector_pass_accepts_a_single_conjunctive_predicate() {
    let dialect = Postgres::new();
    let state = CompileState::new(query_with(nearest(8)));
    let state = run(&VectorPass { dialect: &dialect }, state).unwrap();

    assert_eq!(state.vector.as_ref().map(|v| v.limit), Some(8));
}

#[test]
fn vector_under_or_is_rejected() {
    let dialect = Postgres::new();
    let guarded = crate::builder::Expr::new(nearest(8))
        .or(&name_field().eq("x").unwrap())
        .into_predicate();
    let state = CompileState::new(query_with(guarded));

    assert!(matches!(
        run(&VectorPass { dialect: &dialect }, state),
        Err(CompileError::Invariant(
            CompilerInvariantError::VectorUnderOrNot
        ))
    ));
}

#[test]
fn vector_under_not_is_rejected() {
    let dialect = Postgres::new();
    let negated = crate::builder::Expr::new(nearest(8)).not().into_predicate();
    let state = CompileState::new(query_with(negated));

    assert!(run(&VectorPass { dialect: &dialect }, state).is_err());
}

#[test]
fn multiple_vector_predicates_are_rejected() {
    let dialect = Postgres::new();
    let ast = query_with(nearest(8)).with_predicate("p", nearest(4));
    let state = CompileState::new(ast);

    assert!(matches!(
        run(&VectorPass { dialect: &dialect }, state),
        Err(CompileError::Invariant(
            CompilerInvariantError::MultipleVectorPredicates { count: 2 }
        ))
    ));
}

#[test]
fn unsupported_metric_is_a_capability_error() {
    let dialect = Sqlite::new();
    let inner = EmbeddingField::new(props_field("p", "embedding", ValueType::Embedding))
        .nearest(vec![0.1], VectorMetric::InnerProduct, 8)
        .build()
        .into();
    let state = CompileState::new(query_with(inner));

    assert!(matches!(
        run(&VectorPass { dialect: &dialect }, state),
        Err(CompileError::DialectCapability(
            DialectCapabilityError::MetricUnsupported { .. }
        ))
    ));
}

#[test]
fn zero_limit_is_rejected() {
    let dialect = Postgres::new();
    let state = CompileState::new(query_with(nearest(0)));

    assert!(matches!(
        run(&VectorPass { dialect: &dialect }, state),
        Err(CompileError::Invariant(
            CompilerInvariantError::InvalidVectorLimit
        ))
    ));
}

#[test]
fn cosine_floor_outside_range_is_rejected() {
    let dialect = Postgres::new();
    let predicate = EmbeddingField::new(props_field("p", "embedding", ValueType::Embedding))
        .nearest(vec![0.1], VectorMetric::Cosine, 8)
        .min_score(1.5)
        .build()
        .into();
    let state = CompileState::new(query_with(predicate));

    assert!(matches!(
        run(&VectorPass { dialect: &dialect }, state),
        Err(CompileError::Invariant(
            CompilerInvariantError::InvalidMinScore { .. }
        ))
    ));
}

#[test]
fn limit_pass_consumes_vector_output() {
    let dialect = Postgres::new();
    let state = CompileState::new(query_with(nearest(8)).with_limit(25));
    let state = run(&VectorPass { dialect: &dialect }, state).unwrap();
    let state = run(&LimitPass, state).unwrap();

    assert_eq!(state.effective_limit, Some(8));
}

// ----------------------------------------------------------------------
// Temporal pass
// ----------------------------------------------------------------------

#[test]
fn current_mode_shares_one_timestamp_across_aliases() {
    let dialect = Postgres::new();
    let state = CompileState::new(QueryAst::new("p", vec!["Person".to_string()]));
    let state = run(&TemporalPass { dialect: &dialect }, state).unwrap();
    let filter = state.temporal.unwrap();

    let for_p = filter
        .for_alias(&dialect, Some("p"))
        .unwrap()
        .render(PlaceholderStyle::Numbered);
    let for_f = filter
        .for_alias(&dialect, Some("f"))
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert!(for_p.sql.contains("\"p\".\"valid_from\" <= CURRENT_TIMESTAMP"));
    assert!(for_p.sql.contains("\"p\".\"deleted_at\" IS NULL"));
    assert!(for_f.sql.contains("\"f\".\"valid_from\" <= CURRENT_TIMESTAMP"));
}

#[test]
fn as_of_mode_binds_the_reference_instant_once() {
    let dialect = Sqlite::new();
    let mut ast = QueryAst::new("p", vec!["Person".to_string()]);
    ast.temporal.mode = TemporalMode::AsOf;
    ast.temporal.as_of = Some("2024-01-01T00:00:00Z".to_string());
    let state = run(&TemporalPass { dialect: &dialect }, CompileState::new(ast)).unwrap();
    let fragment = state
        .temporal
        .unwrap()
        .for_alias(&dialect, Some("p"))
        .unwrap()
        .render(PlaceholderStyle::Positional);

    // One bound instant reused for both interval ends.
    assert_eq!(fragment.binds.len(), 2);
    assert_eq!(fragment.binds[0], fragment.binds[1]);
}

#[test]
fn as_of_without_timestamp_is_rejected() {
    let dialect = Postgres::new();
    let mut ast = QueryAst::new("p", vec!["Person".to_string()]);
    ast.temporal.mode = TemporalMode::AsOf;

    assert!(matches!(
        run(&TemporalPass { dialect: &dialect }, CompileState::new(ast)),
        Err(CompileError::Invariant(CompilerInvariantError::MissingAsOf))
    ));
}

#[test]
fn all_mode_emits_no_filter() {
    let dialect = Postgres::new();
    let mut ast = QueryAst::new("p", vec!["Person".to_string()]);
    ast.temporal.mode = TemporalMode::All;
    let state = run(&TemporalPass { dialect: &dialect }, CompileState::new(ast)).unwrap();

    assert!(state.temporal.unwrap().for_alias(&dialect, Some("p")).is_none());
}

// ----------------------------------------------------------------------
// Expression compilation
// ----------------------------------------------------------------------

#[test]
fn comparisons_render_typed_extraction_and_binds() {
    let dialect = Postgres::new();
    let compiler = ExpressionCompiler::new(&dialect);
    let predicate = age_field().gte(21i64).unwrap().into_predicate();
    let fragment = compiler
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert_eq!(
        fragment.sql,
        "(\"p\".\"props\" #>> '{\"age\"}')::numeric >= $1"
    );
    assert_eq!(fragment.binds.len(), 1);
}

#[test]
fn contains_escapes_like_wildcards() {
    let dialect = Sqlite::new();
    let compiler = ExpressionCompiler::new(&dialect);
    let predicate = name_field().contains("50%_off").into_predicate();
    let fragment = compiler
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Positional);

    assert!(fragment.sql.ends_with("LIKE ? ESCAPE '\\'"));
    let crate::dialect::BindArg::Literal(bound) = &fragment.binds[0] else {
        panic!("expected literal bind");
    };
    assert_eq!(bound.as_text(), "%50\\%\\_off%");
}

#[test]
fn empty_membership_lists_have_constant_truth() {
    let dialect = Postgres::new();
    let compiler = ExpressionCompiler::new(&dialect);
    let none: [i64; 0] = [];
    let in_empty = age_field().in_list(none).unwrap().into_predicate();
    let not_in_empty = age_field().not_in_list(none).unwrap().into_predicate();

    assert_eq!(
        compiler
            .compile_predicate(&in_empty)
            .unwrap()
            .render(PlaceholderStyle::Numbered)
            .sql,
        "FALSE"
    );
    assert_eq!(
        compiler
            .compile_predicate(&not_in_empty)
            .unwrap()
            .render(PlaceholderStyle::Numbered)
            .sql,
        "TRUE"
    );
}

#[test]
fn array_containment_compiles_per_backend() {
    let predicate = tags_field().contains("rust").unwrap().into_predicate();

    let pg = Postgres::new();
    let pg_sql = ExpressionCompiler::new(&pg)
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Numbered)
        .sql;
    assert_eq!(pg_sql, "(\"p\".\"props\" #> '{\"tags\"}') @> $1::jsonb");

    let lite = Sqlite::new();
    let lite_sql = ExpressionCompiler::new(&lite)
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Positional)
        .sql;
    assert_eq!(
        lite_sql,
        "EXISTS (SELECT 1 FROM json_each(\"p\".\"props\", '$.\"tags\"') WHERE json_each.value = ?)"
    );
}

#[test]
fn array_length_bounds_bind_the_operand() {
    let dialect = Postgres::new();
    let predicate = tags_field().length_gte(2).into_predicate();
    let fragment = ExpressionCompiler::new(&dialect)
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert_eq!(
        fragment.sql,
        "jsonb_array_length(\"p\".\"props\" #> '{\"tags\"}') >= $1"
    );
}

#[test]
fn object_paths_compose_with_the_field_pointer() {
    let dialect = Postgres::new();
    let object = ObjectField::new(props_field("p", "profile", ValueType::Object));
    let predicate = object
        .path_equals(
            JsonPointer::from_segments(["city"]).unwrap(),
            "Berlin",
            Some(ValueType::String),
        )
        .unwrap()
        .into_predicate();
    let fragment = ExpressionCompiler::new(&dialect)
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert_eq!(
        fragment.sql,
        "(\"p\".\"props\" #>> '{\"profile\",\"city\"}') = $1"
    );
}

#[test]
fn vector_floor_translates_cosine_scores_to_distance() {
    let dialect = Postgres::new();
    let compiler = ExpressionCompiler::new(&dialect);
    let Predicate::VectorSimilarity(vector) =
        EmbeddingField::new(props_field("f", "embedding", ValueType::Embedding))
            .nearest(vec![0.1], VectorMetric::Cosine, 8)
            .min_score(0.25)
            .build()
            .into_predicate()
    else {
        panic!("expected vector predicate");
    };
    let fragment = compiler
        .compile_vector_floor(&vector)
        .unwrap()
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert!(fragment.sql.contains("<=> $1::vector <= $2"));
}

// ----------------------------------------------------------------------
// Subquery predicates
// ----------------------------------------------------------------------

struct StubRenderer;

impl SubqueryRenderer for StubRenderer {
    fn render_subquery(&self, _query: &QueryExpr) -> Result<SqlExpr, CompileError> {
        Ok(SqlExpr::raw("SELECT 1"))
    }
}

fn single_column_subquery(value_type: ValueType) -> QueryExpr {
    QueryAst::new("s", vec!["Person".to_string()])
        .with_projection_field(
            "value",
            ProjectionSource::Field(props_field("s", "age", value_type)),
        )
        .into()
}

#[test]
fn in_subquery_requires_a_single_column() {
    let dialect = Postgres::new();
    let renderer = StubRenderer;
    let compiler = ExpressionCompiler::with_subqueries(&dialect, &renderer);
    let no_columns = QueryExpr::Query(QueryAst::new("s", vec!["Person".to_string()]));
    let predicate =
        in_subquery(props_field("p", "age", ValueType::Number), no_columns).into_predicate();

    assert!(matches!(
        compiler.compile_predicate(&predicate),
        Err(CompileError::Invariant(
            CompilerInvariantError::SubqueryColumnCount { count: 0 }
        ))
    ));
}

#[test]
fn in_subquery_rejects_type_mismatches() {
    let dialect = Postgres::new();
    let renderer = StubRenderer;
    let compiler = ExpressionCompiler::with_subqueries(&dialect, &renderer);
    let predicate = in_subquery(
        props_field("p", "name", ValueType::String),
        single_column_subquery(ValueType::Number),
    )
    .into_predicate();

    assert!(matches!(
        compiler.compile_predicate(&predicate),
        Err(CompileError::Invariant(
            CompilerInvariantError::SubqueryTypeMismatch { .. }
        ))
    ));
}

#[test]
fn in_subquery_accepts_unresolved_sides() {
    let dialect = Postgres::new();
    let renderer = StubRenderer;
    let compiler = ExpressionCompiler::with_subqueries(&dialect, &renderer);
    let predicate = in_subquery(
        props_field("p", "name", ValueType::String),
        single_column_subquery(ValueType::Unknown),
    )
    .into_predicate();
    let fragment = compiler
        .compile_predicate(&predicate)
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert!(fragment.sql.ends_with(" IN (SELECT 1)"));
}

#[test]
fn in_subquery_rejects_structural_columns() {
    let dialect = Postgres::new();
    let renderer = StubRenderer;
    let compiler = ExpressionCompiler::with_subqueries(&dialect, &renderer);
    let predicate = in_subquery(
        props_field("p", "tags", ValueType::Array),
        single_column_subquery(ValueType::Array),
    )
    .into_predicate();

    assert!(matches!(
        compiler.compile_predicate(&predicate),
        Err(CompileError::Invariant(
            CompilerInvariantError::SubqueryUnsupportedType { .. }
        ))
    ));
}

#[test]
fn exists_without_a_renderer_is_unsupported() {
    let dialect = Postgres::new();
    let compiler = ExpressionCompiler::new(&dialect);
    let predicate = crate::builder::exists(single_column_subquery(ValueType::Number))
        .into_predicate();

    assert!(matches!(
        compiler.compile_predicate(&predicate),
        Err(CompileError::UnsupportedPredicate(_))
    ));
}
