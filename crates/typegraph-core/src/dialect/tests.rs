use crate::{
    ast::{Literal, VectorMetric},
    dialect::{Dialect, PlaceholderStyle, Postgres, Sqlite},
    error::{CompileError, DialectCapabilityError, UnsupportedLiteralError},
};
use typegraph_schema::JsonPointer;

fn ptr(text: &str) -> JsonPointer {
    JsonPointer::parse(text).unwrap()
}

#[test]
fn postgres_path_text_is_stable_across_calls() {
    let pg = Postgres::new();
    let pointer = ptr("/profile/name");

    let first = pg.compile_path(&pointer);
    let second = pg.compile_path(&pointer);

    assert_eq!(first, second);
    assert_eq!(first, "'{\"profile\",\"name\"}'");
}

#[test]
fn sqlite_path_text_is_stable_across_calls() {
    let lite = Sqlite::new();
    let pointer = ptr("/profile/tags/0");

    let first = lite.compile_path(&pointer);
    let second = lite.compile_path(&pointer);

    assert_eq!(first, second);
    assert_eq!(first, "'$.\"profile\".\"tags\"[0]'");
}

#[test]
fn root_pointer_paths_compile() {
    assert_eq!(Postgres::new().compile_path(&JsonPointer::root()), "'{}'");
    assert_eq!(Sqlite::new().compile_path(&JsonPointer::root()), "'$'");
}

#[test]
fn typed_extraction_casts_differ_by_backend() {
    let pointer = ptr("/age");
    let pg = Postgres::new()
        .json_extract_number("n.\"props\"", &pointer)
        .render(PlaceholderStyle::Numbered);
    let lite = Sqlite::new()
        .json_extract_number("n.\"props\"", &pointer)
        .render(PlaceholderStyle::Positional);

    assert_eq!(pg.sql, "(n.\"props\" #>> '{\"age\"}')::numeric");
    assert_eq!(lite.sql, "CAST(json_extract(n.\"props\", '$.\"age\"') AS REAL)");
}

#[test]
fn ilike_falls_back_to_lowercasing_on_sqlite() {
    let pattern = Literal::string("%ada%");
    let pg = Postgres::new()
        .ilike("p.\"name\"", pattern.clone())
        .render(PlaceholderStyle::Numbered);
    let lite = Sqlite::new()
        .ilike("p.\"name\"", pattern)
        .render(PlaceholderStyle::Positional);

    assert_eq!(pg.sql, "p.\"name\" ILIKE $1");
    assert_eq!(lite.sql, "lower(p.\"name\") LIKE lower(?)");
}

#[test]
fn identifier_quoting_doubles_embedded_quotes() {
    assert_eq!(Postgres::new().quote_identifier("we\"ird"), "\"we\"\"ird\"");
    assert_eq!(Sqlite::new().quote_identifier("plain"), "\"plain\"");
}

#[test]
fn pgvector_distance_parameterizes_the_embedding() {
    let fragment = Postgres::new()
        .vector_distance("f.\"embedding\"", &[0.1, 0.2, 0.3], VectorMetric::Cosine)
        .unwrap()
        .render(PlaceholderStyle::Numbered);

    assert_eq!(fragment.sql, "f.\"embedding\" <=> $1::vector");
    assert_eq!(fragment.binds.len(), 1);
}

#[test]
fn sqlite_rejects_inner_product() {
    let result = Sqlite::new().vector_distance("e", &[0.0], VectorMetric::InnerProduct);

    assert!(matches!(
        result,
        Err(CompileError::DialectCapability(
            DialectCapabilityError::MetricUnsupported { .. }
        ))
    ));
}

#[test]
fn non_finite_embeddings_are_rejected_before_emission() {
    let result = Postgres::new().format_embedding(&[0.5, f64::NAN]);

    assert_eq!(
        result,
        Err(UnsupportedLiteralError::NonFiniteEmbedding { index: 1 })
    );
}

#[test]
fn cycle_checks_accumulate_per_backend() {
    let pg = Postgres::new();
    let lite = Sqlite::new();

    assert_eq!(
        pg.cycle_check("e.\"to_id\"", "r.\"path\"")
            .render(PlaceholderStyle::Numbered)
            .sql,
        "NOT (e.\"to_id\" = ANY(r.\"path\"))"
    );
    assert_eq!(
        lite.cycle_check("e.\"to_id\"", "r.\"path\"")
            .render(PlaceholderStyle::Positional)
            .sql,
        "NOT EXISTS (SELECT 1 FROM json_each(r.\"path\") WHERE json_each.value = e.\"to_id\")"
    );
}
