use crate::{
    ast::{
        AggregateExpr, AggregateFunction, CyclePolicy, FieldRef, OrderKey, ProjectionSource,
        QueryAst, QueryExpr, SetOperation, SetOperator, SortDirection, Traversal,
        VariableLengthSpec, VectorMetric,
    },
    builder::{EmbeddingField, NumberField, StringField},
    compile::compile_query,
    dialect::Postgres,
    plan::{PlanNode, PlanOp},
};
use typegraph_schema::{FieldTypeInfo, JsonPointer, ValueType};

fn string_field(alias: &str, name: &str) -> StringField {
    StringField::new(FieldRef::typed_props(
        alias,
        JsonPointer::from_segments([name]).unwrap(),
        FieldTypeInfo::new(ValueType::String),
    ))
}

fn number_field(alias: &str, name: &str) -> NumberField {
    NumberField::new(FieldRef::typed_props(
        alias,
        JsonPointer::from_segments([name]).unwrap(),
        FieldTypeInfo::new(ValueType::Number),
    ))
}

fn embedding_field(alias: &str) -> EmbeddingField {
    EmbeddingField::new(FieldRef::typed_props(
        alias,
        JsonPointer::from_segments(["embedding"]).unwrap(),
        FieldTypeInfo::new(ValueType::Embedding),
    ))
}

fn knows_traversal() -> Traversal {
    Traversal::out(
        "p",
        "e",
        vec!["knows".to_string()],
        "f",
        vec!["Person".to_string()],
    )
}

fn person_query() -> QueryAst {
    QueryAst::new("p", vec!["Person".to_string()])
}

fn plan_for(ast: QueryAst) -> PlanNode {
    compile_query(&QueryExpr::Query(ast), &Postgres::new())
        .unwrap()
        .plan
}

#[test]
fn simple_filter_scenario() {
    let ast = person_query()
        .with_predicate("p", string_field("p", "name").eq("Alice").unwrap().into())
        .with_limit(25);
    let plan = plan_for(ast);

    assert_eq!(
        plan.op_chain(),
        [
            PlanOp::Project,
            PlanOp::LimitOffset,
            PlanOp::Filter,
            PlanOp::Scan,
        ]
    );
    let PlanNode::Project { input, .. } = &plan else {
        panic!("expected project root");
    };
    let PlanNode::LimitOffset { limit, .. } = input.as_ref() else {
        panic!("expected limit under project");
    };
    assert_eq!(*limit, Some(25));
}

#[test]
fn traversal_with_vector_scenario() {
    let vector = embedding_field("f")
        .nearest(vec![0.1, 0.2, 0.3], VectorMetric::Cosine, 8)
        .build();
    let ast = person_query()
        .with_traversal(knows_traversal())
        .with_predicate("f", vector.into());
    let plan = plan_for(ast);

    assert_eq!(
        plan.op_chain(),
        [
            PlanOp::Project,
            PlanOp::LimitOffset,
            PlanOp::VectorKnn,
            PlanOp::Filter,
            PlanOp::Join,
            PlanOp::Scan,
        ]
    );
    let PlanNode::Project { input, .. } = &plan else {
        panic!("expected project root");
    };
    let PlanNode::LimitOffset { limit, .. } = input.as_ref() else {
        panic!("expected limit under project");
    };
    assert_eq!(*limit, Some(8), "vector limit caps the effective limit");
}

#[test]
fn group_by_scenario() {
    let id_field = FieldRef::typed_column("p", "id", ValueType::String);
    let mut ast = person_query().with_projection_field(
        "count",
        ProjectionSource::Aggregate(AggregateExpr {
            function: AggregateFunction::Count,
            field: id_field.clone(),
        }),
    );
    ast.group_by = vec![id_field];
    let plan = plan_for(ast);

    assert_eq!(
        plan.op_chain(),
        [PlanOp::Project, PlanOp::Aggregate, PlanOp::Scan]
    );
}

#[test]
fn recursive_scenario() {
    let traversal = knows_traversal().with_variable_length(VariableLengthSpec {
        min_depth: 1,
        max_depth: 5,
        cycle_policy: CyclePolicy::Prevent,
        path_alias: None,
        depth_alias: None,
    });
    let ast = person_query()
        .with_traversal(traversal)
        .with_predicate("p", string_field("p", "name").eq("Alice").unwrap().into())
        .with_predicate("e", number_field("e", "weight").gt(1i64).unwrap().into())
        .with_predicate("f", string_field("f", "name").contains("li").into())
        .with_limit(20);
    let plan = plan_for(ast);

    assert_eq!(
        plan.op_chain(),
        [
            PlanOp::Project,
            PlanOp::LimitOffset,
            PlanOp::Filter,
            PlanOp::Filter,
            PlanOp::RecursiveExpand,
            PlanOp::Filter,
            PlanOp::Scan,
        ]
    );
}

#[test]
fn nested_set_operation_scenario() {
    let member = |name: &str| {
        person_query().with_predicate("p", string_field("p", "name").eq(name).unwrap().into())
    };
    let inner = SetOperation::new(SetOperator::Except, member("Bob"), member("Carol"));
    let mut outer = SetOperation::new(SetOperator::Union, member("Alice"), inner);
    outer.order_by = vec![OrderKey {
        field: FieldRef::typed_column("p", "id", ValueType::String),
        direction: SortDirection::Asc,
    }];
    outer.limit = Some(10);
    outer.offset = Some(5);

    let plan = compile_query(&QueryExpr::from(outer), &Postgres::new())
        .unwrap()
        .plan;

    assert_eq!(
        plan.op_chain(),
        [
            PlanOp::LimitOffset,
            PlanOp::Sort,
            PlanOp::SetOp,
            PlanOp::Project,
            PlanOp::Filter,
            PlanOp::Scan,
            PlanOp::SetOp,
            PlanOp::Project,
            PlanOp::Filter,
            PlanOp::Scan,
            PlanOp::Project,
            PlanOp::Filter,
            PlanOp::Scan,
        ]
    );
}

#[test]
fn full_standard_operator_order_law() {
    let vector = embedding_field("f")
        .nearest(vec![0.5, 0.5], VectorMetric::L2, 16)
        .build();
    let id_field = FieldRef::typed_column("p", "id", ValueType::String);
    let mut ast = person_query()
        .with_traversal(knows_traversal())
        .with_predicate("p", string_field("p", "name").starts_with("A").into())
        .with_predicate("f", vector.into())
        .with_limit(50);
    ast.group_by = vec![id_field.clone()];
    ast.order_by = vec![OrderKey {
        field: id_field,
        direction: SortDirection::Desc,
    }];
    let plan = plan_for(ast);

    assert_eq!(
        plan.op_chain(),
        [
            PlanOp::Project,
            PlanOp::LimitOffset,
            PlanOp::Sort,
            PlanOp::Aggregate,
            PlanOp::VectorKnn,
            PlanOp::Filter,
            PlanOp::Join,
            PlanOp::Filter,
            PlanOp::Scan,
        ]
    );
}

#[test]
fn unknown_predicate_alias_is_rejected() {
    let ast = person_query()
        .with_predicate("ghost", string_field("ghost", "name").eq("x").unwrap().into());

    assert!(compile_query(&QueryExpr::Query(ast), &Postgres::new()).is_err());
}

#[test]
fn optional_traversals_survive_lowering() {
    let mut traversal = knows_traversal();
    traversal.optional = true;
    let ast = person_query().with_traversal(traversal);
    let plan = plan_for(ast);

    let PlanNode::Project { input, .. } = &plan else {
        panic!("expected project root");
    };
    let PlanNode::Join { traversal, .. } = input.as_ref() else {
        panic!("expected join under project");
    };
    assert!(traversal.optional);
}

#[test]
fn display_renders_root_first() {
    let ast = person_query()
        .with_predicate("p", string_field("p", "name").eq("Alice").unwrap().into())
        .with_limit(1);
    let rendered = plan_for(ast).to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    assert!(lines[0].starts_with("project"));
    assert!(lines[lines.len() - 1].trim_start().starts_with("scan"));
}
