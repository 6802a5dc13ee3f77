use crate::{
    ast::{ComparisonRhs, FieldRef, Predicate},
    builder::{Expr, NumberField, StringField},
};
use typegraph_schema::{JsonPointer, ValueType};

fn name_field() -> StringField {
    let ptr = JsonPointer::parse("/name").unwrap();
    StringField::new(FieldRef::typed_props(
        "p",
        ptr,
        typegraph_schema::FieldTypeInfo::new(ValueType::String),
    ))
}

fn age_field() -> NumberField {
    let ptr = JsonPointer::parse("/age").unwrap();
    NumberField::new(FieldRef::typed_props(
        "p",
        ptr,
        typegraph_schema::FieldTypeInfo::new(ValueType::Number),
    ))
}

#[test]
fn and_is_binary_in_given_order() {
    let left = name_field().eq("Alice").unwrap();
    let right = age_field().gt(30i64).unwrap();
    let combined = left.and(&right);

    let Predicate::And(children) = combined.predicate() else {
        panic!("expected And");
    };
    assert_eq!(children.len(), 2);
    assert_eq!(&children[0], left.predicate());
    assert_eq!(&children[1], right.predicate());
}

#[test]
fn nested_and_is_not_flattened() {
    let a = name_field().eq("a").unwrap();
    let b = name_field().eq("b").unwrap();
    let c = name_field().eq("c").unwrap();
    let nested = a.and(&b).and(&c);

    let Predicate::And(outer) = nested.predicate() else {
        panic!("expected And");
    };
    assert_eq!(outer.len(), 2);
    assert!(matches!(outer[0], Predicate::And(ref inner) if inner.len() == 2));
}

#[test]
fn double_negation_is_preserved() {
    let base = age_field().lt(10i64).unwrap();
    let double = base.not().not();

    let Predicate::Not(inner) = double.predicate() else {
        panic!("expected Not");
    };
    let Predicate::Not(innermost) = inner.as_ref() else {
        panic!("expected nested Not");
    };
    assert_eq!(innermost.as_ref(), base.predicate());
}

#[test]
fn combinators_do_not_mutate_operands() {
    let left = name_field().eq("Alice").unwrap();
    let right = age_field().between(20i64, 30i64).unwrap();
    let left_before = left.clone();
    let right_before = right.clone();

    let _ = left.and(&right);
    let _ = left.or(&right);
    let _ = left.not();
    let _ = right.not();

    assert_eq!(left, left_before);
    assert_eq!(right, right_before);
}

#[test]
fn in_list_builds_the_list_rhs() {
    let expr = name_field().in_list(["a", "b"]).unwrap();

    let Predicate::Comparison { rhs, op, .. } = expr.predicate() else {
        panic!("expected Comparison");
    };
    assert!(op.takes_list());
    let ComparisonRhs::List(values) = rhs else {
        panic!("expected List rhs");
    };
    assert_eq!(values.len(), 2);
}

#[test]
fn scalar_comparisons_never_carry_lists() {
    let expr = age_field().eq(1i64).unwrap();

    let Predicate::Comparison { rhs, op, .. } = expr.predicate() else {
        panic!("expected Comparison");
    };
    assert!(!op.takes_list());
    assert!(matches!(rhs, ComparisonRhs::Scalar(_)));
}

#[test]
fn or_clones_share_no_observable_state() {
    let a = name_field().eq("x").unwrap();
    let b = name_field().eq("y").unwrap();
    let first = a.or(&b);
    let second = a.or(&b);

    assert_eq!(first, second);
}

mod property {
    use super::{Expr, age_field, name_field};
    use proptest::prelude::*;

    fn arb_leaf() -> impl Strategy<Value = Expr> {
        prop_oneof![
            "[a-z]{1,8}".prop_map(|s| name_field().eq(s).unwrap()),
            any::<i32>().prop_map(|n| age_field().eq(n).unwrap()),
            any::<i32>().prop_map(|n| age_field().gte(n).unwrap()),
        ]
    }

    proptest! {
        #[test]
        fn immutability_holds_for_every_combinator(
            left in arb_leaf(),
            right in arb_leaf(),
            pick in 0u8..3,
        ) {
            let left_before = left.clone();
            let right_before = right.clone();

            let _ = match pick {
                0 => left.and(&right),
                1 => left.or(&right),
                _ => left.not(),
            };

            prop_assert_eq!(left, left_before);
            prop_assert_eq!(right, right_before);
        }
    }
}
