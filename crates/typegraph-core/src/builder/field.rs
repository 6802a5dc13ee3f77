use crate::{
    ast::{
        AggregateExpr, AggregateFunction, ArrayMatchOp, CompareOp, ComparisonRhs, FieldRef,
        Literal, LiteralInput, NullCheckOp, ObjectMatchOp, Parameter, Predicate, StringMatchOp,
        VectorMetric, VectorPredicate, coerce,
    },
    builder::Expr,
    error::UnsupportedLiteralError,
};
use serde_json::Value as Json;
use typegraph_schema::{JsonPointer, ValueType};

///
/// Typed field builders
///
/// Each wrapper carries the target field reference and exposes the
/// operator methods valid for its value type. Operator methods coerce
/// their inputs against the field's declared type and return fresh
/// expressions; the field builder itself is freely reusable.
///

fn comparison(field: &FieldRef, op: CompareOp, literal: Literal) -> Expr {
    Expr::new(Predicate::Comparison {
        field: field.clone(),
        op,
        rhs: ComparisonRhs::Scalar(literal),
    })
}

fn coerced_comparison(
    field: &FieldRef,
    op: CompareOp,
    value: impl Into<LiteralInput>,
    preferred: ValueType,
) -> Result<Expr, UnsupportedLiteralError> {
    Ok(comparison(field, op, coerce(value, Some(preferred))?))
}

fn membership<I, V>(
    field: &FieldRef,
    op: CompareOp,
    values: I,
    preferred: ValueType,
) -> Result<Expr, UnsupportedLiteralError>
where
    I: IntoIterator<Item = V>,
    V: Into<LiteralInput>,
{
    let literals = values
        .into_iter()
        .map(|value| coerce(value, Some(preferred)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Expr::new(Predicate::Comparison {
        field: field.clone(),
        op,
        rhs: ComparisonRhs::List(literals),
    }))
}

fn null_check(field: &FieldRef, op: NullCheckOp) -> Expr {
    Expr::new(Predicate::NullCheck {
        field: field.clone(),
        op,
    })
}

fn param_comparison(field: &FieldRef, op: CompareOp, parameter: Parameter) -> Expr {
    Expr::new(Predicate::Comparison {
        field: field.clone(),
        op,
        rhs: ComparisonRhs::Param(parameter),
    })
}

///
/// StringField
///

#[derive(Clone, Debug)]
pub struct StringField {
    field: FieldRef,
}

impl StringField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    pub fn eq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Eq, value, ValueType::String)
    }

    pub fn neq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Neq, value, ValueType::String)
    }

    pub fn in_list<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        membership(&self.field, CompareOp::In, values, ValueType::String)
    }

    pub fn not_in_list<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        membership(&self.field, CompareOp::NotIn, values, ValueType::String)
    }

    fn string_match(
        &self,
        op: StringMatchOp,
        pattern: impl Into<String>,
    ) -> Expr {
        Expr::new(Predicate::StringMatch {
            field: self.field.clone(),
            op,
            pattern: Literal::string(pattern),
        })
    }

    #[must_use]
    pub fn contains(&self, pattern: impl Into<String>) -> Expr {
        self.string_match(StringMatchOp::Contains, pattern)
    }

    #[must_use]
    pub fn starts_with(&self, pattern: impl Into<String>) -> Expr {
        self.string_match(StringMatchOp::StartsWith, pattern)
    }

    #[must_use]
    pub fn ends_with(&self, pattern: impl Into<String>) -> Expr {
        self.string_match(StringMatchOp::EndsWith, pattern)
    }

    /// Raw LIKE pattern, wildcards caller-supplied.
    #[must_use]
    pub fn like(&self, pattern: impl Into<String>) -> Expr {
        self.string_match(StringMatchOp::Like, pattern)
    }

    /// Case-insensitive LIKE, falling back to lower-casing on dialects
    /// without native ILIKE.
    #[must_use]
    pub fn ilike(&self, pattern: impl Into<String>) -> Expr {
        self.string_match(StringMatchOp::Ilike, pattern)
    }

    #[must_use]
    pub fn is_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNull)
    }

    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNotNull)
    }

    #[must_use]
    pub fn param(&self, op: CompareOp, name: impl Into<String>) -> Expr {
        param_comparison(&self.field, op, Parameter::new(name, ValueType::String))
    }
}

///
/// NumberField
///

#[derive(Clone, Debug)]
pub struct NumberField {
    field: FieldRef,
}

impl NumberField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    pub fn eq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Eq, value, ValueType::Number)
    }

    pub fn neq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Neq, value, ValueType::Number)
    }

    pub fn gt(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Gt, value, ValueType::Number)
    }

    pub fn gte(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Gte, value, ValueType::Number)
    }

    pub fn lt(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Lt, value, ValueType::Number)
    }

    pub fn lte(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Lte, value, ValueType::Number)
    }

    pub fn between(
        &self,
        lower: impl Into<LiteralInput>,
        upper: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        Ok(Expr::new(Predicate::Between {
            field: self.field.clone(),
            lower: coerce(lower, Some(ValueType::Number))?,
            upper: coerce(upper, Some(ValueType::Number))?,
        }))
    }

    pub fn in_list<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        membership(&self.field, CompareOp::In, values, ValueType::Number)
    }

    pub fn not_in_list<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        membership(&self.field, CompareOp::NotIn, values, ValueType::Number)
    }

    #[must_use]
    pub fn is_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNull)
    }

    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNotNull)
    }

    #[must_use]
    pub fn param(&self, op: CompareOp, name: impl Into<String>) -> Expr {
        param_comparison(&self.field, op, Parameter::new(name, ValueType::Number))
    }
}

///
/// BooleanField
///

#[derive(Clone, Debug)]
pub struct BooleanField {
    field: FieldRef,
}

impl BooleanField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    pub fn eq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Eq, value, ValueType::Boolean)
    }

    pub fn neq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Neq, value, ValueType::Boolean)
    }

    #[must_use]
    pub fn is_true(&self) -> Expr {
        comparison(&self.field, CompareOp::Eq, Literal::boolean(true))
    }

    #[must_use]
    pub fn is_false(&self) -> Expr {
        comparison(&self.field, CompareOp::Eq, Literal::boolean(false))
    }

    #[must_use]
    pub fn is_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNull)
    }

    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNotNull)
    }
}

///
/// DateField
///
/// Accepts `chrono` datetimes or ISO-8601 strings; string inputs retag
/// without parsing.
///

#[derive(Clone, Debug)]
pub struct DateField {
    field: FieldRef,
}

impl DateField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    pub fn eq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Eq, value, ValueType::Date)
    }

    pub fn before(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Lt, value, ValueType::Date)
    }

    pub fn at_or_before(
        &self,
        value: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Lte, value, ValueType::Date)
    }

    pub fn after(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Gt, value, ValueType::Date)
    }

    pub fn at_or_after(
        &self,
        value: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        coerced_comparison(&self.field, CompareOp::Gte, value, ValueType::Date)
    }

    pub fn between(
        &self,
        lower: impl Into<LiteralInput>,
        upper: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        Ok(Expr::new(Predicate::Between {
            field: self.field.clone(),
            lower: coerce(lower, Some(ValueType::Date))?,
            upper: coerce(upper, Some(ValueType::Date))?,
        }))
    }

    #[must_use]
    pub fn is_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNull)
    }

    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        null_check(&self.field, NullCheckOp::IsNotNull)
    }
}

///
/// ArrayField
///

#[derive(Clone, Debug)]
pub struct ArrayField {
    field: FieldRef,
}

impl ArrayField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    fn element_type(&self) -> ValueType {
        self.field.element_type.unwrap_or(ValueType::Unknown)
    }

    fn values_test<I, V>(
        &self,
        op: ArrayMatchOp,
        values: I,
    ) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        let preferred = self.element_type();
        let literals = values
            .into_iter()
            .map(|value| coerce(value, Some(preferred)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Expr::new(Predicate::ArrayMatch {
            field: self.field.clone(),
            op,
            values: literals,
            length: None,
        }))
    }

    fn length_test(&self, op: ArrayMatchOp, length: u64) -> Expr {
        Expr::new(Predicate::ArrayMatch {
            field: self.field.clone(),
            op,
            values: Vec::new(),
            length: Some(length),
        })
    }

    pub fn contains(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.values_test(ArrayMatchOp::Contains, [value])
    }

    pub fn contains_all<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        self.values_test(ArrayMatchOp::ContainsAll, values)
    }

    pub fn contains_any<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        self.values_test(ArrayMatchOp::ContainsAny, values)
    }

    #[must_use]
    pub fn is_empty(&self) -> Expr {
        Expr::new(Predicate::ArrayMatch {
            field: self.field.clone(),
            op: ArrayMatchOp::IsEmpty,
            values: Vec::new(),
            length: None,
        })
    }

    #[must_use]
    pub fn is_not_empty(&self) -> Expr {
        Expr::new(Predicate::ArrayMatch {
            field: self.field.clone(),
            op: ArrayMatchOp::IsNotEmpty,
            values: Vec::new(),
            length: None,
        })
    }

    #[must_use]
    pub fn length_eq(&self, length: u64) -> Expr {
        self.length_test(ArrayMatchOp::LengthEq, length)
    }

    #[must_use]
    pub fn length_gt(&self, length: u64) -> Expr {
        self.length_test(ArrayMatchOp::LengthGt, length)
    }

    #[must_use]
    pub fn length_gte(&self, length: u64) -> Expr {
        self.length_test(ArrayMatchOp::LengthGte, length)
    }

    #[must_use]
    pub fn length_lt(&self, length: u64) -> Expr {
        self.length_test(ArrayMatchOp::LengthLt, length)
    }

    #[must_use]
    pub fn length_lte(&self, length: u64) -> Expr {
        self.length_test(ArrayMatchOp::LengthLte, length)
    }
}

///
/// ObjectField
///
/// Pointer-addressed tests inside an object-typed props field. Pointers
/// are relative to the field itself.
///

#[derive(Clone, Debug)]
pub struct ObjectField {
    field: FieldRef,
}

impl ObjectField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    fn object_test(
        &self,
        op: ObjectMatchOp,
        pointer: JsonPointer,
        value: Option<Literal>,
        value_type: Option<ValueType>,
    ) -> Expr {
        Expr::new(Predicate::ObjectMatch {
            field: self.field.clone(),
            op,
            pointer,
            value,
            value_type,
            element_type: None,
        })
    }

    #[must_use]
    pub fn has_key(&self, pointer: JsonPointer) -> Expr {
        self.object_test(ObjectMatchOp::HasKey, pointer, None, None)
    }

    #[must_use]
    pub fn has_path(&self, pointer: JsonPointer) -> Expr {
        self.object_test(ObjectMatchOp::HasPath, pointer, None, None)
    }

    pub fn path_equals(
        &self,
        pointer: JsonPointer,
        value: impl Into<LiteralInput>,
        value_type: Option<ValueType>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        let literal = coerce(value, value_type)?;

        Ok(self.object_test(
            ObjectMatchOp::PathEquals,
            pointer,
            Some(literal),
            value_type,
        ))
    }

    /// The array at `pointer` contains the given JSON value.
    #[must_use]
    pub fn path_contains(&self, pointer: JsonPointer, value: Json) -> Expr {
        self.object_test(
            ObjectMatchOp::PathContains,
            pointer,
            Some(Literal::json(value)),
            None,
        )
    }

    #[must_use]
    pub fn path_is_null(&self, pointer: JsonPointer) -> Expr {
        self.object_test(ObjectMatchOp::PathIsNull, pointer, None, None)
    }

    #[must_use]
    pub fn path_is_not_null(&self, pointer: JsonPointer) -> Expr {
        self.object_test(ObjectMatchOp::PathIsNotNull, pointer, None, None)
    }
}

///
/// EmbeddingField
///

#[derive(Clone, Debug)]
pub struct EmbeddingField {
    field: FieldRef,
}

impl EmbeddingField {
    #[must_use]
    pub const fn new(field: FieldRef) -> Self {
        Self { field }
    }

    /// Start a nearest-neighbor constraint against this field.
    #[must_use]
    pub fn nearest(
        &self,
        query_embedding: Vec<f64>,
        metric: VectorMetric,
        limit: u64,
    ) -> NearestNeighbors {
        NearestNeighbors {
            inner: VectorPredicate {
                field: self.field.clone(),
                query_embedding,
                metric,
                limit,
                min_score: None,
            },
        }
    }
}

///
/// NearestNeighbors
///

#[derive(Clone, Debug)]
pub struct NearestNeighbors {
    inner: VectorPredicate,
}

impl NearestNeighbors {
    /// Attach a similarity floor. Range is metric-specific and validated
    /// by the vector pass.
    #[must_use]
    pub const fn min_score(mut self, min_score: f64) -> Self {
        self.inner.min_score = Some(min_score);
        self
    }

    #[must_use]
    pub fn build(self) -> Expr {
        Expr::new(Predicate::VectorSimilarity(self.inner))
    }
}

///
/// AggregateField
///
/// HAVING-side comparisons against an aggregate output.
///

#[derive(Clone, Debug)]
pub struct AggregateField {
    aggregate: AggregateExpr,
}

impl AggregateField {
    #[must_use]
    pub const fn new(function: AggregateFunction, field: FieldRef) -> Self {
        Self {
            aggregate: AggregateExpr { function, field },
        }
    }

    fn compare(
        &self,
        op: CompareOp,
        value: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        let preferred = self
            .aggregate
            .function
            .output_type(&self.aggregate.field)
            .unwrap_or(ValueType::Unknown);

        Ok(Expr::new(Predicate::AggregateCompare {
            aggregate: self.aggregate.clone(),
            op,
            value: coerce(value, Some(preferred))?,
        }))
    }

    pub fn eq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Eq, value)
    }

    pub fn gt(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Gte, value)
    }

    pub fn lt(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Lte, value)
    }
}
